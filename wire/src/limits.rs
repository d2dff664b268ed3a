//! Configurable limits for bounded decoding.

/// Limits enforced while decoding a replay stream.
///
/// These bound memory use on hostile or corrupt input. The codec checks
/// frame and chunk limits; the container header check happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum declared payload size in bytes.
    pub max_payload_bytes: usize,

    /// Maximum normalized frame index accepted into a timeline buffer.
    pub max_frame_index: usize,

    /// Maximum number of multi-part patch chunks in one stream.
    pub max_message_chunks: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Long sessions stay well under this
            max_payload_bytes: 256 * 1024 * 1024,

            // Eight hours at 60 frames per second
            max_frame_index: 60 * 60 * 60 * 8,
            max_message_chunks: 4096,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_payload_bytes: 64 * 1024,
            max_frame_index: 4096,
            max_message_chunks: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_payload_bytes: usize::MAX,
            max_frame_index: usize::MAX,
            max_message_chunks: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_payload_bytes() {
        let limits = Limits::default();
        assert_eq!(limits.max_payload_bytes, 256 * 1024 * 1024);
    }

    #[test]
    fn default_limits_cover_long_sessions() {
        let limits = Limits::default();
        assert_eq!(limits.max_frame_index, 1_728_000);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_payload_bytes < default_limits.max_payload_bytes);
        assert!(test_limits.max_frame_index < default_limits.max_frame_index);
        assert!(test_limits.max_message_chunks < default_limits.max_message_chunks);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_payload_bytes, usize::MAX);
        assert_eq!(limits.max_frame_index, usize::MAX);
        assert_eq!(limits.max_message_chunks, usize::MAX);
    }

    #[test]
    fn limits_clone_eq() {
        let limits = Limits::for_testing();
        assert_eq!(limits.clone(), limits);
    }
}
