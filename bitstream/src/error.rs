//! Error types for byte stream operations.

use std::io;

use thiserror::Error;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur during byte-level encoding/decoding.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The source ran out of bytes before a read completed.
    #[error("short read at offset {offset}: requested {requested} bytes but only {available} available")]
    ShortRead {
        /// Stream offset at which the read started.
        offset: u64,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes that were actually available.
        available: usize,
    },

    /// The underlying source or sink failed.
    #[error("i/o error at offset {offset}: {source}")]
    Io {
        /// Stream offset at which the operation started.
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Invalid bit count for a flag packing operation.
    #[error("invalid bit count {bits}, maximum allowed is {max_bits}")]
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: usize,
        /// Maximum allowed bits for this operation.
        max_bits: usize,
    },

    /// A back-patch targeted bytes that have not been written yet.
    #[error("cannot patch {len} bytes at offset {offset}: only {written} bytes written")]
    PatchOutOfRange {
        offset: u64,
        len: usize,
        written: u64,
    },
}

impl StreamError {
    /// Returns `true` if this error was caused by running out of input.
    #[must_use]
    pub const fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_short_read() {
        let err = StreamError::ShortRead {
            offset: 17,
            requested: 4,
            available: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 17"), "should mention the offset");
        assert!(msg.contains("4 bytes"), "should mention requested bytes");
        assert!(msg.contains("1 available"), "should mention available bytes");
    }

    #[test]
    fn error_display_io() {
        let err = StreamError::Io {
            offset: 3,
            source: io::Error::new(io::ErrorKind::WriteZero, "sink full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 3"));
        assert!(msg.contains("sink full"));
    }

    #[test]
    fn error_display_invalid_bit_count() {
        let err = StreamError::InvalidBitCount {
            bits: 40,
            max_bits: 32,
        };
        let msg = err.to_string();
        assert!(msg.contains("40"), "should mention invalid count");
        assert!(msg.contains("32"), "should mention maximum");
    }

    #[test]
    fn short_read_predicate() {
        let err = StreamError::ShortRead {
            offset: 0,
            requested: 1,
            available: 0,
        };
        assert!(err.is_short_read());
        let err = StreamError::InvalidBitCount {
            bits: 33,
            max_bits: 32,
        };
        assert!(!err.is_short_read());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<StreamError>();
    }
}
