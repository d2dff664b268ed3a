//! Error types for wire format operations.

use std::fmt;

use bitstream::StreamError;
use thiserror::Error;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while framing or unframing a replay container.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WireError {
    /// The container does not start with the expected prefix.
    #[error("invalid container magic: {found:02X?}")]
    InvalidMagic { found: [u8; 11] },

    /// The first record of the payload is not the payload size table.
    #[error("payload must begin with the payload size table, found command 0x{found:02X}")]
    MissingPayloadTable { found: u8 },

    /// The payload size table's declared length is not `1 + 3n`.
    #[error("malformed payload size table: declared length {declared_len} is not 1 + 3n")]
    MalformedPayloadTable { declared_len: u8 },

    /// A command byte appears twice in the payload size table.
    #[error("duplicate command 0x{command:02X} in payload size table")]
    DuplicateCommand { command: u8 },

    /// Too many entries to describe with a one-byte table length.
    #[error("payload size table cannot hold {entries} entries")]
    TableOverflow { entries: usize },

    /// Limits exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Byte-level read or write failure.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Specific limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PayloadBytes,
    FrameIndex,
    MessageChunks,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PayloadBytes => "payload bytes",
            Self::FrameIndex => "frame index",
            Self::MessageChunks => "message chunks",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_magic() {
        let err = WireError::InvalidMagic { found: [0xAB; 11] };
        assert!(err.to_string().contains("AB"));
    }

    #[test]
    fn display_malformed_table() {
        let err = WireError::MalformedPayloadTable { declared_len: 5 };
        let msg = err.to_string();
        assert!(msg.contains("malformed"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn display_limits_exceeded() {
        let err = WireError::LimitsExceeded {
            kind: LimitKind::MessageChunks,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("message chunks"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn display_duplicate_command() {
        let err = WireError::DuplicateCommand { command: 0x37 };
        assert!(err.to_string().contains("0x37"));
    }

    #[test]
    fn stream_errors_convert() {
        let err: WireError = StreamError::ShortRead {
            offset: 0,
            requested: 4,
            available: 0,
        }
        .into();
        assert!(matches!(err, WireError::Stream(_)));
    }
}
