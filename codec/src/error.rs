//! Error and warning types for codec operations.

use std::fmt;

use bitstream::StreamError;
use schema::SchemaError;
use thiserror::Error;
use wire::{LimitKind, WireError};

use crate::records::RecordKind;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that abort a decode or encode.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Byte-level read or write failure.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Container or payload table error.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Field or record codec error.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A record's encoded length disagrees with the payload size table.
    #[error(
        "command 0x{command:02X} at offset {offset}: payload size table declares {expected} bytes, record has {actual}"
    )]
    PayloadSizeMismatch {
        command: u8,
        expected: usize,
        actual: usize,
        offset: u64,
    },

    /// A command byte is neither handled nor declared in the size table.
    #[error("unknown command 0x{command:02X} at offset {offset}")]
    UnknownCommand { command: u8, offset: u64 },

    /// A handled command has no entry in the payload size table.
    #[error("command 0x{command:02X} has no entry in the payload size table")]
    MissingPayloadSize { command: u8 },

    /// Consumed payload bytes do not match the container header.
    #[error("container declares {declared} payload bytes, stream framed {consumed}")]
    TruncatedOrOverrunStream { declared: u64, consumed: u64 },

    /// A record skips ahead of a frame buffer's next index.
    #[error("{kind} at frame index {index} leaves a gap after {len} buffered frames")]
    FrameGap {
        kind: RecordKind,
        index: usize,
        len: usize,
    },

    /// A frame number is below the first frame of a game.
    #[error("frame number {frame} precedes the first frame")]
    FrameOutOfRange { frame: i32 },

    /// A player slot field is outside the four ports.
    #[error("player index {player_index} is out of range")]
    InvalidPlayerSlot { player_index: u8 },

    /// A template lacks a field the codec needs.
    #[error("{kind} record has no usable `{field}` field")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    /// No template was supplied for a record kind.
    #[error("no template for {kind}")]
    MissingTemplate { kind: RecordKind },

    /// Limits exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Which timeline a rollback was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Record(RecordKind),
    Items,
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(kind) => write!(f, "{kind}"),
            Self::Items => f.write_str("item"),
        }
    }
}

/// Non-fatal conditions observed while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A sized but unhandled command was skipped.
    SkippedCommand { command: u8, size: usize, offset: u64 },

    /// A re-sent frame discarded previously buffered records.
    Rollback {
        timeline: Timeline,
        frame: i32,
        discarded: usize,
    },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedCommand {
                command,
                size,
                offset,
            } => write!(
                f,
                "skipped unhandled command 0x{command:02X} ({size} bytes) at offset {offset}"
            ),
            Self::Rollback {
                timeline,
                frame,
                discarded,
            } => write!(
                f,
                "rollback to frame {frame} discarded {discarded} buffered {timeline} records"
            ),
        }
    }
}
