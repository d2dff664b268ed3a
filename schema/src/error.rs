//! Schema and field codec errors.

use bitstream::StreamError;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building, reading, or writing records.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A value does not match the field's declared kind.
    #[error("type mismatch: field declared as {expected}, value is {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A bit-flag vector's length disagrees with its declared width.
    #[error("bit-flag vector has {actual} flags, declared width is {expected}")]
    BitFlagLength { expected: usize, actual: usize },

    /// A text character cannot be stored in a single byte.
    #[error("character {ch:?} cannot be encoded as a single byte")]
    TextOutOfRange { ch: char },

    /// No field exists at the given name or path.
    #[error("no field named `{name}`")]
    UnknownField { name: String },

    /// A version string is not `major.minor.patch`.
    #[error("invalid format version `{text}`")]
    InvalidVersion { text: String },

    /// Byte-level read or write failure.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
