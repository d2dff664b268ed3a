//! Versioned field descriptors and record codec for the slp replay codec.
//!
//! This crate defines how replay records are described and moved on and
//! off the wire:
//! - Typed leaf fields (integers, floats, bit flags, byte arrays, text)
//! - Records: ordered, named, nestable groups of fields and sequences
//! - Format versions that gate when a field first appears in a stream
//!
//! # Design Principles
//!
//! - **Runtime schemas** - Records are built at runtime and can be overridden.
//! - **Declaration order is wire order** - No reflection, no reordering.
//! - **Gated, not optional** - A field older streams lack is skipped, never guessed.
//!
//! # Example
//!
//! ```
//! use bitstream::ByteReader;
//! use schema::{Field, FormatVersion, Record};
//!
//! let mut record = Record::builder()
//!     .field("frame_number", Field::i32(0))
//!     .field("percent", Field::f32(0.0).since(FormatVersion::new(1, 4, 0)))
//!     .build();
//!
//! // A 1.0.0 stream has no percent field, so only four bytes are read.
//! let bytes = [0xFF, 0xFF, 0xFF, 0x85];
//! let mut reader = ByteReader::new(&bytes[..]);
//! record.read(&mut reader, FormatVersion::new(1, 0, 0), &[]).unwrap();
//!
//! assert_eq!(reader.position(), 4);
//! assert_eq!(record.field("frame_number").and_then(|f| f.as_i32()), Some(-123));
//! ```

mod error;
mod field;
mod record;
mod version;

pub use error::{SchemaError, SchemaResult};
pub use field::{Field, FieldKind, FieldValue, FlagWidth};
pub use record::{Node, Record, RecordBuilder};
pub use version::FormatVersion;
