//! Big-endian byte primitives for the slp replay codec.
//!
//! This crate provides [`ByteReader`] and [`ByteWriter`] for byte-level
//! encoding and decoding over any `std::io` source or sink, plus
//! most-significant-bit-first flag packing.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Exact reads** - A read either produces the full value or a structured error.
//! - **Offset tracking** - Readers and writers count bytes so framing layers can audit sizes.
//! - **No domain knowledge** - This crate knows nothing about replays, records, or commands.
//!
//! # Example
//!
//! ```
//! use bitstream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new(Vec::new());
//! writer.write_u16(0xBEEF).unwrap();
//! writer.write_i8(-2).unwrap();
//!
//! let bytes = writer.into_inner();
//! assert_eq!(bytes, [0xBE, 0xEF, 0xFE]);
//!
//! let mut reader = ByteReader::new(bytes.as_slice());
//! assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
//! assert_eq!(reader.read_i8().unwrap(), -2);
//! assert_eq!(reader.position(), 3);
//! ```

mod error;
mod flags;
mod reader;
mod writer;

pub use error::{StreamError, StreamResult};
pub use flags::{pack_flags, unpack_flags, MAX_FLAG_BITS};
pub use reader::ByteReader;
pub use writer::ByteWriter;
