//! Container framing for the slp replay codec.
//!
//! This crate handles the outer binary layout of a replay: the 15-byte
//! container header, the command bytes that tag each record, and the
//! self-describing payload size table every stream opens with. It does not
//! know the layout of individual records, only how long each one is.
//!
//! # Design Principles
//!
//! - **Externally fixed format** - Byte layouts match captured streams exactly.
//! - **Bounded decoding** - Declared lengths are validated against limits.
//! - **No record knowledge** - Record schemas live in the `schema` and `codec` crates.

mod command;
mod error;
mod header;
mod limits;
mod payload;

pub use command::Command;
pub use error::{LimitKind, WireError, WireResult};
pub use header::{decode_header, encode_header, ContainerHeader, HEADER_SIZE, MAGIC};
pub use limits::Limits;
pub use payload::{PayloadEntry, PayloadSizes};
