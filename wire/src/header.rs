//! Container header types and constants.

use std::io::{Read, Write};

use bitstream::{ByteReader, ByteWriter};

use crate::error::{LimitKind, WireError, WireResult};
use crate::limits::Limits;

/// Fixed prefix identifying a replay container.
///
/// The bytes spell a UBJSON object opening a strongly-typed `u8` array
/// named `raw`, whose element count follows as a big-endian `u32`.
pub const MAGIC: [u8; 11] = *b"{U\x03raw[$U#l";

/// Header size in bytes (15 total).
pub const HEADER_SIZE: usize = MAGIC.len() + 4;

/// Container header.
///
/// The magic prefix is validated during decoding and not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerHeader {
    /// Number of payload bytes following the header.
    pub payload_len: u32,
}

impl ContainerHeader {
    /// Creates a header declaring `payload_len` payload bytes.
    #[must_use]
    pub const fn new(payload_len: u32) -> Self {
        Self { payload_len }
    }
}

/// Reads and validates a container header.
pub fn decode_header<R: Read>(
    reader: &mut ByteReader<R>,
    limits: &Limits,
) -> WireResult<ContainerHeader> {
    let mut found = [0u8; MAGIC.len()];
    found.copy_from_slice(&reader.read_bytes(MAGIC.len())?);
    if found != MAGIC {
        return Err(WireError::InvalidMagic { found });
    }

    let payload_len = reader.read_u32()?;
    if payload_len as usize > limits.max_payload_bytes {
        return Err(WireError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit: limits.max_payload_bytes,
            actual: payload_len as usize,
        });
    }
    Ok(ContainerHeader { payload_len })
}

/// Writes a container header.
///
/// Returns the writer offset of the length field so it can be back-patched
/// once the payload length is known.
pub fn encode_header<W: Write>(
    header: &ContainerHeader,
    writer: &mut ByteWriter<W>,
) -> WireResult<u64> {
    writer.write_bytes(&MAGIC)?;
    let len_offset = writer.position();
    writer.write_u32(header.payload_len)?;
    Ok(len_offset)
}
