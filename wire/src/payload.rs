//! The self-describing payload size table.
//!
//! Every stream opens with a table mapping each command byte to the fixed
//! length of its payload (the tag byte itself is not counted):
//!
//! ```text
//! 0x35  len:u8  (cmd:u8 size:u16) * n     where n = (len - 1) / 3
//! ```
//!
//! The table describes itself through its first pair, so `0x35` maps to
//! `len` like any other command.

use std::io::{Read, Write};

use bitstream::{ByteReader, ByteWriter};

use crate::command::Command;
use crate::error::{WireError, WireResult};

/// Bytes per table entry: one tag byte plus a two-byte length.
const ENTRY_SIZE: usize = 3;

/// One `(command, payload length)` pair from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadEntry {
    pub command: u8,
    pub size: u16,
}

impl PayloadEntry {
    #[must_use]
    pub const fn new(command: u8, size: u16) -> Self {
        Self { command, size }
    }
}

/// Command byte → declared payload length, derived from a stream's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSizes {
    declared_len: u8,
    entries: Vec<PayloadEntry>,
    lookup: Vec<Option<u16>>,
}

impl PayloadSizes {
    /// Builds a table from its entries, deriving the table's own length.
    pub fn from_entries(entries: Vec<PayloadEntry>) -> WireResult<Self> {
        let declared_len = u8::try_from(1 + entries.len() * ENTRY_SIZE)
            .map_err(|_| WireError::TableOverflow {
                entries: entries.len(),
            })?;
        Self::build(declared_len, entries)
    }

    /// Decodes the table body. The leading `0x35` tag must already have been
    /// consumed by the caller.
    pub fn decode<R: Read>(reader: &mut ByteReader<R>) -> WireResult<Self> {
        let declared_len = reader.read_u8()?;
        let count = entry_count(declared_len)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let command = reader.read_u8()?;
            let size = reader.read_u16()?;
            entries.push(PayloadEntry { command, size });
        }
        Self::build(declared_len, entries)
    }

    /// Encodes the table including its leading `0x35` tag.
    pub fn encode<W: Write>(&self, writer: &mut ByteWriter<W>) -> WireResult<()> {
        writer.write_u8(Command::EventPayloads.byte())?;
        writer.write_u8(self.declared_len)?;
        for entry in &self.entries {
            writer.write_u8(entry.command)?;
            writer.write_u16(entry.size)?;
        }
        Ok(())
    }

    /// Returns the declared payload length for `command`, if the table has it.
    #[must_use]
    pub fn size_of(&self, command: u8) -> Option<usize> {
        self.lookup[usize::from(command)].map(usize::from)
    }

    /// Returns `true` if the table declares a length for `command`.
    #[must_use]
    pub fn contains(&self, command: u8) -> bool {
        self.lookup[usize::from(command)].is_some()
    }

    /// The table's own declared payload length.
    #[must_use]
    pub const fn declared_len(&self) -> u8 {
        self.declared_len
    }

    /// Entries in stream order, excluding the table's self-describing pair.
    #[must_use]
    pub fn entries(&self) -> &[PayloadEntry] {
        &self.entries
    }

    /// Total encoded size including the tag byte.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        1 + usize::from(self.declared_len)
    }

    fn build(declared_len: u8, entries: Vec<PayloadEntry>) -> WireResult<Self> {
        let mut lookup = vec![None; 256];
        lookup[usize::from(Command::EventPayloads.byte())] = Some(u16::from(declared_len));
        for entry in &entries {
            let slot = &mut lookup[usize::from(entry.command)];
            if slot.is_some() {
                return Err(WireError::DuplicateCommand {
                    command: entry.command,
                });
            }
            *slot = Some(entry.size);
        }
        Ok(Self {
            declared_len,
            entries,
            lookup,
        })
    }
}

fn entry_count(declared_len: u8) -> WireResult<usize> {
    let len = usize::from(declared_len);
    if len == 0 || (len - 1) % ENTRY_SIZE != 0 {
        return Err(WireError::MalformedPayloadTable { declared_len });
    }
    Ok((len - 1) / ENTRY_SIZE)
}
