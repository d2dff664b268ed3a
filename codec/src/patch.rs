//! Embedded patch data: a single-shot code list or multi-part chunks.

use std::io::Write;
use std::iter;

use bitstream::ByteWriter;
use schema::{Field, FormatVersion, Record};
use wire::{Command, LimitKind, Limits, PayloadSizes};

use crate::encode::write_sized;
use crate::error::{CodecError, CodecResult};
use crate::records::RecordKind;

const BLOCK_FIELD: &str = "fixed_block";
const SIZE_FIELD: &str = "actual_size";
const INNER_COMMAND_FIELD: &str = "internal_command";
const LAST_FIELD: &str = "last_message";

/// Patch payload carried by a stream.
///
/// A stream carries either one opaque gecko list or a run of message
/// splitter chunks. If both are present the gecko list wins on write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchData {
    gecko_list: Option<Vec<u8>>,
    chunks: Vec<Record>,
}

impl PatchData {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gecko_list: None,
            chunks: Vec::new(),
        }
    }

    /// Stores the raw payload of a single-shot gecko list.
    pub fn set_gecko_list(&mut self, payload: Vec<u8>) {
        self.gecko_list = Some(payload);
    }

    /// Appends a decoded message splitter chunk.
    pub fn add_chunk(&mut self, chunk: Record, limits: &Limits) -> CodecResult<()> {
        if self.chunks.len() >= limits.max_message_chunks {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::MessageChunks,
                limit: limits.max_message_chunks,
                actual: self.chunks.len() + 1,
            });
        }
        self.chunks.push(chunk);
        Ok(())
    }

    #[must_use]
    pub fn gecko_list(&self) -> Option<&[u8]> {
        self.gecko_list.as_deref()
    }

    #[must_use]
    pub fn chunks(&self) -> &[Record] {
        &self.chunks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gecko_list.is_none() && self.chunks.is_empty()
    }

    /// The command the chunks carry, taken from the first chunk.
    #[must_use]
    pub fn internal_command(&self) -> Option<u8> {
        self.chunks
            .first()
            .and_then(|chunk| chunk.field(INNER_COMMAND_FIELD))
            .and_then(Field::as_u8)
    }

    /// Returns `true` if the last chunk is flagged as the final one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.chunks
            .last()
            .and_then(|chunk| chunk.field(LAST_FIELD))
            .and_then(Field::as_u8)
            .is_some_and(|last| last != 0)
    }

    /// Concatenates the meaningful prefix of every chunk's block.
    pub fn reassembled(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        for chunk in &self.chunks {
            let missing_block = || CodecError::MissingField {
                kind: RecordKind::MessageSplitter,
                field: BLOCK_FIELD,
            };
            let field = chunk.field(BLOCK_FIELD).ok_or_else(missing_block)?;
            let block = field.as_bytes().ok_or_else(missing_block)?;
            let size = chunk
                .field(SIZE_FIELD)
                .and_then(Field::as_u16)
                .ok_or(CodecError::MissingField {
                    kind: RecordKind::MessageSplitter,
                    field: SIZE_FIELD,
                })?;
            // The block is zero-padded to its wire width.
            let take = usize::from(size).min(field.kind().width());
            out.extend(block.iter().copied().chain(iter::repeat(0)).take(take));
        }
        Ok(out)
    }

    /// Writes the patch: the gecko list if present, otherwise every chunk in
    /// decode order.
    pub fn write_all<W: Write>(
        &self,
        writer: &mut ByteWriter<W>,
        version: FormatVersion,
        sizes: &PayloadSizes,
    ) -> CodecResult<()> {
        if let Some(payload) = &self.gecko_list {
            return write_sized(writer, Command::GeckoList.byte(), sizes, |w| {
                w.write_u8(Command::GeckoList.byte())?;
                w.write_bytes(payload)?;
                Ok(())
            });
        }
        for chunk in &self.chunks {
            write_sized(writer, Command::MessageSplitter.byte(), sizes, |w| {
                chunk.write(w, version)?;
                Ok(())
            })?;
        }
        Ok(())
    }
}
