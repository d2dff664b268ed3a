//! Stream writer: re-serializes a decoded replay.

use std::io::{Cursor, Seek, Write};

use bitstream::ByteWriter;
use schema::Record;
use tracing::debug;
use wire::{encode_header, ContainerHeader, LimitKind, PayloadSizes};

use crate::error::{CodecError, CodecResult};
use crate::records::RecordKind;
use crate::replay::Replay;

/// Writes one tagged record and checks its length against the size table.
pub(crate) fn write_sized<W, F>(
    writer: &mut ByteWriter<W>,
    command: u8,
    sizes: &PayloadSizes,
    write_body: F,
) -> CodecResult<()>
where
    W: Write,
    F: FnOnce(&mut ByteWriter<W>) -> CodecResult<()>,
{
    let expected = sizes
        .size_of(command)
        .ok_or(CodecError::MissingPayloadSize { command })?;
    let offset = writer.position();
    write_body(writer)?;

    let written = writer.position() - offset;
    let actual = usize::try_from(written.saturating_sub(1)).unwrap_or(usize::MAX);
    if actual != expected {
        return Err(CodecError::PayloadSizeMismatch {
            command,
            expected,
            actual,
            offset,
        });
    }
    Ok(())
}

/// Serializes a [`Replay`] to a seekable sink.
///
/// The container length is written as a placeholder and back-patched once
/// the payload is complete.
#[derive(Debug)]
pub struct Encoder<W> {
    writer: ByteWriter<W>,
}

impl<W: Write + Seek> Encoder<W> {
    #[must_use]
    pub const fn new(sink: W) -> Self {
        Self {
            writer: ByteWriter::new(sink),
        }
    }

    /// Writes the whole replay and returns the sink.
    ///
    /// Order: header, size table, game start, patch data, then per frame the
    /// frame start, pre-frame updates, items, post-frame updates and bookend,
    /// then game end and the trailing metadata.
    pub fn encode(mut self, replay: &Replay) -> CodecResult<W> {
        let len_offset = encode_header(&ContainerHeader::default(), &mut self.writer)?;
        let start = self.writer.position();
        replay.payload_sizes.encode(&mut self.writer)?;

        if let Some(record) = &replay.game_start {
            self.record(replay, RecordKind::GameStart, record)?;
        }
        replay
            .patch
            .write_all(&mut self.writer, replay.version, &replay.payload_sizes)?;

        let frames = replay.frame_count();
        for index in 0..frames {
            self.frame(replay, index)?;
        }

        if let Some(record) = &replay.game_end {
            self.record(replay, RecordKind::GameEnd, record)?;
        }

        let payload_len = self.writer.position() - start;
        let declared = u32::try_from(payload_len).map_err(|_| CodecError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit: u32::MAX as usize,
            actual: usize::try_from(payload_len).unwrap_or(usize::MAX),
        })?;
        self.writer.patch_u32(len_offset, declared)?;
        self.writer.write_bytes(&replay.metadata)?;
        self.writer.flush()?;

        debug!(
            version = %replay.version,
            payload_len = declared,
            frames,
            "encoded replay"
        );
        Ok(self.writer.into_inner())
    }

    fn frame(&mut self, replay: &Replay, index: usize) -> CodecResult<()> {
        if let Some(record) = replay.frame_starts.get(index) {
            self.record(replay, RecordKind::FrameStart, record)?;
        }
        for record in replay.pre_frames.frame(index).into_iter().flatten() {
            self.record(replay, RecordKind::PreFrameUpdate, record)?;
        }
        for record in replay.items.frame(index) {
            self.record(replay, RecordKind::ItemUpdate, record)?;
        }
        for record in replay.post_frames.frame(index).into_iter().flatten() {
            self.record(replay, RecordKind::PostFrameUpdate, record)?;
        }
        if let Some(record) = replay.bookends.get(index) {
            self.record(replay, RecordKind::FrameBookend, record)?;
        }
        Ok(())
    }

    fn record(&mut self, replay: &Replay, kind: RecordKind, record: &Record) -> CodecResult<()> {
        write_sized(
            &mut self.writer,
            kind.command().byte(),
            &replay.payload_sizes,
            |w| Ok(record.write(w, replay.version)?),
        )
    }
}

/// Encodes a replay into a fresh byte vector.
pub fn encode_replay(replay: &Replay) -> CodecResult<Vec<u8>> {
    Encoder::new(Cursor::new(Vec::new()))
        .encode(replay)
        .map(Cursor::into_inner)
}

#[cfg(test)]
mod tests {
    use schema::FormatVersion;
    use wire::{PayloadEntry, HEADER_SIZE, MAGIC};

    use super::*;

    fn table_only() -> Replay {
        let sizes = PayloadSizes::from_entries(vec![PayloadEntry::new(0x39, 1)]).unwrap();
        Replay::new(FormatVersion::new(0, 1, 0), sizes)
    }

    #[test]
    fn header_length_is_back_patched() {
        let mut replay = table_only();
        replay.metadata = b"meta".to_vec();
        let bytes = encode_replay(&replay).unwrap();

        assert_eq!(&bytes[..MAGIC.len()], &MAGIC);
        let declared = u32::from_be_bytes([bytes[11], bytes[12], bytes[13], bytes[14]]);
        assert_eq!(declared, 5);
        assert_eq!(bytes.len(), HEADER_SIZE + 5 + 4);
        assert!(bytes.ends_with(b"meta"));
    }

    #[test]
    fn game_end_is_written_last() {
        let mut replay = table_only();
        replay.game_end = Some(RecordKind::GameEnd.schema());
        let bytes = encode_replay(&replay).unwrap();
        assert_eq!(&bytes[HEADER_SIZE + 5..], [0x39, 0x00]);
    }

    #[test]
    fn missing_table_entry_fails() {
        let mut replay = table_only();
        replay.game_start = Some(RecordKind::GameStart.schema());
        let err = encode_replay(&replay).unwrap_err();
        assert!(matches!(err, CodecError::MissingPayloadSize { command: 0x36 }));
    }

    #[test]
    fn size_drift_fails() {
        let sizes = PayloadSizes::from_entries(vec![PayloadEntry::new(0x39, 6)]).unwrap();
        let mut replay = Replay::new(FormatVersion::new(2, 0, 0), sizes);
        replay.game_end = Some(RecordKind::GameEnd.schema());
        let err = encode_replay(&replay).unwrap_err();
        assert!(matches!(
            err,
            CodecError::PayloadSizeMismatch {
                command: 0x39,
                expected: 6,
                actual: 2,
                ..
            }
        ));
    }
}
