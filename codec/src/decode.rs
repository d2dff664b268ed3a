//! Stream dispatcher: frames the payload and routes each record.

use std::io::Read;

use bitstream::ByteReader;
use schema::{Field, FieldValue, FormatVersion, Record};
use tracing::{debug, trace, warn};
use wire::{decode_header, Command, Limits, PayloadSizes, WireError};

use crate::error::{CodecError, CodecResult, DecodeWarning, Timeline};
use crate::records::{RecordKind, COMMAND_FIELD, FRAME_FIELD};
use crate::replay::Replay;
use crate::templates::Templates;
use crate::timeline::Placement;
use crate::types::FrameIndex;

const VERSION_FIELD: &str = "version";
const VERSION_PARTS: [&str; 4] = ["major", "minor", "build", "unused"];

/// Decodes replay streams against a set of templates.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    templates: &'t Templates,
    limits: Limits,
}

impl<'t> Decoder<'t> {
    #[must_use]
    pub fn new(templates: &'t Templates) -> Self {
        Self {
            templates,
            limits: Limits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Decodes one complete stream.
    ///
    /// Reads the container header and payload size table, dispatches every
    /// record until the declared payload length is consumed, then keeps the
    /// rest of the source as trailing metadata.
    pub fn decode<R: Read>(&self, source: R) -> CodecResult<Replay> {
        let mut reader = ByteReader::new(source);
        let header = decode_header(&mut reader, &self.limits)?;
        let start = reader.position();

        let tag = reader.read_u8()?;
        if tag != Command::EventPayloads.byte() {
            return Err(WireError::MissingPayloadTable { found: tag }.into());
        }
        let sizes = PayloadSizes::decode(&mut reader)?;
        debug!(
            payload_len = header.payload_len,
            entries = sizes.entries().len(),
            "decoded payload size table"
        );

        let mut session = Session {
            reader,
            templates: self.templates,
            limits: &self.limits,
            replay: Replay::new(FormatVersion::ZERO, sizes),
        };
        session.frame(start, u64::from(header.payload_len))?;

        let Session {
            mut reader,
            mut replay,
            ..
        } = session;
        replay.metadata = reader.read_to_end()?;
        debug!(
            version = %replay.version,
            frames = replay.frame_count(),
            items = replay.items.item_count(),
            chunks = replay.patch.chunks().len(),
            metadata = replay.metadata.len(),
            warnings = replay.warnings.len(),
            "decoded replay"
        );
        Ok(replay)
    }
}

/// Decodes a complete in-memory stream with default limits.
pub fn decode_replay(bytes: &[u8], templates: &Templates) -> CodecResult<Replay> {
    Decoder::new(templates).decode(bytes)
}

struct Session<'d, R> {
    reader: ByteReader<R>,
    templates: &'d Templates,
    limits: &'d Limits,
    replay: Replay,
}

impl<R: Read> Session<'_, R> {
    fn frame(&mut self, start: u64, declared: u64) -> CodecResult<()> {
        loop {
            let consumed = self.reader.position() - start;
            if consumed >= declared {
                break;
            }
            let offset = self.reader.position();
            let command = match self.reader.read_u8() {
                Ok(command) => command,
                Err(err) if err.is_short_read() => {
                    return Err(CodecError::TruncatedOrOverrunStream { declared, consumed });
                }
                Err(err) => return Err(err.into()),
            };
            self.dispatch(command, offset)?;
        }

        let consumed = self.reader.position() - start;
        if consumed != declared {
            return Err(CodecError::TruncatedOrOverrunStream { declared, consumed });
        }
        Ok(())
    }

    fn dispatch(&mut self, command: u8, offset: u64) -> CodecResult<()> {
        let parsed = Command::parse(command);
        let kind = parsed.and_then(RecordKind::from_command);
        if kind.is_none() && parsed != Some(Command::GeckoList) {
            return self.skip(command, offset);
        }

        let expected = self
            .replay
            .payload_sizes
            .size_of(command)
            .ok_or(CodecError::MissingPayloadSize { command })?;
        trace!(command = format_args!("0x{command:02X}"), offset, "dispatch");

        match kind {
            Some(RecordKind::GameStart) => self.game_start()?,
            Some(kind) => {
                let record = self.read_record(kind)?;
                self.file(kind, record)?;
            }
            None => {
                let payload = self.reader.read_bytes(expected)?;
                self.replay.patch.set_gecko_list(payload);
            }
        }

        let actual = usize::try_from(self.reader.position() - offset - 1).unwrap_or(usize::MAX);
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

    fn skip(&mut self, command: u8, offset: u64) -> CodecResult<()> {
        let size = self
            .replay
            .payload_sizes
            .size_of(command)
            .ok_or(CodecError::UnknownCommand { command, offset })?;
        warn!(
            command = format_args!("0x{command:02X}"),
            size, offset, "skipping unhandled command"
        );
        self.reader.skip(size)?;
        self.replay.warnings.push(DecodeWarning::SkippedCommand {
            command,
            size,
            offset,
        });
        Ok(())
    }

    fn read_record(&mut self, kind: RecordKind) -> CodecResult<Record> {
        let mut record = self.templates.instantiate(kind)?;
        record.set(COMMAND_FIELD, FieldValue::U8(kind.command().byte()))?;
        record.read(&mut self.reader, self.replay.version, &[COMMAND_FIELD])?;
        Ok(record)
    }

    /// The version quad precedes the rest of the record and sets the
    /// version every later field is gated on.
    fn game_start(&mut self) -> CodecResult<()> {
        let kind = RecordKind::GameStart;
        let mut record = self.templates.instantiate(kind)?;
        record.set(COMMAND_FIELD, FieldValue::U8(kind.command().byte()))?;

        let mut quad = [0u8; 4];
        for (byte, part) in quad.iter_mut().zip(VERSION_PARTS) {
            *byte = self.reader.read_u8()?;
            record
                .set_path(&format!("{VERSION_FIELD}.{part}"), FieldValue::U8(*byte))
                .map_err(|_| CodecError::MissingField {
                    kind,
                    field: VERSION_FIELD,
                })?;
        }
        self.replay.version = FormatVersion::from_quad(quad);
        debug!(version = %self.replay.version, "format version established");

        record.read(
            &mut self.reader,
            self.replay.version,
            &[COMMAND_FIELD, VERSION_FIELD],
        )?;
        self.replay.game_start = Some(record);
        Ok(())
    }

    fn file(&mut self, kind: RecordKind, record: Record) -> CodecResult<()> {
        let limits = self.limits;
        let frame = record.field(FRAME_FIELD).and_then(Field::as_i32);
        let replay = &mut self.replay;

        let filed = match kind {
            RecordKind::GameStart => {
                replay.game_start = Some(record);
                None
            }
            RecordKind::GameEnd => {
                replay.game_end = Some(record);
                None
            }
            RecordKind::MessageSplitter => {
                replay.patch.add_chunk(record, limits)?;
                None
            }
            RecordKind::PreFrameUpdate => Some((
                Timeline::Record(kind),
                replay.pre_frames.add(record, limits)?,
            )),
            RecordKind::PostFrameUpdate => Some((
                Timeline::Record(kind),
                replay.post_frames.add(record, limits)?,
            )),
            RecordKind::ItemUpdate => Some((Timeline::Items, replay.items.add(record, limits)?)),
            RecordKind::FrameStart => {
                let index = FrameIndex::of(kind, &record, limits)?;
                let placement = replay.frame_starts.add(record, limits)?;
                replay.items.open_frame(index);
                Some((Timeline::Record(kind), placement))
            }
            RecordKind::FrameBookend => Some((
                Timeline::Record(kind),
                replay.bookends.add(record, limits)?,
            )),
        };

        if let Some((timeline, Placement::RolledBack { discarded })) = filed {
            replay.warnings.push(DecodeWarning::Rollback {
                timeline,
                frame: frame.unwrap_or_default(),
                discarded,
            });
        }
        Ok(())
    }
}
