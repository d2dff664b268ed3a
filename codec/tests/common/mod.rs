#![allow(dead_code)]

use bitstream::ByteWriter;
use codec::{RecordKind, Templates, FRAME_FIELD};
use schema::{FieldValue, FormatVersion, Record};
use wire::{PayloadEntry, PayloadSizes, MAGIC};

pub const LATEST: FormatVersion = FormatVersion::new(3, 14, 0);

/// Builds synthetic replay streams record by record.
pub struct StreamBuilder {
    pub version: FormatVersion,
    pub sizes: PayloadSizes,
    body: Vec<u8>,
}

impl StreamBuilder {
    pub fn new(version: FormatVersion) -> Self {
        let sizes = Templates::default().payload_sizes(version, None).unwrap();
        Self::with_sizes(version, sizes)
    }

    pub fn with_sizes(version: FormatVersion, sizes: PayloadSizes) -> Self {
        Self {
            version,
            sizes,
            body: Vec::new(),
        }
    }

    /// Adds extra entries on top of the template sizes.
    pub fn with_extra_entries(version: FormatVersion, extra: &[(u8, u16)]) -> Self {
        let base = Templates::default().payload_sizes(version, None).unwrap();
        let mut entries = base.entries().to_vec();
        entries.extend(extra.iter().map(|&(command, size)| PayloadEntry::new(command, size)));
        Self::with_sizes(version, PayloadSizes::from_entries(entries).unwrap())
    }

    /// Offset of the next record from the start of the stream.
    pub fn offset(&self) -> u64 {
        (MAGIC.len() + 4 + self.sizes.encoded_len() + self.body.len()) as u64
    }

    pub fn game_start(&mut self, edit: impl FnOnce(&mut Record)) -> &mut Self {
        let version = self.version;
        self.record(RecordKind::GameStart, |record| {
            for (part, value) in [("major", version.major), ("minor", version.minor), ("build", version.patch)] {
                record
                    .set_path(&format!("version.{part}"), FieldValue::U8(value as u8))
                    .unwrap();
            }
            edit(record);
        })
    }

    pub fn record(&mut self, kind: RecordKind, edit: impl FnOnce(&mut Record)) -> &mut Self {
        let mut record = kind.schema();
        edit(&mut record);
        let mut writer = ByteWriter::new(Vec::new());
        record.write(&mut writer, self.version).unwrap();
        self.body.extend(writer.into_inner());
        self
    }

    pub fn frame_start(&mut self, frame: i32, seed: u32) -> &mut Self {
        self.record(RecordKind::FrameStart, |r| {
            r.set(FRAME_FIELD, FieldValue::I32(frame)).unwrap();
            r.set("random_seed", FieldValue::U32(seed)).unwrap();
        })
    }

    pub fn player(
        &mut self,
        kind: RecordKind,
        frame: i32,
        port: u8,
        follower: bool,
        x: f32,
    ) -> &mut Self {
        self.record(kind, |r| {
            r.set(FRAME_FIELD, FieldValue::I32(frame)).unwrap();
            r.set("player_index", FieldValue::U8(port)).unwrap();
            r.set("is_follower", FieldValue::U8(u8::from(follower)))
                .unwrap();
            r.set("x_position", FieldValue::F32(x)).unwrap();
        })
    }

    pub fn item(&mut self, frame: i32, spawn_id: u32) -> &mut Self {
        self.record(RecordKind::ItemUpdate, |r| {
            r.set(FRAME_FIELD, FieldValue::I32(frame)).unwrap();
            r.set("spawn_id", FieldValue::U32(spawn_id)).unwrap();
        })
    }

    pub fn bookend(&mut self, frame: i32) -> &mut Self {
        self.record(RecordKind::FrameBookend, |r| {
            r.set(FRAME_FIELD, FieldValue::I32(frame)).unwrap();
            r.set("last_finalized_frame", FieldValue::I32(frame))
                .unwrap();
        })
    }

    /// A complete frame for the given ports, leader only.
    pub fn full_frame(&mut self, frame: i32, ports: &[u8]) -> &mut Self {
        self.frame_start(frame, frame as u32);
        for &port in ports {
            self.player(RecordKind::PreFrameUpdate, frame, port, false, frame as f32);
        }
        for &port in ports {
            self.player(RecordKind::PostFrameUpdate, frame, port, false, frame as f32);
        }
        self.bookend(frame)
    }

    pub fn game_end(&mut self, method: u8) -> &mut Self {
        self.record(RecordKind::GameEnd, |r| {
            r.set("game_end_method", FieldValue::U8(method)).unwrap();
        })
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Payload length: the table plus every record.
    pub fn payload_len(&self) -> u32 {
        (self.sizes.encoded_len() + self.body.len()) as u32
    }

    pub fn finish(&self, metadata: &[u8]) -> Vec<u8> {
        self.finish_declaring(self.payload_len(), metadata)
    }

    /// Finishes with an arbitrary declared payload length.
    pub fn finish_declaring(&self, payload_len: u32, metadata: &[u8]) -> Vec<u8> {
        let mut writer = ByteWriter::new(Vec::new());
        writer.write_bytes(&MAGIC).unwrap();
        writer.write_u32(payload_len).unwrap();
        self.sizes.encode(&mut writer).unwrap();
        writer.write_bytes(&self.body).unwrap();
        writer.write_bytes(metadata).unwrap();
        writer.into_inner()
    }
}
