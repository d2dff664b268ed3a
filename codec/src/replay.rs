//! The decoded contents of one replay stream.

use schema::{FormatVersion, Record};
use wire::PayloadSizes;

use crate::error::DecodeWarning;
use crate::patch::PatchData;
use crate::records::RecordKind;
use crate::timeline::{FrameBuffer, ItemFrames, PlayerFrames};

/// A decoded replay.
///
/// Everything needed to reproduce the stream is kept: the payload size
/// table, every record in its timeline, the patch data and the trailing
/// metadata bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    /// Format version established by the game start record.
    pub version: FormatVersion,
    pub payload_sizes: PayloadSizes,
    pub game_start: Option<Record>,
    pub game_end: Option<Record>,
    pub frame_starts: FrameBuffer,
    pub pre_frames: PlayerFrames,
    pub post_frames: PlayerFrames,
    pub items: ItemFrames,
    pub bookends: FrameBuffer,
    pub patch: PatchData,
    /// Opaque bytes following the framed payload.
    pub metadata: Vec<u8>,
    /// Non-fatal conditions seen while decoding.
    pub warnings: Vec<DecodeWarning>,
}

impl Replay {
    /// Creates an empty replay that will encode with `payload_sizes`.
    #[must_use]
    pub fn new(version: FormatVersion, payload_sizes: PayloadSizes) -> Self {
        Self {
            version,
            payload_sizes,
            game_start: None,
            game_end: None,
            frame_starts: FrameBuffer::new(RecordKind::FrameStart),
            pre_frames: PlayerFrames::new(RecordKind::PreFrameUpdate),
            post_frames: PlayerFrames::new(RecordKind::PostFrameUpdate),
            items: ItemFrames::new(),
            bookends: FrameBuffer::new(RecordKind::FrameBookend),
            patch: PatchData::new(),
            metadata: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of frame indices spanned by any timeline.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        [
            self.frame_starts.len(),
            self.pre_frames.len(),
            self.post_frames.len(),
            self.items.len(),
            self.bookends.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Number of rollbacks observed while decoding.
    #[must_use]
    pub fn rollback_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DecodeWarning::Rollback { .. }))
            .count()
    }
}
