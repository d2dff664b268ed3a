//! Rollback-aware frame timelines.
//!
//! Every buffer is indexed by normalized frame number. Records normally
//! arrive one frame after another; a record for an earlier frame means the
//! game rolled back and resimulated, so everything buffered from that frame
//! onward is discarded and replaced.

use schema::Record;
use tracing::warn;
use wire::Limits;

use crate::error::{CodecError, CodecResult, Timeline};
use crate::records::RecordKind;
use crate::types::{FrameIndex, PlayerSlot, PLAYER_SLOTS};

/// Where an added record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended after the last buffered frame.
    Appended,
    /// Replaced the buffered frames from its index onward.
    RolledBack { discarded: usize },
}

impl Placement {
    #[must_use]
    pub const fn is_rollback(self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}

/// One record per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    kind: RecordKind,
    records: Vec<Record>,
}

impl FrameBuffer {
    #[must_use]
    pub const fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Files a record at its frame.
    ///
    /// Appends when the frame is the next one; truncates to the frame and
    /// appends when it is earlier. A frame further ahead is a gap and fails.
    pub fn add(&mut self, record: Record, limits: &Limits) -> CodecResult<Placement> {
        let index = FrameIndex::of(self.kind, &record, limits)?;
        self.insert(index, record)
    }

    fn insert(&mut self, index: FrameIndex, record: Record) -> CodecResult<Placement> {
        let index = index.raw();
        let len = self.records.len();
        if index > len {
            return Err(CodecError::FrameGap {
                kind: self.kind,
                index,
                len,
            });
        }
        let placement = if index < len {
            let discarded = len - index;
            warn!(
                kind = %self.kind,
                frame = FrameIndex::new(index).frame_number(),
                discarded,
                "rollback truncated frame buffer"
            );
            self.records.truncate(index);
            Placement::RolledBack { discarded }
        } else {
            Placement::Appended
        };
        self.records.push(record);
        Ok(placement)
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Iterates records in frame order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a FrameBuffer {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-player frame timelines, one sparse buffer per [`PlayerSlot`].
///
/// Slots advance independently and may skip frames: a follower stops
/// reporting while dead and resumes once its pair respawns. A slot that has
/// no record at some frame yields `None` there.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFrames {
    kind: RecordKind,
    slots: [Vec<Option<Record>>; PLAYER_SLOTS],
}

impl PlayerFrames {
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            slots: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Files a record into its player's slot.
    ///
    /// A frame past the end of the slot leaves the skipped frames empty; an
    /// earlier frame truncates the slot to it and appends.
    pub fn add(&mut self, record: Record, limits: &Limits) -> CodecResult<Placement> {
        let slot = PlayerSlot::of(self.kind, &record)?;
        let index = FrameIndex::of(self.kind, &record, limits)?;
        let records = &mut self.slots[slot.index()];

        let placement = if index.raw() < records.len() {
            let discarded = records[index.raw()..].iter().flatten().count();
            warn!(
                kind = %self.kind,
                port = slot.player_index(),
                follower = slot.is_follower(),
                frame = index.frame_number(),
                discarded,
                "rollback truncated player slot"
            );
            records.truncate(index.raw());
            Placement::RolledBack { discarded }
        } else {
            records.resize_with(index.raw(), || None);
            Placement::Appended
        };
        records.push(Some(record));
        Ok(placement)
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Number of frames, i.e. the longest slot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One slot's records by frame index.
    #[must_use]
    pub fn slot(&self, slot: PlayerSlot) -> &[Option<Record>] {
        &self.slots[slot.index()]
    }

    /// Number of records buffered for one slot.
    #[must_use]
    pub fn record_count(&self, slot: PlayerSlot) -> usize {
        self.slot(slot).iter().flatten().count()
    }

    /// Records at one frame, in slot order.
    #[must_use]
    pub fn frame(&self, index: usize) -> [Option<&Record>; PLAYER_SLOTS] {
        std::array::from_fn(|slot| self.slots[slot].get(index).and_then(Option::as_ref))
    }

    /// Iterates frames, yielding every slot's record at each.
    pub fn frames(&self) -> impl Iterator<Item = [Option<&Record>; PLAYER_SLOTS]> + '_ {
        (0..self.len()).map(|index| self.frame(index))
    }
}

/// Item updates, any number per frame.
///
/// Frames without items are normal, so a later frame simply opens every
/// frame up to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFrames {
    frames: Vec<Vec<Record>>,
}

impl ItemFrames {
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Starts `index` afresh, discarding any items buffered at or after it.
    ///
    /// Returns the number of discarded items.
    pub fn open_frame(&mut self, index: FrameIndex) -> usize {
        let index = index.raw();
        let discarded = self.frames.get(index..).map_or(0, |rest| {
            rest.iter().map(Vec::len).sum()
        });
        self.frames.truncate(index);
        self.frames.resize_with(index + 1, Vec::new);
        discarded
    }

    /// Files an item at its frame.
    ///
    /// An item for the newest frame joins it; an item for a later frame
    /// opens that frame; an item for an earlier frame rolls back to it.
    pub fn add(&mut self, record: Record, limits: &Limits) -> CodecResult<Placement> {
        let index = FrameIndex::of(RecordKind::ItemUpdate, &record, limits)?;
        let newest = self.frames.len().checked_sub(1);
        let placement = match newest {
            Some(newest) if index.raw() < newest => {
                let discarded = self.open_frame(index);
                warn!(
                    kind = %Timeline::Items,
                    frame = index.frame_number(),
                    discarded,
                    "rollback truncated item buffer"
                );
                Placement::RolledBack { discarded }
            }
            Some(newest) if index.raw() == newest => Placement::Appended,
            _ => {
                self.frames.resize_with(index.raw() + 1, Vec::new);
                Placement::Appended
            }
        };
        if let Some(frame) = self.frames.get_mut(index.raw()) {
            frame.push(record);
        }
        Ok(placement)
    }

    /// Number of frames opened.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total number of buffered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    /// Items at one frame, in arrival order.
    #[must_use]
    pub fn frame(&self, index: usize) -> &[Record] {
        self.frames.get(index).map_or(&[], Vec::as_slice)
    }

    /// Iterates frames in order.
    pub fn frames(&self) -> impl Iterator<Item = &[Record]> + '_ {
        self.frames.iter().map(Vec::as_slice)
    }
}
