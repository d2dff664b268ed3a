//! Core types for the codec.

use schema::{Field, Record};
use wire::{LimitKind, Limits};

use crate::error::{CodecError, CodecResult};
use crate::records::{RecordKind, FRAME_FIELD};

/// Offset added to raw frame numbers; the first frame of a game is `-123`.
pub const FRAME_OFFSET: i32 = 123;

/// Number of player slots: four ports, each with a leader and a follower.
pub const PLAYER_SLOTS: usize = 8;

/// A normalized, zero-based frame position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameIndex(usize);

impl FrameIndex {
    /// Creates a frame index from its normalized value.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Normalizes a raw frame number.
    pub fn from_frame_number(frame: i32) -> CodecResult<Self> {
        usize::try_from(i64::from(frame) + i64::from(FRAME_OFFSET))
            .map(Self)
            .map_err(|_| CodecError::FrameOutOfRange { frame })
    }

    /// Reads and normalizes the frame number of a record, enforcing
    /// `limits.max_frame_index`.
    pub fn of(kind: RecordKind, record: &Record, limits: &Limits) -> CodecResult<Self> {
        let frame = record
            .field(FRAME_FIELD)
            .and_then(Field::as_i32)
            .ok_or(CodecError::MissingField {
                kind,
                field: FRAME_FIELD,
            })?;
        let index = Self::from_frame_number(frame)?;
        if index.0 > limits.max_frame_index {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::FrameIndex,
                limit: limits.max_frame_index,
                actual: index.0,
            });
        }
        Ok(index)
    }

    /// Returns the normalized value.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Returns the raw frame number this index was normalized from.
    #[must_use]
    pub fn frame_number(self) -> i32 {
        i32::try_from(self.0)
            .map_or(i32::MAX, |index| index.saturating_sub(FRAME_OFFSET))
    }
}

impl From<usize> for FrameIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<FrameIndex> for usize {
    fn from(index: FrameIndex) -> Self {
        index.0
    }
}

/// A player timeline slot: port-major, leader before follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerSlot(u8);

impl PlayerSlot {
    /// Creates a slot for a port (`0..4`) and leader/follower role.
    pub fn new(player_index: u8, is_follower: bool) -> CodecResult<Self> {
        if usize::from(player_index) >= PLAYER_SLOTS / 2 {
            return Err(CodecError::InvalidPlayerSlot { player_index });
        }
        Ok(Self(player_index * 2 + u8::from(is_follower)))
    }

    /// Reads the slot from a frame update's `player_index` and `is_follower`.
    pub fn of(kind: RecordKind, record: &Record) -> CodecResult<Self> {
        let byte = |field: &'static str| {
            record
                .field(field)
                .and_then(Field::as_u8)
                .ok_or(CodecError::MissingField { kind, field })
        };
        Self::new(byte("player_index")?, byte("is_follower")? != 0)
    }

    /// Position of this slot in per-frame player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn player_index(self) -> u8 {
        self.0 / 2
    }

    #[must_use]
    pub const fn is_follower(self) -> bool {
        self.0 % 2 == 1
    }
}
