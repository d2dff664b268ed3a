//! Replay stream decoding and encoding for the slp replay codec.
//!
//! This is the main codec crate that ties together bitstream, wire, and schema
//! to decode a replay stream into frame timelines and write it back out.
//!
//! # Features
//!
//! - Payload-size-table driven framing with forward-compatible skipping
//! - Version gating established mid-stream by the game start record
//! - Rollback-aware per-player, item, and marker timelines
//! - Multi-part patch reassembly
//! - Byte-identical re-encoding with a back-patched container length
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Templates are prototypes** - Every record decodes into a fresh clone.
//! - **Fail loudly on drift** - Any size disagreement with the table is an error.
//!
//! # Example
//!
//! ```
//! use codec::{decode_replay, encode_replay, Templates};
//!
//! // A stream holding nothing but its payload size table.
//! let mut bytes = wire::MAGIC.to_vec();
//! bytes.extend_from_slice(&[0, 0, 0, 2, 0x35, 0x01]);
//!
//! let replay = decode_replay(&bytes, &Templates::default()).unwrap();
//! assert_eq!(replay.frame_count(), 0);
//! assert_eq!(encode_replay(&replay).unwrap(), bytes);
//! ```

mod decode;
mod encode;
mod error;
mod patch;
mod records;
mod replay;
mod templates;
mod timeline;
mod types;

pub use decode::{decode_replay, Decoder};
pub use encode::{encode_replay, Encoder};
pub use error::{CodecError, CodecResult, DecodeWarning, Timeline};
pub use patch::PatchData;
pub use records::{RecordKind, COMMAND_FIELD, FRAME_FIELD};
pub use replay::Replay;
pub use templates::Templates;
pub use timeline::{FrameBuffer, ItemFrames, Placement, PlayerFrames};
pub use types::{FrameIndex, PlayerSlot, FRAME_OFFSET, PLAYER_SLOTS};
pub use wire::Limits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Templates::default();
        let _ = Limits::default();
        let _ = FrameIndex::new(0);
        let _ = PatchData::new();
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn frame_offset_matches_first_frame() {
        assert_eq!(FRAME_OFFSET, 123);
        assert_eq!(PLAYER_SLOTS, 8);
    }
}
