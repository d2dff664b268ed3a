//! Inspection and round-trip tools for the slp replay codec.
//!
//! This crate turns decoded replays into reports a person can read:
//!
//! - Summarize a stream: version, size table, timelines, patch data
//! - Check that a stream re-encodes to the exact same bytes
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use codec::{CodecResult, Decoder, Replay, Templates, PLAYER_SLOTS};
use schema::Field;
use serde::Serialize;
use wire::{Command, Limits};

/// One payload size table entry, named when the command is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub command: u8,
    pub name: Option<&'static str>,
    pub size: u16,
}

/// Record counts for one player slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    pub slot: usize,
    pub port: usize,
    pub follower: bool,
    pub pre_frames: usize,
    pub post_frames: usize,
}

/// Summary of one decoded stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub version: String,
    pub payload_sizes: Vec<TableEntry>,
    pub frames: usize,
    pub first_frame: Option<i32>,
    pub last_frame: Option<i32>,
    pub slots: Vec<SlotSummary>,
    pub items: usize,
    pub rollbacks: usize,
    pub skipped: Vec<String>,
    pub stage: Option<u16>,
    pub game_end_method: Option<u8>,
    pub patch_chunks: usize,
    pub patch_bytes: usize,
    pub gecko_list_bytes: Option<usize>,
    pub metadata_bytes: usize,
}

impl InspectReport {
    /// Builds the report for an already decoded replay.
    pub fn from_replay(replay: &Replay) -> CodecResult<Self> {
        let frame_numbers = replay
            .frame_starts
            .iter()
            .chain(replay.bookends.iter())
            .filter_map(|record| record.field(codec::FRAME_FIELD).and_then(Field::as_i32));
        let (first_frame, last_frame) = frame_numbers.fold((None, None), |(lo, hi), frame| {
            (
                Some(lo.map_or(frame, |lo: i32| lo.min(frame))),
                Some(hi.map_or(frame, |hi: i32| hi.max(frame))),
            )
        });

        let slots = (0..PLAYER_SLOTS)
            .filter_map(|index| {
                let port = index / 2;
                let follower = index % 2 == 1;
                let slot = codec::PlayerSlot::new(u8::try_from(port).ok()?, follower).ok()?;
                let pre_frames = replay.pre_frames.record_count(slot);
                let post_frames = replay.post_frames.record_count(slot);
                (pre_frames + post_frames > 0).then_some(SlotSummary {
                    slot: index,
                    port,
                    follower,
                    pre_frames,
                    post_frames,
                })
            })
            .collect();

        let patch_bytes = if replay.patch.chunks().is_empty() {
            0
        } else {
            replay.patch.reassembled()?.len()
        };

        Ok(Self {
            version: replay.version.to_string(),
            payload_sizes: replay
                .payload_sizes
                .entries()
                .iter()
                .map(|entry| TableEntry {
                    command: entry.command,
                    name: Command::parse(entry.command).map(Command::name),
                    size: entry.size,
                })
                .collect(),
            frames: replay.frame_count(),
            first_frame,
            last_frame,
            slots,
            items: replay.items.item_count(),
            rollbacks: replay.rollback_count(),
            skipped: replay
                .warnings
                .iter()
                .filter(|w| !matches!(w, codec::DecodeWarning::Rollback { .. }))
                .map(ToString::to_string)
                .collect(),
            stage: replay
                .game_start
                .as_ref()
                .and_then(|r| r.path_field("game_info_block.stage"))
                .and_then(Field::as_u16),
            game_end_method: replay
                .game_end
                .as_ref()
                .and_then(|r| r.field("game_end_method"))
                .and_then(Field::as_u8),
            patch_chunks: replay.patch.chunks().len(),
            patch_bytes,
            gecko_list_bytes: replay.patch.gecko_list().map(<[u8]>::len),
            metadata_bytes: replay.metadata.len(),
        })
    }
}

/// Decodes `bytes` and summarizes the result.
pub fn inspect_replay(
    bytes: &[u8],
    templates: &Templates,
    limits: &Limits,
) -> CodecResult<InspectReport> {
    let replay = Decoder::new(templates)
        .with_limits(limits.clone())
        .decode(bytes)?;
    InspectReport::from_replay(&replay)
}

/// Renders a report as indented text.
pub fn format_report_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "version: {}", report.version);
    let _ = writeln!(out, "payload sizes:");
    for entry in &report.payload_sizes {
        let name = entry.name.unwrap_or("unknown");
        let _ = writeln!(
            out,
            "  0x{:02X} {name}: {} bytes",
            entry.command, entry.size
        );
    }
    match (report.first_frame, report.last_frame) {
        (Some(first), Some(last)) => {
            let _ = writeln!(out, "frames: {} ({first}..={last})", report.frames);
        }
        _ => {
            let _ = writeln!(out, "frames: {}", report.frames);
        }
    }
    if let Some(stage) = report.stage {
        let _ = writeln!(out, "stage: {stage}");
    }
    let _ = writeln!(out, "players:");
    for slot in &report.slots {
        let role = if slot.follower { "follower" } else { "leader" };
        let _ = writeln!(
            out,
            "  port {} {role}: {} pre, {} post",
            slot.port + 1,
            slot.pre_frames,
            slot.post_frames
        );
    }
    let _ = writeln!(out, "items: {}", report.items);
    let _ = writeln!(out, "rollbacks: {}", report.rollbacks);
    for skipped in &report.skipped {
        let _ = writeln!(out, "warning: {skipped}");
    }
    if report.patch_chunks > 0 {
        let _ = writeln!(
            out,
            "patch: {} chunks, {} bytes",
            report.patch_chunks, report.patch_bytes
        );
    }
    if let Some(len) = report.gecko_list_bytes {
        let _ = writeln!(out, "gecko list: {len} bytes");
    }
    if let Some(method) = report.game_end_method {
        let _ = writeln!(out, "game end method: {method}");
    }
    let _ = write!(out, "metadata: {} bytes", report.metadata_bytes);
    out
}

/// Result of decoding a stream and writing it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTrip {
    #[serde(skip)]
    pub encoded: Vec<u8>,
    pub original_len: usize,
    pub encoded_len: usize,
    /// Offset of the first differing byte, if any.
    pub first_difference: Option<usize>,
}

impl RoundTrip {
    pub fn is_identical(&self) -> bool {
        self.first_difference.is_none()
    }
}

/// Decodes `bytes`, re-encodes the replay and compares the two.
///
/// A stream with skipped commands or rollbacks is expected to differ:
/// the writer emits only the canonical timeline.
pub fn roundtrip(bytes: &[u8], templates: &Templates, limits: &Limits) -> CodecResult<RoundTrip> {
    let replay = Decoder::new(templates)
        .with_limits(limits.clone())
        .decode(bytes)?;
    let encoded = codec::encode_replay(&replay)?;
    Ok(RoundTrip {
        original_len: bytes.len(),
        encoded_len: encoded.len(),
        first_difference: first_difference(bytes, &encoded),
        encoded,
    })
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}
