//! Record kinds and their built-in schemas.
//!
//! Each schema is a default-populated [`Record`] whose declaration order is
//! the wire order. Fields carry the first format version that writes them,
//! so a schema decodes every stream version up to the newest one listed
//! here. Payload sizes at 3.14.0, excluding the command byte:
//!
//! | kind              | bytes |
//! |-------------------|-------|
//! | game start        | 760   |
//! | pre-frame update  | 63    |
//! | post-frame update | 80    |
//! | item update       | 42    |
//! | frame start       | 12    |
//! | frame bookend     | 8     |
//! | game end          | 6     |
//! | message splitter  | 516   |

use std::fmt;

use schema::{Field, FormatVersion, Record, RecordBuilder};
use wire::Command;

/// Top-level record kinds decoded through a template.
///
/// The single-shot gecko list is absent: its payload is kept as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RecordKind {
    GameStart,
    PreFrameUpdate,
    PostFrameUpdate,
    ItemUpdate,
    FrameStart,
    FrameBookend,
    GameEnd,
    MessageSplitter,
}

impl RecordKind {
    pub const ALL: [Self; 8] = [
        Self::GameStart,
        Self::PreFrameUpdate,
        Self::PostFrameUpdate,
        Self::ItemUpdate,
        Self::FrameStart,
        Self::FrameBookend,
        Self::GameEnd,
        Self::MessageSplitter,
    ];

    /// The command byte tagging this kind on the wire.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::GameStart => Command::GameStart,
            Self::PreFrameUpdate => Command::PreFrameUpdate,
            Self::PostFrameUpdate => Command::PostFrameUpdate,
            Self::ItemUpdate => Command::ItemUpdate,
            Self::FrameStart => Command::FrameStart,
            Self::FrameBookend => Command::FrameBookend,
            Self::GameEnd => Command::GameEnd,
            Self::MessageSplitter => Command::MessageSplitter,
        }
    }

    /// Maps a command to its record kind, if it is decoded via a template.
    #[must_use]
    pub const fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::GameStart => Some(Self::GameStart),
            Command::PreFrameUpdate => Some(Self::PreFrameUpdate),
            Command::PostFrameUpdate => Some(Self::PostFrameUpdate),
            Command::ItemUpdate => Some(Self::ItemUpdate),
            Command::FrameStart => Some(Self::FrameStart),
            Command::FrameBookend => Some(Self::FrameBookend),
            Command::GameEnd => Some(Self::GameEnd),
            Command::MessageSplitter => Some(Self::MessageSplitter),
            Command::EventPayloads | Command::GeckoList => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.command().name()
    }

    /// Builds the built-in schema for this kind.
    #[must_use]
    pub fn schema(self) -> Record {
        match self {
            Self::GameStart => game_start(),
            Self::PreFrameUpdate => pre_frame_update(),
            Self::PostFrameUpdate => post_frame_update(),
            Self::ItemUpdate => item_update(),
            Self::FrameStart => frame_start(),
            Self::FrameBookend => frame_bookend(),
            Self::GameEnd => game_end(),
            Self::MessageSplitter => message_splitter(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the leading tag field every record carries.
pub const COMMAND_FIELD: &str = "command_byte";

/// Name of the frame counter on frame-scoped records.
pub const FRAME_FIELD: &str = "frame_number";

const fn v(major: u16, minor: u16, patch: u16) -> FormatVersion {
    FormatVersion::new(major, minor, patch)
}

fn u8s(mut builder: RecordBuilder, names: &[&str], since: FormatVersion) -> RecordBuilder {
    for name in names {
        builder = builder.field(*name, Field::u8(0).since(since));
    }
    builder
}

fn f32s(mut builder: RecordBuilder, names: &[&str], since: FormatVersion) -> RecordBuilder {
    for name in names {
        builder = builder.field(*name, Field::f32(0.0).since(since));
    }
    builder
}

fn flags8s(mut builder: RecordBuilder, names: &[&str], since: FormatVersion) -> RecordBuilder {
    for name in names {
        builder = builder.field(*name, Field::flags8().since(since));
    }
    builder
}

fn player_block() -> Record {
    let b = Record::builder();
    let b = u8s(
        b,
        &[
            "external_character_id",
            "player_type",
            "stock_start_count",
            "costume_index",
        ],
        FormatVersion::ZERO,
    );
    let b = b.field("pad_04", Field::bytes(3));
    let b = u8s(b, &["team_shade", "handicap", "team_id"], FormatVersion::ZERO);
    let b = b
        .field("pad_0a", Field::bytes(2))
        .field("player_bitfield", Field::flags8())
        .field("pad_0d", Field::bytes(2))
        .field("cpu_level", Field::u8(0))
        .field("damage_start", Field::u16(0))
        .field("damage_spawn", Field::u16(0))
        .field("pad_14", Field::bytes(4));
    f32s(
        b,
        &["offense_ratio", "defense_ratio", "model_scale"],
        FormatVersion::ZERO,
    )
    .build()
}

fn game_info_block() -> Record {
    let b = flags8s(
        Record::builder(),
        &[
            "game_bitfield_1",
            "game_bitfield_2",
            "game_bitfield_3",
            "game_bitfield_4",
        ],
        FormatVersion::ZERO,
    );
    let b = b
        .field("pad_04", Field::bytes(2))
        .field("bomb_rain", Field::u8(0))
        .field("pad_07", Field::bytes(1))
        .field("is_teams", Field::u8(0))
        .field("pad_09", Field::bytes(2))
        .field("item_spawn_behavior", Field::i8(0))
        .field("self_destruct_score_value", Field::i8(0))
        .field("pad_0d", Field::bytes(1))
        .field("stage", Field::u16(0))
        .field("game_timer", Field::u32(0))
        .field("pad_14", Field::bytes(15));
    let b = flags8s(
        b,
        &[
            "item_spawn_bitfield_1",
            "item_spawn_bitfield_2",
            "item_spawn_bitfield_3",
            "item_spawn_bitfield_4",
            "item_spawn_bitfield_5",
        ],
        FormatVersion::ZERO,
    );
    b.field("pad_28", Field::bytes(8))
        .field("unknown_30", Field::f32(0.0))
        .field("damage_ratio", Field::f32(0.0))
        .field("unknown_38", Field::f32(0.0))
        .field("pad_3c", Field::bytes(36))
        .seq("player_data", player_block(), 6)
        .build()
}

/// Game start: format version, rules, players, and online identities.
fn game_start() -> Record {
    let version = Record::builder()
        .field("major", Field::u8(0))
        .field("minor", Field::u8(0))
        .field("build", Field::u8(0))
        .field("unused", Field::u8(0))
        .build();
    let start_fix = Record::builder()
        .field("dashback_fix", Field::u32(0).since(v(1, 0, 0)))
        .field("shield_drop_fix", Field::u32(0).since(v(1, 0, 0)))
        .build();
    let display_name = Record::builder()
        .field("display_name", Field::wide_text(15).since(v(3, 9, 0)))
        .field("null_terminator", Field::u8(0).since(v(3, 9, 0)))
        .build();
    let connect_code = Record::builder()
        .field("connect_code_str", Field::text(4).since(v(3, 9, 0)))
        .field("connect_code_hash", Field::u16(0).since(v(3, 9, 0)))
        .field("connect_code_num", Field::text(3).since(v(3, 9, 0)))
        .field("null_terminator", Field::u8(0).since(v(3, 9, 0)))
        .build();

    Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::GameStart.byte()))
        .record("version", version)
        .record("game_info_block", game_info_block())
        .field("random_seed", Field::u32(0))
        .seq("start_fixes", start_fix, 4)
        .seq("nametags", Field::wide_text(8).since(v(1, 3, 0)), 4)
        .field("pal", Field::u8(0).since(v(1, 5, 0)))
        .field("frozen_ps", Field::u8(0).since(v(2, 0, 0)))
        .field("minor_scene", Field::u8(0).since(v(3, 7, 0)))
        .field("major_scene", Field::u8(0).since(v(3, 7, 0)))
        .seq("display_names", display_name, 4)
        .seq("connect_codes", connect_code, 4)
        .seq("slippi_uids", Field::text(29).since(v(3, 11, 0)), 4)
        .field("language_option", Field::u8(0).since(v(3, 12, 0)))
        .field("match_id", Field::terminated_text(51).since(v(3, 14, 0)))
        .field("game_number", Field::u32(0).since(v(3, 14, 0)))
        .field("tiebreaker_number", Field::u32(0).since(v(3, 14, 0)))
        .build()
}

/// Pre-frame update: inputs and position before the engine steps a frame.
fn pre_frame_update() -> Record {
    let b = Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::PreFrameUpdate.byte()))
        .field(FRAME_FIELD, Field::i32(0))
        .field("player_index", Field::u8(0))
        .field("is_follower", Field::u8(0))
        .field("random_seed", Field::u32(0))
        .field("action_state_id", Field::u16(0));
    let b = f32s(
        b,
        &[
            "x_position",
            "y_position",
            "facing_direction",
            "joystick_x",
            "joystick_y",
            "cstick_x",
            "cstick_y",
            "trigger",
        ],
        FormatVersion::ZERO,
    );
    b.field("processed_buttons", Field::flags32())
        .field("physical_buttons", Field::flags16())
        .field("physical_l_trigger", Field::f32(0.0))
        .field("physical_r_trigger", Field::f32(0.0))
        .field("x_analog_for_ucf", Field::i8(0).since(v(1, 2, 0)))
        .field("percent", Field::f32(0.0).since(v(1, 4, 0)))
        .build()
}

/// Post-frame update: character state after the engine steps a frame.
fn post_frame_update() -> Record {
    let b = Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::PostFrameUpdate.byte()))
        .field(FRAME_FIELD, Field::i32(0))
        .field("player_index", Field::u8(0))
        .field("is_follower", Field::u8(0))
        .field("internal_character_id", Field::u8(0))
        .field("action_state_id", Field::u16(0));
    let b = f32s(
        b,
        &[
            "x_position",
            "y_position",
            "facing_direction",
            "percent",
            "shield_size",
        ],
        FormatVersion::ZERO,
    );
    let b = u8s(
        b,
        &[
            "last_hitting_attack_id",
            "current_combo_count",
            "last_hit_by",
            "stocks_remaining",
        ],
        FormatVersion::ZERO,
    );
    let b = b.field(
        "action_state_frame_counter",
        Field::f32(0.0).since(v(0, 2, 0)),
    );
    let b = flags8s(
        b,
        &[
            "state_bit_flags_1",
            "state_bit_flags_2",
            "state_bit_flags_3",
            "state_bit_flags_4",
            "state_bit_flags_5",
        ],
        v(2, 0, 0),
    );
    let b = b
        .field("misc_as", Field::f32(0.0).since(v(2, 0, 0)))
        .field("ground_air_state", Field::u8(0).since(v(2, 0, 0)))
        .field("last_ground_id", Field::u16(0).since(v(2, 0, 0)))
        .field("jumps_remaining", Field::u8(0).since(v(2, 0, 0)))
        .field("l_cancel_status", Field::u8(0).since(v(2, 0, 0)))
        .field("hurtbox_collision_state", Field::u8(0).since(v(2, 1, 0)));
    let b = f32s(
        b,
        &[
            "self_induced_air_x_speed",
            "self_induced_y_speed",
            "attack_based_x_speed",
            "attack_based_y_speed",
            "self_induced_ground_x_speed",
        ],
        v(3, 5, 0),
    );
    b.field("hitlag_frames_remaining", Field::f32(0.0).since(v(3, 8, 0)))
        .field("animation_index", Field::u32(0).since(v(3, 11, 0)))
        .build()
}

/// Item update: one active item or projectile on one frame.
fn item_update() -> Record {
    let b = Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::ItemUpdate.byte()))
        .field(FRAME_FIELD, Field::i32(0).since(v(3, 0, 0)))
        .field("type_id", Field::i16(0).since(v(3, 0, 0)))
        .field("state", Field::u8(0).since(v(3, 0, 0)));
    let b = f32s(
        b,
        &[
            "facing_direction",
            "x_velocity",
            "y_velocity",
            "x_position",
            "y_position",
        ],
        v(3, 0, 0),
    );
    let b = b
        .field("damage_taken", Field::u16(0).since(v(3, 0, 0)))
        .field("expiration_timer", Field::f32(0.0).since(v(3, 0, 0)))
        .field("spawn_id", Field::u32(0).since(v(3, 0, 0)));
    u8s(b, &["misc_1", "misc_2", "misc_3", "misc_4"], v(3, 2, 0))
        .field("owner", Field::i8(0).since(v(3, 6, 0)))
        .build()
}

/// Frame start: opens a frame and carries its random seed.
fn frame_start() -> Record {
    Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::FrameStart.byte()))
        .field(FRAME_FIELD, Field::i32(0).since(v(2, 2, 0)))
        .field("random_seed", Field::u32(0).since(v(2, 2, 0)))
        .field("scene_frame_counter", Field::u32(0).since(v(3, 10, 0)))
        .build()
}

/// Frame bookend: closes a frame.
fn frame_bookend() -> Record {
    Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::FrameBookend.byte()))
        .field(FRAME_FIELD, Field::i32(0).since(v(3, 0, 0)))
        .field("last_finalized_frame", Field::i32(0).since(v(3, 7, 0)))
        .build()
}

fn game_end() -> Record {
    Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::GameEnd.byte()))
        .field("game_end_method", Field::u8(0))
        .field("lras_initiator", Field::i8(0).since(v(2, 0, 0)))
        .seq("player_placements", Field::i8(0).since(v(3, 13, 0)), 4)
        .build()
}

/// One fragment of a multi-part patch.
fn message_splitter() -> Record {
    Record::builder()
        .field(COMMAND_FIELD, Field::u8(Command::MessageSplitter.byte()))
        .field("fixed_block", Field::bytes(512).since(v(3, 3, 0)))
        .field("actual_size", Field::u16(0).since(v(3, 3, 0)))
        .field("internal_command", Field::u8(0).since(v(3, 3, 0)))
        .field("last_message", Field::u8(0).since(v(3, 3, 0)))
        .build()
}
