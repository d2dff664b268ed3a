//! Command bytes tagging each record of the event stream.

use std::fmt;

/// Record kinds understood by this implementation.
///
/// Any other byte may still appear in a stream as long as the payload size
/// table declares its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Command {
    /// One fragment of a multi-part embedded patch.
    MessageSplitter = 0x10,
    /// The self-describing payload size table.
    EventPayloads = 0x35,
    GameStart = 0x36,
    PreFrameUpdate = 0x37,
    PostFrameUpdate = 0x38,
    GameEnd = 0x39,
    FrameStart = 0x3A,
    ItemUpdate = 0x3B,
    FrameBookend = 0x3C,
    /// A single-shot embedded patch (code list) stored as one opaque blob.
    GeckoList = 0x3D,
}

impl Command {
    /// Every known command, in byte order.
    pub const ALL: [Self; 10] = [
        Self::MessageSplitter,
        Self::EventPayloads,
        Self::GameStart,
        Self::PreFrameUpdate,
        Self::PostFrameUpdate,
        Self::GameEnd,
        Self::FrameStart,
        Self::ItemUpdate,
        Self::FrameBookend,
        Self::GeckoList,
    ];

    /// Parses a command from a raw byte.
    #[must_use]
    pub const fn parse(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(Self::MessageSplitter),
            0x35 => Some(Self::EventPayloads),
            0x36 => Some(Self::GameStart),
            0x37 => Some(Self::PreFrameUpdate),
            0x38 => Some(Self::PostFrameUpdate),
            0x39 => Some(Self::GameEnd),
            0x3A => Some(Self::FrameStart),
            0x3B => Some(Self::ItemUpdate),
            0x3C => Some(Self::FrameBookend),
            0x3D => Some(Self::GeckoList),
            _ => None,
        }
    }

    /// Returns the raw command byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Human-readable name used in logs and tooling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MessageSplitter => "message splitter",
            Self::EventPayloads => "event payloads",
            Self::GameStart => "game start",
            Self::PreFrameUpdate => "pre-frame update",
            Self::PostFrameUpdate => "post-frame update",
            Self::GameEnd => "game end",
            Self::FrameStart => "frame start",
            Self::ItemUpdate => "item update",
            Self::FrameBookend => "frame bookend",
            Self::GeckoList => "gecko list",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.byte())
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_command() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.byte()), Some(command));
        }
    }

    #[test]
    fn unknown_bytes_do_not_parse() {
        assert_eq!(Command::parse(0x00), None);
        assert_eq!(Command::parse(0x3E), None);
        assert_eq!(Command::parse(0xFF), None);
    }

    #[test]
    fn fixed_byte_values() {
        assert_eq!(Command::EventPayloads.byte(), 0x35);
        assert_eq!(Command::GameStart.byte(), 0x36);
        assert_eq!(Command::MessageSplitter.byte(), 0x10);
        assert_eq!(u8::from(Command::GeckoList), 0x3D);
    }

    #[test]
    fn display_includes_hex() {
        assert_eq!(Command::FrameBookend.to_string(), "frame bookend (0x3C)");
    }

    #[test]
    fn all_is_sorted_and_unique() {
        let mut sorted = Command::ALL;
        sorted.sort();
        assert_eq!(sorted, Command::ALL);
        assert!(sorted.windows(2).all(|w| w[0] != w[1]));
    }
}
