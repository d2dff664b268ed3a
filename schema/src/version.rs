//! Stream format versions.

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// A `major.minor.patch` format version.
///
/// Ordering compares the three components numerically, in order, so
/// `3.10.0` is newer than `3.9.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct FormatVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl FormatVersion {
    /// The oldest possible version; fields gated on it are always active.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a new version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Builds a version from the leading three bytes of a stream's
    /// `major, minor, build, unused` version quad.
    #[must_use]
    pub const fn from_quad(quad: [u8; 4]) -> Self {
        Self::new(quad[0] as u16, quad[1] as u16, quad[2] as u16)
    }

    /// Returns `true` if `self` is `minimum` or newer.
    #[must_use]
    pub fn is_at_least(self, minimum: Self) -> bool {
        self >= minimum
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for FormatVersion {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidVersion {
            text: text.to_string(),
        };
        let mut parts = text.split('.').map(str::parse::<u16>);
        let (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self::new(major, minor, patch))
    }
}

impl TryFrom<String> for FormatVersion {
    type Error = SchemaError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<FormatVersion> for String {
    fn from(version: FormatVersion) -> Self {
        version.to_string()
    }
}
