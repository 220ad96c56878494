use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Revision of the TDX module whose MSR virtualization is under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum VersionTag {
    /// TDX module 1.0.
    #[cfg_attr(feature = "serde", serde(rename = "1.0"))]
    V1_0,
    /// TDX module 1.5.
    #[cfg_attr(feature = "serde", serde(rename = "1.5"))]
    V1_5,
    /// TDX module 2.0.
    #[cfg_attr(feature = "serde", serde(rename = "2.0"))]
    V2_0,
}

impl VersionTag {
    /// Every known revision, oldest first.
    pub const ALL: [Self; 3] = [Self::V1_0, Self::V1_5, Self::V2_0];

    /// Canonical dotted spelling (`"1.5"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_5 => "1.5",
            Self::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a version string names no known module revision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown TDX module version `{0}` (expected 1.0, 1.5 or 2.0)")]
pub struct UnknownVersion(pub String);

impl FromStr for VersionTag {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" | "1" => Ok(Self::V1_0),
            "1.5" => Ok(Self::V1_5),
            "2.0" | "2" => Ok(Self::V2_0),
            other => Err(UnknownVersion(other.to_string())),
        }
    }
}

/// Set of module revisions a test case applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VersionSet(BTreeSet<VersionTag>);

impl VersionSet {
    /// Builds a set from a slice of tags.
    #[must_use]
    pub fn of(tags: &[VersionTag]) -> Self {
        tags.iter().copied().collect()
    }

    /// Returns true when `tag` is a member.
    #[must_use]
    pub fn contains(&self, tag: VersionTag) -> bool {
        self.0.contains(&tag)
    }

    /// Returns true when the two sets share at least one revision.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    /// First revision present in both sets.
    #[must_use]
    pub fn first_shared(&self, other: &Self) -> Option<VersionTag> {
        self.0.intersection(&other.0).next().copied()
    }

    /// Returns true when no revision is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = VersionTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<VersionTag> for VersionSet {
    fn from_iter<I: IntoIterator<Item = VersionTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{tag}")?;
            first = false;
        }
        Ok(())
    }
}
