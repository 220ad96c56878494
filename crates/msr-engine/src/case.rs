//! Declarative MSR test vectors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Outcome, Precondition, VersionSet, VersionTag};

/// Direction of a privileged MSR access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Access {
    /// `RDMSR`.
    #[cfg_attr(feature = "serde", serde(alias = "rdmsr"))]
    Read,
    /// `WRMSR`.
    #[cfg_attr(feature = "serde", serde(alias = "wrmsr"))]
    Write,
}

impl Access {
    /// Lowercase name used in case names and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an access direction string is not `read` or `write`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access direction `{0}` (expected read or write)")]
pub struct UnknownAccess(pub String);

impl FromStr for Access {
    type Err = UnknownAccess;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" | "rdmsr" => Ok(Self::Read),
            "write" | "wrmsr" => Ok(Self::Write),
            other => Err(UnknownAccess(other.to_string())),
        }
    }
}

#[cfg(feature = "serde")]
const fn default_width() -> u32 {
    1
}

/// One test vector: an MSR span, an access direction and its expected outcome.
///
/// Cases are plain data. Validation happens when they are collected into a
/// [`Registry`](crate::Registry); resolution never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TestCase {
    /// Identifying name, conventionally `<MSR>_<access>`.
    pub name: String,
    /// Module revisions this case applies to.
    pub versions: VersionSet,
    /// First MSR index of the span.
    pub msr: u32,
    /// Access direction.
    pub access: Access,
    /// Number of consecutive MSRs covered, starting at `msr`.
    #[cfg_attr(feature = "serde", serde(default = "default_width"))]
    pub width: u32,
    /// Outcome expected when no precondition overrides it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub baseline: Outcome,
    /// Capability the baseline depends on.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub precondition: Option<Precondition>,
}

impl TestCase {
    /// Creates a single-register, ungated case.
    pub fn new(
        name: impl Into<String>,
        versions: &[VersionTag],
        msr: u32,
        access: Access,
        baseline: Outcome,
    ) -> Self {
        Self {
            name: name.into(),
            versions: VersionSet::of(versions),
            msr,
            access,
            width: 1,
            baseline,
            precondition: None,
        }
    }

    /// Sets the span width.
    #[must_use]
    pub const fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Gates the baseline on `precondition`.
    #[must_use]
    pub const fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }

    /// Returns true when the case is selected for `version`.
    #[must_use]
    pub fn applies_to(&self, version: VersionTag) -> bool {
        self.versions.contains(version)
    }

    /// Last MSR index covered, or `None` for an empty or overflowing span.
    #[must_use]
    pub const fn last_msr(&self) -> Option<u32> {
        if self.width == 0 {
            return None;
        }
        self.msr.checked_add(self.width - 1)
    }

    /// MSR indices covered, paired with their offset from `msr`.
    ///
    /// Iteration stops early if the span would wrap past `u32::MAX`; registry
    /// validation rejects such cases before they can run.
    pub fn span(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.width)
            .map_while(move |offset| Some((offset, self.msr.checked_add(offset)?)))
    }

    /// Returns true when both cases touch at least one common MSR.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.last_msr(), other.last_msr()) {
            (Some(last), Some(other_last)) => self.msr <= other_last && other.msr <= last,
            _ => false,
        }
    }
}
