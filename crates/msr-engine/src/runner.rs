//! Suite execution over a validated registry.
//!
//! ## Execution Model
//!
//! 1. Select the registry cases that apply to the active version and pass the
//!    optional name and direction filters.
//! 2. For each selected case, in registry order:
//!    a. Resolve its expectation against live capability state.
//!    b. Execute every offset of its span.
//!    c. Fold the offset verdicts into a case verdict.
//! 3. Report every case result plus summary counts.
//!
//! A containment failure aborts the run with the identity of the case that
//! triggered it; no partial report is produced.

use std::fmt;

use thiserror::Error;

use crate::verify::{verify, CaseResult, VerifyError};
use crate::{Access, Platform, Registry, TestCase, VersionTag};

/// Which cases a run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Active module revision.
    pub version: VersionTag,
    /// Only cases whose name contains this substring.
    pub name_filter: Option<String>,
    /// Only cases of this access direction.
    pub access: Option<Access>,
}

impl RunConfig {
    /// Selects every case applicable to `version`.
    #[must_use]
    pub const fn new(version: VersionTag) -> Self {
        Self {
            version,
            name_filter: None,
            access: None,
        }
    }

    /// Restricts the run to case names containing `filter`.
    #[must_use]
    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = Some(filter.into());
        self
    }

    /// Restricts the run to one access direction.
    #[must_use]
    pub const fn with_access(mut self, access: Access) -> Self {
        self.access = Some(access);
        self
    }

    /// Returns true when `case` is part of a run with this configuration.
    #[must_use]
    pub fn selects(&self, case: &TestCase) -> bool {
        case.applies_to(self.version)
            && self.access.is_none_or(|access| access == case.access)
            && self
                .name_filter
                .as_deref()
                .is_none_or(|filter| case.name.contains(filter))
    }
}

/// Fatal run failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// An access escaped trap containment; the run was aborted.
    #[error("case `{case}` escaped trap containment at MSR {msr:#x}: {detail}")]
    Containment {
        /// Case that was executing.
        case: String,
        /// MSR whose access escaped.
        msr: u32,
        /// Backend description of the failure.
        detail: String,
    },
    /// A selected case covers no valid MSR range; nothing of it was executed.
    #[error("case `{case}` span {msr:#x}+{width:#x} covers no valid MSR range")]
    InvalidSpan {
        /// Offending case.
        case: String,
        /// First MSR of the span.
        msr: u32,
        /// Requested width.
        width: u32,
    },
}

/// Ordered results of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Report {
    /// Module revision the run targeted.
    pub version: VersionTag,
    /// One entry per selected case, in registry order.
    pub results: Vec<CaseResult>,
}

impl Report {
    /// Returns true when every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CaseResult::passed)
    }

    /// Returns counts for summary reporting.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let passed = self.results.iter().filter(|r| r.passed()).count();
        RunSummary {
            passed,
            failed: self.results.len() - passed,
            total: self.results.len(),
        }
    }

    /// Looks up a result by case name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Iterates the failing results.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

/// Summary counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunSummary {
    /// Cases whose every offset matched.
    pub passed: usize,
    /// Cases with at least one mismatching offset.
    pub failed: usize,
    /// Cases executed.
    pub total: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} total",
            self.passed, self.failed, self.total
        )
    }
}

/// Runs every case `config` selects from `registry` against `platform`.
///
/// # Errors
///
/// Returns [`RunError::Containment`] when any access or capability read
/// escapes trap containment, and [`RunError::InvalidSpan`] for a case whose
/// span covers no register.
pub fn run<P: Platform + ?Sized>(
    registry: &Registry,
    config: &RunConfig,
    platform: &mut P,
) -> Result<Report, RunError> {
    let mut results = Vec::new();

    for case in registry.select(config) {
        let result = verify(case, platform).map_err(|error| {
            log::error!("{}: {error}", case.name);
            match error {
                VerifyError::InvalidSpan { name, msr, width } => RunError::InvalidSpan {
                    case: name,
                    msr,
                    width,
                },
                VerifyError::Containment(failure) => RunError::Containment {
                    case: case.name.clone(),
                    msr: failure.msr,
                    detail: failure.detail,
                },
            }
        })?;
        results.push(result);
    }

    let report = Report {
        version: config.version,
        results,
    };
    log::info!("TDX {} MSR run: {}", config.version, report.summary());
    Ok(report)
}
