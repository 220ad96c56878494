//! Range verification: one resolved expectation checked at every offset of a
//! case's span.

use std::fmt;

use thiserror::Error;

use crate::execute::{execute, ContainmentFailure};
use crate::resolve::resolve;
use crate::{Access, Gate, Outcome, Platform, TestCase, TrapKind};

/// Why a case could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The span is empty or runs past the last MSR index; nothing is executed.
    #[error("case `{name}` span {msr:#x}+{width:#x} covers no valid MSR range")]
    InvalidSpan {
        /// Case name.
        name: String,
        /// First MSR of the span.
        msr: u32,
        /// Requested width.
        width: u32,
    },
    /// An access or capability read escaped trap containment.
    #[error(transparent)]
    Containment(#[from] ContainmentFailure),
}

/// Comparison of one observed access against its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OffsetVerdict {
    /// Observed and expected agree.
    Match,
    /// A trap was expected but the access completed.
    ExpectedButNoFault(TrapKind),
    /// No trap was expected but one was raised.
    UnexpectedFault(TrapKind),
    /// Both trapped, with different kinds.
    WrongFaultKind {
        /// Expected trap.
        expected: TrapKind,
        /// Trap actually raised.
        observed: TrapKind,
    },
}

impl OffsetVerdict {
    /// Classifies `observed` against `expected`.
    #[must_use]
    pub const fn compare(expected: Outcome, observed: Outcome) -> Self {
        match (expected.trap(), observed.trap()) {
            (None, None) => Self::Match,
            (Some(expected), None) => Self::ExpectedButNoFault(expected),
            (None, Some(observed)) => Self::UnexpectedFault(observed),
            (Some(expected), Some(observed)) => {
                if expected as u8 == observed as u8 {
                    Self::Match
                } else {
                    Self::WrongFaultKind { expected, observed }
                }
            }
        }
    }

    /// Returns true for [`OffsetVerdict::Match`].
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for OffsetVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => f.write_str("match"),
            Self::ExpectedButNoFault(kind) => {
                write!(f, "expected {} but no fault", kind.mnemonic())
            }
            Self::UnexpectedFault(kind) => write!(f, "unexpected {}", kind.mnemonic()),
            Self::WrongFaultKind { expected, observed } => write!(
                f,
                "expected {} but got {}",
                expected.mnemonic(),
                observed.mnemonic()
            ),
        }
    }
}

/// One offset whose observed outcome differed from the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Mismatch {
    /// Offset within the case span.
    pub offset: u32,
    /// MSR index at that offset.
    pub msr: u32,
    /// Resolved expectation.
    pub expected: Outcome,
    /// Outcome actually observed.
    pub observed: Outcome,
}

impl Mismatch {
    /// The offset-level verdict this mismatch represents.
    #[must_use]
    pub const fn verdict(&self) -> OffsetVerdict {
        OffsetVerdict::compare(self.expected, self.observed)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset {} (MSR {:#x}): {}",
            self.offset,
            self.msr,
            self.verdict()
        )
    }
}

/// Folded verdict over every offset of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CaseVerdict {
    /// Every offset matched.
    Pass,
    /// At least one offset mismatched.
    Fail {
        /// Lowest mismatching offset.
        first: Mismatch,
        /// Number of mismatching offsets.
        mismatches: u32,
    },
}

impl CaseVerdict {
    /// Returns true for [`CaseVerdict::Pass`].
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Everything recorded about one verified case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// First MSR of the span.
    pub msr: u32,
    /// Access direction.
    pub access: Access,
    /// Span width.
    pub width: u32,
    /// Resolved expectation applied to every offset.
    pub expected: Outcome,
    /// Precondition state behind `expected`.
    pub gate: Gate,
    /// Number of offsets actually executed.
    pub checked: u32,
    /// Folded verdict.
    pub verdict: CaseVerdict,
}

impl CaseResult {
    /// Returns true when the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.verdict.passed()
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            CaseVerdict::Pass => write!(f, "PASS {} (expected {})", self.name, self.expected),
            CaseVerdict::Fail { first, mismatches } => write!(
                f,
                "FAIL {}: {first}, {mismatches}/{} offsets mismatched",
                self.name, self.checked
            ),
        }
    }
}

/// Resolves `case` once, then executes and compares every offset of its span.
///
/// # Errors
///
/// Returns [`VerifyError::InvalidSpan`] before touching the platform when the
/// span covers no register, and [`VerifyError::Containment`] as soon as any
/// access escapes containment; the remaining offsets are not executed.
pub fn verify<P: Platform + ?Sized>(
    case: &TestCase,
    platform: &mut P,
) -> Result<CaseResult, VerifyError> {
    if case.last_msr().is_none() {
        return Err(VerifyError::InvalidSpan {
            name: case.name.clone(),
            msr: case.msr,
            width: case.width,
        });
    }
    let resolved = resolve(case, platform)?;
    let mut first = None;
    let mut mismatches = 0u32;
    let mut checked = 0u32;

    for (offset, msr) in case.span() {
        let observed = execute(platform, msr, case.access)?;
        let verdict = OffsetVerdict::compare(resolved.expected, observed);
        log::trace!(
            "{} +{offset} MSR {msr:#x}: {observed} ({verdict})",
            case.name
        );
        checked += 1;
        if !verdict.is_match() {
            mismatches += 1;
            first.get_or_insert(Mismatch {
                offset,
                msr,
                expected: resolved.expected,
                observed,
            });
        }
    }

    let verdict = match first {
        None => CaseVerdict::Pass,
        Some(first) => {
            log::warn!("{}: {first} ({mismatches} mismatched)", case.name);
            CaseVerdict::Fail { first, mismatches }
        }
    };
    log::debug!("{} -> {verdict:?}", case.name);

    Ok(CaseResult {
        name: case.name.clone(),
        msr: case.msr,
        access: case.access,
        width: case.width,
        expected: resolved.expected,
        gate: resolved.gate,
        checked,
        verdict,
    })
}
