//! Validated, immutable case collections.

use thiserror::Error;

use crate::msr::index::DESTRUCTIVE_WRITE_MSRS;
use crate::{Access, RunConfig, TestCase, VersionTag};

/// Reasons a set of cases is refused before anything runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A case has an empty name.
    #[error("case #{index} has an empty name")]
    EmptyName {
        /// Position of the case in load order.
        index: usize,
    },
    /// A case applies to no module revision.
    #[error("case `{name}` lists no module versions")]
    NoVersions {
        /// Case name.
        name: String,
    },
    /// A case spans zero registers.
    #[error("case `{name}` has width 0")]
    ZeroWidth {
        /// Case name.
        name: String,
    },
    /// The span runs past the last MSR index.
    #[error("case `{name}` span {msr:#x}+{width:#x} overflows the MSR index space")]
    SpanOverflow {
        /// Case name.
        name: String,
        /// First MSR of the span.
        msr: u32,
        /// Requested width.
        width: u32,
    },
    /// A write case touches an MSR whose write terminates the guest.
    #[error("case `{name}` writes MSR {msr:#x}, which terminates the guest")]
    DestructiveWrite {
        /// Case name.
        name: String,
        /// Offending MSR.
        msr: u32,
    },
    /// Two overlapping cases disagree on the expected outcome.
    #[error(
        "cases `{first}` and `{second}` both cover {access} of MSR {msr:#x} under TDX {version} with different expectations"
    )]
    Conflict {
        /// Earlier case in load order.
        first: String,
        /// Later case in load order.
        second: String,
        /// Shared access direction.
        access: Access,
        /// Lowest MSR both spans cover.
        msr: u32,
        /// Lowest revision both cases apply to.
        version: VersionTag,
    },
    /// Two overlapping cases define the same expectation twice.
    #[error(
        "cases `{first}` and `{second}` both cover {access} of MSR {msr:#x} under TDX {version}"
    )]
    Duplicate {
        /// Earlier case in load order.
        first: String,
        /// Later case in load order.
        second: String,
        /// Shared access direction.
        access: Access,
        /// Lowest MSR both spans cover.
        msr: u32,
        /// Lowest revision both cases apply to.
        version: VersionTag,
    },
}

/// An ordered collection of cases that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    cases: Vec<TestCase>,
}

impl Registry {
    /// Validates `cases` and freezes them in load order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] found; no partial registry is
    /// produced.
    pub fn new(cases: Vec<TestCase>) -> Result<Self, RegistryError> {
        for (index, case) in cases.iter().enumerate() {
            validate_case(index, case)?;
        }
        for (index, case) in cases.iter().enumerate() {
            for earlier in &cases[..index] {
                check_overlap(earlier, case)?;
            }
        }
        log::debug!("registry loaded with {} cases", cases.len());
        Ok(Self { cases })
    }

    /// The built-in TDX MSR table.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] only if the compiled-in table is itself
    /// inconsistent.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(crate::builtin::builtin_cases())
    }

    /// Cases a run with `config` executes, in registry order.
    pub fn select<'a>(&'a self, config: &'a RunConfig) -> impl Iterator<Item = &'a TestCase> + 'a {
        self.cases.iter().filter(move |case| config.selects(case))
    }

    /// Every case in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// First case named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when the registry holds no case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_case(index: usize, case: &TestCase) -> Result<(), RegistryError> {
    if case.name.trim().is_empty() {
        return Err(RegistryError::EmptyName { index });
    }
    if case.versions.is_empty() {
        return Err(RegistryError::NoVersions {
            name: case.name.clone(),
        });
    }
    if case.width == 0 {
        return Err(RegistryError::ZeroWidth {
            name: case.name.clone(),
        });
    }
    let Some(last) = case.last_msr() else {
        return Err(RegistryError::SpanOverflow {
            name: case.name.clone(),
            msr: case.msr,
            width: case.width,
        });
    };
    if case.access == Access::Write {
        if let Some(&msr) = DESTRUCTIVE_WRITE_MSRS
            .iter()
            .find(|&&msr| (case.msr..=last).contains(&msr))
        {
            return Err(RegistryError::DestructiveWrite {
                name: case.name.clone(),
                msr,
            });
        }
    }
    Ok(())
}

fn check_overlap(earlier: &TestCase, later: &TestCase) -> Result<(), RegistryError> {
    if earlier.access != later.access || !earlier.overlaps(later) {
        return Ok(());
    }
    let Some(version) = earlier.versions.first_shared(&later.versions) else {
        return Ok(());
    };
    let first = earlier.name.clone();
    let second = later.name.clone();
    let access = later.access;
    let msr = earlier.msr.max(later.msr);
    if earlier.baseline == later.baseline && earlier.precondition == later.precondition {
        Err(RegistryError::Duplicate {
            first,
            second,
            access,
            msr,
            version,
        })
    } else {
        Err(RegistryError::Conflict {
            first,
            second,
            access,
            msr,
            version,
        })
    }
}
