//! Closed set of capability predicates that gate a case's expected outcome.
//!
//! Each [`Precondition`] maps to one [`CapabilityCheck`]. CPUID-based checks
//! are pure functions of a [`CpuidResult`]; the single MSR-based check reads
//! another register through the platform. That read may trap, but an escape
//! from containment is passed up to the caller.

use std::fmt;

use crate::cpuid::{
    probe, CpuidQuery, CpuidRegister, CpuidResult, CPUID_LEAF_FEATURES, CPUID_LEAF_PERFMON,
    CPUID_LEAF_STRUCTURED_EXT, CPUID_LEAF_XSAVE,
};
use crate::msr::index::{ARCH_CAP_TSX_CTRL_MSR_BIT, IA32_ARCH_CAPABILITIES};
use crate::{Access, AccessError, ContainmentFailure, Platform};

/// Capability a case depends on. Absent capability forces an expected #GP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Precondition {
    /// Architectural performance monitoring: CPUID(0xA,0) is implemented.
    Perfmon,
    /// Fixed-function counters: perfmon present and CPUID(0xA,0).EDX\[4:0\] != 0.
    FixedCounters,
    /// Protection keys for supervisor pages: CPUID(0x7,0).ECX\[31\].
    Pks,
    /// TSC-deadline timer: CPUID(0x1,0).ECX\[24\].
    TscDeadline,
    /// Direct cache access: CPUID(0x1,0).ECX\[18\].
    Dca,
    /// `UMWAIT`/`TPAUSE`: CPUID(0x7,0).ECX\[5\].
    Waitpkg,
    /// Total memory encryption: CPUID(0x7,0).ECX\[13\].
    Tme,
    /// `PCONFIG`: CPUID(0x7,0).EDX\[18\].
    Pconfig,
    /// Extended feature disable: CPUID(0xD,1).EAX\[4\].
    Xfd,
    /// Processor trace (XFAM\[8\]): CPUID(0x7,0).EBX\[25\].
    Rtit,
    /// Control-flow enforcement (XFAM\[12:11\]): CPUID(0xD,1).ECX\[11\] or ECX\[12\].
    Cet,
    /// User interrupts (XFAM\[14\]): CPUID(0x7,0).EDX\[5\].
    Uli,
    /// Architectural LBRs (XFAM\[15\]): CPUID(0x7,0).EDX\[19\].
    ArchLbr,
    /// TSX control: `IA32_ARCH_CAPABILITIES` bit 7.
    Tsx,
}

impl Precondition {
    /// Every predicate in the closed set.
    pub const ALL: [Self; 14] = [
        Self::Perfmon,
        Self::FixedCounters,
        Self::Pks,
        Self::TscDeadline,
        Self::Dca,
        Self::Waitpkg,
        Self::Tme,
        Self::Pconfig,
        Self::Xfd,
        Self::Rtit,
        Self::Cet,
        Self::Uli,
        Self::ArchLbr,
        Self::Tsx,
    ];

    /// Stable snake-case identifier, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Perfmon => "perfmon",
            Self::FixedCounters => "fixed_counters",
            Self::Pks => "pks",
            Self::TscDeadline => "tsc_deadline",
            Self::Dca => "dca",
            Self::Waitpkg => "waitpkg",
            Self::Tme => "tme",
            Self::Pconfig => "pconfig",
            Self::Xfd => "xfd",
            Self::Rtit => "rtit",
            Self::Cet => "cet",
            Self::Uli => "uli",
            Self::ArchLbr => "arch_lbr",
            Self::Tsx => "tsx",
        }
    }

    /// The capability check this predicate performs.
    #[must_use]
    pub const fn check(self) -> CapabilityCheck {
        match self {
            Self::Perfmon => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_PERFMON, 0),
                test: CpuidTest::LeafImplemented,
            },
            Self::FixedCounters => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_PERFMON, 0),
                test: CpuidTest::FieldNonZero {
                    register: CpuidRegister::Edx,
                    low: 0,
                    high: 4,
                },
            },
            Self::Pks => structured_ext(CpuidRegister::Ecx, &[31]),
            Self::TscDeadline => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_FEATURES, 0),
                test: CpuidTest::AnyBit {
                    register: CpuidRegister::Ecx,
                    bits: &[24],
                },
            },
            Self::Dca => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_FEATURES, 0),
                test: CpuidTest::AnyBit {
                    register: CpuidRegister::Ecx,
                    bits: &[18],
                },
            },
            Self::Waitpkg => structured_ext(CpuidRegister::Ecx, &[5]),
            Self::Tme => structured_ext(CpuidRegister::Ecx, &[13]),
            Self::Pconfig => structured_ext(CpuidRegister::Edx, &[18]),
            Self::Xfd => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_XSAVE, 1),
                test: CpuidTest::AnyBit {
                    register: CpuidRegister::Eax,
                    bits: &[4],
                },
            },
            Self::Rtit => structured_ext(CpuidRegister::Ebx, &[25]),
            Self::Cet => CapabilityCheck::Cpuid {
                query: CpuidQuery::new(CPUID_LEAF_XSAVE, 1),
                test: CpuidTest::AnyBit {
                    register: CpuidRegister::Ecx,
                    bits: &[11, 12],
                },
            },
            Self::Uli => structured_ext(CpuidRegister::Edx, &[5]),
            Self::ArchLbr => structured_ext(CpuidRegister::Edx, &[19]),
            Self::Tsx => CapabilityCheck::MsrBit {
                msr: IA32_ARCH_CAPABILITIES,
                bit: ARCH_CAP_TSX_CTRL_MSR_BIT,
            },
        }
    }

    /// Evaluates the predicate against live platform state.
    ///
    /// # Errors
    ///
    /// Returns [`ContainmentFailure`] when the capability read escapes containment.
    pub fn evaluate<P: Platform + ?Sized>(
        self,
        platform: &mut P,
    ) -> Result<Gate, ContainmentFailure> {
        self.check().evaluate(platform)
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const fn structured_ext(register: CpuidRegister, bits: &'static [u8]) -> CapabilityCheck {
    CapabilityCheck::Cpuid {
        query: CpuidQuery::new(CPUID_LEAF_STRUCTURED_EXT, 0),
        test: CpuidTest::AnyBit { register, bits },
    }
}

/// Test applied to one CPUID result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuidTest {
    /// The leaf returns anything other than four zero words.
    LeafImplemented,
    /// At least one of `bits` is set in `register`.
    AnyBit {
        /// Output register holding the bits.
        register: CpuidRegister,
        /// Candidate bit positions; any one suffices.
        bits: &'static [u8],
    },
    /// The leaf is implemented and the field `low..=high` is non-zero.
    FieldNonZero {
        /// Output register holding the field.
        register: CpuidRegister,
        /// Lowest bit of the field.
        low: u8,
        /// Highest bit of the field, inclusive.
        high: u8,
    },
}

impl CpuidTest {
    /// Pure evaluation over a probe result.
    #[must_use]
    pub const fn holds(&self, result: &CpuidResult) -> bool {
        match *self {
            Self::LeafImplemented => !result.is_unimplemented(),
            Self::AnyBit { register, bits } => {
                let mut i = 0;
                while i < bits.len() {
                    if result.bit(register, bits[i]) {
                        return true;
                    }
                    i += 1;
                }
                false
            }
            Self::FieldNonZero {
                register,
                low,
                high,
            } => !result.is_unimplemented() && result.field(register, low, high) != 0,
        }
    }
}

/// Concrete probe behind a [`Precondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityCheck {
    /// Feature bits reported by one CPUID query.
    Cpuid {
        /// Query to execute.
        query: CpuidQuery,
        /// Test applied to its result.
        test: CpuidTest,
    },
    /// A bit of another MSR's current value.
    MsrBit {
        /// MSR to read.
        msr: u32,
        /// Bit that must be set.
        bit: u8,
    },
}

impl CapabilityCheck {
    /// Runs the probe and classifies the capability.
    ///
    /// A probe read that traps yields [`Gate::ProbeFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`ContainmentFailure`] when the capability read escapes containment.
    pub fn evaluate<P: Platform + ?Sized>(
        &self,
        platform: &mut P,
    ) -> Result<Gate, ContainmentFailure> {
        match *self {
            Self::Cpuid { query, test } => {
                let result = probe(&*platform, query.leaf, query.sub_leaf);
                Ok(Gate::from_presence(test.holds(&result)))
            }
            Self::MsrBit { msr, bit } => match platform.read_msr(msr) {
                Ok(value) => Ok(Gate::from_presence(bit < 64 && (value >> bit) & 1 == 1)),
                Err(AccessError::Trapped(kind)) => {
                    log::warn!("capability probe read of MSR {msr:#x} raised {kind}");
                    Ok(Gate::ProbeFailed)
                }
                Err(AccessError::Uncontained(detail)) => Err(ContainmentFailure {
                    msr,
                    access: Access::Read,
                    detail,
                }),
            },
        }
    }
}

/// Capability state that decided a case's effective expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Gate {
    /// The case carries no precondition.
    Ungated,
    /// The capability is present; the baseline stands.
    Satisfied,
    /// The capability is absent; #GP is forced.
    Unsatisfied,
    /// The probe itself faulted; treated as absent.
    ProbeFailed,
}

impl Gate {
    const fn from_presence(present: bool) -> Self {
        if present {
            Self::Satisfied
        } else {
            Self::Unsatisfied
        }
    }

    /// True when the gate forces the expectation to #GP.
    #[must_use]
    pub const fn forces_gp(self) -> bool {
        matches!(self, Self::Unsatisfied | Self::ProbeFailed)
    }
}
