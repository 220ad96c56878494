//! Deterministic in-memory platform.
//!
//! [`SimulatedPlatform`] answers CPUID queries from a fixed table and models
//! each MSR as a stored value plus the outcome its read and write raise.
//! MSRs it does not know raise #GP in both directions, and CPUID leaves it
//! does not know return four zero words. Write cases store back the value a
//! register already holds.

use std::collections::BTreeMap;

use crate::cpuid::{CpuidQuery, CpuidRegister, CpuidResult};
use crate::resolve::resolve;
use crate::{
    Access, AccessError, CpuidSource, MsrBus, Outcome, Registry, RunConfig, TrapKind,
};

const ESCAPE_DETAIL: &str = "simulated containment escape";

/// Behaviour of one simulated MSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MsrBehavior {
    /// Current register value.
    pub value: u64,
    /// Outcome raised by a read.
    pub read: Outcome,
    /// Outcome raised by a write.
    pub write: Outcome,
    /// Every access escapes trap containment.
    pub uncontained: bool,
}

impl MsrBehavior {
    /// An MSR the platform does not implement.
    pub const ABSENT: Self = Self {
        value: 0,
        read: Outcome::GeneralProtection,
        write: Outcome::GeneralProtection,
        uncontained: false,
    };
}

/// One access as the simulated platform saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRecord {
    /// A read and the outcome it raised.
    Read {
        /// MSR read.
        msr: u32,
        /// Outcome raised.
        outcome: Outcome,
    },
    /// A write, the value offered and the outcome it raised.
    Write {
        /// MSR written.
        msr: u32,
        /// Value the caller tried to store.
        value: u64,
        /// Outcome raised.
        outcome: Outcome,
    },
    /// An access that escaped containment.
    Escaped {
        /// MSR accessed.
        msr: u32,
        /// Direction of the access.
        access: Access,
    },
}

/// Serialisable CPUID table entry of a [`PlatformProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub struct CpuidEntry {
    pub leaf: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_leaf: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub eax: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ebx: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ecx: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edx: u32,
}

/// Serialisable MSR entry of a [`PlatformProfile`].
///
/// Listed MSRs default to accessible in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MsrEntry {
    /// MSR index.
    pub msr: u32,
    /// Initial value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u64,
    /// Outcome raised by a read.
    #[cfg_attr(feature = "serde", serde(default))]
    pub read: Outcome,
    /// Outcome raised by a write.
    #[cfg_attr(feature = "serde", serde(default))]
    pub write: Outcome,
    /// Every access escapes trap containment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub uncontained: bool,
}

/// Declarative description of a simulated platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PlatformProfile {
    /// CPUID results by `(leaf, sub_leaf)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cpuid: Vec<CpuidEntry>,
    /// MSR behaviours.
    #[cfg_attr(feature = "serde", serde(default))]
    pub msrs: Vec<MsrEntry>,
}

/// In-memory implementation of [`MsrBus`] and [`CpuidSource`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedPlatform {
    cpuid: BTreeMap<CpuidQuery, CpuidResult>,
    msrs: BTreeMap<u32, MsrBehavior>,
    log: Vec<AccessRecord>,
}

impl SimulatedPlatform {
    /// A platform with no CPUID leaves and no MSRs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a platform from its declarative description.
    ///
    /// Later entries for the same leaf or MSR replace earlier ones.
    #[must_use]
    pub fn from_profile(profile: &PlatformProfile) -> Self {
        let mut platform = Self::new();
        for entry in &profile.cpuid {
            platform.set_cpuid(
                CpuidQuery::new(entry.leaf, entry.sub_leaf),
                CpuidResult {
                    eax: entry.eax,
                    ebx: entry.ebx,
                    ecx: entry.ecx,
                    edx: entry.edx,
                },
            );
        }
        for entry in &profile.msrs {
            platform.msrs.insert(
                entry.msr,
                MsrBehavior {
                    value: entry.value,
                    read: entry.read,
                    write: entry.write,
                    uncontained: entry.uncontained,
                },
            );
        }
        platform
    }

    /// A platform whose MSRs behave exactly as `registry` expects for the cases
    /// `config` selects, given no CPUID leaves.
    #[must_use]
    pub fn conforming(registry: &Registry, config: &RunConfig) -> Self {
        let mut platform = Self::new();
        platform.conform_to(registry, config);
        platform
    }

    /// Reshapes MSR behaviour so every case `config` selects would pass.
    ///
    /// Expectations are resolved against this platform's current CPUID table
    /// and MSR state, in registry order. The access log is cleared afterwards.
    pub fn conform_to(&mut self, registry: &Registry, config: &RunConfig) {
        for case in registry.select(config) {
            // The run aborts on an escaping capability read; leave the span alone.
            let Ok(resolved) = resolve(case, self) else {
                continue;
            };
            let expected = resolved.expected;
            for (_, msr) in case.span() {
                let behavior = self.msrs.entry(msr).or_insert(MsrBehavior::ABSENT);
                match case.access {
                    Access::Read => behavior.read = expected,
                    Access::Write => behavior.write = expected,
                }
            }
        }
        self.log.clear();
    }

    /// Sets the result of one CPUID query.
    pub fn set_cpuid(&mut self, query: CpuidQuery, result: CpuidResult) {
        self.cpuid.insert(query, result);
    }

    /// Sets one bit of a CPUID result, creating the leaf if needed.
    pub fn set_cpuid_bit(&mut self, query: CpuidQuery, register: CpuidRegister, bit: u8) {
        let result = self.cpuid.entry(query).or_default();
        let mask = 1u32.checked_shl(u32::from(bit)).unwrap_or(0);
        match register {
            CpuidRegister::Eax => result.eax |= mask,
            CpuidRegister::Ebx => result.ebx |= mask,
            CpuidRegister::Ecx => result.ecx |= mask,
            CpuidRegister::Edx => result.edx |= mask,
        }
    }

    /// Defines (or redefines) an MSR.
    pub fn define_msr(&mut self, msr: u32, value: u64, read: Outcome, write: Outcome) {
        self.msrs.insert(
            msr,
            MsrBehavior {
                value,
                read,
                write,
                uncontained: false,
            },
        );
    }

    /// Makes every access to `msr` escape containment.
    pub fn mark_uncontained(&mut self, msr: u32) {
        let behavior = self.msrs.entry(msr).or_insert(MsrBehavior::ABSENT);
        behavior.uncontained = true;
    }

    /// Behaviour of `msr`, if defined.
    #[must_use]
    pub fn msr(&self, msr: u32) -> Option<&MsrBehavior> {
        self.msrs.get(&msr)
    }

    /// Stored value of `msr`, if defined.
    #[must_use]
    pub fn msr_value(&self, msr: u32) -> Option<u64> {
        self.msrs.get(&msr).map(|behavior| behavior.value)
    }

    /// Accesses observed since construction or the last clear.
    #[must_use]
    pub fn access_log(&self) -> &[AccessRecord] {
        &self.log
    }

    /// Forgets recorded accesses.
    pub fn clear_access_log(&mut self) {
        self.log.clear();
    }

    fn behavior(&self, msr: u32) -> MsrBehavior {
        self.msrs.get(&msr).copied().unwrap_or(MsrBehavior::ABSENT)
    }

    fn escape(&mut self, msr: u32, access: Access) -> AccessError {
        self.log.push(AccessRecord::Escaped { msr, access });
        AccessError::Uncontained(ESCAPE_DETAIL.to_string())
    }
}

fn raise(outcome: Outcome) -> Result<(), TrapKind> {
    outcome.trap().map_or(Ok(()), Err)
}

impl MsrBus for SimulatedPlatform {
    fn read_msr(&mut self, msr: u32) -> Result<u64, AccessError> {
        let behavior = self.behavior(msr);
        if behavior.uncontained {
            return Err(self.escape(msr, Access::Read));
        }
        self.log.push(AccessRecord::Read {
            msr,
            outcome: behavior.read,
        });
        raise(behavior.read)?;
        Ok(behavior.value)
    }

    fn write_msr(&mut self, msr: u32, value: u64) -> Result<(), AccessError> {
        let behavior = self.behavior(msr);
        if behavior.uncontained {
            return Err(self.escape(msr, Access::Write));
        }
        self.log.push(AccessRecord::Write {
            msr,
            value,
            outcome: behavior.write,
        });
        raise(behavior.write)?;
        if let Some(stored) = self.msrs.get_mut(&msr) {
            stored.value = value;
        }
        Ok(())
    }

    fn safe_write_value(&self, msr: u32) -> u64 {
        self.behavior(msr).value
    }
}

impl CpuidSource for SimulatedPlatform {
    fn cpuid(&self, query: CpuidQuery) -> CpuidResult {
        self.cpuid.get(&query).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{CpuidEntry, MsrEntry, PlatformProfile, SimulatedPlatform};
    use crate::cpuid::{CpuidQuery, CpuidRegister};
    use crate::{
        Access, AccessError, CpuidSource, MsrBus, Outcome, Precondition, Registry, RunConfig,
        TestCase, TrapKind, VersionTag,
    };

    #[test]
    fn unknown_msrs_fault_with_gp_both_ways() {
        let mut platform = SimulatedPlatform::new();
        assert_eq!(
            platform.read_msr(0x1234),
            Err(AccessError::Trapped(TrapKind::GeneralProtection))
        );
        assert_eq!(
            platform.write_msr(0x1234, 1),
            Err(AccessError::Trapped(TrapKind::GeneralProtection))
        );
        assert_eq!(platform.msr_value(0x1234), None);
    }

    #[test]
    fn successful_write_updates_stored_value() {
        let mut platform = SimulatedPlatform::new();
        platform.define_msr(0x3b, 5, Outcome::NoFault, Outcome::NoFault);
        platform.write_msr(0x3b, 9).expect("writable");
        assert_eq!(platform.read_msr(0x3b), Ok(9));
    }

    #[test]
    fn trapped_write_leaves_value_alone() {
        let mut platform = SimulatedPlatform::new();
        platform.define_msr(0x10, 5, Outcome::NoFault, Outcome::VirtualizationException);
        assert_eq!(
            platform.write_msr(0x10, 9),
            Err(AccessError::Trapped(TrapKind::VirtualizationException))
        );
        assert_eq!(platform.msr_value(0x10), Some(5));
    }

    #[test]
    fn set_cpuid_bit_accumulates() {
        let mut platform = SimulatedPlatform::new();
        let leaf7 = CpuidQuery::new(0x7, 0);
        platform.set_cpuid_bit(leaf7, CpuidRegister::Ecx, 5);
        platform.set_cpuid_bit(leaf7, CpuidRegister::Ecx, 13);
        platform.set_cpuid_bit(leaf7, CpuidRegister::Ecx, 40);
        assert_eq!(platform.cpuid(leaf7).ecx, (1 << 5) | (1 << 13));
        assert!(platform.cpuid(CpuidQuery::new(0x7, 1)).is_unimplemented());
    }

    #[test]
    fn profile_entries_build_the_platform() {
        let profile = PlatformProfile {
            cpuid: vec![CpuidEntry {
                leaf: 0x1,
                ecx: 1 << 24,
                ..CpuidEntry::default()
            }],
            msrs: vec![
                MsrEntry {
                    msr: 0x6e0,
                    value: 7,
                    ..MsrEntry::default()
                },
                MsrEntry {
                    msr: 0x48a,
                    read: Outcome::VirtualizationException,
                    write: Outcome::GeneralProtection,
                    ..MsrEntry::default()
                },
            ],
        };
        let mut platform = SimulatedPlatform::from_profile(&profile);
        assert_eq!(platform.cpuid(CpuidQuery::new(0x1, 0)).ecx, 1 << 24);
        assert_eq!(platform.read_msr(0x6e0), Ok(7));
        assert_eq!(
            platform.read_msr(0x48a),
            Err(AccessError::Trapped(TrapKind::VirtualizationException))
        );
    }

    #[test]
    fn conforming_platform_follows_resolved_expectations() {
        let registry = Registry::new(vec![
            TestCase::new(
                "IA32_PKRS_read",
                &VersionTag::ALL,
                0x6e1,
                Access::Read,
                Outcome::NoFault,
            )
            .with_precondition(Precondition::Pks),
            TestCase::new(
                "IA32_TSC_write",
                &VersionTag::ALL,
                0x10,
                Access::Write,
                Outcome::VirtualizationException,
            ),
        ])
        .expect("valid");
        let platform = SimulatedPlatform::conforming(&registry, &RunConfig::new(VersionTag::V2_0));

        let pkrs = platform.msr(0x6e1).expect("defined");
        assert_eq!(pkrs.read, Outcome::GeneralProtection);
        let tsc = platform.msr(0x10).expect("defined");
        assert_eq!(tsc.write, Outcome::VirtualizationException);
        assert_eq!(tsc.read, Outcome::GeneralProtection);
        assert!(platform.access_log().is_empty());
    }
}
