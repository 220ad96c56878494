//! Expectation-resolution and verification engine for TDX guest MSR
//! conformance.
//!
//! A [`TestCase`] names an MSR span, an access direction and the outcome a
//! trust-domain guest should observe. [`run`] selects the cases of one module
//! revision from a validated [`Registry`], resolves each expectation against
//! live capability state, executes the accesses through a [`Platform`] and
//! folds the observed outcomes into a [`Report`].

/// Trap taxonomy and access outcomes.
pub mod trap;
pub use trap::{Outcome, TrapKind};

/// CPUID capability probe primitives.
pub mod cpuid;
pub use cpuid::{probe, CpuidQuery, CpuidRegister, CpuidResult, CpuidSource};

/// MSR access contract and architectural MSR indices.
pub mod msr;
pub use msr::{AccessError, MsrBus, Platform};

/// TDX module revisions and revision sets.
pub mod version;
pub use version::{UnknownVersion, VersionSet, VersionTag};

/// Capability predicates gating expectations.
pub mod precondition;
pub use precondition::{CapabilityCheck, CpuidTest, Gate, Precondition};

/// Test case definitions.
pub mod case;
pub use case::{Access, TestCase, UnknownAccess};

/// Expectation resolution.
pub mod resolve;
pub use resolve::{resolve, ResolvedCase};

/// Single-access execution and outcome classification.
pub mod execute;
pub use execute::{execute, ContainmentFailure};

/// Range verification and verdicts.
pub mod verify;
pub use verify::{verify, CaseResult, CaseVerdict, Mismatch, OffsetVerdict, VerifyError};

/// Suite runner and reports.
pub mod runner;
pub use runner::{run, Report, RunConfig, RunError, RunSummary};

/// Case registry and load-time validation.
pub mod registry;
pub use registry::{Registry, RegistryError};

/// Built-in TDX MSR table.
pub mod builtin;
pub use builtin::builtin_cases;

/// Deterministic simulated platform.
pub mod sim;
pub use sim::{AccessRecord, CpuidEntry, MsrBehavior, MsrEntry, PlatformProfile, SimulatedPlatform};

#[cfg(test)]
use proptest as _;
