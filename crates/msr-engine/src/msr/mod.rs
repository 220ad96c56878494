//! MSR access contract and architectural MSR indices.

/// Architectural and TDX-relevant MSR indices.
pub mod index;

use thiserror::Error;

use crate::{CpuidSource, TrapKind};

/// Failure modes of a single privileged MSR access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum AccessError {
    /// The access raised an exception that the guest observed and survived.
    #[error("access raised {0}")]
    Trapped(TrapKind),
    /// The access escaped trap containment; the execution context is no
    /// longer trustworthy.
    #[error("access escaped trap containment: {0}")]
    Uncontained(String),
}

impl From<TrapKind> for AccessError {
    fn from(kind: TrapKind) -> Self {
        Self::Trapped(kind)
    }
}

/// Privileged single-register access primitives consumed by the engine.
///
/// Implementations classify every exception the access raises; anything they
/// cannot classify is reported as [`AccessError::Uncontained`].
pub trait MsrBus {
    /// Reads one 64-bit MSR.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Trapped`] when the read raised #GP or #VE, and
    /// [`AccessError::Uncontained`] when the access could not be classified.
    fn read_msr(&mut self, msr: u32) -> Result<u64, AccessError>;

    /// Writes one 64-bit MSR.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Trapped`] when the write raised #GP or #VE, and
    /// [`AccessError::Uncontained`] when the access could not be classified.
    fn write_msr(&mut self, msr: u32, value: u64) -> Result<(), AccessError>;

    /// Value a write case stores into `msr`.
    ///
    /// Must not access the register itself. The default writes zero.
    fn safe_write_value(&self, msr: u32) -> u64 {
        let _ = msr;
        0
    }
}

/// Everything the pipeline needs from the execution environment: MSR access
/// plus capability enumeration on the same logical CPU.
pub trait Platform: MsrBus + CpuidSource {}

impl<T: MsrBus + CpuidSource + ?Sized> Platform for T {}
