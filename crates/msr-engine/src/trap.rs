use std::fmt;

use thiserror::Error;

/// Architectural exceptions an MSR access can raise inside a trust domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum TrapKind {
    /// General-protection fault raised by the module or the CPU.
    #[error("general-protection fault (#GP)")]
    GeneralProtection = 13,
    /// Virtualization exception delivered to the guest for emulation.
    #[error("virtualization exception (#VE)")]
    VirtualizationException = 20,
}

impl TrapKind {
    /// Returns the x86 exception vector number.
    #[must_use]
    pub const fn vector(self) -> u8 {
        self as u8
    }

    /// Maps an x86 exception vector back to a trap kind the engine tracks.
    #[must_use]
    pub const fn from_vector(vector: u8) -> Option<Self> {
        match vector {
            13 => Some(Self::GeneralProtection),
            20 => Some(Self::VirtualizationException),
            _ => None,
        }
    }

    /// Short mnemonic used in reports (`#GP`, `#VE`).
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::GeneralProtection => "#GP",
            Self::VirtualizationException => "#VE",
        }
    }
}

/// Outcome of a single MSR access, either expected or observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// The access completed without raising an exception.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    NoFault,
    /// The access raised #GP.
    #[cfg_attr(feature = "serde", serde(alias = "gp"))]
    GeneralProtection,
    /// The access raised #VE.
    #[cfg_attr(feature = "serde", serde(alias = "ve"))]
    VirtualizationException,
}

impl Outcome {
    /// Builds an outcome from an optional trap.
    #[must_use]
    pub const fn from_trap(trap: Option<TrapKind>) -> Self {
        match trap {
            None => Self::NoFault,
            Some(TrapKind::GeneralProtection) => Self::GeneralProtection,
            Some(TrapKind::VirtualizationException) => Self::VirtualizationException,
        }
    }

    /// Returns the trap carried by this outcome, if any.
    #[must_use]
    pub const fn trap(self) -> Option<TrapKind> {
        match self {
            Self::NoFault => None,
            Self::GeneralProtection => Some(TrapKind::GeneralProtection),
            Self::VirtualizationException => Some(TrapKind::VirtualizationException),
        }
    }

    /// Returns true when the outcome is a trap of any kind.
    #[must_use]
    pub const fn is_trap(self) -> bool {
        !matches!(self, Self::NoFault)
    }
}

impl From<TrapKind> for Outcome {
    fn from(kind: TrapKind) -> Self {
        Self::from_trap(Some(kind))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trap() {
            None => f.write_str("no fault"),
            Some(kind) => f.write_str(kind.mnemonic()),
        }
    }
}
