//! CPUID capability probe primitives.
//!
//! The probe itself is an external collaborator ([`CpuidSource`]); this module
//! only defines the query/result shapes and the bit predicates callers apply
//! to a result. Bits are numbered from 0, bit 31 is the most significant bit
//! of a 32-bit output word.

/// CPUID leaf 0x1: processor info and feature bits.
pub const CPUID_LEAF_FEATURES: u32 = 0x1;

/// CPUID leaf 0x7: structured extended feature flags (sub-leaf in ECX).
pub const CPUID_LEAF_STRUCTURED_EXT: u32 = 0x7;

/// CPUID leaf 0xA: architectural performance monitoring.
pub const CPUID_LEAF_PERFMON: u32 = 0xA;

/// CPUID leaf 0xD: processor extended state enumeration.
pub const CPUID_LEAF_XSAVE: u32 = 0xD;

/// One capability query: a `(leaf, sub_leaf)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuidQuery {
    /// Leaf selector (EAX input).
    pub leaf: u32,
    /// Sub-leaf selector (ECX input).
    pub sub_leaf: u32,
}

impl CpuidQuery {
    /// Creates a query for `leaf` and `sub_leaf`.
    #[must_use]
    pub const fn new(leaf: u32, sub_leaf: u32) -> Self {
        Self { leaf, sub_leaf }
    }
}

/// Output register selector for a CPUID result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[allow(missing_docs)]
pub enum CpuidRegister {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

/// The four 32-bit output words of one CPUID query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub struct CpuidResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidResult {
    /// Returns the word held in `register`.
    #[must_use]
    pub const fn register(&self, register: CpuidRegister) -> u32 {
        match register {
            CpuidRegister::Eax => self.eax,
            CpuidRegister::Ebx => self.ebx,
            CpuidRegister::Ecx => self.ecx,
            CpuidRegister::Edx => self.edx,
        }
    }

    /// Returns true when `bit` (0..=31) is set in `register`.
    ///
    /// Out-of-range bit indices read as clear.
    #[must_use]
    pub const fn bit(&self, register: CpuidRegister, bit: u8) -> bool {
        bit < 32 && (self.register(register) >> bit) & 1 == 1
    }

    /// Extracts the inclusive bit field `low..=high` of `register`.
    #[must_use]
    pub const fn field(&self, register: CpuidRegister, low: u8, high: u8) -> u32 {
        if low > high || high > 31 {
            return 0;
        }
        let width = high - low + 1;
        let value = self.register(register) >> low;
        if width == 32 {
            value
        } else {
            value & ((1u32 << width) - 1)
        }
    }

    /// All four words zero: the leaf is not implemented.
    #[must_use]
    pub const fn is_unimplemented(&self) -> bool {
        self.eax == 0 && self.ebx == 0 && self.ecx == 0 && self.edx == 0
    }
}

/// Feature-enumeration primitive supplied by the execution environment.
///
/// Implementations must be side-effect free: the same query against the same
/// CPU state returns the same result.
pub trait CpuidSource {
    /// Executes one CPUID query.
    fn cpuid(&self, query: CpuidQuery) -> CpuidResult;
}

/// Runs a capability query against `source`.
#[must_use]
pub fn probe<S: CpuidSource + ?Sized>(source: &S, leaf: u32, sub_leaf: u32) -> CpuidResult {
    let result = source.cpuid(CpuidQuery::new(leaf, sub_leaf));
    log::trace!(
        "cpuid({leaf:#x},{sub_leaf:#x}) = eax={:#010x} ebx={:#010x} ecx={:#010x} edx={:#010x}",
        result.eax,
        result.ebx,
        result.ecx,
        result.edx
    );
    result
}
