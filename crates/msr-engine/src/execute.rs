use thiserror::Error;

use crate::{Access, AccessError, MsrBus, Outcome};

/// An access escaped trap containment.
///
/// Fatal to the run: after this the execution context can no longer be
/// trusted to classify further accesses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("MSR {msr:#x} {access}: {detail}")]
pub struct ContainmentFailure {
    /// MSR whose access escaped containment.
    pub msr: u32,
    /// Direction of the failing access.
    pub access: Access,
    /// Backend description of the failure.
    pub detail: String,
}

/// Performs one privileged access of `msr` and classifies what happened.
///
/// Exactly one privileged access is issued. Writes store the value the bus
/// picks through [`MsrBus::safe_write_value`].
///
/// # Errors
///
/// Returns [`ContainmentFailure`] when the bus reports an unclassifiable
/// failure.
pub fn execute<B: MsrBus + ?Sized>(
    bus: &mut B,
    msr: u32,
    access: Access,
) -> Result<Outcome, ContainmentFailure> {
    let contain = |error: AccessError| match error {
        AccessError::Trapped(kind) => Ok(Outcome::from(kind)),
        AccessError::Uncontained(detail) => Err(ContainmentFailure {
            msr,
            access,
            detail,
        }),
    };

    let result = match access {
        Access::Read => bus.read_msr(msr).map(|_| ()),
        Access::Write => {
            let value = bus.safe_write_value(msr);
            bus.write_msr(msr, value)
        }
    };
    result.map_or_else(contain, |()| Ok(Outcome::NoFault))
}
