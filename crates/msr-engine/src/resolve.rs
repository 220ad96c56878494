use crate::{ContainmentFailure, Gate, Outcome, Platform, TestCase};

/// A case paired with the expectation that applies on the current platform.
///
/// Produced fresh on every run; the underlying [`TestCase`] is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCase<'a> {
    /// The case definition.
    pub case: &'a TestCase,
    /// Effective expected outcome after capability gating.
    pub expected: Outcome,
    /// How the precondition evaluated.
    pub gate: Gate,
}

/// Computes the effective expectation of `case` against live platform state.
///
/// An unsatisfied or unprobeable precondition forces #GP; otherwise the
/// baseline stands.
///
/// # Errors
///
/// Returns [`ContainmentFailure`] when a capability read escapes containment.
pub fn resolve<'a, P: Platform + ?Sized>(
    case: &'a TestCase,
    platform: &mut P,
) -> Result<ResolvedCase<'a>, ContainmentFailure> {
    let gate = match case.precondition {
        Some(precondition) => precondition.evaluate(platform)?,
        None => Gate::Ungated,
    };
    let expected = if gate.forces_gp() {
        Outcome::GeneralProtection
    } else {
        case.baseline
    };
    if expected != case.baseline {
        log::debug!(
            "{}: baseline {} overridden to {expected} ({gate:?})",
            case.name,
            case.baseline
        );
    }
    Ok(ResolvedCase {
        case,
        expected,
        gate,
    })
}
