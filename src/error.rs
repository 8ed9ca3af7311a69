//! Error surface shared by every layer of the planner.

use thiserror::Error;

/// Failure modes that can escape the public API.
///
/// `Impossible`, the condition layer's structural dead-end signal, is
/// deliberately absent from this enum: it is caught inside
/// [`crate::action::ActionClass::check_preconditions`] and
/// [`crate::plan::candidate::CandidatePlan::matches_initial_conditions`]
/// and never seen by a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// Caller-supplied bindings, arities, or registrations were malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `apply` was called on an action whose preconditions do not hold.
    #[error("preconditions not met for action {0:#?}")]
    PreconditionsNotMet(String),

    /// Backward search exhausted its depth budget without matching the goal.
    #[error("planning depth exceeded (max {0})")]
    PlanningDepthExceeded(usize),
}

/// Raised by a condition's `evaluate` when the bound tuple can never satisfy
/// the predicate under any reachable state (e.g. `Is(a, b)` with `a != b`).
///
/// This is not part of [`PlanningError`]: it is an internal signal consumed
/// by the condition and planning layers, never returned to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impossible;

impl std::fmt::Display for Impossible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "condition is structurally impossible for this binding")
    }
}

/// Result of evaluating a bound condition: satisfied, unsatisfied, or
/// structurally impossible.
pub type EvalResult = Result<bool, Impossible>;
