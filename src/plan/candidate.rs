//! Candidate plans: the backward planner's search-state representation.
//!
//! A `CandidatePlan` pairs a set of ground propositions the plan still
//! requires to hold in the *initial* state with the ordered suffix of
//! actions that, starting from a state satisfying those propositions,
//! achieves the original goal.

use std::collections::BTreeMap;

use crate::action::{ActionClass, Bindings};
use crate::condition::GroundProposition;
use crate::entity::Entity;
use crate::error::PlanningError;
use crate::goal::Goal;

/// One ground action bound into a candidate plan's suffix: the entity
/// acting, the action class, and its role bindings.
pub type PlanStep<E> = (E, ActionClass<E>, Bindings<E>);

/// A partial solution in the backward regression search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CandidatePlan<E: Entity> {
    conditions: BTreeMap<GroundProposition<E>, bool>,
    actions: Vec<PlanStep<E>>,
}

impl<E: Entity> CandidatePlan<E> {
    /// The initial candidate for a search: no actions yet, and the sole
    /// required condition is the goal itself.
    pub fn seed(goal: &Goal<E>) -> Self {
        let mut conditions = BTreeMap::new();
        conditions.insert(goal.condition().planning_tuple(), goal.value());
        Self { conditions, actions: Vec::new() }
    }

    /// The ground propositions this candidate still requires of the
    /// initial world state.
    pub fn conditions(&self) -> &BTreeMap<GroundProposition<E>, bool> {
        &self.conditions
    }

    /// The ordered action suffix accumulated so far (nearest-to-goal last).
    pub fn actions(&self) -> &[PlanStep<E>] {
        &self.actions
    }

    /// Consumes the candidate, returning its action suffix. Used once a
    /// candidate has been confirmed to match the initial state.
    pub fn into_actions(self) -> Vec<PlanStep<E>> {
        self.actions
    }

    /// `true` iff every required condition holds in the live world right
    /// now. A condition that raises `Impossible` counts as unsatisfied.
    pub fn matches_initial_conditions(&self) -> bool {
        self.conditions.iter().all(|(proposition, required)| {
            matches!(proposition.bound().evaluate(), Ok(value) if value == *required)
        })
    }

    /// Prepends `(actor, action, bindings)` to the action suffix and
    /// regresses the required conditions through it: conditions the action
    /// establishes are dropped, and the action's own preconditions are
    /// folded in.
    pub fn prepend_action(
        &mut self,
        actor: E,
        action: ActionClass<E>,
        bindings: Bindings<E>,
    ) -> Result<(), PlanningError> {
        let effects = action.calculate_effects(&actor, &bindings)?;
        self.conditions.retain(|proposition, required| {
            effects.get(proposition).map(|established| established != required).unwrap_or(true)
        });

        for (proposition, required) in action.calculate_preconditions(&actor, &bindings)? {
            self.conditions.insert(proposition, required);
        }

        self.actions.insert(0, (actor, action, bindings));
        Ok(())
    }
}
