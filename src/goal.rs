use crate::condition::BoundCondition;
use crate::entity::Entity;

/// A single bound condition the planner is asked to satisfy, plus the
/// truth value it must hold and a display name for diagnostics.
#[derive(Clone, Debug)]
pub struct Goal<E: Entity> {
    name: String,
    condition: BoundCondition<E>,
    value: bool,
}

impl<E: Entity> Goal<E> {
    /// Creates a goal requiring `condition` to evaluate to `value`.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let is_alive = ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| Ok(objs[0].get("alive")));
    /// let dragon = EntityHandle::new(1, "dragon").with_attr("alive", true);
    /// let bound = is_alive.bind(vec![dragon]).unwrap();
    ///
    /// let goal = Goal::new("slay the dragon", bound, false);
    /// assert!(!goal.is_satisfied().unwrap());
    /// ```
    pub fn new(name: impl Into<String>, condition: BoundCondition<E>, value: bool) -> Self {
        Self { name: name.into(), condition, value }
    }

    /// The display name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The condition this goal is bound to.
    pub fn condition(&self) -> &BoundCondition<E> {
        &self.condition
    }

    /// The truth value the condition must hold for the goal to be met.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Evaluates the bound condition against the live world and compares it
    /// to the goal's target value. `Impossible` counts as unsatisfied.
    pub fn is_satisfied(&self) -> Result<bool, crate::error::Impossible> {
        Ok(matches!(self.condition.evaluate(), Ok(value) if value == self.value))
    }
}
