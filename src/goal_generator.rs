//! Random goal generation: picks a condition class and an object binding
//! whose current, negated evaluation becomes the new goal target.
//!
//! Deliberately does not introspect an entity's full attribute set to pick
//! a goal (a variant of the predecessor this is grounded in) — the caller
//! supplies the candidate condition classes explicitly instead.

use log::debug;
use rand::seq::{IteratorRandom, SliceRandom};

use crate::condition::ConditionClass;
use crate::entity::Entity;
use crate::error::PlanningError;
use crate::goal::Goal;

/// Safety bound on Impossible-retries, in case every sampled binding of a
/// given arity happens to be structurally impossible. Not part of the
/// reference algorithm, which retries unconditionally; added so a
/// pathological input (e.g. `Is`/`IsNot` with too few distinct objects)
/// fails loudly instead of looping forever.
const MAX_ATTEMPTS: usize = 1000;

/// Picks a random condition class from `conditions`, binds it to a random
/// permutation of `objects` of the matching arity, and returns a [`Goal`]
/// whose target value is the negation of the binding's current evaluation.
/// Bindings that evaluate to `Impossible` are retried with a fresh
/// condition/object draw.
///
/// # Example
/// ```
/// use regress_planner::prelude::*;
///
/// let is_alive = ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| Ok(objs[0].get("alive")));
/// let dragon = EntityHandle::new(1, "dragon").with_attr("alive", true);
///
/// let goal = generate_goal(&[is_alive], &[dragon]).unwrap();
/// assert_eq!(goal.value(), false);
/// ```
pub fn generate_goal<E: Entity>(
    conditions: &[ConditionClass<E>],
    objects: &[E],
) -> Result<Goal<E>, PlanningError> {
    if conditions.is_empty() {
        return Err(PlanningError::InvalidArgument("no condition classes supplied".to_string()));
    }
    if objects.is_empty() {
        return Err(PlanningError::InvalidArgument("no objects supplied".to_string()));
    }

    let mut rng = rand::thread_rng();

    for attempt in 0..MAX_ATTEMPTS {
        let class = conditions.choose(&mut rng).expect("conditions is non-empty").clone();
        if class.arity() > objects.len() {
            continue;
        }
        let mut tuple: Vec<E> = objects.iter().cloned().choose_multiple(&mut rng, class.arity());
        tuple.shuffle(&mut rng);

        let bound = class.bind(tuple)?;
        match bound.evaluate() {
            Ok(current) => {
                let target = !current;
                debug!(
                    "generated goal: {} on {:?} -> {}",
                    class.name(),
                    bound.objects(),
                    target
                );
                return Ok(Goal::new(class.name().to_string(), bound, target));
            },
            Err(_impossible) => {
                debug!("attempt {attempt}: impossible binding for {}, retrying", class.name());
                continue;
            },
        }
    }

    Err(PlanningError::InvalidArgument(
        "could not find a possible condition binding after repeated attempts".to_string(),
    ))
}
