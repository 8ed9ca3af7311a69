//! Backward breadth-first regression planner.
//!
//! Starting from a [`CandidatePlan`] seeded with the goal itself, the
//! search repeatedly prepends actions whose effects justify some of the
//! current candidate's required conditions, advancing one frontier of
//! candidates at a time until one of them matches the live world.

use itertools::Itertools;
use log::{debug, warn};

use crate::action::{ActionClass, Bindings};
use crate::condition::GroundProposition;
use crate::entity::Entity;
use crate::error::PlanningError;
use crate::goal::Goal;
use crate::plan::candidate::{CandidatePlan, PlanStep};
use std::collections::BTreeMap;

/// Tunable knobs for [`select_plan`].
#[derive(Clone, Copy, Debug)]
pub struct PlannerConfig {
    /// Hard cap on the number of actions a returned plan may contain, and
    /// on how many BFS levels the search will expand before giving up.
    pub max_search_depth: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_search_depth: 3 }
    }
}

/// `true` iff `effects` overlaps `conditions` on at least one key
/// (`some_effects_match`) and never disagrees with it on a shared key
/// (`all_effects_match`). Effect keys absent from `conditions` are ignored.
fn effects_match_candidate<E: Entity>(
    effects: &BTreeMap<GroundProposition<E>, bool>,
    conditions: &BTreeMap<GroundProposition<E>, bool>,
) -> bool {
    let mut overlaps = false;
    for (proposition, value) in effects {
        if let Some(required) = conditions.get(proposition) {
            overlaps = true;
            if value != required {
                return false;
            }
        }
    }
    overlaps
}

/// Enumerates every `(action, bindings)` pair that is a relevant
/// predecessor of `candidate`: ordered permutations without repetition of
/// `objects`, bound to the action's roles in declaration order, whose
/// effects match the candidate's required conditions.
fn successors<E: Entity>(
    candidate: &CandidatePlan<E>,
    actor: &E,
    available_actions: &[ActionClass<E>],
    objects: &[E],
) -> Vec<CandidatePlan<E>> {
    let mut expanded = Vec::new();
    for action in available_actions {
        let roles = action.object_keys();
        if roles.len() > objects.len() {
            continue;
        }

        for permutation in objects.iter().cloned().permutations(roles.len()) {
            let bindings: Bindings<E> = roles.iter().cloned().zip(permutation).collect();

            let effects = match action.calculate_effects(actor, &bindings) {
                Ok(effects) => effects,
                Err(_) => continue,
            };
            if !effects_match_candidate(&effects, candidate.conditions()) {
                continue;
            }

            let mut next = candidate.clone();
            if next.prepend_action(actor.clone(), action.clone(), bindings).is_ok() {
                expanded.push(next);
            }
        }
    }
    expanded
}

/// Finds an ordered action sequence that, applied from the current world
/// state, satisfies `goal`.
///
/// Drives the frontier loop by hand rather than delegating to a generic
/// search routine, so every level of the breadth-first backward regression
/// can be logged: entry into the search, the frontier size at each depth,
/// and (via [`ActionClass::check_preconditions`]) each precondition check
/// along the way.
///
/// Returns an empty plan if the goal already holds. Fails with
/// [`PlanningError::PlanningDepthExceeded`] if no matching candidate is
/// found within `config.max_search_depth` actions — this covers both a
/// frontier that empties out before the bound and one that is still
/// growing when the bound is reached, since both represent "no plan found
/// under the configured search budget".
pub fn select_plan<E: Entity>(
    actor: &E,
    goal: &Goal<E>,
    available_actions: &[ActionClass<E>],
    objects: &[E],
    config: &PlannerConfig,
) -> Result<Vec<PlanStep<E>>, PlanningError> {
    debug!("select_plan: goal {:#?} for actor {:?}", goal.name(), actor);

    let mut frontier = vec![CandidatePlan::seed(goal)];
    let mut depth = 0;

    loop {
        debug!("select_plan: depth {depth}, frontier size {}", frontier.len());

        for candidate in &frontier {
            if candidate.matches_initial_conditions() {
                debug!("select_plan: matched at depth {depth}");
                return Ok(candidate.clone().into_actions());
            }
        }

        if depth >= config.max_search_depth {
            break;
        }

        let mut next_frontier = Vec::new();
        for candidate in &frontier {
            next_frontier.extend(successors(candidate, actor, available_actions, objects));
        }
        frontier = next_frontier;
        depth += 1;
    }

    warn!(
        "select_plan: exhausted search within depth {} without matching goal {:#?}",
        config.max_search_depth,
        goal.name()
    );
    Err(PlanningError::PlanningDepthExceeded(config.max_search_depth))
}

/// Convenience wrapper over [`select_plan`] using [`PlannerConfig::default`].
pub fn select_plan_default<E: Entity>(
    actor: &E,
    goal: &Goal<E>,
    available_actions: &[ActionClass<E>],
    objects: &[E],
) -> Result<Vec<PlanStep<E>>, PlanningError> {
    select_plan(actor, goal, available_actions, objects, &PlannerConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ACTOR_ROLE;
    use crate::condition::ConditionClass;
    use crate::entity::handle::EntityHandle;

    fn is_alive() -> ConditionClass<EntityHandle> {
        ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| Ok(objs[0].get("alive")))
    }
    fn has_sword() -> ConditionClass<EntityHandle> {
        ConditionClass::define("has_sword", 1, |objs: &[EntityHandle]| {
            Ok(objs[0].get("has_sword"))
        })
    }

    fn kill_action() -> ActionClass<EntityHandle> {
        ActionClass::new("kill")
            .with_precondition(is_alive(), "victim", true)
            .with_precondition(has_sword(), ACTOR_ROLE, true)
            .with_effect(is_alive(), "victim", false)
            .with_apply(|_actor, bindings| {
                bindings["victim"].set("alive", false);
                Ok(())
            })
    }

    fn get_sword_action() -> ActionClass<EntityHandle> {
        ActionClass::new("get_sword")
            .with_precondition(has_sword(), ACTOR_ROLE, false)
            .with_effect(has_sword(), ACTOR_ROLE, true)
            .with_apply(|actor, _bindings| {
                actor.set("has_sword", true);
                Ok(())
            })
    }

    fn steal_sword_action() -> ActionClass<EntityHandle> {
        let is_not = ConditionClass::<EntityHandle>::is_not();
        ActionClass::new("steal_sword")
            .with_precondition(has_sword(), "victim", true)
            .with_precondition(is_not, vec!["victim", ACTOR_ROLE], true)
            .with_effect(has_sword(), ACTOR_ROLE, true)
            .with_effect(has_sword(), "victim", false)
            .with_apply(|actor, bindings| {
                bindings["victim"].set("has_sword", false);
                actor.set("has_sword", true);
                Ok(())
            })
    }

    /// A two-role, non-actor action: "recipient" is declared before "donor"
    /// even though they sort the other way alphabetically, exercising role
    /// binding beyond the single-role actions above.
    fn give_sword_action() -> ActionClass<EntityHandle> {
        ActionClass::new("give_sword")
            .with_precondition(has_sword(), "recipient", false)
            .with_precondition(has_sword(), "donor", true)
            .with_effect(has_sword(), "recipient", true)
            .with_effect(has_sword(), "donor", false)
            .with_apply(|_actor, bindings| {
                bindings["donor"].set("has_sword", false);
                bindings["recipient"].set("has_sword", true);
                Ok(())
            })
    }

    #[test]
    fn trivial_kill_plan() {
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", true);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);

        let bound = is_alive().bind(vec![dragon.clone()]).unwrap();
        let goal = Goal::new("kill dragon", bound, false);

        let plan = select_plan_default(
            &knight,
            &goal,
            &[kill_action()],
            &[knight.clone(), dragon.clone()],
        )
        .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1.name(), "kill");
        assert_eq!(plan[0].2.get("victim"), Some(&dragon));
    }

    #[test]
    fn two_step_plan_gets_sword_first() {
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", false);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);

        let bound = is_alive().bind(vec![dragon.clone()]).unwrap();
        let goal = Goal::new("kill dragon", bound, false);

        let plan = select_plan_default(
            &knight,
            &goal,
            &[kill_action(), get_sword_action()],
            &[knight.clone(), dragon.clone()],
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].1.name(), "get_sword");
        assert_eq!(plan[1].1.name(), "kill");
    }

    #[test]
    fn three_step_plan_respects_identity_constraint() {
        let arthur = EntityHandle::new(1, "arthur").with_attr("has_sword", false);
        let lancelot = EntityHandle::new(2, "lancelot").with_attr("has_sword", true);
        let guenivere = EntityHandle::new(3, "guenivere").with_attr("alive", true);

        let bound = is_alive().bind(vec![guenivere.clone()]).unwrap();
        let goal = Goal::new("kill guenivere", bound, false);

        let plan = select_plan_default(
            &arthur,
            &goal,
            &[kill_action(), steal_sword_action(), give_sword_action()],
            &[arthur.clone(), lancelot.clone(), guenivere.clone()],
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].1.name(), "steal_sword");
        assert_eq!(plan[0].2.get("victim"), Some(&lancelot));
        assert_eq!(plan[1].1.name(), "kill");
        assert_eq!(plan[1].2.get("victim"), Some(&guenivere));
    }

    #[test]
    fn two_role_action_binds_each_role_to_the_right_entity() {
        let alice = EntityHandle::new(1, "alice").with_attr("has_sword", true);
        let bob = EntityHandle::new(2, "bob").with_attr("has_sword", false);

        let bound = has_sword().bind(vec![bob.clone()]).unwrap();
        let goal = Goal::new("bob gets a sword", bound, true);

        let plan = select_plan_default(
            &alice,
            &goal,
            &[give_sword_action()],
            &[alice.clone(), bob.clone()],
        )
        .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1.name(), "give_sword");
        assert_eq!(plan[0].2.get("recipient"), Some(&bob));
        assert_eq!(plan[0].2.get("donor"), Some(&alice));
    }

    #[test]
    fn goal_already_met_yields_empty_plan() {
        let knight = EntityHandle::new(1, "knight");
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", false);

        let bound = is_alive().bind(vec![dragon.clone()]).unwrap();
        let goal = Goal::new("kill dragon", bound, false);

        let plan =
            select_plan_default(&knight, &goal, &[kill_action()], &[knight.clone(), dragon])
                .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn unreachable_goal_exceeds_depth() {
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", false);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);

        let bound = is_alive().bind(vec![dragon.clone()]).unwrap();
        let goal = Goal::new("kill dragon", bound, false);

        let err =
            select_plan_default(&knight, &goal, &[kill_action()], &[knight.clone(), dragon])
                .unwrap_err();
        assert_eq!(err, PlanningError::PlanningDepthExceeded(3));
    }

    #[test]
    fn determinism_given_identical_inputs() {
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", false);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);
        let actions = [kill_action(), get_sword_action()];
        let objects = [knight.clone(), dragon.clone()];

        let bound = is_alive().bind(vec![dragon.clone()]).unwrap();
        let goal = Goal::new("kill dragon", bound, false);

        let first = select_plan_default(&knight, &goal, &actions, &objects).unwrap();
        let second = select_plan_default(&knight, &goal, &actions, &objects).unwrap();

        let names = |plan: &[PlanStep<EntityHandle>]| {
            plan.iter().map(|(_, action, _)| action.name().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
    }
}
