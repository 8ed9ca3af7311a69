//! Actions: named, role-parameterised state transformers.
//!
//! An [`ActionClass`] declares its preconditions and effects in terms of
//! [`ConditionClass`]es bound to named roles (e.g. `victim`, `friend`)
//! rather than concrete entities. Binding happens per call, via a
//! `bindings` map plus a distinguished `actor`, which is never itself
//! counted as an object role.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use log::debug;

use crate::condition::{ConditionClass, GroundProposition};
use crate::entity::Entity;
use crate::error::PlanningError;

/// The distinguished role name that is always bound to the acting entity
/// and never appears in [`ActionClass::object_keys`].
pub const ACTOR_ROLE: &str = "actor";

/// The role names a precondition or effect is bound to: either a single
/// role (arity-1 condition) or an ordered tuple of roles (arity ≥ 2).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoleSpec {
    One(String),
    Many(Vec<String>),
}

impl RoleSpec {
    fn roles(&self) -> &[String] {
        match self {
            RoleSpec::One(role) => std::slice::from_ref(role),
            RoleSpec::Many(roles) => roles,
        }
    }
}

impl From<&str> for RoleSpec {
    fn from(role: &str) -> Self {
        RoleSpec::One(role.to_string())
    }
}

impl From<Vec<&str>> for RoleSpec {
    fn from(roles: Vec<&str>) -> Self {
        RoleSpec::Many(roles.into_iter().map(str::to_string).collect())
    }
}

#[derive(Clone)]
struct PreconditionSpec<E: Entity> {
    condition: ConditionClass<E>,
    roles: RoleSpec,
    expected: bool,
}

#[derive(Clone)]
struct EffectSpec<E: Entity> {
    condition: ConditionClass<E>,
    roles: RoleSpec,
    value: bool,
}

/// A binding map from role name to the entity filling that role, excluding
/// `actor` (which is supplied alongside the bindings, not inside them).
pub type Bindings<E> = BTreeMap<String, E>;

/// A named class of parameterised actions.
///
/// Built up with the `with_*` builder methods and then queried by the
/// planner (`calculate_effects`, `calculate_preconditions`) or by a driver
/// executing the plan (`apply`).
pub struct ActionClass<E: Entity> {
    name: Arc<str>,
    preconditions: Vec<PreconditionSpec<E>>,
    effects: Vec<EffectSpec<E>>,
    apply_fn: Option<Arc<dyn Fn(&E, &Bindings<E>) -> Result<(), PlanningError> + Send + Sync>>,
}

impl<E: Entity> ActionClass<E> {
    /// Creates a new, empty action with the given display name.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let kill = ActionClass::<EntityHandle>::new("kill");
    /// assert_eq!(kill.name(), "kill");
    /// assert!(kill.object_keys().is_empty());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Arc::from(name.into()), preconditions: vec![], effects: vec![], apply_fn: None }
    }

    /// The action's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a precondition: `condition(roles...)` must evaluate to
    /// `expected` for this action to be applicable.
    pub fn with_precondition(
        mut self,
        condition: ConditionClass<E>,
        roles: impl Into<RoleSpec>,
        expected: bool,
    ) -> Self {
        self.preconditions.push(PreconditionSpec { condition, roles: roles.into(), expected });
        self
    }

    /// Adds an effect: after this action runs, `condition(roles...)` holds
    /// the truth value `value`.
    pub fn with_effect(
        mut self,
        condition: ConditionClass<E>,
        roles: impl Into<RoleSpec>,
        value: bool,
    ) -> Self {
        self.effects.push(EffectSpec { condition, roles: roles.into(), value });
        self
    }

    /// Supplies the mutation this action performs on `apply`. Not consulted
    /// by the planner, which only ever reasons over `calculate_effects` and
    /// `calculate_preconditions`.
    pub fn with_apply(
        mut self,
        apply_fn: impl Fn(&E, &Bindings<E>) -> Result<(), PlanningError> + Send + Sync + 'static,
    ) -> Self {
        self.apply_fn = Some(Arc::new(apply_fn));
        self
    }

    /// The role names this action expects to be bound, in the order they
    /// were first declared across its preconditions and effects (role
    /// bindings are enumerated in this order during planning, so two
    /// actions with the same roles but different declaration order bind
    /// objects to them differently). `actor` is never included.
    pub fn object_keys(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut keys = Vec::new();
        for role in self
            .preconditions
            .iter()
            .flat_map(|p| p.roles.roles())
            .chain(self.effects.iter().flat_map(|e| e.roles.roles()))
        {
            if role.as_str() == ACTOR_ROLE {
                continue;
            }
            if seen.insert(role.clone()) {
                keys.push(role.clone());
            }
        }
        keys
    }

    fn bind_roles(
        &self,
        actor: &E,
        bindings: &Bindings<E>,
        roles: &RoleSpec,
    ) -> Result<Vec<E>, PlanningError> {
        roles
            .roles()
            .iter()
            .map(|role| {
                if role == ACTOR_ROLE {
                    Ok(actor.clone())
                } else {
                    bindings.get(role).cloned().ok_or_else(|| {
                        PlanningError::InvalidArgument(format!(
                            "action {:#?} missing binding for role {:#?}",
                            self.name, role
                        ))
                    })
                }
            })
            .collect()
    }

    fn check_bindings_key_set(&self, bindings: &Bindings<E>) -> Result<(), PlanningError> {
        let object_keys = self.object_keys();
        let expected: BTreeSet<&str> = object_keys.iter().map(String::as_str).collect();
        let actual: BTreeSet<&str> = bindings.keys().map(String::as_str).collect();
        if expected != actual {
            return Err(PlanningError::InvalidArgument(format!(
                "action {:#?} expects bindings for {:?}, got {:?}",
                self.name, expected, actual
            )));
        }
        Ok(())
    }

    /// Returns `true` iff `bindings` covers exactly [`ActionClass::object_keys`]
    /// and every precondition evaluates to its declared expectation.
    /// `Impossible` is treated as "does not hold".
    pub fn check_preconditions(
        &self,
        actor: &E,
        bindings: &Bindings<E>,
    ) -> Result<bool, PlanningError> {
        debug!("checking preconditions for action {:#?}, actor {actor:?}, bindings {bindings:?}", self.name);
        self.check_bindings_key_set(bindings)?;
        for precondition in &self.preconditions {
            let objects = self.bind_roles(actor, bindings, &precondition.roles)?;
            let bound = precondition.condition.bind(objects)?;
            match bound.evaluate() {
                Ok(value) if value == precondition.expected => continue,
                _ => {
                    debug!("preconditions not met for action {:#?}", self.name);
                    return Ok(false);
                },
            }
        }
        debug!("preconditions met for action {:#?}", self.name);
        Ok(true)
    }

    /// Runs the action's mutation, after checking its preconditions hold.
    pub fn apply(&self, actor: &E, bindings: &Bindings<E>) -> Result<(), PlanningError> {
        if !self.check_preconditions(actor, bindings)? {
            return Err(PlanningError::PreconditionsNotMet(self.name.to_string()));
        }
        match &self.apply_fn {
            Some(apply_fn) => apply_fn(actor, bindings),
            None => Ok(()),
        }
    }

    /// The ground propositions this action establishes, as a map from
    /// `(ConditionClass, tuple)` to the value the effect assigns. Pure: does
    /// not read entity attribute state.
    pub fn calculate_effects(
        &self,
        actor: &E,
        bindings: &Bindings<E>,
    ) -> Result<BTreeMap<GroundProposition<E>, bool>, PlanningError> {
        self.check_bindings_key_set(bindings)?;
        let mut effects = BTreeMap::new();
        for effect in &self.effects {
            let objects = self.bind_roles(actor, bindings, &effect.roles)?;
            let bound = effect.condition.bind(objects)?;
            effects.insert(bound.planning_tuple(), effect.value);
        }
        Ok(effects)
    }

    /// The ground propositions this action requires beforehand, as an
    /// ordered list of `((ConditionClass, tuple), expected_value)`. Pure:
    /// does not read entity attribute state.
    pub fn calculate_preconditions(
        &self,
        actor: &E,
        bindings: &Bindings<E>,
    ) -> Result<Vec<(GroundProposition<E>, bool)>, PlanningError> {
        self.check_bindings_key_set(bindings)?;
        let mut preconditions = Vec::with_capacity(self.preconditions.len());
        for precondition in &self.preconditions {
            let objects = self.bind_roles(actor, bindings, &precondition.roles)?;
            let bound = precondition.condition.bind(objects)?;
            preconditions.push((bound.planning_tuple(), precondition.expected));
        }
        Ok(preconditions)
    }
}

impl<E: Entity> Clone for ActionClass<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            preconditions: self.preconditions.clone(),
            effects: self.effects.clone(),
            apply_fn: self.apply_fn.clone(),
        }
    }
}

impl<E: Entity> PartialEq for ActionClass<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl<E: Entity> Eq for ActionClass<E> {}

impl<E: Entity> PartialOrd for ActionClass<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<E: Entity> Ord for ActionClass<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl<E: Entity> std::hash::Hash for ActionClass<E> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<E: Entity> std::fmt::Debug for ActionClass<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActionClass({:#?})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::handle::EntityHandle;

    fn is_alive() -> ConditionClass<EntityHandle> {
        ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| Ok(objs[0].get("alive")))
    }
    fn has_sword() -> ConditionClass<EntityHandle> {
        ConditionClass::define("has_sword", 1, |objs: &[EntityHandle]| Ok(objs[0].get("has_sword")))
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

    #[test]
    fn object_keys_excludes_actor() {
        let kill = kill_action();
        let keys: Vec<_> = kill.object_keys().into_iter().collect();
        assert_eq!(keys, vec!["victim".to_string()]);
    }

    #[test]
    fn object_keys_preserves_declaration_order() {
        // "recipient" is declared before "donor", even though "donor" sorts
        // first alphabetically; object_keys() must preserve declaration
        // order rather than falling back to a sorted set.
        let give_sword = ActionClass::new("give_sword")
            .with_precondition(has_sword(), "recipient", false)
            .with_precondition(has_sword(), "donor", true)
            .with_effect(has_sword(), "recipient", true)
            .with_effect(has_sword(), "donor", false);

        assert_eq!(
            give_sword.object_keys(),
            vec!["recipient".to_string(), "donor".to_string()]
        );
    }

    #[test]
    fn check_preconditions_respects_bindings() {
        let kill = kill_action();
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", true);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);
        let bindings = Bindings::from([("victim".to_string(), dragon.clone())]);

        assert_eq!(kill.check_preconditions(&knight, &bindings), Ok(true));

        let unarmed = EntityHandle::new(3, "unarmed");
        assert_eq!(kill.check_preconditions(&unarmed, &bindings), Ok(false));
    }

    #[test]
    fn apply_mutates_and_rejects_unmet_preconditions() {
        let kill = kill_action();
        let knight = EntityHandle::new(1, "knight").with_attr("has_sword", true);
        let dragon = EntityHandle::new(2, "dragon").with_attr("alive", true);
        let bindings = Bindings::from([("victim".to_string(), dragon.clone())]);

        kill.apply(&knight, &bindings).unwrap();
        assert!(!dragon.get("alive"));

        let err = kill.apply(&knight, &bindings).unwrap_err();
        assert!(matches!(err, PlanningError::PreconditionsNotMet(_)));
    }

    #[test]
    fn calculate_effects_is_pure() {
        let kill = kill_action();
        let knight = EntityHandle::new(1, "knight");
        let dragon = EntityHandle::new(2, "dragon"); // alive attribute unset
        let bindings = Bindings::from([("victim".to_string(), dragon.clone())]);

        let effects = kill.calculate_effects(&knight, &bindings).unwrap();
        assert_eq!(effects.len(), 1);
        let (prop, value) = effects.iter().next().unwrap();
        assert_eq!(prop.objects(), &[dragon]);
        assert_eq!(*value, false);
    }

    #[test]
    fn mismatched_bindings_are_invalid_argument() {
        let kill = kill_action();
        let knight = EntityHandle::new(1, "knight");
        let bindings: Bindings<EntityHandle> = Bindings::new();
        assert!(matches!(
            kill.check_preconditions(&knight, &bindings),
            Err(PlanningError::InvalidArgument(_))
        ));
    }
}
