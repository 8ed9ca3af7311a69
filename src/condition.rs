//! Condition algebra: evaluable predicates over typed entity tuples.
//!
//! A [`ConditionClass`] is identified by a stable name rather than by
//! language-level type identity, so it can be declared once and reused
//! across many bound instances and many planning calls (see
//! [`ConditionClass::define`]). Binding a class to an ordered tuple of
//! entities produces a [`BoundCondition`], whose [`BoundCondition::evaluate`]
//! reads live entity attributes and whose [`BoundCondition::planning_tuple`]
//! produces the canonical ground-proposition key the planner searches over.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::entity::Entity;
use crate::error::{EvalResult, Impossible, PlanningError};

/// A named, fixed-arity predicate class over entity tuples.
///
/// Two `ConditionClass` values are the same class iff their names match;
/// registering two distinct predicates under one name within a single
/// planning universe is a caller error this type cannot detect on its own.
pub struct ConditionClass<E: Entity> {
    name: Arc<str>,
    arity: usize,
    evaluator: Arc<dyn Fn(&[E]) -> EvalResult + Send + Sync>,
}

impl<E: Entity> ConditionClass<E> {
    /// Declares a new condition class.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let is_alive = ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| {
    ///     Ok(objs[0].get("alive"))
    /// });
    /// assert_eq!(is_alive.arity(), 1);
    /// ```
    pub fn define(
        name: impl Into<String>,
        arity: usize,
        evaluator: impl Fn(&[E]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Self { name: Arc::from(name.into()), arity, evaluator: Arc::new(evaluator) }
    }

    /// The stable name this class is identified by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fixed number of entities this class binds to.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Binds this class to an ordered tuple of entities, producing an
    /// evaluable [`BoundCondition`]. Fails if the tuple length does not
    /// match [`ConditionClass::arity`].
    pub fn bind(&self, objects: impl Into<Vec<E>>) -> Result<BoundCondition<E>, PlanningError> {
        let objects = objects.into();
        if objects.len() != self.arity {
            return Err(PlanningError::InvalidArgument(format!(
                "condition {:#?} expects {} object(s), got {}",
                self.name,
                self.arity,
                objects.len()
            )));
        }
        Ok(BoundCondition { class: self.clone(), objects })
    }

    fn evaluate_raw(&self, objects: &[E]) -> EvalResult {
        (self.evaluator)(objects)
    }
}

impl<E: Entity + 'static> ConditionClass<E> {
    /// Built-in identity predicate: true iff both bound entities are the
    /// same object, structurally impossible otherwise.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let is_ = ConditionClass::<EntityHandle>::is();
    /// let a = EntityHandle::new(1, "a");
    /// assert_eq!(is_.bind(vec![a.clone(), a.clone()]).unwrap().evaluate(), Ok(true));
    /// ```
    pub fn is() -> Self {
        Self::define("is", 2, |objs: &[E]| {
            if objs[0] == objs[1] { Ok(true) } else { Err(Impossible) }
        })
    }

    /// Built-in distinctness predicate: true iff the two bound entities
    /// differ, structurally impossible otherwise.
    pub fn is_not() -> Self {
        Self::define("is_not", 2, |objs: &[E]| {
            if objs[0] != objs[1] { Ok(true) } else { Err(Impossible) }
        })
    }
}

impl<E: Entity> Clone for ConditionClass<E> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), arity: self.arity, evaluator: self.evaluator.clone() }
    }
}

impl<E: Entity> PartialEq for ConditionClass<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl<E: Entity> Eq for ConditionClass<E> {}

impl<E: Entity> PartialOrd for ConditionClass<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<E: Entity> Ord for ConditionClass<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl<E: Entity> Hash for ConditionClass<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<E: Entity> std::fmt::Debug for ConditionClass<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConditionClass({:#?}/{})", self.name, self.arity)
    }
}

/// A condition class bound to a concrete, ordered tuple of entities.
#[derive(Clone, Debug)]
pub struct BoundCondition<E: Entity> {
    class: ConditionClass<E>,
    objects: Vec<E>,
}

impl<E: Entity> BoundCondition<E> {
    /// Evaluates the predicate against the entities' current attribute
    /// state. `Ok(false)` is returned when the predicate does not hold;
    /// `Err(Impossible)` when it can never hold for this binding.
    pub fn evaluate(&self) -> EvalResult {
        self.class.evaluate_raw(&self.objects)
    }

    /// The canonical `(ConditionClass, entity-tuple)` key this instance
    /// represents, used by the planner as a ground-proposition map key.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let is_alive = ConditionClass::define("is_alive", 1, |objs: &[EntityHandle]| Ok(objs[0].get("alive")));
    /// let dragon = EntityHandle::new(1, "dragon");
    /// let bound = is_alive.bind(vec![dragon.clone()]).unwrap();
    /// let again = is_alive.bind(vec![dragon]).unwrap();
    /// assert_eq!(bound.planning_tuple(), again.planning_tuple());
    /// ```
    pub fn planning_tuple(&self) -> GroundProposition<E> {
        GroundProposition { class: self.class.clone(), objects: self.objects.clone() }
    }

    /// The class this instance was bound from.
    pub fn class(&self) -> &ConditionClass<E> {
        &self.class
    }

    /// The ordered tuple of entities this instance is bound to.
    pub fn objects(&self) -> &[E] {
        &self.objects
    }
}

/// A ground proposition: a condition class paired with a concrete entity
/// tuple, usable as a map key in the planner's internal state tracking.
///
/// Ordering is derived from the class name followed by the entity tuple, so
/// that planner-internal maps keyed by `GroundProposition` have a
/// deterministic iteration order regardless of hash randomization.
#[derive(Clone, Debug)]
pub struct GroundProposition<E: Entity> {
    class: ConditionClass<E>,
    objects: Vec<E>,
}

impl<E: Entity> GroundProposition<E> {
    /// Rebinds this ground proposition back into an evaluable condition.
    pub fn bound(&self) -> BoundCondition<E> {
        BoundCondition { class: self.class.clone(), objects: self.objects.clone() }
    }

    pub fn class(&self) -> &ConditionClass<E> {
        &self.class
    }

    pub fn objects(&self) -> &[E] {
        &self.objects
    }
}

impl<E: Entity> PartialEq for GroundProposition<E> {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.objects == other.objects
    }
}
impl<E: Entity> Eq for GroundProposition<E> {}

impl<E: Entity> PartialOrd for GroundProposition<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<E: Entity> Ord for GroundProposition<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class.cmp(&other.class).then_with(|| self.objects.cmp(&other.objects))
    }
}

impl<E: Entity> Hash for GroundProposition<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        self.objects.hash(state);
    }
}
