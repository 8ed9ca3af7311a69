//! Entity contract: the only world-state interface the planner depends on.
//!
//! The planner never owns concrete game objects. It is generic over any type
//! implementing [`Entity`], so a host application can plug in its own agent,
//! item, or location representation without touching the search itself.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque object identity with mutable named boolean attributes.
///
/// Implementors decide how attributes are stored; the planner only ever
/// reads via [`Entity::get`] and writes via [`Entity::set`] inside a
/// user-supplied `apply` closure (see [`crate::action::ActionClass`]).
///
/// `Ord` is required so that the planner can keep its internal
/// ground-proposition maps in a canonical order — this is purely an
/// implementation detail of the search, not part of the predicate
/// semantics, which only ever compare entities by identity.
pub trait Entity: Clone + Eq + Ord + Hash + Debug {
    /// Reads a named boolean attribute. Implementations should treat an
    /// unset attribute as `false` rather than panicking, mirroring how the
    /// condition algebra treats missing state as "does not hold".
    fn get(&self, attribute: &str) -> bool;

    /// Writes a named boolean attribute. Called only from within an
    /// action's `apply` body, never by the planner itself.
    fn set(&self, attribute: &str, value: bool);
}

/// A ready-to-use [`Entity`] backed by shared, interior-mutable boolean
/// attributes, suitable for demos, tests, and small hosts that don't need a
/// richer object model.
pub mod handle {
    use super::Entity;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct Inner {
        id: u64,
        name: String,
        attributes: RefCell<BTreeMap<String, bool>>,
    }

    /// A named, reference-counted entity handle with boolean attributes.
    ///
    /// Two clones of the same `EntityHandle` refer to the same underlying
    /// object: mutating attributes through one clone is visible through all
    /// others, and they compare equal.
    ///
    /// # Example
    /// ```
    /// use regress_planner::prelude::*;
    ///
    /// let dragon = EntityHandle::new(1, "dragon").with_attr("alive", true);
    /// assert!(dragon.get("alive"));
    /// dragon.set("alive", false);
    /// assert!(!dragon.get("alive"));
    /// ```
    #[derive(Debug, Clone)]
    pub struct EntityHandle(Rc<Inner>);

    impl EntityHandle {
        /// Creates a new entity with the given stable id and display name.
        ///
        /// `id` is what identity comparisons and ordering are based on;
        /// callers are responsible for keeping ids unique within a planning
        /// universe.
        pub fn new(id: u64, name: impl Into<String>) -> Self {
            Self(Rc::new(Inner {
                id,
                name: name.into(),
                attributes: RefCell::new(BTreeMap::new()),
            }))
        }

        /// Builder-style initial attribute assignment.
        pub fn with_attr(self, attribute: impl Into<String>, value: bool) -> Self {
            self.0.attributes.borrow_mut().insert(attribute.into(), value);
            self
        }

        /// The display name given at construction.
        pub fn name(&self) -> &str {
            &self.0.name
        }

        /// The stable identity used for equality and ordering.
        pub fn id(&self) -> u64 {
            self.0.id
        }
    }

    impl Entity for EntityHandle {
        fn get(&self, attribute: &str) -> bool {
            self.0.attributes.borrow().get(attribute).copied().unwrap_or(false)
        }

        fn set(&self, attribute: &str, value: bool) {
            self.0.attributes.borrow_mut().insert(attribute.into(), value);
        }
    }

    impl PartialEq for EntityHandle {
        fn eq(&self, other: &Self) -> bool {
            self.0.id == other.0.id
        }
    }
    impl Eq for EntityHandle {}

    impl PartialOrd for EntityHandle {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for EntityHandle {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.id.cmp(&other.0.id)
        }
    }

    impl std::hash::Hash for EntityHandle {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.0.id.hash(state);
        }
    }

    impl std::fmt::Display for EntityHandle {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}#{}", self.0.name, self.0.id)
        }
    }
}
