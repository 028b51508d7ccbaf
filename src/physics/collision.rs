//! One-shot collision callbacks
//!
//! A callback is attached to a single rigid body. After every physics step the
//! body is tested for contact against the rest of the world; on contact the
//! callback runs, and if it returns `true` it is consumed and never runs
//! again. Returning `false` keeps it armed for later contacts.
//!
//! Evaluation is two-phase: every armed body is tested and fired first, the
//! consumed entries are removed afterwards, so the map is never mutated while
//! it is being walked.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{PhysicsQuery, RigidBodyHandle};

/// Predicate run when its body touches something.
///
/// Return `true` to consume the callback, `false` to keep it registered.
pub type CollisionCallback = Box<dyn FnMut() -> bool>;

/// Registry of pending collision callbacks, at most one per body
#[derive(Default)]
pub struct CollisionCallbacks {
    callbacks: FxHashMap<RigidBodyHandle, CollisionCallback>,
}

impl CollisionCallbacks {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `body`.
    ///
    /// A body holds at most one callback: registering again replaces the
    /// earlier one. Returns `true` if a callback was replaced.
    pub fn register(
        &mut self,
        body: RigidBodyHandle,
        callback: impl FnMut() -> bool + 'static,
    ) -> bool {
        let replaced = self.callbacks.insert(body, Box::new(callback)).is_some();
        if replaced {
            log::debug!("Replaced pending collision callback for {body:?}");
        } else {
            log::debug!("Registered collision callback for {body:?}");
        }
        replaced
    }

    /// Drop the callback for `body`, if any
    pub fn deregister(&mut self, body: RigidBodyHandle) -> bool {
        self.callbacks.remove(&body).is_some()
    }

    /// Check whether `body` has a pending callback
    #[must_use]
    pub fn contains(&self, body: RigidBodyHandle) -> bool {
        self.callbacks.contains_key(&body)
    }

    /// Number of pending callbacks
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if no callbacks are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Test every registered body for contact and fire the callbacks of those
    /// touching something.
    ///
    /// Iteration order across bodies is unspecified. Each callback fires at
    /// most once per call. Returns the number of callbacks consumed.
    pub fn evaluate(&mut self, world: &impl PhysicsQuery) -> usize {
        let mut consumed: SmallVec<[RigidBodyHandle; 8]> = SmallVec::new();

        for (&body, callback) in &mut self.callbacks {
            if world.in_contact(body) && callback() {
                consumed.push(body);
            }
        }

        for body in &consumed {
            self.callbacks.remove(body);
            log::trace!("Collision callback for {body:?} consumed");
        }

        consumed.len()
    }
}

impl std::fmt::Debug for CollisionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionCallbacks")
            .field("pending", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::rc::Rc;

    use glam::{Quat, Vec3};

    /// Contacts are scripted by the test
    #[derive(Default)]
    struct ScriptedContacts {
        touching: HashSet<RigidBodyHandle>,
    }

    impl PhysicsQuery for ScriptedContacts {
        fn body_transform(&self, _body: RigidBodyHandle) -> Option<(Vec3, Quat)> {
            Some((Vec3::ZERO, Quat::IDENTITY))
        }

        fn in_contact(&self, body: RigidBodyHandle) -> bool {
            self.touching.contains(&body)
        }
    }

    fn body(index: u32) -> RigidBodyHandle {
        RigidBodyHandle(rapier3d::dynamics::RigidBodyHandle::from_raw_parts(index, 0))
    }

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        (Rc::clone(&count), count)
    }

    #[test]
    fn test_no_contact_does_not_fire() {
        let mut callbacks = CollisionCallbacks::new();
        let (fired, seen) = counter();
        callbacks.register(body(0), move || {
            fired.set(fired.get() + 1);
            true
        });

        let world = ScriptedContacts::default();
        assert_eq!(callbacks.evaluate(&world), 0);
        assert_eq!(seen.get(), 0);
        assert!(callbacks.contains(body(0)));
    }

    #[test]
    fn test_false_keeps_callback_armed() {
        let mut callbacks = CollisionCallbacks::new();
        let (fired, seen) = counter();
        callbacks.register(body(0), move || {
            fired.set(fired.get() + 1);
            false
        });

        let mut world = ScriptedContacts::default();
        world.touching.insert(body(0));

        for step in 1..=3 {
            assert_eq!(callbacks.evaluate(&world), 0);
            assert_eq!(seen.get(), step);
            assert!(callbacks.contains(body(0)));
        }
    }

    #[test]
    fn test_true_consumes_callback() {
        let mut callbacks = CollisionCallbacks::new();
        let (fired, seen) = counter();
        callbacks.register(body(0), move || {
            fired.set(fired.get() + 1);
            true
        });

        let mut world = ScriptedContacts::default();
        world.touching.insert(body(0));

        assert_eq!(callbacks.evaluate(&world), 1);
        assert!(!callbacks.contains(body(0)));
        assert!(callbacks.is_empty());

        // Still touching, but nothing left to fire
        assert_eq!(callbacks.evaluate(&world), 0);
        assert_eq!(callbacks.evaluate(&world), 0);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_callback_fires_on_later_contact() {
        let mut callbacks = CollisionCallbacks::new();
        let (fired, seen) = counter();
        callbacks.register(body(0), move || {
            fired.set(fired.get() + 1);
            fired.get() >= 2
        });

        let mut world = ScriptedContacts::default();
        world.touching.insert(body(0));
        assert_eq!(callbacks.evaluate(&world), 0);

        world.touching.clear();
        assert_eq!(callbacks.evaluate(&world), 0);
        assert_eq!(seen.get(), 1);

        world.touching.insert(body(0));
        assert_eq!(callbacks.evaluate(&world), 1);
        assert_eq!(seen.get(), 2);
        assert!(callbacks.is_empty());
    }

    #[test]
    fn test_reregister_replaces_callback() {
        let mut callbacks = CollisionCallbacks::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        assert!(!callbacks.register(body(0), move || {
            first.borrow_mut().push("A");
            true
        }));
        let second = Rc::clone(&log);
        assert!(callbacks.register(body(0), move || {
            second.borrow_mut().push("B");
            true
        }));
        assert_eq!(callbacks.len(), 1);

        let mut world = ScriptedContacts::default();
        world.touching.insert(body(0));
        callbacks.evaluate(&world);

        assert_eq!(*log.borrow(), vec!["B"]);
    }

    #[test]
    fn test_only_registered_body_fires() {
        let mut callbacks = CollisionCallbacks::new();
        let (fired, seen) = counter();
        callbacks.register(body(0), move || {
            fired.set(fired.get() + 1);
            true
        });

        // Both bodies touch each other, only body 0 has a callback
        let mut world = ScriptedContacts::default();
        world.touching.insert(body(0));
        world.touching.insert(body(1));

        assert_eq!(callbacks.evaluate(&world), 1);
        assert_eq!(seen.get(), 1);
        assert!(!callbacks.contains(body(1)));
    }

    #[test]
    fn test_many_bodies_consumed_in_one_pass() {
        let mut callbacks = CollisionCallbacks::new();
        let mut world = ScriptedContacts::default();
        for index in 0..20 {
            callbacks.register(body(index), move || index % 2 == 0);
            world.touching.insert(body(index));
        }

        assert_eq!(callbacks.evaluate(&world), 10);
        assert_eq!(callbacks.len(), 10);
        assert!((0..20)
            .filter(|index| index % 2 == 1)
            .all(|index| callbacks.contains(body(index))));
    }

    #[test]
    fn test_deregister() {
        let mut callbacks = CollisionCallbacks::new();
        callbacks.register(body(3), || true);
        assert!(callbacks.deregister(body(3)));
        assert!(!callbacks.deregister(body(3)));
        assert!(callbacks.is_empty());
    }
}
