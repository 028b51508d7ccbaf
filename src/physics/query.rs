//! Read-only view of the simulation used by the binder and the collision registry

use glam::{Quat, Vec3};

use super::RigidBodyHandle;

/// What the frame-level glue needs to know about simulated bodies.
///
/// Implemented by [`PhysicsWorld`](super::PhysicsWorld) and
/// [`PhysicsManager`](super::PhysicsManager). Tests implement it directly to
/// script body motion and contacts.
pub trait PhysicsQuery {
    /// Current world position and orientation of `body`, or `None` once the
    /// body has been removed from the simulation
    fn body_transform(&self, body: RigidBodyHandle) -> Option<(Vec3, Quat)>;

    /// Whether `body` is touching anything else in the world right now
    fn in_contact(&self, body: RigidBodyHandle) -> bool;
}

impl<T: PhysicsQuery + ?Sized> PhysicsQuery for &T {
    fn body_transform(&self, body: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        (**self).body_transform(body)
    }

    fn in_contact(&self, body: RigidBodyHandle) -> bool {
        (**self).in_contact(body)
    }
}
