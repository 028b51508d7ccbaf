//! Physics simulation module
//!
//! Built on top of rapier3d

mod collision;
mod debug;
mod manager;
mod query;
mod world;

pub use collision::{CollisionCallback, CollisionCallbacks};
pub use manager::PhysicsManager;
pub use query::PhysicsQuery;
pub use world::{PhysicsWorld, RigidBodyHandle};
