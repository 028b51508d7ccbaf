//! Thin scene/physics/audio layer for small 3D samples
//!
//! This crate provides:
//! - A scene graph of meshes, planes and lights stored in hecs
//! - Physics simulation with rapier3d and one-shot collision callbacks
//! - Scene nodes that follow rigid bodies every frame
//! - Sound clip playback with rodio
//! - A headless fixed-rate frame loop with start/end hooks

pub mod audio;
pub mod core;
pub mod physics;
pub mod scene;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::audio::{AudioClip, AudioError, AudioManager};
    pub use crate::core::{Engine, EngineConfig, EngineContext, EngineError, FrameStats};
    pub use crate::physics::{PhysicsManager, PhysicsQuery, RigidBodyHandle};
    pub use crate::scene::{
        Colour, GraphicsManager, ManualObject, ManualObjectHandle, RenderEntity, SceneManager,
        Transform,
    };
    pub use glam::{Quat, Vec3};
}
