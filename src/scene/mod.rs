//! Scene side of the engine
//!
//! Scene nodes stored in hecs, the debug line buffer, the entity/body binder
//! and the scene manager tying them to physics.

mod binder;
mod components;
mod graphics;
mod manager;
mod manual_object;

pub use binder::Bindings;
pub use components::{Colour, Light, LightKind, Name, Renderable, SkyDome, Transform};
pub use graphics::{
    CUBE_MESH, CUBE_MESH_SIZE, GraphicsManager, ManualObjectHandle, Material, PlaneMesh,
    RenderEntity, TransformTarget,
};
pub use manager::SceneManager;
pub use manual_object::{Line, ManualObject, NotBuilding};
