//! Wires the scene and the simulation together through frame hooks

use glam::Vec3;

use super::graphics::{CUBE_MESH_SIZE, ManualObjectHandle, RenderEntity};
use crate::core::{Engine, EngineContext, EngineError};
use crate::physics::RigidBodyHandle;

/// Scene-level glue between the graphics and physics managers.
///
/// Attaching registers, in order:
///
/// - frame start: submit the physics debug lines drawn last frame
/// - frame start: copy every bound body's transform onto its scene node
/// - frame end: reopen the debug lines and redraw the colliders into them
///
/// Hooks added to the engine before attaching run before these; hooks that
/// read synced node transforms must be added after.
#[derive(Debug, Clone, Copy)]
pub struct SceneManager {
    debug_lines: ManualObjectHandle,
}

impl SceneManager {
    /// Create the debug line object and register the scene's frame hooks
    pub fn attach(engine: &mut Engine) -> Self {
        let debug_lines = engine.context_mut().graphics.add_manual_object();

        engine.on_frame_start(move |ctx| {
            let mut lines = ctx.graphics.manual_object_mut(debug_lines)?;
            // Still closed if the previous frame failed before its end hooks
            if lines.is_building() {
                lines
                    .end()
                    .map_err(|_| EngineError::NotBuilding(debug_lines.0))?;
            }
            Ok(())
        });

        engine.on_frame_start(|ctx| {
            let synced = ctx.bindings.sync(&ctx.physics, &mut ctx.graphics)?;
            log::trace!("Synced {synced} bound node(s)");
            Ok(())
        });

        engine.on_frame_end(move |ctx| {
            let mut lines = ctx.graphics.manual_object_mut(debug_lines)?;
            lines.begin();
            ctx.physics.draw_debug(&mut lines, debug_lines.0)?;
            Ok(())
        });

        log::debug!("Scene manager attached");
        Self { debug_lines }
    }

    /// The manual object holding physics debug lines
    #[must_use]
    pub const fn debug_lines(&self) -> ManualObjectHandle {
        self.debug_lines
    }

    /// Add a falling cube: a scene node and a dynamic body of matching size,
    /// bound together, with `on_collision` armed for the body.
    ///
    /// `scale` applies to the 100 unit cube mesh, so the body's half extent
    /// is `scale * 50`.
    ///
    /// # Errors
    ///
    /// Propagates collision registration failures
    pub fn add_cube(
        &self,
        ctx: &mut EngineContext,
        position: Vec3,
        scale: f32,
        material: &str,
        mass: f32,
        on_collision: impl FnMut() -> bool + 'static,
    ) -> Result<(RenderEntity, RigidBodyHandle), EngineError> {
        let entity = ctx.graphics.add_cube(position, scale, material);
        let half_extent = Vec3::splat(scale * CUBE_MESH_SIZE / 2.0);
        let body = ctx
            .physics
            .add_dynamic_rigid_body(half_extent, position, mass);

        ctx.bindings.bind(entity, body);
        ctx.physics.register_collision_callback(body, on_collision)?;

        log::debug!("Added cube {entity:?} bound to {body:?}");
        Ok((entity, body))
    }

    /// Remove a cube added with [`add_cube`](Self::add_cube), unbinding it
    /// before either side is destroyed
    ///
    /// # Errors
    ///
    /// Returns the stale handle if either side was already removed
    pub fn remove_cube(
        &self,
        ctx: &mut EngineContext,
        entity: RenderEntity,
        body: RigidBodyHandle,
    ) -> Result<(), EngineError> {
        ctx.bindings.unbind_entity(entity);
        ctx.bindings.unbind_body(body);
        ctx.physics.remove_body(body)?;
        ctx.graphics.remove_entity(entity)
    }
}
