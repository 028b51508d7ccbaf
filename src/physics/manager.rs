//! Physics facade used by the engine loop

use glam::{Quat, Vec3};
use rapier3d::pipeline::{DebugRenderMode, DebugRenderPipeline, DebugRenderStyle};

use super::collision::CollisionCallbacks;
use super::debug::DebugLineWriter;
use super::{PhysicsQuery, PhysicsWorld, RigidBodyHandle};
use crate::core::{EngineError, PhysicsConfig};
use crate::scene::{ManualObject, RenderEntity};

/// Owns the simulation, its collision callbacks and the optional debug
/// renderer
pub struct PhysicsManager {
    world: PhysicsWorld,
    collision_callbacks: CollisionCallbacks,
    /// Present while debug drawing is enabled
    debug_render: Option<DebugRenderPipeline>,
    timestep: f32,
    steps: u64,
}

impl PhysicsManager {
    /// Create an empty simulation
    pub fn new(config: &PhysicsConfig) -> Self {
        log::info!(
            "Physics: gravity {:?}, fixed step {}",
            config.gravity,
            config.timestep
        );
        Self {
            world: PhysicsWorld::with_gravity(config.gravity),
            collision_callbacks: CollisionCallbacks::new(),
            debug_render: config.debug_draw.then(Self::debug_pipeline),
            timestep: config.timestep,
            steps: 0,
        }
    }

    fn debug_pipeline() -> DebugRenderPipeline {
        DebugRenderPipeline::new(DebugRenderStyle::default(), DebugRenderMode::COLLIDER_SHAPES)
    }

    /// Add a fixed box that never moves
    pub fn add_static_rigid_body(&mut self, half_extent: Vec3, position: Vec3) -> RigidBodyHandle {
        self.world
            .add_box(half_extent, position, Quat::IDENTITY, None)
    }

    /// Add a box affected by gravity and collisions
    pub fn add_dynamic_rigid_body(
        &mut self,
        half_extent: Vec3,
        position: Vec3,
        mass: f32,
    ) -> RigidBodyHandle {
        self.world
            .add_box(half_extent, position, Quat::IDENTITY, Some(mass))
    }

    /// Run `callback` whenever `body` touches something after a step.
    ///
    /// The callback returns `true` to be consumed, `false` to fire again on
    /// later contacts. Registering again for the same body replaces the
    /// pending callback.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleBody`] if the body was removed
    pub fn register_collision_callback(
        &mut self,
        body: RigidBodyHandle,
        callback: impl FnMut() -> bool + 'static,
    ) -> Result<(), EngineError> {
        if !self.world.contains(body) {
            return Err(EngineError::StaleBody(body));
        }
        self.collision_callbacks.register(body, callback);
        Ok(())
    }

    /// Pending collision callbacks
    #[must_use]
    pub fn collision_callbacks(&self) -> &CollisionCallbacks {
        &self.collision_callbacks
    }

    /// Advance one fixed step, then fire collision callbacks for bodies in
    /// contact. Returns the number of callbacks consumed.
    pub fn update(&mut self) -> usize {
        self.world.step(self.timestep);
        self.steps += 1;

        let consumed = self.collision_callbacks.evaluate(&self.world);
        log::trace!(
            "Physics step {}: {} callback(s) consumed, {} pending",
            self.steps,
            consumed,
            self.collision_callbacks.len()
        );
        consumed
    }

    /// Turn collider wireframe drawing on or off
    pub fn set_debug_drawing(&mut self, enabled: bool) {
        match (enabled, self.debug_render.is_some()) {
            (true, false) => self.debug_render = Some(Self::debug_pipeline()),
            (false, true) => self.debug_render = None,
            _ => {}
        }
    }

    #[must_use]
    pub fn debug_drawing(&self) -> bool {
        self.debug_render.is_some()
    }

    /// Draw collider wireframes into `lines`. Does nothing while debug
    /// drawing is off. Returns the number of lines drawn.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotBuilding`] if `lines` is not between
    /// `begin()` and `end()`
    pub fn draw_debug(
        &mut self,
        lines: &mut ManualObject,
        owner: RenderEntity,
    ) -> Result<usize, EngineError> {
        let Some(pipeline) = self.debug_render.as_mut() else {
            return Ok(0);
        };
        let mut writer = DebugLineWriter::new(lines);
        self.world.render_debug(pipeline, &mut writer);
        writer.finish().map_err(|_| EngineError::NotBuilding(owner))
    }

    /// World position of a body
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleBody`] if the body was removed
    pub fn position(&self, body: RigidBodyHandle) -> Result<Vec3, EngineError> {
        self.world
            .body_transform(body)
            .map(|(position, _)| position)
            .ok_or(EngineError::StaleBody(body))
    }

    /// World orientation of a body
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleBody`] if the body was removed
    pub fn orientation(&self, body: RigidBodyHandle) -> Result<Quat, EngineError> {
        self.world
            .body_transform(body)
            .map(|(_, orientation)| orientation)
            .ok_or(EngineError::StaleBody(body))
    }

    /// Teleport a body
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleBody`] if the body was removed
    pub fn set_body_transform(
        &mut self,
        body: RigidBodyHandle,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), EngineError> {
        if self.world.set_body_transform(body, position, orientation) {
            Ok(())
        } else {
            Err(EngineError::StaleBody(body))
        }
    }

    /// Remove a body together with its pending collision callback
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleBody`] if the body was already removed
    pub fn remove_body(&mut self, body: RigidBodyHandle) -> Result<(), EngineError> {
        self.collision_callbacks.deregister(body);
        if self.world.remove_body(body) {
            Ok(())
        } else {
            Err(EngineError::StaleBody(body))
        }
    }

    /// Number of bodies in the simulation
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    /// Number of completed steps
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Fixed step length
    #[must_use]
    pub const fn timestep(&self) -> f32 {
        self.timestep
    }

    /// The underlying simulation
    #[must_use]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

impl PhysicsQuery for PhysicsManager {
    fn body_transform(&self, body: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.world.body_transform(body)
    }

    fn in_contact(&self, body: RigidBodyHandle) -> bool {
        self.world.in_contact(body)
    }
}

impl Default for PhysicsManager {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl std::fmt::Debug for PhysicsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsManager")
            .field("gravity", &self.world.gravity)
            .field("timestep", &self.timestep)
            .field("bodies", &self.world.body_count())
            .field("collision_callbacks", &self.collision_callbacks)
            .field("debug_drawing", &self.debug_render.is_some())
            .field("steps", &self.steps)
            .finish()
    }
}
