//! Simulated world built on rapier3d

use glam::{Quat, Vec3};
use rapier3d::na::{self, UnitQuaternion};
use rapier3d::pipeline::{DebugRenderBackend, DebugRenderPipeline};
use rapier3d::prelude::*;

use super::PhysicsQuery;

/// Handle to a rigid body in the physics world.
///
/// Wraps rapier's generational index, so a handle to a removed body is
/// detected instead of silently aliasing a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
fn rapier_to_quat(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        na::Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

/// The rapier sets and pipelines making up one simulation
pub struct PhysicsWorld {
    /// Gravity vector
    pub gravity: Vec3,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    integration_parameters: IntegrationParameters,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Advance the simulation by `dt`
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Insert a box-shaped body.
    ///
    /// A `mass` of `None` makes the body fixed, matching a zero-mass body in
    /// engines that encode "static" that way.
    pub fn add_box(
        &mut self,
        half_extent: Vec3,
        position: Vec3,
        rotation: Quat,
        mass: Option<f32>,
    ) -> RigidBodyHandle {
        let builder = match mass {
            Some(_) => RigidBodyBuilder::dynamic(),
            None => RigidBodyBuilder::fixed(),
        };
        let body = builder.position(isometry(position, rotation)).build();
        let handle = self.rigid_body_set.insert(body);

        let mut collider = ColliderBuilder::cuboid(half_extent.x, half_extent.y, half_extent.z)
            .friction(1.0);
        if let Some(mass) = mass {
            collider = collider.mass(mass);
        }
        self.collider_set
            .insert_with_parent(collider.build(), handle, &mut self.rigid_body_set);

        RigidBodyHandle(handle)
    }

    /// Check whether the body is still part of the simulation
    pub fn contains(&self, body: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(body.0)
    }

    /// Teleport a body, waking it up
    ///
    /// Returns false if the body no longer exists.
    pub fn set_body_transform(
        &mut self,
        body: RigidBodyHandle,
        position: Vec3,
        rotation: Quat,
    ) -> bool {
        match self.rigid_body_set.get_mut(body.0) {
            Some(rb) => {
                rb.set_position(isometry(position, rotation), true);
                true
            }
            None => false,
        }
    }

    /// Remove a rigid body and its colliders
    ///
    /// Returns false if the body had already been removed.
    pub fn remove_body(&mut self, body: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                body.0,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    /// Number of bodies in the simulation
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Feed collider wireframes of the current state into `backend`
    pub fn render_debug(
        &self,
        pipeline: &mut DebugRenderPipeline,
        backend: &mut impl DebugRenderBackend,
    ) {
        pipeline.render(
            backend,
            &self.rigid_body_set,
            &self.collider_set,
            &self.impulse_joint_set,
            &self.multibody_joint_set,
            &self.narrow_phase,
        );
    }
}

impl PhysicsQuery for PhysicsWorld {
    fn body_transform(&self, body: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            (Vec3::new(pos.x, pos.y, pos.z), rapier_to_quat(rb.rotation()))
        })
    }

    fn in_contact(&self, body: RigidBodyHandle) -> bool {
        let Some(rb) = self.rigid_body_set.get(body.0) else {
            return false;
        };

        rb.colliders().iter().any(|&collider| {
            self.narrow_phase
                .contact_pairs_with(collider)
                .any(|pair| pair.has_any_active_contact)
                || self
                    .narrow_phase
                    .intersection_pairs_with(collider)
                    .any(|(_, _, intersecting)| intersecting)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_and_box(box_height: f32) -> (PhysicsWorld, RigidBodyHandle, RigidBodyHandle) {
        let mut world = PhysicsWorld::with_gravity(Vec3::new(0.0, -10.0, 0.0));
        let ground = world.add_box(
            Vec3::new(50.0, 1.0, 50.0),
            Vec3::new(0.0, -1.0, 0.0),
            Quat::IDENTITY,
            None,
        );
        let cube = world.add_box(
            Vec3::splat(0.5),
            Vec3::new(0.0, box_height, 0.0),
            Quat::IDENTITY,
            Some(1.0),
        );
        (world, ground, cube)
    }

    #[test]
    fn test_quaternion_conversion_preserves_components() {
        let q = Quat::from_axis_angle(Vec3::Y, std::f32::consts::PI / 3.0);
        let back = rapier_to_quat(&quat_to_rapier(q));
        assert!((back.x - q.x).abs() < 1e-6);
        assert!((back.y - q.y).abs() < 1e-6);
        assert!((back.z - q.z).abs() < 1e-6);
        assert!((back.w - q.w).abs() < 1e-6);
    }

    #[test]
    fn test_static_body_does_not_fall() {
        let (mut world, ground, _) = ground_and_box(3.0);
        for _ in 0..10 {
            world.step(0.16);
        }
        let (position, _) = world.body_transform(ground).unwrap();
        assert_eq!(position, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_dynamic_body_falls() {
        let (mut world, _, cube) = ground_and_box(3.0);
        world.step(0.16);
        let (position, _) = world.body_transform(cube).unwrap();
        assert!(position.y < 3.0);
    }

    #[test]
    fn test_falling_box_reaches_ground_contact() {
        let (mut world, _, cube) = ground_and_box(3.0);
        assert!(!world.in_contact(cube));

        let touched = (0..40).any(|_| {
            world.step(0.16);
            world.in_contact(cube)
        });
        assert!(touched, "box never touched the ground");
    }

    #[test]
    fn test_removed_body_is_detected() {
        let (mut world, _, cube) = ground_and_box(3.0);
        assert!(world.remove_body(cube));
        assert!(!world.contains(cube));
        assert!(world.body_transform(cube).is_none());
        assert!(!world.in_contact(cube));
        assert!(!world.remove_body(cube));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_set_body_transform_teleports() {
        let (mut world, _, cube) = ground_and_box(3.0);
        let rotation = Quat::from_rotation_z(0.5);
        assert!(world.set_body_transform(cube, Vec3::new(4.0, 8.0, -2.0), rotation));

        let (position, orientation) = world.body_transform(cube).unwrap();
        assert_eq!(position, Vec3::new(4.0, 8.0, -2.0));
        assert!(orientation.abs_diff_eq(rotation, 1e-6));
    }
}
