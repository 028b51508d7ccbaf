//! Scene graph consumed by the renderer
//!
//! Nodes live in a `hecs` world. Every node has a [`Name`] and a
//! [`Transform`]; drawables add a [`Renderable`], lights a [`Light`], debug
//! geometry a [`ManualObject`].

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use super::components::{Colour, Light, LightKind, Name, Renderable, SkyDome, Transform};
use super::manual_object::ManualObject;
use crate::core::{EngineError, GraphicsConfig};

/// Mesh every cube is instanced from; 100 units along each axis
pub const CUBE_MESH: &str = "cube.mesh";

/// Edge length of [`CUBE_MESH`] at scale 1
pub const CUBE_MESH_SIZE: f32 = 100.0;

/// Handle to a node in the scene.
///
/// Generational, so a handle to a despawned node is reported as
/// [`EngineError::StaleEntity`] rather than reaching a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderEntity(pub hecs::Entity);

/// Handle to a node carrying a [`ManualObject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManualObjectHandle(pub RenderEntity);

/// Anything whose nodes can be moved to a world transform
pub trait TransformTarget {
    /// Place `entity` at `position` with `orientation`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if the node no longer exists
    fn set_transform(
        &mut self,
        entity: RenderEntity,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), EngineError>;
}

/// Generated plane geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMesh {
    pub width: f32,
    pub height: f32,
    pub x_segments: u32,
    pub z_segments: u32,
}

/// Material made from a single texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub texture: String,
}

/// Owns the scene: nodes, materials and global scene settings
pub struct GraphicsManager {
    world: hecs::World,
    materials: FxHashMap<String, Material>,
    ambient_light: Colour,
    sky_dome: Option<SkyDome>,
    shadows: bool,
    /// Source of generated plane mesh names
    plane_counter: u32,
    /// Source of generated light names
    light_counter: u32,
}

impl GraphicsManager {
    /// Create an empty scene
    pub fn new(config: &GraphicsConfig) -> Self {
        Self {
            world: hecs::World::new(),
            materials: FxHashMap::default(),
            ambient_light: config.ambient_light,
            sky_dome: config.sky_dome.clone(),
            shadows: config.shadows,
            plane_counter: 0,
            light_counter: 0,
        }
    }

    /// Set the sky dome material and shape
    pub fn set_sky_dome(&mut self, material: impl Into<String>, curvature: f32, tiling: f32) {
        self.sky_dome = Some(SkyDome {
            material: material.into(),
            curvature,
            tiling,
        });
    }

    /// Current sky dome, if any
    #[must_use]
    pub fn sky_dome(&self) -> Option<&SkyDome> {
        self.sky_dome.as_ref()
    }

    /// Set the ambient light colour
    pub fn set_ambient_light(&mut self, colour: Colour) {
        self.ambient_light = colour;
    }

    #[must_use]
    pub const fn ambient_light(&self) -> Colour {
        self.ambient_light
    }

    #[must_use]
    pub const fn shadows_enabled(&self) -> bool {
        self.shadows
    }

    /// Add a named mesh to the scene
    pub fn add_mesh(
        &mut self,
        mesh: impl Into<String>,
        position: Vec3,
        orientation: Quat,
        casts_shadows: bool,
    ) -> RenderEntity {
        let mesh = mesh.into();
        let entity = self.world.spawn((
            Name::new(mesh.clone()),
            Transform::from_position_rotation(position, orientation),
            Renderable {
                mesh,
                material: None,
                casts_shadows,
            },
        ));
        RenderEntity(entity)
    }

    /// Add a horizontal plane through the origin with the given material
    pub fn add_plane(
        &mut self,
        width: f32,
        height: f32,
        x_segments: u32,
        z_segments: u32,
        casts_shadows: bool,
        material: impl Into<String>,
    ) -> RenderEntity {
        let name = format!("plane{}", self.plane_counter);
        self.plane_counter += 1;

        let entity = self.world.spawn((
            Name::new(name.clone()),
            Transform::default(),
            PlaneMesh {
                width,
                height,
                x_segments,
                z_segments,
            },
            Renderable {
                mesh: name,
                material: Some(material.into()),
                casts_shadows,
            },
        ));
        RenderEntity(entity)
    }

    /// Register a material wrapping a texture
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateMaterial`] if the name is taken
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        texture: impl Into<String>,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if self.materials.contains_key(&name) {
            return Err(EngineError::DuplicateMaterial(name));
        }
        log::debug!("Added material '{name}'");
        self.materials.insert(
            name,
            Material {
                texture: texture.into(),
            },
        );
        Ok(())
    }

    /// Look up a registered material
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Add a uniformly scaled cube
    pub fn add_cube(
        &mut self,
        position: Vec3,
        scale: f32,
        material: impl Into<String>,
    ) -> RenderEntity {
        let material = material.into();
        if !self.materials.contains_key(&material) {
            log::warn!("Cube uses unregistered material '{material}'");
        }

        let entity = self.world.spawn((
            Name::new(CUBE_MESH),
            Transform {
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::splat(scale),
            },
            Renderable {
                mesh: String::from(CUBE_MESH),
                material: Some(material),
                casts_shadows: true,
            },
        ));
        RenderEntity(entity)
    }

    /// Add a spot light; cone angles are in degrees
    pub fn add_spot_light(
        &mut self,
        position: Vec3,
        direction: Vec3,
        colour: Colour,
        inner_degrees: f32,
        outer_degrees: f32,
    ) -> RenderEntity {
        let kind = LightKind::Spot {
            inner: inner_degrees.to_radians(),
            outer: outer_degrees.to_radians(),
        };
        self.spawn_light(kind, position, direction, colour)
    }

    /// Add a directional light
    pub fn add_directional_light(&mut self, direction: Vec3, colour: Colour) -> RenderEntity {
        self.spawn_light(LightKind::Directional, Vec3::ZERO, direction, colour)
    }

    /// Add a point light
    pub fn add_point_light(&mut self, position: Vec3, colour: Colour) -> RenderEntity {
        self.spawn_light(LightKind::Point, position, Vec3::NEG_Z, colour)
    }

    fn spawn_light(
        &mut self,
        kind: LightKind,
        position: Vec3,
        direction: Vec3,
        colour: Colour,
    ) -> RenderEntity {
        let name = format!("light{}", self.light_counter);
        self.light_counter += 1;

        let mut transform = Transform {
            position,
            ..Default::default()
        };
        transform.set_direction(direction);

        let entity = self.world.spawn((
            Name::new(name),
            transform,
            Light {
                kind,
                diffuse: colour,
                specular: colour,
            },
        ));
        RenderEntity(entity)
    }

    /// Add an empty manual object, ready for lines
    pub fn add_manual_object(&mut self) -> ManualObjectHandle {
        let entity = self.world.spawn((
            Name::new("manual_object"),
            Transform::default(),
            ManualObject::new(),
        ));
        ManualObjectHandle(RenderEntity(entity))
    }

    /// Borrow a manual object
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if it was removed
    pub fn manual_object(
        &self,
        handle: ManualObjectHandle,
    ) -> Result<hecs::Ref<'_, ManualObject>, EngineError> {
        self.world
            .get::<&ManualObject>(handle.0.0)
            .map_err(component_error(handle.0, "ManualObject"))
    }

    /// Mutably borrow a manual object
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if it was removed
    pub fn manual_object_mut(
        &self,
        handle: ManualObjectHandle,
    ) -> Result<hecs::RefMut<'_, ManualObject>, EngineError> {
        self.world
            .get::<&mut ManualObject>(handle.0.0)
            .map_err(component_error(handle.0, "ManualObject"))
    }

    /// Move a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if the node was removed
    pub fn set_position(&mut self, entity: RenderEntity, position: Vec3) -> Result<(), EngineError> {
        self.transform_mut(entity)?.position = position;
        Ok(())
    }

    /// Rotate a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if the node was removed
    pub fn set_orientation(
        &mut self,
        entity: RenderEntity,
        orientation: Quat,
    ) -> Result<(), EngineError> {
        self.transform_mut(entity)?.rotation = orientation;
        Ok(())
    }

    /// Current transform of a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if the node was removed
    pub fn transform(&self, entity: RenderEntity) -> Result<Transform, EngineError> {
        self.world
            .get::<&Transform>(entity.0)
            .map(|transform| *transform)
            .map_err(component_error(entity, "Transform"))
    }

    fn transform_mut(
        &mut self,
        entity: RenderEntity,
    ) -> Result<hecs::RefMut<'_, Transform>, EngineError> {
        self.world
            .get::<&mut Transform>(entity.0)
            .map_err(component_error(entity, "Transform"))
    }

    /// Name of a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if the node was removed
    pub fn name(&self, entity: RenderEntity) -> Result<String, EngineError> {
        self.world
            .get::<&Name>(entity.0)
            .map(|name| name.0.clone())
            .map_err(component_error(entity, "Name"))
    }

    /// Drawable component of a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingComponent`] for lights and manual objects
    pub fn renderable(&self, entity: RenderEntity) -> Result<Renderable, EngineError> {
        self.world
            .get::<&Renderable>(entity.0)
            .map(|renderable| Renderable::clone(&renderable))
            .map_err(component_error(entity, "Renderable"))
    }

    /// Light component of a node
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingComponent`] for nodes that are not lights
    pub fn light(&self, entity: RenderEntity) -> Result<Light, EngineError> {
        self.world
            .get::<&Light>(entity.0)
            .map(|light| *light)
            .map_err(component_error(entity, "Light"))
    }

    /// Remove a node from the scene
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StaleEntity`] if it was already removed
    pub fn remove_entity(&mut self, entity: RenderEntity) -> Result<(), EngineError> {
        self.world
            .despawn(entity.0)
            .map_err(|_| EngineError::StaleEntity(entity))
    }

    /// Check whether a node still exists
    #[must_use]
    pub fn contains(&self, entity: RenderEntity) -> bool {
        self.world.contains(entity.0)
    }

    /// Number of nodes of any kind
    #[must_use]
    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }

    /// Number of drawable nodes
    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.world.query::<&Renderable>().iter().count()
    }

    /// Number of lights
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.world.query::<&Light>().iter().count()
    }
}

impl TransformTarget for GraphicsManager {
    fn set_transform(
        &mut self,
        entity: RenderEntity,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), EngineError> {
        let mut transform = self.transform_mut(entity)?;
        transform.position = position;
        transform.rotation = orientation;
        Ok(())
    }
}

impl Default for GraphicsManager {
    fn default() -> Self {
        Self::new(&GraphicsConfig::default())
    }
}

impl std::fmt::Debug for GraphicsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsManager")
            .field("entities", &self.world.len())
            .field("materials", &self.materials.len())
            .field("ambient_light", &self.ambient_light)
            .field("sky_dome", &self.sky_dome)
            .field("shadows", &self.shadows)
            .finish()
    }
}

fn component_error(
    entity: RenderEntity,
    component: &'static str,
) -> impl FnOnce(hecs::ComponentError) -> EngineError {
    move |error| match error {
        hecs::ComponentError::NoSuchEntity => EngineError::StaleEntity(entity),
        hecs::ComponentError::MissingComponent(_) => {
            EngineError::MissingComponent(entity, component)
        }
    }
}
