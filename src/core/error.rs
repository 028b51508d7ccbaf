//! Engine-wide error type

use crate::physics::RigidBodyHandle;
use crate::scene::RenderEntity;

/// Errors raised by the engine, its hooks, and the managers it drives
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A rigid body handle outlived the body it referred to
    StaleBody(RigidBodyHandle),
    /// A scene entity handle outlived the node it referred to
    StaleEntity(RenderEntity),
    /// The entity exists but does not carry the expected component
    MissingComponent(RenderEntity, &'static str),
    /// Lines were written to a manual object that is not being built
    NotBuilding(RenderEntity),
    /// A material with this name is already registered
    DuplicateMaterial(String),
    /// Configuration could not be parsed or serialized
    Config(String),
    /// IO error
    Io(String),
    /// A frame hook failed
    Hook(String),
}

impl EngineError {
    /// Convenience constructor for hook failures
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook(message.into())
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleBody(body) => write!(f, "Rigid body {body:?} is no longer simulated"),
            Self::StaleEntity(entity) => write!(f, "Scene entity {entity:?} no longer exists"),
            Self::MissingComponent(entity, component) => {
                write!(f, "Scene entity {entity:?} has no {component} component")
            }
            Self::NotBuilding(entity) => {
                write!(f, "Manual object {entity:?} is not between begin() and end()")
            }
            Self::DuplicateMaterial(name) => write!(f, "Material '{name}' already exists"),
            Self::Config(e) => write!(f, "Config error: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Hook(e) => write!(f, "Frame hook failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

