//! Engine configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Files are RON or JSON, picked by extension.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::scene::{Colour, SkyDome};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application name, used in logs
    pub title: String,
    /// Target frames per second (0 for unlimited)
    pub target_fps: u32,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Log frame statistics every this many frames (0 to disable)
    pub stats_interval: u64,
    pub physics: PhysicsConfig,
    pub graphics: GraphicsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("bab"),
            target_fps: 60,
            max_frames: None,
            stats_interval: 300,
            physics: PhysicsConfig::default(),
            graphics: GraphicsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Stop the loop after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set the physics settings
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Set the scene settings
    pub fn with_graphics(mut self, graphics: GraphicsConfig) -> Self {
        self.graphics = graphics;
        self
    }

    /// Parse a RON document
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the text is not a valid config
    pub fn from_ron(text: &str) -> Result<Self, EngineError> {
        ron::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the text is not a valid config
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize as pretty RON
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if serialization fails
    pub fn to_ron(&self) -> Result<String, EngineError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load a config file; `.json` files are read as JSON, anything else as
    /// RON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EngineError::Io(e.to_string()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_ron(&content)
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Fixed step length, one step per frame
    pub timestep: f32,
    /// Draw collider wireframes into the debug line object
    pub debug_draw: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -10.0, 0.0),
            timestep: 0.16,
            debug_draw: false,
        }
    }
}

/// Scene-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub ambient_light: Colour,
    pub sky_dome: Option<SkyDome>,
    pub shadows: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            ambient_light: Colour::rgb(0.2, 0.2, 0.2),
            sky_dome: None,
            shadows: true,
        }
    }
}
