//! Core engine module
//!
//! Contains the Engine struct, its frame loop and configuration

mod config;
mod engine;
mod error;
mod hooks;
mod stats;
mod time;

pub use config::{EngineConfig, GraphicsConfig, PhysicsConfig};
pub use engine::{Engine, EngineContext};
pub use error::EngineError;
pub use hooks::{FrameHook, FrameHooks};
pub use stats::FrameStats;
pub use time::Time;
