//! Sound clip playback
//!
//! Built on top of the rodio audio library.
//! Supports WAV, MP3, OGG, and FLAC formats.

mod clip;
mod manager;

pub use clip::{AudioClip, AudioError};
pub use manager::AudioManager;
