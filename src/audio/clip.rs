//! Decoded-once sound clips

use std::fmt;
use std::io::Cursor;
use std::sync::{Arc, Weak};

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Errors that can occur during audio operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// IO error reading file
    IoError(String),
    /// Error decoding audio data
    DecodeError(String),
    /// Error during playback
    PlayError(String),
    /// No audio device available
    NoDevice,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::PlayError(e) => write!(f, "Playback error: {e}"),
            Self::NoDevice => write!(f, "No audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Decoded source shared by every clone of a clip
type ClipSource = Buffered<Decoder<Cursor<Arc<[u8]>>>>;

/// A sound, cheap to clone, that can be played any number of times.
///
/// The data is decoded once. Samples are kept as they are first played, so
/// later plays and clones reuse them.
///
/// A clip does not keep the output device open: once its [`AudioManager`]
/// is dropped, [`play`](Self::play) fails with [`AudioError::PlayError`].
///
/// [`AudioManager`]: super::AudioManager
#[derive(Clone)]
pub struct AudioClip {
    name: String,
    /// Encoded size in bytes
    size: usize,
    source: ClipSource,
    output: Weak<OutputStream>,
}

impl AudioClip {
    /// Wrap encoded bytes, checking that they decode
    pub(super) fn new(
        name: impl Into<String>,
        bytes: Arc<[u8]>,
        output: Weak<OutputStream>,
    ) -> Result<Self, AudioError> {
        let size = bytes.len();
        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| AudioError::DecodeError(e.to_string()))?
            .buffered();
        Ok(Self {
            name: name.into(),
            size,
            source,
            output,
        })
    }

    /// Start playing the clip on a fresh sink and return immediately.
    /// Overlapping calls mix together.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::PlayError`] if the output device was closed
    pub fn play(&self) -> Result<(), AudioError> {
        let output = self
            .output
            .upgrade()
            .ok_or_else(|| AudioError::PlayError(format!("{}: output closed", self.name)))?;

        let sink = Sink::connect_new(output.mixer());
        sink.append(self.source.clone());
        sink.detach();

        log::trace!("Playing {}", self.name);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the encoded data in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Decoded sample rate in Hz
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("name", &self.name)
            .field("bytes", &self.size)
            .field("output_open", &(self.output.strong_count() > 0))
            .finish()
    }
}
