//! Audio manager owning the output device and the clip cache

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use rodio::{OutputStream, OutputStreamBuilder};
use rustc_hash::FxHashMap;

use super::clip::{AudioClip, AudioError};

/// Owns the default output device and every loaded clip
pub struct AudioManager {
    /// The output stream; clips hold a weak reference to it
    _output: Arc<OutputStream>,
    cache: ClipCache,
}

impl AudioManager {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;

        log::info!("Audio output opened");
        let output = Arc::new(stream);
        let cache = ClipCache::new(Arc::downgrade(&output));
        Ok(Self {
            _output: output,
            cache,
        })
    }

    /// Load a clip from a file. Loading the same path again returns the
    /// cached clip without touching the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<AudioClip, AudioError> {
        self.cache.load(path.as_ref())
    }

    /// Make a clip from encoded bytes already in memory. Not cached.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::DecodeError`] if the bytes are not audio
    pub fn load_bytes(
        &self,
        name: impl Into<String>,
        bytes: Arc<[u8]>,
    ) -> Result<AudioClip, AudioError> {
        self.cache.load_bytes(name, bytes)
    }

    /// Number of cached clips
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("clip_count", &self.cache.len())
            .finish()
    }
}

/// Clips keyed by the path they were loaded from
#[derive(Debug)]
struct ClipCache {
    clips: FxHashMap<PathBuf, AudioClip>,
    /// Output every clip plays on
    output: Weak<OutputStream>,
}

impl ClipCache {
    fn new(output: Weak<OutputStream>) -> Self {
        Self {
            clips: FxHashMap::default(),
            output,
        }
    }

    fn load(&mut self, path: &Path) -> Result<AudioClip, AudioError> {
        if let Some(clip) = self.clips.get(path) {
            return Ok(clip.clone());
        }

        let bytes: Arc<[u8]> = fs::read(path)
            .map_err(|e| AudioError::IoError(format!("{}: {e}", path.display())))?
            .into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let clip = self.load_bytes(name, bytes)?;

        log::debug!("Loaded {} ({} bytes)", path.display(), clip.len());
        self.clips.insert(path.to_path_buf(), clip.clone());
        Ok(clip)
    }

    fn load_bytes(&self, name: impl Into<String>, bytes: Arc<[u8]>) -> Result<AudioClip, AudioError> {
        AudioClip::new(name, bytes, Weak::clone(&self.output))
    }

    fn len(&self) -> usize {
        self.clips.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::clip::tests::wav_bytes;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bab-audio-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut cache = ClipCache::new(Weak::new());
        let result = cache.load(Path::new("no/such/crash.wav"));
        assert!(matches!(result, Err(AudioError::IoError(_))));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_undecodable_file_is_not_cached() {
        let path = temp_file("garbage.wav", b"RIFF but not really");
        let mut cache = ClipCache::new(Weak::new());
        assert!(matches!(
            cache.load(&path),
            Err(AudioError::DecodeError(_))
        ));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_same_path_loads_once() {
        let path = temp_file("crash.wav", &wav_bytes());
        let mut cache = ClipCache::new(Weak::new());

        let first = cache.load(&path).unwrap();
        // Later reads come from the cache, not the file
        fs::remove_file(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert_eq!(first.name(), "crash.wav");
        assert_eq!(second.name(), first.name());
        assert_eq!(second.len(), first.len());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bytes_in_memory_are_not_cached() {
        let cache = ClipCache::new(Weak::new());
        let clip = cache.load_bytes("beep", wav_bytes()).unwrap();
        assert_eq!(clip.name(), "beep");
        assert_eq!(cache.len(), 0);

        let garbage: Arc<[u8]> = Arc::from(&b"not audio at all"[..]);
        assert!(matches!(
            cache.load_bytes("garbage", garbage),
            Err(AudioError::DecodeError(_))
        ));
    }
}
