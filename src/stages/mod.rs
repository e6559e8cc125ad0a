//! Stage executors: audio prep, transcribe, align, diarize, export.
//!
//! Each stage is a function from the shared execution context plus the prior
//! document to a new document; the engine owns sequencing and persistence.

pub mod align;
pub mod audio_prep;
pub mod diarize;
pub mod export;
pub mod transcribe;

use crate::backend::{AudioBuffer, AudioLoader};
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-run state threaded through the stage sequence.
///
/// Holds the canonical audio handle, loaded lazily on first use and assigned
/// exactly once; stages that resume from a late checkpoint never pay for a
/// load. The buffer is dropped with the context at the end of the run.
pub struct ExecutionContext<'a> {
    audio_path: PathBuf,
    loader: &'a dyn AudioLoader,
    audio: Option<Arc<AudioBuffer>>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(audio_path: PathBuf, loader: &'a dyn AudioLoader) -> Self {
        Self {
            audio_path,
            loader,
            audio: None,
        }
    }

    /// Path of the canonical audio file.
    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    /// The decoded audio, loading it on first call.
    pub fn audio(&mut self) -> Result<Arc<AudioBuffer>> {
        match &self.audio {
            Some(buffer) => Ok(buffer.clone()),
            None => {
                let buffer = Arc::new(self.loader.load(&self.audio_path)?);
                self.audio = Some(buffer.clone());
                Ok(buffer)
            }
        }
    }

    /// Whether the audio has been loaded.
    pub fn audio_loaded(&self) -> bool {
        self.audio.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockAudioLoader;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_audio_loaded_lazily_and_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audio.mp3");
        fs::write(&path, b"fake").unwrap();

        let loader = MockAudioLoader::new();
        let mut ctx = ExecutionContext::new(path, &loader);

        assert!(!ctx.audio_loaded());
        let first = ctx.audio().unwrap();
        assert!(ctx.audio_loaded());
        let second = ctx.audio().unwrap();
        // Same buffer, not a reload
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_audio_surfaces_loader_error() {
        let loader = MockAudioLoader::new();
        let mut ctx = ExecutionContext::new(PathBuf::from("/nope/audio.mp3"), &loader);
        assert!(ctx.audio().is_err());
        assert!(!ctx.audio_loaded());
    }
}
