//! Audio loading collaborator.
//!
//! Decoding the canonical audio file into samples belongs to the model
//! stack, not the engine; the engine only keeps the loaded buffer alive for
//! the stages that need it.

use crate::error::{Result, ScrybeError};
use std::path::Path;

/// Decoded audio, mono float samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Trait for decoding the canonical audio file.
pub trait AudioLoader: Send + Sync {
    /// Decode the file at `path` into a mono sample buffer.
    fn load(&self, path: &Path) -> Result<AudioBuffer>;
}

/// Mock audio loader for tests: verifies the file exists and returns
/// silence of a configurable duration.
#[derive(Debug, Clone)]
pub struct MockAudioLoader {
    duration_secs: f64,
    sample_rate: u32,
}

impl Default for MockAudioLoader {
    fn default() -> Self {
        Self {
            duration_secs: 1.0,
            sample_rate: 16000,
        }
    }
}

impl MockAudioLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the duration of the silence returned.
    pub fn with_duration_secs(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }
}

impl AudioLoader for MockAudioLoader {
    fn load(&self, path: &Path) -> Result<AudioBuffer> {
        if !path.is_file() {
            return Err(ScrybeError::Collaborator {
                stage: "audio loading",
                message: format!("no audio file at {}", path.display()),
            });
        }
        let sample_count = (self.duration_secs * self.sample_rate as f64) as usize;
        Ok(AudioBuffer {
            samples: vec![0.0; sample_count],
            sample_rate: self.sample_rate,
        })
    }
}
