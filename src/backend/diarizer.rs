//! Diarization collaborator.

use crate::backend::audio::AudioBuffer;
use crate::backend::ModelResource;
use crate::error::{Result, ScrybeError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A stretch of audio attributed to one speaker.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerTurn {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

impl SpeakerTurn {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
        }
    }
}

/// Trait for the speaker-diarization collaborator.
///
/// Requires a credential; the engine guarantees one is present before
/// invoking this (a missing credential skips the stage instead).
pub trait Diarizer: ModelResource + Send + Sync {
    /// Detect speaker turns across the full audio.
    fn diarize(&self, audio: &AudioBuffer, credential: &str) -> Result<Vec<SpeakerTurn>>;
}

/// Mock diarizer for tests and dry runs.
#[derive(Debug)]
pub struct MockDiarizer {
    turns: Vec<SpeakerTurn>,
    should_fail: bool,
    releases: AtomicUsize,
}

impl Default for MockDiarizer {
    fn default() -> Self {
        Self {
            turns: vec![SpeakerTurn::new(0.0, f64::MAX, "SPEAKER_00")],
            should_fail: false,
            releases: AtomicUsize::new(0),
        }
    }
}

impl MockDiarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the turns the mock reports.
    pub fn with_turns(mut self, turns: Vec<SpeakerTurn>) -> Self {
        self.turns = turns;
        self
    }

    /// Configure the mock to fail on diarize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// How many times `release` has been called.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ModelResource for MockDiarizer {
    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(&self, _audio: &AudioBuffer, credential: &str) -> Result<Vec<SpeakerTurn>> {
        if credential.trim().is_empty() {
            return Err(ScrybeError::Collaborator {
                stage: "diarization",
                message: "empty credential".to_string(),
            });
        }
        if self.should_fail {
            return Err(ScrybeError::Collaborator {
                stage: "diarization",
                message: "mock diarization failure".to_string(),
            });
        }
        Ok(self.turns.clone())
    }
}
