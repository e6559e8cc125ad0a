//! Transcription collaborator.

use crate::backend::audio::AudioBuffer;
use crate::backend::ModelResource;
use crate::document::{Segment, Transcript};
use crate::error::{Result, ScrybeError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for the speech-to-text collaborator.
///
/// Implementations own their model loading; the engine only hands them the
/// full audio, an optional language hint and a batch size, and expects a
/// transcribed-shape document back.
pub trait Transcriber: ModelResource + Send + Sync {
    /// Transcribe the full audio.
    ///
    /// `language` of `None` means auto-detect; the detected language must be
    /// recorded on the returned document.
    fn transcribe(
        &self,
        audio: &AudioBuffer,
        language: Option<&str>,
        batch_size: u32,
    ) -> Result<Transcript>;

    /// Name of the loaded model, for log lines.
    fn model_name(&self) -> &str;
}

/// Mock transcriber for tests and dry runs.
#[derive(Debug)]
pub struct MockTranscriber {
    model_name: String,
    segments: Vec<Segment>,
    language: Option<String>,
    should_fail: bool,
    releases: AtomicUsize,
}

impl MockTranscriber {
    /// Create a mock that produces one canned segment.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            segments: vec![Segment::new(0.0, 1.0, "mock transcription")],
            language: Some("en".to_string()),
            should_fail: false,
            releases: AtomicUsize::new(0),
        }
    }

    /// Configure the segments the mock produces.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Configure the detected language.
    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// How many times `release` has been called.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ModelResource for MockTranscriber {
    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(
        &self,
        _audio: &AudioBuffer,
        language: Option<&str>,
        _batch_size: u32,
    ) -> Result<Transcript> {
        if self.should_fail {
            return Err(ScrybeError::Collaborator {
                stage: "transcription",
                message: "mock transcription failure".to_string(),
            });
        }
        // A requested language wins over the mock's canned detection.
        let language = language
            .map(str::to_string)
            .or_else(|| self.language.clone());
        Ok(Transcript::new(self.segments.clone(), language))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
