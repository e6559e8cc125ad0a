//! Alignment collaborator.

use crate::backend::audio::AudioBuffer;
use crate::backend::ModelResource;
use crate::document::{Segment, Transcript, WordSpan};
use crate::error::{Result, ScrybeError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for the word-level alignment collaborator.
pub trait Aligner: ModelResource + Send + Sync {
    /// Align the transcribed segments against the audio, producing an
    /// aligned-shape document.
    ///
    /// A language without alignment support is a fatal
    /// `AlignmentUnsupported` error; it must never be silently skipped.
    fn align(
        &self,
        segments: &[Segment],
        language: &str,
        audio: &AudioBuffer,
    ) -> Result<Transcript>;
}

/// Mock aligner for tests and dry runs.
///
/// Splits each segment's text on whitespace and spreads the words evenly
/// across the segment's time span.
#[derive(Debug, Default)]
pub struct MockAligner {
    unsupported_languages: Vec<String>,
    should_fail: bool,
    releases: AtomicUsize,
}

impl MockAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure languages the mock reports as unsupported.
    pub fn with_unsupported_language(mut self, language: &str) -> Self {
        self.unsupported_languages.push(language.to_string());
        self
    }

    /// Configure the mock to fail on align.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// How many times `release` has been called.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ModelResource for MockAligner {
    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Aligner for MockAligner {
    fn align(
        &self,
        segments: &[Segment],
        language: &str,
        _audio: &AudioBuffer,
    ) -> Result<Transcript> {
        if self.unsupported_languages.iter().any(|l| l == language) {
            return Err(ScrybeError::AlignmentUnsupported {
                language: language.to_string(),
            });
        }
        if self.should_fail {
            return Err(ScrybeError::Collaborator {
                stage: "alignment",
                message: "mock alignment failure".to_string(),
            });
        }

        let aligned = segments
            .iter()
            .map(|segment| {
                let tokens: Vec<&str> = segment.text.split_whitespace().collect();
                let span = segment.end - segment.start;
                let step = if tokens.is_empty() {
                    0.0
                } else {
                    span / tokens.len() as f64
                };
                let words = tokens
                    .iter()
                    .enumerate()
                    .map(|(i, token)| {
                        WordSpan::new(
                            *token,
                            segment.start + step * i as f64,
                            segment.start + step * (i + 1) as f64,
                        )
                    })
                    .collect();
                Segment::with_words(segment.start, segment.end, segment.text.clone(), words)
            })
            .collect();

        Ok(Transcript::new(aligned, Some(language.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silence() -> AudioBuffer {
        AudioBuffer {
            samples: vec![0.0; 16000],
            sample_rate: 16000,
        }
    }

    #[test]
    fn test_mock_aligner_adds_words() {
        let aligner = MockAligner::new();
        let segments = vec![Segment::new(0.0, 2.0, "hello world")];

        let result = aligner.align(&segments, "en", &silence()).unwrap();

        let words = result.segments[0].words.as_ref().unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "hello");
        assert_eq!(words[0].start, Some(0.0));
        assert_eq!(words[1].end, Some(2.0));
    }

    #[test]
    fn test_mock_aligner_empty_text_gets_empty_words() {
        let aligner = MockAligner::new();
        let segments = vec![Segment::new(0.0, 1.0, "   ")];

        let result = aligner.align(&segments, "en", &silence()).unwrap();

        assert_eq!(result.segments[0].words.as_ref().unwrap().len(), 0);
    }

    #[test]
    fn test_unsupported_language_is_surfaced() {
        let aligner = MockAligner::new().with_unsupported_language("xx");
        let segments = vec![Segment::new(0.0, 1.0, "hello")];

        match aligner.align(&segments, "xx", &silence()) {
            Err(ScrybeError::AlignmentUnsupported { language }) => assert_eq!(language, "xx"),
            other => panic!("expected AlignmentUnsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_supported_language_still_works() {
        let aligner = MockAligner::new().with_unsupported_language("xx");
        let segments = vec![Segment::new(0.0, 1.0, "hello")];
        assert!(aligner.align(&segments, "en", &silence()).is_ok());
    }
}
