//! Transcript document model shared by all pipeline stages.
//!
//! The same document type flows through the whole pipeline; stages enrich it
//! in place of replacing it. Which stage produced a document is visible from
//! its structure, not from a flag: `transcribed` segments lack `words`,
//! `aligned` segments carry them, `diarized` segments additionally carry a
//! `speaker` label. Optional fields are omitted from the serialized JSON so
//! pre-existing checkpoints keep their exact shape.

use serde::{Deserialize, Serialize};

/// A single word with word-level timing, produced by alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSpan {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl WordSpan {
    /// Creates a word span with timing and no speaker.
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start: Some(start),
            end: Some(end),
            score: None,
            speaker: None,
        }
    }
}

/// One utterance-level segment of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Word-level timing; present from the aligned stage on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordSpan>>,
    /// Speaker label; present from the diarized stage on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl Segment {
    /// Creates a transcribed-shape segment (no words, no speaker).
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: None,
            speaker: None,
        }
    }

    /// Creates an aligned-shape segment carrying word-level timing.
    pub fn with_words(start: f64, end: f64, text: impl Into<String>, words: Vec<WordSpan>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: Some(words),
            speaker: None,
        }
    }
}

/// The whole transcript document, persisted as one JSON checkpoint per stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Language detected by transcription (or requested up front).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Transcript {
    /// Creates a transcript from segments with a detected language.
    pub fn new(segments: Vec<Segment>, language: Option<String>) -> Self {
        Self { segments, language }
    }
}

/// Pipeline stage whose output is persisted as a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Transcribed,
    Aligned,
    Diarized,
}

impl Stage {
    /// Checkpoint file name for this stage inside the run's `.cache` dir.
    pub fn file_name(self) -> &'static str {
        match self {
            Stage::Transcribed => "transcribed.json",
            Stage::Aligned => "aligned.json",
            Stage::Diarized => "diarized.json",
        }
    }

    /// Human-readable stage label for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Transcribed => "transcribed",
            Stage::Aligned => "aligned",
            Stage::Diarized => "diarized",
        }
    }

    /// Probe order for resuming: most complete first.
    pub const MOST_COMPLETE_FIRST: [Stage; 3] = [Stage::Diarized, Stage::Aligned, Stage::Transcribed];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcribed_segment_serializes_without_words_or_speaker() {
        let segment = Segment::new(0.0, 2.5, "hello world");
        let json = serde_json::to_string(&segment).unwrap();

        assert!(!json.contains("words"));
        assert!(!json.contains("speaker"));
        assert!(json.contains("hello world"));
    }

    #[test]
    fn test_aligned_segment_serializes_words() {
        let words = vec![WordSpan::new("hello", 0.0, 0.4), WordSpan::new("world", 0.5, 1.0)];
        let segment = Segment::with_words(0.0, 1.0, "hello world", words);
        let json = serde_json::to_string(&segment).unwrap();

        assert!(json.contains("\"words\""));
        assert!(!json.contains("speaker"));
    }

    #[test]
    fn test_segment_roundtrip_preserves_shape() {
        let mut segment = Segment::with_words(1.0, 2.0, "привет", vec![WordSpan::new("привет", 1.0, 2.0)]);
        segment.speaker = Some("SPEAKER_00".to_string());

        let json = serde_json::to_string(&segment).unwrap();
        let back: Segment = serde_json::from_str(&json).unwrap();

        assert_eq!(segment, back);
    }

    #[test]
    fn test_transcript_deserializes_missing_segments_as_empty() {
        let transcript: Transcript = serde_json::from_str("{}").unwrap();
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.language, None);
    }

    #[test]
    fn test_transcript_unicode_preserved() {
        let transcript = Transcript::new(vec![Segment::new(0.0, 1.0, "Привет, мир")], Some("ru".to_string()));
        let json = serde_json::to_string_pretty(&transcript).unwrap();

        // serde_json does not escape non-ASCII text
        assert!(json.contains("Привет, мир"));
    }

    #[test]
    fn test_stage_file_names() {
        assert_eq!(Stage::Transcribed.file_name(), "transcribed.json");
        assert_eq!(Stage::Aligned.file_name(), "aligned.json");
        assert_eq!(Stage::Diarized.file_name(), "diarized.json");
    }

    #[test]
    fn test_stage_probe_order_is_most_complete_first() {
        assert_eq!(
            Stage::MOST_COMPLETE_FIRST,
            [Stage::Diarized, Stage::Aligned, Stage::Transcribed]
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Diarized.to_string(), "diarized");
    }
}
