//! Diarization stage.
//!
//! The collaborator detects speaker turns; this stage merges them onto the
//! aligned document. Each word takes the speaker whose turn overlaps it the
//! most; each segment takes the speaker with the largest total overlap of
//! its span. Words without timing inherit their segment's speaker.

use crate::backend::{Diarizer, ModelResource, ReleaseGuard, SpeakerTurn};
use crate::document::Transcript;
use crate::error::Result;
use crate::events::EventSink;
use crate::stages::ExecutionContext;

/// Runs the diarization collaborator and produces a diarized-shape document.
pub fn run(
    ctx: &mut ExecutionContext<'_>,
    diarizer: &dyn Diarizer,
    prior: &Transcript,
    credential: &str,
    events: &dyn EventSink,
) -> Result<Transcript> {
    events.log("Detecting speakers...");
    let audio = ctx.audio()?;

    let _release = ReleaseGuard(diarizer as &dyn ModelResource);
    let turns = diarizer.diarize(&audio, credential)?;
    events.log(&format!("Diarization completed ({} speaker turns).", turns.len()));

    Ok(assign_speakers(prior, &turns))
}

/// Merges speaker turns onto a document, producing diarized shape.
pub fn assign_speakers(document: &Transcript, turns: &[SpeakerTurn]) -> Transcript {
    let mut result = document.clone();

    for segment in &mut result.segments {
        let segment_speaker = dominant_speaker(turns, segment.start, segment.end);

        if let Some(words) = &mut segment.words {
            for word in words {
                word.speaker = match (word.start, word.end) {
                    (Some(start), Some(end)) => {
                        dominant_speaker(turns, start, end).or_else(|| segment_speaker.clone())
                    }
                    _ => segment_speaker.clone(),
                };
            }
        }

        segment.speaker = segment_speaker;
    }

    result
}

/// The speaker whose turns overlap `[start, end]` the most, ties going to
/// the earlier turn. `None` when no turn overlaps at all.
fn dominant_speaker(turns: &[SpeakerTurn], start: f64, end: f64) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;

    for turn in turns {
        let overlap = (end.min(turn.end) - start.max(turn.start)).max(0.0);
        if overlap <= 0.0 {
            continue;
        }
        // Total overlap across all of this speaker's turns, so split turns
        // still beat one long turn from another speaker.
        let speaker_total: f64 = turns
            .iter()
            .filter(|t| t.speaker == turn.speaker)
            .map(|t| (end.min(t.end) - start.max(t.start)).max(0.0))
            .sum();
        match best {
            Some((_, best_total)) if best_total >= speaker_total => {}
            _ => best = Some((turn.speaker.as_str(), speaker_total)),
        }
    }

    best.map(|(speaker, _)| speaker.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockAudioLoader, MockDiarizer};
    use crate::document::{Segment, WordSpan};
    use crate::events::NullSink;
    use std::fs;
    use tempfile::TempDir;

    fn aligned() -> Transcript {
        Transcript::new(
            vec![
                Segment::with_words(
                    0.0,
                    4.0,
                    "hello there",
                    vec![WordSpan::new("hello", 0.0, 1.0), WordSpan::new("there", 3.0, 4.0)],
                ),
                Segment::with_words(4.0, 8.0, "hi", vec![WordSpan::new("hi", 5.0, 6.0)]),
            ],
            Some("en".to_string()),
        )
    }

    #[test]
    fn test_assigns_speaker_by_overlap() {
        let turns = vec![
            SpeakerTurn::new(0.0, 4.0, "SPEAKER_00"),
            SpeakerTurn::new(4.0, 8.0, "SPEAKER_01"),
        ];

        let result = assign_speakers(&aligned(), &turns);

        assert_eq!(result.segments[0].speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(result.segments[1].speaker.as_deref(), Some("SPEAKER_01"));
        let words = result.segments[1].words.as_ref().unwrap();
        assert_eq!(words[0].speaker.as_deref(), Some("SPEAKER_01"));
    }

    #[test]
    fn test_word_straddling_turns_takes_larger_overlap() {
        let turns = vec![
            SpeakerTurn::new(0.0, 0.4, "SPEAKER_00"),
            SpeakerTurn::new(0.4, 2.0, "SPEAKER_01"),
        ];
        let document = Transcript::new(
            vec![Segment::with_words(
                0.0,
                2.0,
                "word",
                vec![WordSpan::new("word", 0.0, 1.0)],
            )],
            None,
        );

        let result = assign_speakers(&document, &turns);

        // Word overlaps SPEAKER_00 for 0.4s and SPEAKER_01 for 0.6s
        let words = result.segments[0].words.as_ref().unwrap();
        assert_eq!(words[0].speaker.as_deref(), Some("SPEAKER_01"));
    }

    #[test]
    fn test_untimed_word_inherits_segment_speaker() {
        let turns = vec![SpeakerTurn::new(0.0, 10.0, "SPEAKER_00")];
        let mut word = WordSpan::new("hm", 0.0, 0.0);
        word.start = None;
        word.end = None;
        let document = Transcript::new(
            vec![Segment::with_words(0.0, 2.0, "hm", vec![word])],
            None,
        );

        let result = assign_speakers(&document, &turns);

        let words = result.segments[0].words.as_ref().unwrap();
        assert_eq!(words[0].speaker.as_deref(), Some("SPEAKER_00"));
    }

    #[test]
    fn test_no_overlapping_turn_leaves_speaker_absent() {
        let turns = vec![SpeakerTurn::new(100.0, 200.0, "SPEAKER_00")];
        let result = assign_speakers(&aligned(), &turns);
        assert_eq!(result.segments[0].speaker, None);
    }

    #[test]
    fn test_split_turns_accumulate_per_speaker() {
        // SPEAKER_00 speaks 0-1 and 3-4 (total 2.0 overlap of segment 0-4),
        // SPEAKER_01 speaks 1-2.5 (1.5). SPEAKER_00 wins despite shorter
        // individual turns.
        let turns = vec![
            SpeakerTurn::new(0.0, 1.0, "SPEAKER_00"),
            SpeakerTurn::new(1.0, 2.5, "SPEAKER_01"),
            SpeakerTurn::new(3.0, 4.0, "SPEAKER_00"),
        ];
        let document = Transcript::new(vec![Segment::new(0.0, 4.0, "long segment")], None);

        let result = assign_speakers(&document, &turns);
        assert_eq!(result.segments[0].speaker.as_deref(), Some("SPEAKER_00"));
    }

    #[test]
    fn test_run_merges_collaborator_turns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audio.mp3");
        fs::write(&path, b"fake").unwrap();
        let loader = MockAudioLoader::new();
        let mut ctx = ExecutionContext::new(path, &loader);

        let diarizer = MockDiarizer::new().with_turns(vec![SpeakerTurn::new(0.0, 100.0, "SPEAKER_00")]);
        let result = run(&mut ctx, &diarizer, &aligned(), "hf_token", &NullSink).unwrap();

        assert!(result.segments.iter().all(|s| s.speaker.is_some()));
        assert_eq!(diarizer.release_count(), 1);
    }

    #[test]
    fn test_releases_model_on_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audio.mp3");
        fs::write(&path, b"fake").unwrap();
        let loader = MockAudioLoader::new();
        let mut ctx = ExecutionContext::new(path, &loader);

        let diarizer = MockDiarizer::new().with_failure();
        let result = run(&mut ctx, &diarizer, &aligned(), "hf_token", &NullSink);

        assert!(result.is_err());
        assert_eq!(diarizer.release_count(), 1);
    }
}
