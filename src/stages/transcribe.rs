//! Transcription stage.

use crate::backend::{ModelResource, ReleaseGuard, Transcriber};
use crate::document::Transcript;
use crate::error::Result;
use crate::events::EventSink;
use crate::options::ExecutionOptions;
use crate::stages::ExecutionContext;

/// Runs the transcription collaborator over the full audio, producing a
/// transcribed-shape document.
///
/// Model resources are released when the invocation finishes, whether it
/// succeeded or not.
pub fn run(
    ctx: &mut ExecutionContext<'_>,
    transcriber: &dyn Transcriber,
    options: &ExecutionOptions,
    events: &dyn EventSink,
) -> Result<Transcript> {
    events.log(&format!("Loading Whisper model: {}...", transcriber.model_name()));

    events.log("Loading audio...");
    let audio = ctx.audio()?;

    let language_label = options.language.as_deref().unwrap_or("auto-detect");
    events.log(&format!("Transcribing audio (language: {language_label})..."));

    let _release = ReleaseGuard(transcriber as &dyn ModelResource);
    let document = transcriber.transcribe(&audio, options.language.as_deref(), options.batch_size)?;

    events.log("Transcription completed.");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockAudioLoader, MockTranscriber};
    use crate::document::Segment;
    use crate::events::NullSink;
    use std::fs;
    use tempfile::TempDir;

    fn context_with_audio<'a>(
        dir: &TempDir,
        loader: &'a MockAudioLoader,
    ) -> ExecutionContext<'a> {
        let path = dir.path().join("audio.mp3");
        fs::write(&path, b"fake").unwrap();
        ExecutionContext::new(path, loader)
    }

    #[test]
    fn test_produces_transcribed_shape() {
        let dir = TempDir::new().unwrap();
        let loader = MockAudioLoader::new();
        let mut ctx = context_with_audio(&dir, &loader);
        let transcriber =
            MockTranscriber::new("large-v3").with_segments(vec![Segment::new(0.0, 2.0, "hi")]);

        let document = run(&mut ctx, &transcriber, &ExecutionOptions::default(), &NullSink).unwrap();

        assert_eq!(document.segments.len(), 1);
        assert!(document.segments[0].words.is_none());
        assert_eq!(transcriber.release_count(), 1);
    }

    #[test]
    fn test_releases_model_on_failure() {
        let dir = TempDir::new().unwrap();
        let loader = MockAudioLoader::new();
        let mut ctx = context_with_audio(&dir, &loader);
        let transcriber = MockTranscriber::new("large-v3").with_failure();

        let result = run(&mut ctx, &transcriber, &ExecutionOptions::default(), &NullSink);

        assert!(result.is_err());
        assert_eq!(transcriber.release_count(), 1);
    }

    #[test]
    fn test_language_hint_forwarded() {
        let dir = TempDir::new().unwrap();
        let loader = MockAudioLoader::new();
        let mut ctx = context_with_audio(&dir, &loader);
        let transcriber = MockTranscriber::new("large-v3").with_language(Some("en"));

        let options = ExecutionOptions {
            language: Some("ru".to_string()),
            ..ExecutionOptions::default()
        };
        let document = run(&mut ctx, &transcriber, &options, &NullSink).unwrap();

        assert_eq!(document.language.as_deref(), Some("ru"));
    }
}
