//! Audio preparation stage.
//!
//! Idempotent: if the canonical audio file already exists the stage is a
//! no-op, which is what makes re-invoking the engine after an interruption
//! cheap.

use crate::error::Result;
use crate::events::EventSink;
use crate::media::{AudioConverter, CommandExecutor, InputKind};
use crate::store::RunPaths;
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures the canonical audio file for the run exists, converting or
/// copying the input as its kind requires. Returns the canonical path.
pub fn run(
    input: &Path,
    paths: &RunPaths,
    executor: &dyn CommandExecutor,
    ffmpeg_override: Option<&Path>,
    events: &dyn EventSink,
) -> Result<PathBuf> {
    let audio_file = paths.audio_file();

    if audio_file.exists() {
        events.log(&format!("Audio file already exists: {}", audio_file.display()));
        return Ok(audio_file);
    }

    // Classify before touching the filesystem so an unsupported input
    // fails without leaving an empty run directory behind.
    let kind = InputKind::classify(input)?;
    fs::create_dir_all(paths.output_dir())?;

    match kind {
        InputKind::Mp3 => {
            events.log(&format!("Detected MP3 file. Copying to: {}", audio_file.display()));
            fs::copy(input, &audio_file)?;
        }
        InputKind::Wav => {
            events.log("Detected WAV file. Converting to MP3...");
            let converter = AudioConverter::new(executor, ffmpeg_override);
            converter.convert(input, &audio_file)?;
            events.log("Audio conversion completed.");
        }
        InputKind::Mp4 | InputKind::Mkv => {
            events.log(&format!(
                "Detected video file ({}). Converting to MP3...",
                if kind == InputKind::Mp4 { ".mp4" } else { ".mkv" }
            ));
            let converter = AudioConverter::new(executor, ffmpeg_override);
            converter.convert(input, &audio_file)?;
            events.log("Audio conversion completed.");
        }
    }

    Ok(audio_file)
}
