//! Export stage: pure rendering of a document into the final transcript.

use crate::defaults;
use crate::document::Transcript;
use crate::error::{Result, ScrybeError};
use std::fs;
use std::path::{Path, PathBuf};

/// Formats seconds as `HH:MM:SS`, truncating fractional seconds.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Renders a document as the line-oriented human-readable transcript.
///
/// One `[HH:MM:SS - HH:MM:SS] SPEAKER: text` line per segment; segments
/// whose trimmed text is empty are dropped entirely, not emitted as blank
/// lines. Input order is preserved.
pub fn render(document: &Transcript) -> String {
    let lines: Vec<String> = document
        .segments
        .iter()
        .filter_map(|segment| {
            let text = segment.text.trim();
            if text.is_empty() {
                return None;
            }
            let speaker = segment
                .speaker
                .as_deref()
                .unwrap_or(defaults::SPEAKER_PLACEHOLDER);
            Some(format!(
                "[{} - {}] {}: {}",
                format_timestamp(segment.start),
                format_timestamp(segment.end),
                speaker,
                text
            ))
        })
        .collect();

    lines.join("\n")
}

/// Renders a document and writes it to `path`, returning the line count.
pub fn write_transcript(document: &Transcript, path: &Path) -> Result<usize> {
    let rendered = render(document);
    let line_count = if rendered.is_empty() {
        0
    } else {
        rendered.lines().count()
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rendered)?;
    Ok(line_count)
}

/// Re-renders an existing checkpoint JSON into `transcript.txt` next to the
/// canonical audio (two levels above the `.cache` directory), without
/// running the pipeline.
pub fn format_checkpoint(checkpoint: &Path) -> Result<PathBuf> {
    if !checkpoint.is_file() {
        return Err(ScrybeError::InputNotFound {
            path: checkpoint.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(checkpoint)?;
    let document: Transcript =
        serde_json::from_str(&contents).map_err(|e| ScrybeError::CorruptCheckpoint {
            path: checkpoint.to_path_buf(),
            message: e.to_string(),
        })?;

    let output = checkpoint
        .parent()
        .and_then(Path::parent)
        .map(|run_dir| run_dir.join(defaults::TRANSCRIPT_FILE))
        .unwrap_or_else(|| PathBuf::from(defaults::TRANSCRIPT_FILE));

    write_transcript(&document, &output)?;
    Ok(output)
}
