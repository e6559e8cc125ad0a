//! On-disk layout and checkpoint persistence for one pipeline run.
//!
//! A run's identity is the input file's base name: `clip.mkv` and `clip.mp3`
//! both map to `<output_root>/clip/`, no matter which stage last wrote there.
//! Checkpoints are whole-document JSON files; a reader never observes a
//! partially written one because saves go through a temporary file and a
//! rename.

use crate::defaults;
use crate::document::{Stage, Transcript};
use crate::error::{Result, ScrybeError};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem layout of a single run, derived from the input file name.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    run_id: String,
    output_dir: PathBuf,
    cache_dir: PathBuf,
}

impl RunPaths {
    /// Derives the run layout from an input path and output root.
    ///
    /// Only the input's base name matters; its directory and extension do not.
    pub fn for_input(input: &Path, output_root: &Path) -> Self {
        let run_id = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "run".to_string());
        let output_dir = output_root.join(&run_id);
        let cache_dir = output_dir.join(defaults::CACHE_DIR);
        Self {
            run_id,
            output_dir,
            cache_dir,
        }
    }

    /// Run identity (the input file's base name).
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Directory holding all outputs of this run.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Canonical audio file for this run.
    pub fn audio_file(&self) -> PathBuf {
        self.output_dir.join(defaults::CANONICAL_AUDIO)
    }

    /// Exported transcript file for this run.
    pub fn transcript_file(&self) -> PathBuf {
        self.output_dir.join(defaults::TRANSCRIPT_FILE)
    }

    /// Checkpoint file for a stage.
    pub fn checkpoint(&self, stage: Stage) -> PathBuf {
        self.cache_dir.join(stage.file_name())
    }

    /// Creates the output and cache directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }
}

/// Persists and restores per-stage checkpoints for one run.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: RunPaths,
}

impl ArtifactStore {
    pub fn new(paths: RunPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    /// Loads the most complete cached document, probing diarized → aligned →
    /// transcribed, together with the stage that produced it.
    ///
    /// Returns `None` when no checkpoint exists. Deleting a later-stage
    /// checkpoint by hand makes the run fall back to the earlier one on the
    /// next invocation. Malformed JSON at a probed path is fatal and names
    /// the offending file.
    pub fn load_most_complete(&self) -> Result<Option<(Transcript, Stage)>> {
        for stage in Stage::MOST_COMPLETE_FIRST {
            let path = self.paths.checkpoint(stage);
            if !path.is_file() {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            let document =
                serde_json::from_str(&contents).map_err(|e| ScrybeError::CorruptCheckpoint {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            return Ok(Some((document, stage)));
        }
        Ok(None)
    }

    /// Atomically writes a stage checkpoint, replacing any previous document.
    ///
    /// The document is serialized with stable two-space indentation and
    /// unescaped unicode, written to a sibling temporary file and renamed
    /// into place.
    pub fn save(&self, stage: Stage, document: &Transcript) -> Result<PathBuf> {
        self.paths.ensure_dirs()?;
        let path = self.paths.checkpoint(stage);
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| ScrybeError::Other(format!("failed to serialize checkpoint: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(path)
    }

    /// Removes the checkpoint directory and any canonical audio files.
    ///
    /// Idempotent: returns whether anything existed to delete.
    pub fn clear(&self) -> Result<bool> {
        let output_dir = self.paths.output_dir();
        if !output_dir.exists() {
            return Ok(false);
        }

        let mut cleared = false;

        let cache_dir = output_dir.join(defaults::CACHE_DIR);
        if cache_dir.exists() {
            fs::remove_dir_all(&cache_dir)?;
            cleared = true;
        }

        // Remove audio.* files (the canonical audio, whatever its extension)
        for entry in fs::read_dir(output_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("audio.") && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                cleared = true;
            }
        }

        Ok(cleared)
    }
}
