//! Execution options for a pipeline run.
//!
//! Options are captured once at run start and never mutated during execution.
//! They can be loaded from a TOML file, overridden from the environment, and
//! finally adjusted by the caller (CLI flags, UI fields) before the run.

use crate::defaults;
use crate::error::{Result, ScrybeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable configuration snapshot for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutionOptions {
    /// Whisper model identifier (e.g. "large-v3", "medium", "base").
    pub model: String,
    /// Device target for model collaborators ("cuda" or "cpu").
    pub device: String,
    /// Compute precision ("float16", "int8", "float32").
    pub compute_type: String,
    /// Language hint; `None` means auto-detect.
    pub language: Option<String>,
    /// Batch size for transcription.
    pub batch_size: u32,
    /// Whether speaker diarization is requested.
    pub diarize: bool,
    /// Diarization credential (HuggingFace token). Absent or blank means
    /// diarization is skipped with a warning.
    pub hf_token: Option<String>,
    /// Root directory under which per-run output directories are created.
    pub output_root: PathBuf,
    /// Audio conversion executable override; `None` uses the system ffmpeg.
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            device: defaults::DEFAULT_DEVICE.to_string(),
            compute_type: defaults::DEFAULT_COMPUTE_TYPE.to_string(),
            language: None,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            diarize: true,
            hf_token: None,
            output_root: PathBuf::from(defaults::DEFAULT_OUTPUT_ROOT),
            ffmpeg_path: None,
        }
    }
}

impl ExecutionOptions {
    /// Load options from a TOML file.
    ///
    /// Missing fields use default values; invalid TOML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let options: ExecutionOptions = toml::from_str(&contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a file, or return defaults if the file is missing.
    ///
    /// Only a missing file falls back to defaults; invalid TOML still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let options: ExecutionOptions = toml::from_str(&contents)?;
                options.validate()?;
                Ok(options)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - SCRYBE_MODEL → model
    /// - SCRYBE_DEVICE → device
    /// - SCRYBE_LANGUAGE → language
    /// - SCRYBE_HF_TOKEN → hf_token
    /// - SCRYBE_OUTPUT_ROOT → output_root
    /// - SCRYBE_FFMPEG → ffmpeg_path
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("SCRYBE_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(device) = std::env::var("SCRYBE_DEVICE")
            && !device.is_empty()
        {
            self.device = device;
        }

        if let Ok(language) = std::env::var("SCRYBE_LANGUAGE")
            && !language.is_empty()
        {
            self.language = Some(language);
        }

        if let Ok(token) = std::env::var("SCRYBE_HF_TOKEN")
            && !token.is_empty()
        {
            self.hf_token = Some(token);
        }

        if let Ok(root) = std::env::var("SCRYBE_OUTPUT_ROOT")
            && !root.is_empty()
        {
            self.output_root = PathBuf::from(root);
        }

        if let Ok(ffmpeg) = std::env::var("SCRYBE_FFMPEG")
            && !ffmpeg.is_empty()
        {
            self.ffmpeg_path = Some(PathBuf::from(ffmpeg));
        }

        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ScrybeError::ConfigInvalidValue {
                key: "batch_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The diarization credential, if one is actually usable.
    ///
    /// A blank token counts as absent: diarization degrades gracefully
    /// instead of failing mid-run with an authentication error.
    pub fn diarization_credential(&self) -> Option<&str> {
        self.hf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Get the default configuration file path.
    ///
    /// Returns ~/.config/scrybe/config.toml on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scrybe")
            .join("config.toml")
    }
}
