//! Error types for scrybe.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrybeError {
    // Pre-flight errors
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Unsupported input format: {extension}. Expected: .mp4, .mkv, .mp3, .wav")]
    UnsupportedInputKind { extension: String },

    // Audio conversion errors
    #[error("Audio conversion tool not found: {tool}. Please install ffmpeg.")]
    ConversionToolMissing { tool: String },

    #[error("Audio conversion failed: {diagnostic}")]
    ConversionFailed { diagnostic: String },

    // Checkpoint errors
    #[error("Corrupt checkpoint at {path}: {message}")]
    CorruptCheckpoint { path: PathBuf, message: String },

    // Collaborator errors
    #[error("Alignment not supported for language '{language}'")]
    AlignmentUnsupported { language: String },

    #[error("{stage} failed: {message}")]
    Collaborator { stage: &'static str, message: String },

    // Configuration errors
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScrybeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_input_not_found_display() {
        let error = ScrybeError::InputNotFound {
            path: PathBuf::from("/videos/missing.mkv"),
        };
        assert_eq!(
            error.to_string(),
            "Input file not found: /videos/missing.mkv"
        );
    }

    #[test]
    fn test_unsupported_input_kind_display() {
        let error = ScrybeError::UnsupportedInputKind {
            extension: ".flac".to_string(),
        };
        assert!(error.to_string().contains(".flac"));
        assert!(error.to_string().contains(".mkv"));
    }

    #[test]
    fn test_conversion_tool_missing_display() {
        let error = ScrybeError::ConversionToolMissing {
            tool: "ffmpeg".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Audio conversion tool not found: ffmpeg. Please install ffmpeg."
        );
    }

    #[test]
    fn test_conversion_failed_display() {
        let error = ScrybeError::ConversionFailed {
            diagnostic: "Invalid data found when processing input".to_string(),
        };
        assert!(error.to_string().contains("Invalid data found"));
    }

    #[test]
    fn test_corrupt_checkpoint_names_path() {
        let error = ScrybeError::CorruptCheckpoint {
            path: PathBuf::from("data/clip/.cache/aligned.json"),
            message: "EOF while parsing an object".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("data/clip/.cache/aligned.json"));
        assert!(text.contains("EOF while parsing"));
    }

    #[test]
    fn test_alignment_unsupported_display() {
        let error = ScrybeError::AlignmentUnsupported {
            language: "xx".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Alignment not supported for language 'xx'"
        );
    }

    #[test]
    fn test_collaborator_display_includes_stage() {
        let error = ScrybeError::Collaborator {
            stage: "transcription",
            message: "out of memory".to_string(),
        };
        assert_eq!(error.to_string(), "transcription failed: out of memory");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ScrybeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: ScrybeError = toml_error.into();
        assert!(error.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ScrybeError>();
        assert_sync::<ScrybeError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
