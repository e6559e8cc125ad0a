//! Command-line interface for scrybe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Transcribe media files into speaker-attributed transcripts
#[derive(Parser, Debug)]
#[command(
    name = "scrybe",
    version,
    about = "Staged, resumable media transcription"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Model backend to drive the run with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Deterministic in-process stand-ins (no model downloads)
    Mock,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline on a media file, resuming from checkpoints
    Run {
        /// Input media file (.mp3, .wav, .mp4, .mkv)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Whisper model identifier (default: large-v3)
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,

        /// Inference device (default: cuda). Examples: cuda, cpu
        #[arg(long, value_name = "DEVICE")]
        device: Option<String>,

        /// Numeric precision for inference (default: float16)
        #[arg(long, value_name = "TYPE")]
        compute_type: Option<String>,

        /// Language code for transcription (default: auto-detect). Examples: en, de, ru
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Transcription batch size
        #[arg(long, value_name = "N")]
        batch_size: Option<u32>,

        /// Skip speaker diarization entirely
        #[arg(long)]
        no_diarize: bool,

        /// Hugging Face token for the diarization model
        #[arg(long, value_name = "TOKEN")]
        hf_token: Option<String>,

        /// Root directory for run outputs (default: data)
        #[arg(long, value_name = "DIR")]
        output_root: Option<PathBuf>,

        /// Path to the ffmpeg executable (default: resolve from PATH)
        #[arg(long, value_name = "PATH")]
        ffmpeg: Option<PathBuf>,

        /// Model backend
        #[arg(long, value_enum, default_value = "mock")]
        backend: Backend,
    },

    /// Delete cached checkpoints and prepared audio for an input
    Clear {
        /// Input media file whose cache should be removed
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Root directory for run outputs (default: data)
        #[arg(long, value_name = "DIR")]
        output_root: Option<PathBuf>,
    },

    /// Re-render a checkpoint JSON into transcript.txt without running models
    Format {
        /// Checkpoint file (e.g. data/clip/.cache/diarized.json)
        #[arg(value_name = "FILE")]
        checkpoint: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_parses_with_defaults() {
        let cli = Cli::try_parse_from(["scrybe", "run", "clip.mp4"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                no_diarize,
                backend,
                ..
            } => {
                assert_eq!(input, PathBuf::from("clip.mp4"));
                assert!(!no_diarize);
                assert_eq!(backend, Backend::Mock);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_run_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "scrybe",
            "run",
            "clip.mkv",
            "--model",
            "medium",
            "--language",
            "de",
            "--batch-size",
            "8",
            "--no-diarize",
            "--output-root",
            "/tmp/out",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                model,
                language,
                batch_size,
                no_diarize,
                output_root,
                ..
            } => {
                assert_eq!(model.as_deref(), Some("medium"));
                assert_eq!(language.as_deref(), Some("de"));
                assert_eq!(batch_size, Some(8));
                assert!(no_diarize);
                assert_eq!(output_root, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_and_format_parse() {
        let cli = Cli::try_parse_from(["scrybe", "clear", "clip.mp3"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { .. }));

        let cli =
            Cli::try_parse_from(["scrybe", "format", "data/clip/.cache/aligned.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Format { .. }));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["scrybe"]).is_err());
    }
}
