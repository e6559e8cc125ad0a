//! scrybe - Staged media transcription pipeline
//!
//! Converts audio/video files into speaker-attributed transcripts through a
//! checkpointed pipeline: audio preparation, transcription, word alignment,
//! diarization, export. Every stage persists its result, so an interrupted
//! run resumes where it left off.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod backend;
pub mod cli;
pub mod defaults;
pub mod document;
pub mod engine;
pub mod error;
pub mod events;
pub mod media;
pub mod options;
pub mod resolver;
pub mod runtime;
pub mod stages;
pub mod store;

// Core data model
pub use document::{Segment, Stage, Transcript, WordSpan};

// Collaborator seams
pub use backend::{Aligner, AudioBuffer, AudioLoader, Diarizer, SpeakerTurn, Transcriber};
pub use media::{CommandExecutor, SystemCommandExecutor};

// Engine
pub use engine::{Collaborators, PipelineEngine, RunHandle, RunResult, clear_cache};
pub use events::{EventSink, PipelineEvent};
pub use store::{ArtifactStore, RunPaths};

// Error handling
pub use error::{Result, ScrybeError};

// Config
pub use options::ExecutionOptions;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
