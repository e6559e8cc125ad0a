//! Default configuration constants for scrybe.
//!
//! Shared constants used across the options layer, the artifact store and the
//! stage executors, kept in one place to avoid drift.

/// Default Whisper model identifier.
///
/// "large-v3" gives the best multilingual accuracy; smaller models trade
/// accuracy for speed and VRAM.
pub const DEFAULT_MODEL: &str = "large-v3";

/// Default device target for model collaborators.
pub const DEFAULT_DEVICE: &str = "cuda";

/// Default compute precision for model collaborators.
pub const DEFAULT_COMPUTE_TYPE: &str = "float16";

/// Default transcription batch size.
pub const DEFAULT_BATCH_SIZE: u32 = 4;

/// Default output root directory, relative to the working directory.
pub const DEFAULT_OUTPUT_ROOT: &str = "data";

/// Audio conversion executable used when no override is configured.
pub const FFMPEG_TOOL: &str = "ffmpeg";

/// Audio codec passed to the conversion tool.
pub const AUDIO_CODEC: &str = "libmp3lame";

/// File name of the canonical per-run audio file.
pub const CANONICAL_AUDIO: &str = "audio.mp3";

/// Name of the per-run checkpoint directory.
pub const CACHE_DIR: &str = ".cache";

/// File name of the exported transcript.
pub const TRANSCRIPT_FILE: &str = "transcript.txt";

/// Speaker label used when a segment carries no speaker attribution.
pub const SPEAKER_PLACEHOLDER: &str = "SPEAKER_??";

/// Fallback alignment language when neither detection nor configuration
/// provides one.
pub const FALLBACK_LANGUAGE: &str = "en";
