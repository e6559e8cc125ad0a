//! Input classification and the audio-conversion collaborator.
//!
//! Conversion is an external command with a fixed contract:
//! `<ffmpeg> -i <input> -vn -acodec libmp3lame -q:a 2 <output>`, exit code 0
//! required, stderr captured for diagnostics. The command runs behind a
//! `CommandExecutor` seam so tests never shell out.

use crate::defaults;
use crate::error::{Result, ScrybeError};
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

/// Supported input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Compressed audio, copied verbatim to the canonical file.
    Mp3,
    /// Native audio, transcoded to the canonical format.
    Wav,
    /// Container video, demuxed and transcoded.
    Mp4,
    /// Container video, demuxed and transcoded.
    Mkv,
}

impl InputKind {
    /// Classifies an input path by extension (case-insensitive).
    ///
    /// Unknown extensions are a fatal, reported error, not a retry case.
    pub fn classify(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        match extension.as_str() {
            ".mp3" => Ok(InputKind::Mp3),
            ".wav" => Ok(InputKind::Wav),
            ".mp4" => Ok(InputKind::Mp4),
            ".mkv" => Ok(InputKind::Mkv),
            _ => Err(ScrybeError::UnsupportedInputKind { extension }),
        }
    }

    /// True when the conversion tool is needed (everything except mp3 copy).
    pub fn requires_conversion(self) -> bool {
        !matches!(self, InputKind::Mp3)
    }

    /// True for container/video kinds.
    pub fn is_video(self) -> bool {
        matches!(self, InputKind::Mp4 | InputKind::Mkv)
    }
}

/// Trait for executing external commands.
///
/// Allows swapping the real process spawn for a mock in tests.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success. A missing executable
    /// maps to `ConversionToolMissing`; a non-zero exit maps to
    /// `ConversionFailed` carrying the command's stderr.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScrybeError::ConversionToolMissing {
                    tool: command.to_string(),
                }
            } else {
                ScrybeError::ConversionFailed {
                    diagnostic: format!("failed to launch {command}: {e}"),
                }
            }
        })?;

        if !output.status.success() {
            return Err(ScrybeError::ConversionFailed {
                diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The audio-conversion collaborator.
pub struct AudioConverter<'a> {
    executor: &'a dyn CommandExecutor,
    tool: String,
}

impl<'a> AudioConverter<'a> {
    /// Creates a converter with an optional executable override.
    pub fn new(executor: &'a dyn CommandExecutor, tool_override: Option<&Path>) -> Self {
        let tool = tool_override
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| defaults::FFMPEG_TOOL.to_string());
        Self { executor, tool }
    }

    /// Demuxes/transcodes `input` into the canonical compressed audio file.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let args = [
            "-i",
            input.as_ref(),
            "-vn",
            "-acodec",
            defaults::AUDIO_CODEC,
            "-q:a",
            "2",
            output.as_ref(),
        ];
        self.executor.execute(&self.tool, &args)?;
        Ok(())
    }
}

/// Recording command executor for tests and dry runs.
///
/// Captures every invocation and, on success, creates the output file the
/// real tool would have produced (the last argument of the conversion
/// contract).
#[derive(Debug, Default)]
pub struct MockCommandExecutor {
    invocations: Mutex<Vec<(String, Vec<String>)>>,
    failure: Option<MockFailure>,
}

/// Failure modes a `MockCommandExecutor` can simulate.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// The executable is not installed.
    ToolMissing,
    /// The tool ran and exited non-zero with this stderr text.
    NonZeroExit(String),
}

impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail in a specific way.
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Commands executed so far, as (command, args) pairs.
    pub fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((command.to_string(), args.iter().map(|s| s.to_string()).collect()));

        match &self.failure {
            Some(MockFailure::ToolMissing) => Err(ScrybeError::ConversionToolMissing {
                tool: command.to_string(),
            }),
            Some(MockFailure::NonZeroExit(stderr)) => Err(ScrybeError::ConversionFailed {
                diagnostic: stderr.clone(),
            }),
            None => {
                if let Some(output) = args.last() {
                    std::fs::write(output, b"mock audio")?;
                }
                Ok(String::new())
            }
        }
    }
}
