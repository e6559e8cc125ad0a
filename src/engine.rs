//! Pipeline engine: sequences the stages, persists checkpoints, streams
//! events, and decides what to re-run by inspecting cached artifact shape.
//!
//! One run executes sequentially on one thread; stages never overlap because
//! each consumes the previous stage's output. `spawn` moves the whole run
//! onto a background thread and hands the caller an event-polling handle, so
//! an interactive front-end is never blocked on model inference.

use crate::backend::{Aligner, AudioLoader, Diarizer, Transcriber};
use crate::document::{Stage, Transcript};
use crate::error::{Result, ScrybeError};
use crate::events::{ChannelSink, EventSink, NullSink, PipelineEvent};
use crate::media::CommandExecutor;
use crate::options::ExecutionOptions;
use crate::resolver;
use crate::runtime;
use crate::stages::{self, ExecutionContext};
use crate::store::{ArtifactStore, RunPaths};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The external collaborators one engine instance drives.
///
/// All are trait objects behind `Arc` so a configured set can be shared
/// between foreground and background runs.
#[derive(Clone)]
pub struct Collaborators {
    pub executor: Arc<dyn CommandExecutor>,
    pub audio_loader: Arc<dyn AudioLoader>,
    pub transcriber: Arc<dyn Transcriber>,
    pub aligner: Arc<dyn Aligner>,
    pub diarizer: Arc<dyn Diarizer>,
}

impl Collaborators {
    /// A fully mocked stack, with the conversion tool still executed for
    /// real. Used by tests and `--backend mock` dry runs.
    pub fn mock() -> Self {
        use crate::backend::{MockAligner, MockAudioLoader, MockDiarizer, MockTranscriber};
        use crate::media::SystemCommandExecutor;

        Self {
            executor: Arc::new(SystemCommandExecutor::new()),
            audio_loader: Arc::new(MockAudioLoader::new()),
            transcriber: Arc::new(MockTranscriber::new("mock")),
            aligner: Arc::new(MockAligner::new()),
            diarizer: Arc::new(MockDiarizer::new()),
        }
    }
}

/// Final record of a completed run; owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub audio_file: PathBuf,
    pub transcribed_json: PathBuf,
    pub aligned_json: PathBuf,
    /// Present only when diarization actually ran (now or in a prior run).
    pub diarized_json: Option<PathBuf>,
    pub transcript_txt: PathBuf,
    /// The final in-memory document.
    pub transcript: Transcript,
}

/// Emits progress as a monotonically non-decreasing fraction, whatever
/// order the milestones are reached in after a resume.
struct ProgressTracker<'a> {
    sink: &'a dyn EventSink,
    last: f32,
}

impl<'a> ProgressTracker<'a> {
    fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink, last: 0.0 }
    }

    fn report(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0).max(self.last);
        self.last = fraction;
        self.sink.progress(fraction);
    }
}

/// Orchestrates one logical pipeline run.
pub struct PipelineEngine {
    options: ExecutionOptions,
    collaborators: Collaborators,
    sink: Arc<dyn EventSink>,
}

impl PipelineEngine {
    /// Creates an engine with no event sink attached.
    pub fn new(options: ExecutionOptions, collaborators: Collaborators) -> Self {
        Self {
            options,
            collaborators,
            sink: Arc::new(NullSink),
        }
    }

    /// Sets the event sink receiving log and progress events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs the pipeline to completion on the calling thread.
    ///
    /// Resumes from the most complete checkpoint; persists after every stage
    /// before advancing; aborts on the first failure without retry (already
    /// persisted checkpoints remain valid for the next invocation).
    pub fn run(&self, input: &Path) -> Result<RunResult> {
        runtime::ensure_initialized();
        self.options.validate()?;

        // Pre-flight: fail before creating any directories.
        if !input.is_file() {
            return Err(ScrybeError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let sink = self.sink.as_ref();
        let mut progress = ProgressTracker::new(sink);
        progress.report(0.0);
        sink.log(&format!("Starting pipeline for: {}", input.display()));

        let paths = RunPaths::for_input(input, &self.options.output_root);
        let store = ArtifactStore::new(paths.clone());

        // --- Stage 1: audio preparation ---
        sink.log("--- Stage 1: Audio Preparation ---");
        progress.report(0.05);
        let audio_file = stages::audio_prep::run(
            input,
            &paths,
            self.collaborators.executor.as_ref(),
            self.options.ffmpeg_path.as_deref(),
            sink,
        )?;
        progress.report(0.10);

        let mut ctx = ExecutionContext::new(audio_file.clone(), self.collaborators.audio_loader.as_ref());

        // --- Resume from cache, most complete first ---
        let cached = store.load_most_complete()?;
        if let Some((_, stage)) = &cached {
            sink.log(&format!(
                "Loading from cache ({}): {}",
                stage,
                paths.checkpoint(*stage).display()
            ));
        }

        let credential = self.options.diarization_credential().map(str::to_string);
        let do_diarize = self.options.diarize && credential.is_some();
        if self.options.diarize && !do_diarize {
            sink.log(
                "[Warning] Diarization requested but no credential provided. \
                 Skipping speaker detection.",
            );
        }

        // --- Stage 2: transcription ---
        let mut document = match cached {
            Some((document, _)) => document,
            None => {
                sink.log("--- Stage 2: Transcription ---");
                sink.log("No cache found. Starting full processing...");
                progress.report(0.15);
                progress.report(0.20);
                let document = stages::transcribe::run(
                    &mut ctx,
                    self.collaborators.transcriber.as_ref(),
                    &self.options,
                    sink,
                )?;
                let path = store.save(Stage::Transcribed, &document)?;
                sink.log(&format!("Saved transcription cache: {}", path.display()));
                document
            }
        };
        progress.report(0.50);

        // --- Stage 3: alignment ---
        if resolver::needs_alignment(&document) {
            sink.log("--- Stage 3: Alignment ---");
            progress.report(0.55);
            document = stages::align::run(
                &mut ctx,
                self.collaborators.aligner.as_ref(),
                &document,
                &self.options,
                sink,
            )?;
            let path = store.save(Stage::Aligned, &document)?;
            sink.log(&format!("Saved alignment cache: {}", path.display()));
        } else {
            sink.log("Alignment already done (loaded from cache).");
        }
        progress.report(0.70);

        // --- Stage 4: diarization ---
        if resolver::needs_diarization(&document, do_diarize) {
            sink.log("--- Stage 4: Diarization ---");
            progress.report(0.75);
            // Checked above: do_diarize implies a credential.
            let credential = credential.as_deref().unwrap_or_default();
            document = stages::diarize::run(
                &mut ctx,
                self.collaborators.diarizer.as_ref(),
                &document,
                credential,
                sink,
            )?;
            let path = store.save(Stage::Diarized, &document)?;
            sink.log(&format!("Saved diarization cache: {}", path.display()));
        } else if do_diarize {
            sink.log("Diarization already done (loaded from cache).");
        }
        progress.report(0.90);

        // --- Stage 5: export ---
        sink.log("--- Stage 5: Export Transcript ---");
        let transcript_txt = paths.transcript_file();
        sink.log(&format!("Exporting transcript to: {}", transcript_txt.display()));
        let line_count = stages::export::write_transcript(&document, &transcript_txt)?;
        sink.log(&format!("Transcript saved: {line_count} segments"));

        progress.report(1.0);
        sink.log("Pipeline completed successfully.");

        let diarized_json = paths.checkpoint(Stage::Diarized);
        Ok(RunResult {
            output_dir: paths.output_dir().to_path_buf(),
            audio_file,
            transcribed_json: paths.checkpoint(Stage::Transcribed),
            aligned_json: paths.checkpoint(Stage::Aligned),
            diarized_json: diarized_json.is_file().then_some(diarized_json),
            transcript_txt,
            transcript: document,
        })
    }

    /// Runs the pipeline on a background thread.
    ///
    /// The returned handle owns the event stream; the caller polls it with a
    /// short timeout and finally joins for the result. Any sink configured
    /// via `with_event_sink` is replaced by the handle's channel.
    pub fn spawn(mut self, input: PathBuf) -> RunHandle {
        let (sink, events) = ChannelSink::new();
        self.sink = Arc::new(sink);

        let thread = thread::spawn(move || self.run(&input));

        RunHandle { events, thread }
    }
}

/// Handle to a pipeline run executing on a background thread.
pub struct RunHandle {
    events: crossbeam_channel::Receiver<PipelineEvent>,
    thread: JoinHandle<Result<RunResult>>,
}

impl RunHandle {
    /// Polls for the next event, waiting at most `timeout`.
    ///
    /// Returns `None` on timeout or once the run has finished and the
    /// stream is drained.
    pub fn poll_event(&self, timeout: Duration) -> Option<PipelineEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// True once the background run has finished (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the run to finish and returns its result.
    ///
    /// Undelivered events are dropped; drain them via `poll_event` first if
    /// they matter.
    pub fn join(self) -> Result<RunResult> {
        match self.thread.join() {
            Ok(result) => result,
            Err(panic_info) => {
                let message = panic_info
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                    .unwrap_or("unknown panic");
                Err(ScrybeError::Other(format!("pipeline thread panicked: {message}")))
            }
        }
    }
}

/// Deletes the checkpoint namespace and prepared audio for an input.
///
/// Returns whether anything existed to delete. Idempotent.
pub fn clear_cache(input: &Path, output_root: &Path) -> Result<bool> {
    let store = ArtifactStore::new(RunPaths::for_input(input, output_root));
    store.clear()
}
