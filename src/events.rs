//! Progress and log event streaming.
//!
//! Events are ephemeral, fire-and-forget notifications. The engine emits
//! them synchronously from its own thread of control; sinks must not block
//! the producer, which is why the channel sink uses an unbounded sender.

use serde::{Deserialize, Serialize};

/// An event emitted while a pipeline run executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Human-readable log line.
    Log { line: String },
    /// Overall progress, monotonically non-decreasing in [0.0, 1.0].
    Progress { fraction: f32 },
}

/// Consumer-supplied sink for pipeline events.
pub trait EventSink: Send + Sync {
    /// Handle a log line.
    fn log(&self, line: &str);

    /// Handle a progress update.
    fn progress(&self, fraction: f32);
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn log(&self, _line: &str) {}
    fn progress(&self, _fraction: f32) {}
}

/// Sink that prints log lines to stderr with the binary's prefix.
///
/// Progress updates are dropped; the log lines already narrate each stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl EventSink for StderrSink {
    fn log(&self, line: &str) {
        eprintln!("scrybe: {line}");
    }

    fn progress(&self, _fraction: f32) {}
}

/// Sink that forwards events into an unbounded crossbeam channel.
///
/// Sending never blocks the producer; the consumer polls the receiving end
/// with a short timeout to stay responsive.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: crossbeam_channel::Sender<PipelineEvent>,
}

impl ChannelSink {
    /// Creates a sink plus the receiver the consumer polls.
    pub fn new() -> (Self, crossbeam_channel::Receiver<PipelineEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn log(&self, line: &str) {
        // Receiver gone means the consumer stopped listening; keep running.
        let _ = self.tx.send(PipelineEvent::Log {
            line: line.to_string(),
        });
    }

    fn progress(&self, fraction: f32) {
        let _ = self.tx.send(PipelineEvent::Progress { fraction });
    }
}
