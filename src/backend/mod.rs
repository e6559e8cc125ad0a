//! Collaborator seams for the external model services.
//!
//! The pipeline never loads models itself: transcription, alignment and
//! diarization are opaque collaborators behind these traits, with mock
//! implementations for tests and dry runs.

pub mod aligner;
pub mod audio;
pub mod diarizer;
pub mod transcriber;

pub use aligner::{Aligner, MockAligner};
pub use audio::{AudioBuffer, AudioLoader, MockAudioLoader};
pub use diarizer::{Diarizer, MockDiarizer, SpeakerTurn};
pub use transcriber::{MockTranscriber, Transcriber};

/// A collaborator holding transient model resources (weights, device
/// memory) that must be released after use.
pub trait ModelResource {
    /// Releases transient model resources. Idempotent.
    fn release(&self);
}

/// Releases a collaborator's model resources on drop, so a stage frees
/// device memory whether its invocation succeeded or failed.
pub(crate) struct ReleaseGuard<'a>(pub &'a dyn ModelResource);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResource(AtomicUsize);

    impl ModelResource for CountingResource {
        fn release(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_release_guard_fires_on_drop() {
        let resource = CountingResource(AtomicUsize::new(0));
        {
            let _guard = ReleaseGuard(&resource);
        }
        assert_eq!(resource.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_guard_fires_on_early_return() {
        fn failing(resource: &CountingResource) -> crate::error::Result<()> {
            let _guard = ReleaseGuard(resource);
            Err(crate::error::ScrybeError::Other("boom".to_string()))
        }

        let resource = CountingResource(AtomicUsize::new(0));
        assert!(failing(&resource).is_err());
        assert_eq!(resource.0.load(Ordering::SeqCst), 1);
    }
}
