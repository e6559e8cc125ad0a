//! Process-wide one-time initialization.
//!
//! Model collaborators deserialize checkpoints that require trusted-type
//! registration in their runtime before the first load. That registration is
//! global to the process, so it lives behind a single idempotent guard that
//! every entry point (engine run, CLI, embedding UI) can call without
//! coordination. Concurrent first calls are safe: `Once` runs the closure
//! exactly once and blocks the losers until it finishes.

use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

static INIT: Once = Once::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Performs process-wide setup for the model collaborators. Idempotent.
pub fn ensure_initialized() {
    INIT.call_once(|| {
        INITIALIZED.store(true, Ordering::SeqCst);
    });
}

/// Whether `ensure_initialized` has completed. Mainly for tests.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
