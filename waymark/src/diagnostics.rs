//! Hook for failures the router absorbs instead of propagating.

use std::sync::atomic::{AtomicUsize, Ordering};

use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::InteractionError;

/// Receives errors that were suppressed by the routing core.
///
/// Teardown (removing subscriptions from a surface that may already be gone), subscription and hit-testing failures
/// never interrupt event handling. They are handed to this hook and otherwise ignored.
pub trait Diagnostics: MaybeSend + MaybeSync {
    /// Called once for every suppressed error.
    fn suppressed(&self, error: &InteractionError);
}

impl<T> Diagnostics for T
where
    T: Fn(&InteractionError) + MaybeSend + MaybeSync,
{
    fn suppressed(&self, error: &InteractionError) {
        self(error)
    }
}

/// Default diagnostics: writes a warning to the log and counts suppressed errors.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    suppressed: AtomicUsize,
}

impl LogDiagnostics {
    /// Creates a new instance with zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors suppressed so far.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.load(Ordering::Relaxed)
    }
}

impl Diagnostics for LogDiagnostics {
    fn suppressed(&self, error: &InteractionError) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
        log::warn!("Suppressed interaction error: {error}");
    }
}
