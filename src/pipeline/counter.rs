//! Work Counter shared between the write aggregator and the progress reporter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Expected-versus-completed write tracker.
///
/// `total` is fixed before the walk starts; completions are recorded by the
/// aggregating loop and read by the progress reporter. Clones share state.
#[derive(Debug, Clone)]
pub struct WorkCounter {
    total: usize,
    completed: Arc<AtomicUsize>,
}

impl WorkCounter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Writes still expected. Saturates at zero when the walk finds more
    /// files than `total` predicted.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed())
    }

    /// Completions beyond `total`.
    pub fn overflow(&self) -> usize {
        self.completed().saturating_sub(self.total)
    }

    /// Records one successful write and returns the new completion count.
    pub fn record_completion(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }
}
