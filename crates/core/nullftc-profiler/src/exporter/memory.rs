//! In-memory export, for tests and on-robot inspection.

use std::sync::{Arc, Mutex};

use super::ProfilerExporter;
use crate::entry::ProfilerEntry;
use crate::error::ProfilerError;

/// Keeps the most recent snapshot and counts exports.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last: Vec<Arc<dyn ProfilerEntry>>,
    exports: usize,
}

impl MemoryExporter {
    /// Create an empty exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries from the latest export.
    pub fn last_snapshot(&self) -> Vec<Arc<dyn ProfilerEntry>> {
        self.lock().last.clone()
    }

    /// Number of exports received so far.
    pub fn export_count(&self) -> usize {
        self.lock().exports
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProfilerExporter for MemoryExporter {
    fn export(&self, entries: &[Arc<dyn ProfilerEntry>]) -> Result<(), ProfilerError> {
        let mut state = self.lock();
        state.last = entries.to_vec();
        state.exports += 1;
        Ok(())
    }
}
