//! Destinations for profile snapshots.
//!
//! The profiler never formats data itself. On every export it hands the
//! full list of recorded entries to a [`ProfilerExporter`]; file-backed
//! exporters rewrite their target each time so the file always holds the
//! latest complete snapshot.

pub mod csv;
pub mod json;
pub mod memory;

use std::fs;
use std::path::Path;
use std::sync::Arc;

pub use csv::CsvProfilerExporter;
pub use json::JsonProfilerExporter;
pub use memory::MemoryExporter;

use crate::entry::ProfilerEntry;
use crate::error::ProfilerError;

/// Writes a snapshot of profiler entries somewhere.
pub trait ProfilerExporter: Send + Sync {
    /// Export `entries`, replacing whatever a previous export produced.
    fn export(&self, entries: &[Arc<dyn ProfilerEntry>]) -> Result<(), ProfilerError>;
}

/// Create the parent directory of `path` if it does not exist yet.
fn ensure_parent_dir(path: &Path) -> Result<(), ProfilerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
