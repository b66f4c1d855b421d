//! JSON export: a pretty-printed array of entry records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ProfilerExporter, ensure_parent_dir};
use crate::entry::ProfilerEntry;
use crate::error::ProfilerError;

/// Serialized form of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Section name.
    pub kind: String,
    /// Start timestamp in milliseconds.
    pub start_time: u64,
    /// End timestamp in milliseconds.
    pub end_time: u64,
    /// Duration in milliseconds.
    pub delta_time: u64,
}

impl EntryRecord {
    /// Capture the timing fields of any entry.
    pub fn from_entry(entry: &dyn ProfilerEntry) -> Self {
        Self {
            kind: entry.kind().to_string(),
            start_time: entry.start_time(),
            end_time: entry.end_time(),
            delta_time: entry.delta_time(),
        }
    }
}

/// Writes entries to a JSON file, truncating it on every export.
#[derive(Debug, Clone)]
pub struct JsonProfilerExporter {
    path: PathBuf,
}

impl JsonProfilerExporter {
    /// Export to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfilerExporter for JsonProfilerExporter {
    fn export(&self, entries: &[Arc<dyn ProfilerEntry>]) -> Result<(), ProfilerError> {
        let records: Vec<EntryRecord> = entries
            .iter()
            .map(|e| EntryRecord::from_entry(&**e))
            .collect();

        ensure_parent_dir(&self.path)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        log::debug!(
            "exported {} profiler entries to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
