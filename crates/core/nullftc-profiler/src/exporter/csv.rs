//! CSV export.
//!
//! Layout (one header line, one line per entry, `\n` line endings):
//!
//! ```text
//! Type,Start Time,End Time,Delta Time (ms)
//! drive,1718000000000,1718000000012,12
//! ```
//!
//! Cells holding a comma, a double quote or a line break are quoted with
//! embedded quotes doubled. Every other cell is written verbatim.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{ProfilerExporter, ensure_parent_dir};
use crate::entry::ProfilerEntry;
use crate::error::ProfilerError;

/// Header line written at the top of every CSV export.
pub const CSV_HEADER: &str = "Type,Start Time,End Time,Delta Time (ms)";

/// Default number of rows written between flushes.
pub const DEFAULT_FLUSH_INTERVAL: usize = 1000;

/// Writes entries to a CSV file, truncating it on every export.
#[derive(Debug, Clone)]
pub struct CsvProfilerExporter {
    path: PathBuf,
    flush_interval: usize,
}

impl CsvProfilerExporter {
    /// Export to `path`, flushing every [`DEFAULT_FLUSH_INTERVAL`] rows.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    /// Flush the writer every `rows` rows. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_flush_interval(mut self, rows: usize) -> Self {
        self.flush_interval = rows.max(1);
        self
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and `entries` to `out`.
    ///
    /// Split out from [`ProfilerExporter::export`] so the layout can be
    /// written to any sink.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        entries: &[Arc<dyn ProfilerEntry>],
    ) -> Result<(), ProfilerError> {
        out.write_all(CSV_HEADER.as_bytes())?;
        out.write_all(b"\n")?;

        for (count, entry) in entries.iter().enumerate() {
            out.write_all(format_row(&entry.csv_row()).as_bytes())?;
            out.write_all(b"\n")?;

            if (count + 1) % self.flush_interval == 0 {
                out.flush()?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl ProfilerExporter for CsvProfilerExporter {
    fn export(&self, entries: &[Arc<dyn ProfilerEntry>]) -> Result<(), ProfilerError> {
        ensure_parent_dir(&self.path)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        self.write_to(&mut writer, entries)?;
        log::debug!(
            "exported {} profiler entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Join cells into one CSV line (without the trailing newline).
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|cell| escape_cell(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote a cell if it would otherwise break the row.
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}
