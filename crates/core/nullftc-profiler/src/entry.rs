//! Profiled sections and the factories that create them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One completed, timed section.
///
/// Implementors decide how the section is rendered as a CSV row, which lets
/// robot code attach extra columns (battery voltage, loop count, ...) by
/// supplying its own [`ProfilerEntryFactory`].
pub trait ProfilerEntry: Send + Sync + fmt::Debug {
    /// Section name passed to `start`/`end`.
    fn kind(&self) -> &str;

    /// Start timestamp in milliseconds.
    fn start_time(&self) -> u64;

    /// End timestamp in milliseconds.
    fn end_time(&self) -> u64;

    /// Section duration in milliseconds. Zero if the clock went backwards.
    fn delta_time(&self) -> u64 {
        self.end_time().saturating_sub(self.start_time())
    }

    /// Cells of the CSV row for this entry.
    fn csv_row(&self) -> Vec<String>;
}

impl<T: ProfilerEntry + ?Sized> ProfilerEntry for Arc<T> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn start_time(&self) -> u64 {
        (**self).start_time()
    }

    fn end_time(&self) -> u64 {
        (**self).end_time()
    }

    fn delta_time(&self) -> u64 {
        (**self).delta_time()
    }

    fn csv_row(&self) -> Vec<String> {
        (**self).csv_row()
    }
}

/// The default entry: name, start, end and delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicProfilerEntry {
    /// Section name.
    pub kind: String,
    /// Start timestamp in milliseconds.
    pub start_time: u64,
    /// End timestamp in milliseconds.
    pub end_time: u64,
}

impl BasicProfilerEntry {
    /// Create an entry for `kind` spanning `start..end`.
    pub fn new(kind: impl Into<String>, start_time: u64, end_time: u64) -> Self {
        Self {
            kind: kind.into(),
            start_time,
            end_time,
        }
    }
}

impl ProfilerEntry for BasicProfilerEntry {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn start_time(&self) -> u64 {
        self.start_time
    }

    fn end_time(&self) -> u64 {
        self.end_time
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.kind.clone(),
            self.start_time.to_string(),
            self.end_time.to_string(),
            self.delta_time().to_string(),
        ]
    }
}

/// Builds entries when a section ends.
pub trait ProfilerEntryFactory: Send + Sync {
    /// Create the entry for a section that ran from `start` to `end`.
    fn create(&self, kind: &str, start: u64, end: u64) -> Arc<dyn ProfilerEntry>;
}

impl<F> ProfilerEntryFactory for F
where
    F: Fn(&str, u64, u64) -> Arc<dyn ProfilerEntry> + Send + Sync,
{
    fn create(&self, kind: &str, start: u64, end: u64) -> Arc<dyn ProfilerEntry> {
        self(kind, start, end)
    }
}

/// Factory producing [`BasicProfilerEntry`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicProfilerEntryFactory;

impl ProfilerEntryFactory for BasicProfilerEntryFactory {
    fn create(&self, kind: &str, start: u64, end: u64) -> Arc<dyn ProfilerEntry> {
        Arc::new(BasicProfilerEntry::new(kind, start, end))
    }
}
