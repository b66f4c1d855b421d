//! Section timing profiler for FTC robot code.
//!
//! Robot code brackets the work it wants to measure with [`Profiler::start`]
//! and [`Profiler::end`] (or a [`ScopeGuard`] from [`Profiler::scope`]). Each
//! completed section becomes a [`ProfilerEntry`] built by the configured
//! [`ProfilerEntryFactory`], and [`Profiler::export`] hands a snapshot of all
//! entries to a [`ProfilerExporter`], optionally on a background worker so
//! the control loop never blocks on storage.
//!
//! ```no_run
//! use std::sync::Arc;
//! use nullftc_profiler::{BasicProfilerEntryFactory, CsvProfilerExporter, Profiler};
//!
//! # fn main() -> Result<(), nullftc_profiler::ProfilerError> {
//! let profiler = Profiler::builder()
//!     .factory(Arc::new(BasicProfilerEntryFactory))
//!     .exporter(Arc::new(CsvProfilerExporter::new("/sdcard/FIRST/profile.csv")))
//!     .build()?;
//!
//! profiler.start("drive");
//! // ... drive loop ...
//! profiler.end("drive");
//!
//! profiler.export()?;
//! profiler.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod exporter;
pub mod guard;
pub mod profiler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ExportFormat, ProfilerConfig};
pub use entry::{BasicProfilerEntry, BasicProfilerEntryFactory, ProfilerEntry, ProfilerEntryFactory};
pub use error::ProfilerError;
pub use exporter::{CsvProfilerExporter, JsonProfilerExporter, MemoryExporter, ProfilerExporter};
pub use guard::ScopeGuard;
pub use profiler::{Profiler, ProfilerBuilder};
