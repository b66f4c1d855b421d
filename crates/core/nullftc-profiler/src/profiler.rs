//! The profiler itself: section timers, recorded entries and export.
//!
//! A single mutex guards both the running timers and the recorded entries.
//! Clock reads and entry construction happen outside the lock so that
//! recording from several threads stays cheap. Asynchronous exports go to
//! one dedicated worker thread that processes snapshots in FIFO order.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::clock::{Clock, SystemClock};
use crate::config::{ExportFormat, ProfilerConfig};
use crate::entry::{BasicProfilerEntryFactory, ProfilerEntry, ProfilerEntryFactory};
use crate::error::ProfilerError;
use crate::exporter::{CsvProfilerExporter, JsonProfilerExporter, ProfilerExporter};
use crate::guard::ScopeGuard;

/// A snapshot of recorded entries handed to the exporter.
type Snapshot = Vec<Arc<dyn ProfilerEntry>>;

/// Mutable profiler state.
#[derive(Default)]
struct State {
    /// Completed sections, in completion order.
    entries: Vec<Arc<dyn ProfilerEntry>>,
    /// Running sections: name to start timestamp.
    active: HashMap<String, u64>,
}

/// Background thread running queued exports.
struct ExportWorker {
    sender: Sender<Snapshot>,
    handle: JoinHandle<()>,
}

impl ExportWorker {
    fn spawn(exporter: Arc<dyn ProfilerExporter>) -> Result<Self, ProfilerError> {
        let (sender, receiver) = mpsc::channel::<Snapshot>();
        let handle = thread::Builder::new()
            .name("profiler-export".into())
            .spawn(move || {
                // Runs until every sender is dropped and the queue is empty.
                for snapshot in receiver {
                    if let Err(e) = exporter.export(&snapshot) {
                        log::error!("error exporting profile: {e}");
                    }
                }
            })?;
        Ok(Self { sender, handle })
    }
}

/// Thread-safe section profiler.
///
/// Share it between threads with an `Arc`. Dropping the profiler performs
/// [`Profiler::shutdown`].
pub struct Profiler {
    factory: Arc<dyn ProfilerEntryFactory>,
    exporter: Arc<dyn ProfilerExporter>,
    clock: Arc<dyn Clock>,
    async_export: bool,
    state: Mutex<State>,
    /// `Some` while async exports are accepted.
    worker: Mutex<Option<ExportWorker>>,
}

impl Profiler {
    /// Start configuring a profiler.
    pub fn builder() -> ProfilerBuilder {
        ProfilerBuilder::new()
    }

    /// Build a profiler from a loaded configuration.
    ///
    /// Uses [`BasicProfilerEntryFactory`], the system clock and the exporter
    /// selected by `config.format`.
    pub fn from_config(config: &ProfilerConfig) -> Result<Self, ProfilerError> {
        let exporter: Arc<dyn ProfilerExporter> = match config.format {
            ExportFormat::Csv => Arc::new(
                CsvProfilerExporter::new(&config.output).with_flush_interval(config.flush_interval),
            ),
            ExportFormat::Json => Arc::new(JsonProfilerExporter::new(&config.output)),
        };

        Self::builder()
            .factory(Arc::new(BasicProfilerEntryFactory))
            .exporter(exporter)
            .async_export(config.async_export)
            .build()
    }

    /// Begin timing `kind`.
    ///
    /// Starting a section that is already running restarts it.
    pub fn start(&self, kind: &str) {
        let now = self.clock.now_millis();
        self.state().active.insert(kind.to_string(), now);
    }

    /// Stop timing `kind` and record an entry for it.
    ///
    /// Without a matching [`start`](Self::start) nothing is recorded and a
    /// warning is logged.
    pub fn end(&self, kind: &str) {
        let end = self.clock.now_millis();
        let start = self.state().active.remove(kind);

        match start {
            Some(start) => {
                let entry = self.factory.create(kind, start, end);
                self.state().entries.push(entry);
            }
            None => log::warn!("end() called for '{kind}' with no start()"),
        }
    }

    /// Time `kind` until the returned guard is dropped.
    pub fn scope(&self, kind: &str) -> ScopeGuard<'_> {
        ScopeGuard::new(self, kind)
    }

    /// Returns `true` if `kind` has been started but not ended.
    pub fn is_running(&self, kind: &str) -> bool {
        self.state().active.contains_key(kind)
    }

    /// Snapshot of all recorded entries, in completion order.
    pub fn entries(&self) -> Vec<Arc<dyn ProfilerEntry>> {
        self.state().entries.clone()
    }

    /// Number of recorded entries.
    pub fn entry_count(&self) -> usize {
        self.state().entries.len()
    }

    /// Drop all recorded entries and running timers.
    pub fn clear(&self) {
        let mut state = self.state();
        state.entries.clear();
        state.active.clear();
    }

    /// Hand a snapshot of the recorded entries to the exporter.
    ///
    /// In synchronous mode the export runs on the calling thread and its
    /// result is returned. In asynchronous mode the snapshot is queued for
    /// the worker and failures are logged there; queuing after
    /// [`shutdown`](Self::shutdown) returns [`ProfilerError::ShutDown`].
    pub fn export(&self) -> Result<(), ProfilerError> {
        let snapshot = self.entries();

        if !self.async_export {
            return self.exporter.export(&snapshot);
        }

        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        match worker.as_ref() {
            Some(worker) => worker
                .sender
                .send(snapshot)
                .map_err(|_| ProfilerError::ShutDown),
            None => Err(ProfilerError::ShutDown),
        }
    }

    /// Stop accepting asynchronous exports and wait for queued ones.
    ///
    /// Calling this more than once is harmless.
    pub fn shutdown(&self) -> Result<(), ProfilerError> {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(ExportWorker { sender, handle }) = worker {
            drop(sender);
            handle.join().map_err(|_| ProfilerError::WorkerPanicked)?;
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Recording must keep working even if another thread panicked
        // while holding the lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("profiler shutdown failed: {e}");
        }
    }
}

/// Builder for [`Profiler`].
pub struct ProfilerBuilder {
    factory: Option<Arc<dyn ProfilerEntryFactory>>,
    exporter: Option<Arc<dyn ProfilerExporter>>,
    clock: Arc<dyn Clock>,
    async_export: bool,
}

impl Default for ProfilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfilerBuilder {
    /// New builder: system clock, asynchronous export, no factory or exporter.
    pub fn new() -> Self {
        Self {
            factory: None,
            exporter: None,
            clock: Arc::new(SystemClock),
            async_export: true,
        }
    }

    /// Set the entry factory (required).
    #[must_use]
    pub fn factory(mut self, factory: Arc<dyn ProfilerEntryFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the exporter (required).
    #[must_use]
    pub fn exporter(mut self, exporter: Arc<dyn ProfilerExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Replace the time source.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run exports on a background worker (default) or on the caller.
    #[must_use]
    pub fn async_export(mut self, async_export: bool) -> Self {
        self.async_export = async_export;
        self
    }

    /// Build the profiler, spawning the export worker in async mode.
    pub fn build(self) -> Result<Profiler, ProfilerError> {
        let factory = self.factory.ok_or(ProfilerError::MissingFactory)?;
        let exporter = self.exporter.ok_or(ProfilerError::MissingExporter)?;

        let worker = if self.async_export {
            Some(ExportWorker::spawn(Arc::clone(&exporter))?)
        } else {
            None
        };

        Ok(Profiler {
            factory,
            exporter,
            clock: self.clock,
            async_export: self.async_export,
            state: Mutex::new(State::default()),
            worker: Mutex::new(worker),
        })
    }
}
