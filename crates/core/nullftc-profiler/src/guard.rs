//! RAII section timing.

use crate::profiler::Profiler;

/// Ends its section when dropped.
///
/// ```ignore
/// {
///     let _t = profiler.scope("vision");
///     // ... process camera frame ...
/// } // records "vision"
/// ```
#[must_use = "the section ends as soon as the guard is dropped"]
pub struct ScopeGuard<'a> {
    profiler: &'a Profiler,
    kind: String,
}

impl<'a> ScopeGuard<'a> {
    pub(crate) fn new(profiler: &'a Profiler, kind: &str) -> Self {
        profiler.start(kind);
        Self {
            profiler,
            kind: kind.to_string(),
        }
    }

    /// Section being timed.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.profiler.end(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::clock::{Clock, ManualClock};
    use crate::entry::BasicProfilerEntryFactory;
    use crate::exporter::MemoryExporter;
    use crate::profiler::Profiler;

    #[test]
    fn guard_records_on_drop() {
        let clock = Arc::new(ManualClock::new(0));
        let profiler = Profiler::builder()
            .factory(Arc::new(BasicProfilerEntryFactory))
            .exporter(Arc::new(MemoryExporter::new()))
            .clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .async_export(false)
            .build()
            .unwrap();

        {
            let guard = profiler.scope("intake");
            assert_eq!(guard.kind(), "intake");
            assert!(profiler.is_running("intake"));
            clock.advance(8);
        }

        assert!(!profiler.is_running("intake"));
        let entries = profiler.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].delta_time(), 8);
    }
}
