//! End-to-end recording and export through the public API.

use std::sync::Arc;
use std::thread;

use nullftc_profiler::{
    BasicProfilerEntryFactory, Clock, CsvProfilerExporter, ManualClock, Profiler, ProfilerConfig,
    ProfilerEntry, ProfilerExporter,
};

#[test]
fn concurrent_sections_are_all_recorded() {
    let profiler = Arc::new(
        Profiler::builder()
            .factory(Arc::new(BasicProfilerEntryFactory))
            .exporter(Arc::new(nullftc_profiler::MemoryExporter::new()))
            .async_export(false)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let profiler = Arc::clone(&profiler);
            thread::spawn(move || {
                for i in 0..250 {
                    let kind = format!("thread{t}-{i}");
                    profiler.start(&kind);
                    profiler.end(&kind);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(profiler.entry_count(), 1000);
}

#[test]
fn async_csv_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match/teleop.csv");
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));

    let profiler = Profiler::builder()
        .factory(Arc::new(BasicProfilerEntryFactory))
        .exporter(Arc::new(CsvProfilerExporter::new(&path)) as Arc<dyn ProfilerExporter>)
        .clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .build()
        .unwrap();

    profiler.start("loop");
    profiler.start("drive");
    clock.advance(4);
    profiler.end("drive");
    clock.advance(6);
    profiler.end("loop");

    profiler.export().unwrap();
    profiler.shutdown().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "Type,Start Time,End Time,Delta Time (ms)\n\
         drive,1700000000000,1700000000004,4\n\
         loop,1700000000000,1700000000010,10\n"
    );
}

#[test]
fn profiler_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("auto.json");
    let config_path = dir.path().join("profiler.toml");
    std::fs::write(
        &config_path,
        format!(
            "async = false\noutput = {:?}\nformat = \"json\"\n",
            output.display().to_string()
        ),
    )
    .unwrap();

    let config = ProfilerConfig::load(&config_path).unwrap();
    let profiler = Profiler::from_config(&config).unwrap();

    profiler.start("park");
    profiler.end("park");
    profiler.export().unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["kind"], "park");
}

#[test]
fn custom_entry_type_controls_csv_columns() {
    #[derive(Debug)]
    struct LoopEntry {
        start: u64,
        end: u64,
    }

    impl ProfilerEntry for LoopEntry {
        fn kind(&self) -> &str {
            "loop"
        }
        fn start_time(&self) -> u64 {
            self.start
        }
        fn end_time(&self) -> u64 {
            self.end
        }
        fn csv_row(&self) -> Vec<String> {
            vec!["loop".into(), format!("{}Hz", 1000 / self.delta_time().max(1))]
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loops.csv");
    let clock = Arc::new(ManualClock::new(0));

    let profiler = Profiler::builder()
        .factory(Arc::new(|_: &str, start, end| -> Arc<dyn ProfilerEntry> {
            Arc::new(LoopEntry { start, end })
        }))
        .exporter(Arc::new(CsvProfilerExporter::new(&path)))
        .clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .async_export(false)
        .build()
        .unwrap();

    profiler.start("loop");
    clock.advance(20);
    profiler.end("loop");
    profiler.export().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().nth(1), Some("loop,50Hz"));
}
