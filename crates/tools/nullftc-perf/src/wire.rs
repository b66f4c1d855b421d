//! Deserialization of exported profile files.
//!
//! CSV files must start with the exporter's header line. Each following
//! record needs at least the name, start and end columns; the delta column
//! and any extra columns written by custom entry types are ignored, since
//! the duration is recomputed from the timestamps.
//!
//! Oddities in the input that do not stop parsing are reported through the
//! `log` facade.

use std::path::Path;

use anyhow::{Context, Result, bail};
use nullftc_profiler::BasicProfilerEntry;
use nullftc_profiler::exporter::csv::CSV_HEADER;
use nullftc_profiler::exporter::json::EntryRecord;

/// Input format of a profile file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// CSV as written by `CsvProfilerExporter`.
    Csv,
    /// JSON as written by `JsonProfilerExporter`.
    Json,
}

impl Format {
    /// Guess the format from the file extension. Anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Read a profile file, choosing the parser from its extension.
pub fn load(path: &Path) -> Result<Vec<BasicProfilerEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;

    let entries = match Format::from_path(path) {
        Format::Csv => parse_csv(&text),
        Format::Json => parse_json(&text),
    };
    let entries = entries.with_context(|| format!("parsing profile {}", path.display()))?;
    log::debug!("parsed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse a JSON export.
pub fn parse_json(text: &str) -> Result<Vec<BasicProfilerEntry>> {
    let records: Vec<EntryRecord> = serde_json::from_str(text).context("decoding JSON entries")?;
    Ok(records
        .into_iter()
        .map(|r| BasicProfilerEntry::new(r.kind, r.start_time, r.end_time))
        .collect())
}

/// Parse a CSV export.
pub fn parse_csv(text: &str) -> Result<Vec<BasicProfilerEntry>> {
    let records = split_records(text)?;
    let mut records = records.into_iter();

    match records.next() {
        Some((_, header)) if header.join(",") == CSV_HEADER => {}
        Some((line, header)) => {
            bail!("line {line}: unexpected CSV header '{}'", header.join(","))
        }
        None => bail!("empty profile (missing CSV header)"),
    }

    let mut entries = Vec::new();
    let mut extra_rows = 0usize;
    for (line, cells) in records {
        if cells.len() < 3 {
            bail!("line {line}: expected at least 3 columns, found {}", cells.len());
        }
        if cells.len() > 4 {
            extra_rows += 1;
        }
        let start = parse_millis(&cells[1], line, "start time")?;
        let end = parse_millis(&cells[2], line, "end time")?;
        if end < start {
            log::warn!(
                "line {line}: '{}' ends before it starts, counting it as 0 ms",
                cells[0]
            );
        }
        entries.push(BasicProfilerEntry::new(cells[0].clone(), start, end));
    }

    if extra_rows > 0 {
        log::debug!("ignored extra columns on {extra_rows} row(s)");
    }
    Ok(entries)
}

fn parse_millis(cell: &str, line: usize, column: &str) -> Result<u64> {
    cell.trim()
        .parse()
        .with_context(|| format!("line {line}: invalid {column} '{cell}'"))
}

/// Split CSV text into records of unquoted cells.
///
/// Returns each record with the line number it starts on. Blank lines are
/// skipped. Quoted cells may contain commas, doubled quotes and line breaks.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' if cell.is_empty() => in_quotes = true,
            ',' => cells.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_record(&mut records, &mut cells, &mut cell, record_line);
                line += 1;
                record_line = line;
            }
            _ => cell.push(c),
        }
    }

    if in_quotes {
        bail!("line {record_line}: unterminated quoted cell");
    }
    finish_record(&mut records, &mut cells, &mut cell, record_line);

    Ok(records)
}

fn finish_record(
    records: &mut Vec<(usize, Vec<String>)>,
    cells: &mut Vec<String>,
    cell: &mut String,
    line: usize,
) {
    if cells.is_empty() && cell.is_empty() {
        return;
    }
    cells.push(std::mem::take(cell));
    records.push((line, std::mem::take(cells)));
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::*;

    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
    static LOGGER: CaptureLogger = CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            CAPTURED
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    }

    fn was_logged(level: Level, message: &str) -> bool {
        CAPTURED
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }

    #[test]
    fn parse_exported_csv() {
        let text = "Type,Start Time,End Time,Delta Time (ms)\n\
                    drive,100,112,12\n\
                    vision,105,140,35\n";
        let entries = parse_csv(text).unwrap();
        assert_eq!(
            entries,
            vec![
                BasicProfilerEntry::new("drive", 100, 112),
                BasicProfilerEntry::new("vision", 105, 140),
            ]
        );
    }

    #[test]
    fn parse_quoted_cells_and_crlf() {
        let text = "Type,Start Time,End Time,Delta Time (ms)\r\n\
                    \"arm, wrist\",1,2,1\r\n\
                    \"say \"\"hi\"\"\",3,9,6\r\n";
        let entries = parse_csv(text).unwrap();
        assert_eq!(entries[0].kind, "arm, wrist");
        assert_eq!(entries[1].kind, "say \"hi\"");
        assert_eq!(entries[1].end_time, 9);
    }

    #[test]
    fn extra_columns_are_ignored() {
        capture_logs();
        let text = "Type,Start Time,End Time,Delta Time (ms)\nlift,0,7,7,12.4V\n";
        let entries = parse_csv(text).unwrap();
        assert_eq!(entries, vec![BasicProfilerEntry::new("lift", 0, 7)]);
        assert!(was_logged(Level::Debug, "ignored extra columns on 1 row(s)"));
    }

    #[test]
    fn backwards_section_is_kept_with_warning() {
        capture_logs();
        let text = "Type,Start Time,End Time,Delta Time (ms)\nwrist,9,7,0\n";
        let entries = parse_csv(text).unwrap();
        assert_eq!(entries, vec![BasicProfilerEntry::new("wrist", 9, 7)]);
        assert!(was_logged(
            Level::Warn,
            "line 2: 'wrist' ends before it starts, counting it as 0 ms"
        ));
    }

    #[test]
    fn header_is_required() {
        let err = parse_csv("drive,1,2,1\n").unwrap_err();
        assert!(err.to_string().contains("unexpected CSV header"));
        assert!(parse_csv("").is_err());
    }

    #[test]
    fn bad_number_reports_line() {
        let text = "Type,Start Time,End Time,Delta Time (ms)\n\nok,1,2,1\nbad,x,2,1\n";
        let err = parse_csv(text).unwrap_err();
        assert!(err.to_string().contains("line 4"), "{err}");
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let text = "Type,Start Time,End Time,Delta Time (ms)\n\"open,1,2,1\n";
        assert!(parse_csv(text).is_err());
    }

    #[test]
    fn parse_exported_json() {
        let text = r#"[{"kind":"arm","start_time":10,"end_time":30,"delta_time":20}]"#;
        assert_eq!(
            parse_json(text).unwrap(),
            vec![BasicProfilerEntry::new("arm", 10, 30)]
        );
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("run.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("run.csv")), Format::Csv);
        assert_eq!(Format::from_path(Path::new("run")), Format::Csv);
    }
}
