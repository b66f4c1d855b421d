//! Terminal output formatting for profile analysis results.

use std::fmt::Write;

use crate::baseline::{Change, Comparison, percent_of};
use crate::stats::SectionStats;

/// Format section statistics as a table.
pub fn format_stats_table(stats: &[SectionStats]) -> String {
    if stats.is_empty() {
        return "  No profiler entries to display.\n".to_string();
    }

    let width = stats
        .iter()
        .map(|s| s.kind.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<width$}  {:>7}  {:>10}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Section", "Count", "Total (ms)", "Median", "Mean", "Min", "Max", "Stddev",
    );
    let _ = writeln!(
        out,
        "  {:-<width$}  {:->7}  {:->10}  {:->8}  {:->8}  {:->8}  {:->8}  {:->8}",
        "", "", "", "", "", "", "", "",
    );

    for s in stats {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>7}  {:>10}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
            s.kind, s.count, s.total, s.median, s.mean, s.min, s.max, s.stddev,
        );
    }
    out
}

/// Format a flat profile as a table with each section's share of the total.
pub fn format_flat_profile(entries: &[(String, u64)], total_ms: u64) -> String {
    if entries.is_empty() {
        return "  No profiler entries to display.\n".to_string();
    }

    let width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut out = String::new();
    let _ = writeln!(out, "  {:<width$}  {:>10}  {:>6}", "Section", "Time (ms)", "%");
    let _ = writeln!(out, "  {:-<width$}  {:->10}  {:->6}", "", "", "");

    for (name, ms) in entries {
        let pct = percent_of(*ms, total_ms);
        let _ = writeln!(out, "  {name:<width$}  {ms:>10}  {pct:>5}%");
    }
    out
}

/// Format a baseline comparison, one line per section.
pub fn format_comparison(comparisons: &[Comparison], threshold_pct: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Baseline comparison (threshold: {threshold_pct}%):");

    for c in comparisons {
        let line = match (&c.change, c.base_median) {
            (Change::New, _) | (_, None) => format!("    {} : new (no baseline)", c.kind),
            (Change::Slower { pct, regression }, Some(base)) => {
                let flag = if *regression { " REGRESSION" } else { "" };
                format!("    {} : {base} -> {} ({pct}% slower){flag}", c.kind, c.median)
            }
            (Change::Faster { pct }, Some(base)) => {
                format!("    {} : {base} -> {} ({pct}% faster)", c.kind, c.median)
            }
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_profile_percentages() {
        let table = format_flat_profile(&[("drive".into(), 75), ("vision".into(), 25)], 100);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("drive") && lines[2].ends_with("75%"));
        assert!(lines[3].ends_with("25%"));
    }

    #[test]
    fn flat_profile_huge_totals() {
        let table = format_flat_profile(&[("a".into(), u64::MAX)], u64::MAX);
        assert!(table.lines().nth(2).unwrap().ends_with("100%"));
    }

    #[test]
    fn section_column_counts_characters() {
        // "élévateur" is 9 characters but 12 bytes.
        let table = format_flat_profile(&[("élévateur".into(), 5), ("arm".into(), 5)], 10);
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths, vec![31, 31, 31, 31]);
        assert!(table.contains("  élévateur           5     50%"));
    }

    #[test]
    fn empty_tables() {
        assert!(format_stats_table(&[]).contains("No profiler entries"));
        assert!(format_flat_profile(&[], 0).contains("No profiler entries"));
    }

    #[test]
    fn comparison_lines() {
        let comparisons = vec![
            Comparison {
                kind: "drive".into(),
                base_median: Some(10),
                median: 12,
                change: Change::Slower {
                    pct: 20,
                    regression: true,
                },
            },
            Comparison {
                kind: "arm".into(),
                base_median: None,
                median: 3,
                change: Change::New,
            },
        ];
        let text = format_comparison(&comparisons, 10);
        assert!(text.contains("drive : 10 -> 12 (20% slower) REGRESSION"));
        assert!(text.contains("arm : new (no baseline)"));
    }
}
