//! Baseline files and regression comparison.
//!
//! A baseline stores the per-section statistics of a reference run. Later
//! runs are compared by median duration.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::stats::SectionStats;

/// Per-section statistics of a reference run, keyed by section name.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Statistics keyed by section name.
    pub sections: BTreeMap<String, SectionStats>,
}

impl Baseline {
    /// Build a baseline from computed statistics.
    pub fn from_stats(stats: &[SectionStats]) -> Self {
        Self {
            sections: stats
                .iter()
                .map(|s| (s.kind.clone(), s.clone()))
                .collect(),
        }
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing baseline to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing baseline to {}", path.display()))?;
        Ok(())
    }

    /// Load a baseline saved with [`Baseline::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading baseline {}", path.display()))?;
        serde_json::from_str(&json).context("parsing baseline JSON")
    }
}

/// How one section moved relative to the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Section not present in the baseline.
    New,
    /// Median went up by `pct` percent.
    Slower {
        /// Percentage change against the baseline median.
        pct: u64,
        /// `true` if `pct` exceeds the threshold.
        regression: bool,
    },
    /// Median went down (or stayed) by `pct` percent.
    Faster {
        /// Percentage change against the baseline median.
        pct: u64,
    },
}

/// Comparison result for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Section name.
    pub kind: String,
    /// Baseline median, if the section existed.
    pub base_median: Option<u64>,
    /// Current median.
    pub median: u64,
    /// Direction and size of the change.
    pub change: Change,
}

/// Compare current statistics against `baseline`.
///
/// A section regresses when its median grew by more than `threshold_pct`
/// percent.
pub fn compare(stats: &[SectionStats], baseline: &Baseline, threshold_pct: u32) -> Vec<Comparison> {
    stats
        .iter()
        .map(|stat| {
            let Some(base) = baseline.sections.get(&stat.kind) else {
                return Comparison {
                    kind: stat.kind.clone(),
                    base_median: None,
                    median: stat.median,
                    change: Change::New,
                };
            };

            let diff = stat.median.abs_diff(base.median);
            let pct = percent_of(diff, base.median);

            let change = if stat.median > base.median {
                Change::Slower {
                    pct,
                    regression: pct > u64::from(threshold_pct),
                }
            } else {
                Change::Faster { pct }
            };

            Comparison {
                kind: stat.kind.clone(),
                base_median: Some(base.median),
                median: stat.median,
                change,
            }
        })
        .collect()
}

/// `part` as a whole percentage of `whole`, saturating at `u64::MAX`.
///
/// Returns 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let pct = u128::from(part) * 100 / u128::from(whole);
    u64::try_from(pct).unwrap_or(u64::MAX)
}

/// Number of comparisons flagged as regressions.
pub fn regression_count(comparisons: &[Comparison]) -> usize {
    comparisons
        .iter()
        .filter(|c| matches!(c.change, Change::Slower { regression: true, .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use nullftc_profiler::BasicProfilerEntry;

    use super::*;
    use crate::stats::summarize;

    fn stats(entries: &[(&str, u64)]) -> Vec<SectionStats> {
        let entries: Vec<BasicProfilerEntry> = entries
            .iter()
            .map(|&(kind, ms)| BasicProfilerEntry::new(kind, 0, ms))
            .collect();
        summarize(&entries)
    }

    #[test]
    fn flags_regressions_over_threshold() {
        let baseline = Baseline::from_stats(&stats(&[("drive", 10), ("vision", 100)]));
        let current = stats(&[("drive", 12), ("vision", 105), ("arm", 3)]);

        let comparisons = compare(&current, &baseline, 10);
        let by_kind = |k: &str| comparisons.iter().find(|c| c.kind == k).unwrap().clone();

        assert_eq!(
            by_kind("drive").change,
            Change::Slower {
                pct: 20,
                regression: true
            }
        );
        assert_eq!(
            by_kind("vision").change,
            Change::Slower {
                pct: 5,
                regression: false
            }
        );
        assert_eq!(by_kind("arm").change, Change::New);
        assert_eq!(regression_count(&comparisons), 1);
    }

    #[test]
    fn faster_is_never_a_regression() {
        let baseline = Baseline::from_stats(&stats(&[("drive", 20)]));
        let comparisons = compare(&stats(&[("drive", 5)]), &baseline, 0);
        assert_eq!(comparisons[0].change, Change::Faster { pct: 75 });
        assert_eq!(regression_count(&comparisons), 0);
    }

    #[test]
    fn huge_slowdown_saturates_percentage() {
        let baseline = Baseline::from_stats(&stats(&[("drive", 1)]));
        let comparisons = compare(&stats(&[("drive", 1_000_000_000_000_000_000)]), &baseline, 10);
        assert_eq!(
            comparisons[0].change,
            Change::Slower {
                pct: u64::MAX,
                regression: true
            }
        );
    }

    #[test]
    fn percent_of_large_values() {
        assert_eq!(percent_of(u64::MAX, u64::MAX), 100);
        assert_eq!(percent_of(u64::MAX / 2, u64::MAX), 49);
        assert_eq!(percent_of(5, 0), 0);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let baseline = Baseline::from_stats(&stats(&[("drive", 10)]));
        baseline.save(&path).unwrap();

        let loaded = Baseline::load(&path).unwrap();
        assert_eq!(loaded.sections["drive"].median, 10);
    }
}
