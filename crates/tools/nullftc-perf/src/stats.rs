//! Integer-only statistics over section durations.
//!
//! Durations are whole milliseconds, so everything stays in `u64`/`u128`
//! arithmetic.

use std::collections::BTreeMap;

use nullftc_profiler::ProfilerEntry;
use serde::{Deserialize, Serialize};

/// Computed statistics for one section name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStats {
    /// Section name.
    pub kind: String,
    /// Number of recorded entries.
    pub count: usize,
    /// Sum of all durations (ms).
    pub total: u64,
    /// Shortest duration (ms).
    pub min: u64,
    /// Longest duration (ms).
    pub max: u64,
    /// Median duration (ms).
    pub median: u64,
    /// Mean duration (ms).
    pub mean: u64,
    /// Sample standard deviation (integer approximation, ms).
    pub stddev: u64,
}

impl SectionStats {
    /// Compute statistics from a mutable slice of durations.
    ///
    /// The slice is sorted in place. Returns `None` if the slice is empty.
    pub fn compute(kind: &str, samples: &mut [u64]) -> Option<Self> {
        let n = samples.len();
        if n == 0 {
            return None;
        }

        samples.sort_unstable();

        let min = samples[0];
        let max = samples[n - 1];
        let median = if n % 2 == 0 {
            midpoint(samples[n / 2 - 1], samples[n / 2])
        } else {
            samples[n / 2]
        };

        let sum: u128 = samples.iter().map(|&s| u128::from(s)).sum();
        let mean = narrow(sum / n as u128);

        let variance = if n > 1 {
            let var_sum: u128 = samples
                .iter()
                .map(|&s| {
                    let diff = s.abs_diff(mean);
                    u128::from(diff) * u128::from(diff)
                })
                .sum();
            narrow(var_sum / (n as u128 - 1))
        } else {
            0
        };

        Some(Self {
            kind: kind.to_string(),
            count: n,
            total: narrow(sum),
            min,
            max,
            median,
            mean,
            stddev: isqrt(variance),
        })
    }
}

/// Group entries by name and compute statistics for each group.
///
/// Sorted by total time (descending), then by name.
pub fn summarize<E: ProfilerEntry>(entries: &[E]) -> Vec<SectionStats> {
    let mut groups: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.kind()).or_default().push(entry.delta_time());
    }

    let mut stats: Vec<SectionStats> = groups
        .into_iter()
        .filter_map(|(kind, mut samples)| SectionStats::compute(kind, &mut samples))
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.kind.cmp(&b.kind)));
    stats
}

fn midpoint(a: u64, b: u64) -> u64 {
    narrow((u128::from(a) + u128::from(b)) / 2)
}

fn narrow(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// Integer square root via Newton's method.
fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
