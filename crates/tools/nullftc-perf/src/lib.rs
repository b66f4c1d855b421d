//! Performance data analysis for exported profiler runs.
//!
//! Reads the CSV and JSON files written by `nullftc-profiler`, computes
//! per-section statistics, flat profiles and baseline comparisons, and
//! renders nested sections as folded stacks or flame graph SVGs.

pub mod baseline;
pub mod flamegraph;
pub mod output;
pub mod profile_analysis;
pub mod stats;
pub mod wire;
