//! Command-line interface definitions for profview.

use clap::{Parser, Subcommand};

/// Inspect exported profiler runs.
#[derive(Parser)]
#[command(name = "profview", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Only print errors and results.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print timings and library diagnostics.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Per-section statistics (count, total, median, mean, min, max, stddev).
    Stats(InputArgs),
    /// Flat profile: total time per section and its share.
    Flat(InputArgs),
    /// Write folded stacks reconstructed from nested sections.
    Folded(OutputArgs),
    /// Render nested sections as an SVG flame graph.
    Flamegraph(FlamegraphArgs),
    /// Save or compare against a baseline run.
    Baseline(BaselineArgs),
}

/// A profile file to read.
#[derive(Parser)]
pub struct InputArgs {
    /// Exported profile (`.json` for JSON, anything else is read as CSV).
    pub input: String,
}

/// Arguments for `folded`.
#[derive(Parser)]
pub struct OutputArgs {
    /// Exported profile.
    pub input: String,

    /// Output path.
    #[arg(short = 'o', long)]
    pub output: String,
}

/// Arguments for `flamegraph`.
#[derive(Parser)]
pub struct FlamegraphArgs {
    /// Exported profile.
    pub input: String,

    /// Output SVG path.
    #[arg(short = 'o', long)]
    pub output: String,

    /// Flame graph title.
    #[arg(long, default_value = "Robot Profile")]
    pub title: String,
}

/// Arguments for `baseline`.
#[derive(Parser)]
pub struct BaselineArgs {
    /// Baseline subcommand to execute.
    #[command(subcommand)]
    pub command: BaselineCommand,
}

/// Baseline subcommands.
#[derive(Subcommand)]
pub enum BaselineCommand {
    /// Store the statistics of a run as the new baseline.
    Save {
        /// Exported profile.
        input: String,
        /// Baseline JSON file to write.
        baseline: String,
    },
    /// Compare a run against a saved baseline.
    Compare {
        /// Exported profile.
        input: String,
        /// Baseline JSON file to read.
        baseline: String,
        /// Median increase (percent) that counts as a regression.
        #[arg(long, default_value_t = 10)]
        threshold: u32,
    },
}
