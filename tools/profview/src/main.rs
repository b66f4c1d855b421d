//! profview: inspect profiler runs exported by `nullftc-profiler`.
//!
//! Reads the CSV or JSON files written on the robot and prints section
//! statistics and flat profiles, renders flame graphs of nested sections,
//! and compares runs against a saved baseline.

mod cli;
mod perf_cmd;
mod verbose;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    match cli.command {
        cli::Command::Stats(ref args) => perf_cmd::cmd_stats(args),
        cli::Command::Flat(ref args) => perf_cmd::cmd_flat(args),
        cli::Command::Folded(ref args) => perf_cmd::cmd_folded(args),
        cli::Command::Flamegraph(ref args) => perf_cmd::cmd_flamegraph(args),
        cli::Command::Baseline(ref args) => perf_cmd::cmd_baseline(args),
    }
}
