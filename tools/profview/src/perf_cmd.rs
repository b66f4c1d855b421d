//! Subcommand implementations.
//!
//! Bridges the `nullftc-perf` analysis modules (wire parser, statistics,
//! profile analysis, flame graphs, baselines) to the command line.

use std::path::Path;

use anyhow::{Result, bail};
use nullftc_perf::{baseline, flamegraph, output, profile_analysis, stats, wire};
use nullftc_profiler::BasicProfilerEntry;

use crate::cli::{BaselineArgs, BaselineCommand, FlamegraphArgs, InputArgs, OutputArgs};
use crate::verbose::{Timer, dprintln, vprintln};

/// Read a profile file and report what was found.
fn load(input: &str) -> Result<Vec<BasicProfilerEntry>> {
    let path = Path::new(input);
    let _t = Timer::start("load profile");

    dprintln!("Reading {}...", path.display());
    let entries = wire::load(path)?;
    vprintln!(
        "  {} entries ({:?})",
        entries.len(),
        wire::Format::from_path(path)
    );
    Ok(entries)
}

/// `profview stats`.
pub fn cmd_stats(args: &InputArgs) -> Result<()> {
    let entries = load(&args.input)?;
    let stats = stats::summarize(&entries);
    print!("{}", output::format_stats_table(&stats));
    Ok(())
}

/// `profview flat`.
pub fn cmd_flat(args: &InputArgs) -> Result<()> {
    let entries = load(&args.input)?;
    let (flat, total) = profile_analysis::flat_profile(&entries);
    print!("{}", output::format_flat_profile(&flat, total));
    Ok(())
}

/// `profview folded`.
pub fn cmd_folded(args: &OutputArgs) -> Result<()> {
    let entries = load(&args.input)?;
    let output_path = Path::new(&args.output);
    flamegraph::write_folded_stacks(&entries, output_path)?;
    dprintln!("  Folded stacks written to {}", output_path.display());
    Ok(())
}

/// `profview flamegraph`.
pub fn cmd_flamegraph(args: &FlamegraphArgs) -> Result<()> {
    let entries = load(&args.input)?;
    if entries.is_empty() {
        bail!("no profiler entries in '{}'", args.input);
    }

    let svg_path = Path::new(&args.output);
    let _t = Timer::start("render flame graph");
    flamegraph::write_flamegraph_svg(&entries, &args.title, svg_path)?;
    dprintln!("  Flame graph SVG written to {}", svg_path.display());
    Ok(())
}

/// `profview baseline save|compare`.
///
/// `compare` fails when any section regressed, so it can gate CI runs.
pub fn cmd_baseline(args: &BaselineArgs) -> Result<()> {
    match &args.command {
        BaselineCommand::Save {
            input,
            baseline: baseline_path,
        } => {
            let entries = load(input)?;
            let stats = stats::summarize(&entries);
            baseline::Baseline::from_stats(&stats).save(Path::new(baseline_path))?;
            dprintln!(
                "  Baseline with {} sections written to {baseline_path}",
                stats.len()
            );
        }
        BaselineCommand::Compare {
            input,
            baseline: baseline_path,
            threshold,
        } => {
            let entries = load(input)?;
            let stats = stats::summarize(&entries);
            let base = baseline::Baseline::load(Path::new(baseline_path))?;
            let comparisons = baseline::compare(&stats, &base, *threshold);
            print!("{}", output::format_comparison(&comparisons, *threshold));

            let regressions = baseline::regression_count(&comparisons);
            if regressions > 0 {
                bail!("{regressions} regression(s) detected");
            }
            dprintln!("  No regressions detected.");
        }
    }
    Ok(())
}
