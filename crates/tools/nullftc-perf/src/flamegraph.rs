//! Flame graph generation from profiler entries.
//!
//! Generates folded stacks format and converts it to SVG using the
//! `inferno` crate.

use std::path::Path;

use anyhow::{Context, Result};
use nullftc_profiler::ProfilerEntry;

use crate::profile_analysis;

/// Write the folded stacks of `entries` to `output`.
pub fn write_folded_stacks<E: ProfilerEntry>(entries: &[E], output: &Path) -> Result<()> {
    let folded = profile_analysis::folded_stacks(entries);
    std::fs::write(output, &folded)
        .with_context(|| format!("writing folded stacks to {}", output.display()))?;
    Ok(())
}

/// Render folded stacks text as an SVG flame graph.
pub fn render_svg(folded: &str, title: &str) -> Result<Vec<u8>> {
    let mut opts = inferno::flamegraph::Options::default();
    opts.title = title.to_string();
    opts.count_name = "ms".to_string();

    let mut svg = Vec::new();
    inferno::flamegraph::from_lines(&mut opts, folded.lines(), &mut svg)
        .context("generating flame graph SVG")?;
    Ok(svg)
}

/// Generate an SVG flame graph of `entries` at `svg_path`.
pub fn write_flamegraph_svg<E: ProfilerEntry>(
    entries: &[E],
    title: &str,
    svg_path: &Path,
) -> Result<()> {
    let folded = profile_analysis::folded_stacks(entries);
    let svg = render_svg(&folded, title)?;
    std::fs::write(svg_path, &svg)
        .with_context(|| format!("writing SVG to {}", svg_path.display()))?;
    Ok(())
}
