//! Profile analysis: flat profiles and folded stacks from section entries.

use std::collections::HashMap;

use nullftc_profiler::ProfilerEntry;

/// Aggregate time per section name into a flat profile.
///
/// Returns `(name, total_ms)` sorted by time (descending, ties by name) and
/// the sum over all entries. Nested sections are counted in full, so the
/// shares of a flat profile can add up to more than 100%.
pub fn flat_profile<E: ProfilerEntry>(entries: &[E]) -> (Vec<(String, u64)>, u64) {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    let mut total = 0u64;

    for entry in entries {
        let delta = entry.delta_time();
        let section = totals.entry(entry.kind()).or_default();
        *section = section.saturating_add(delta);
        total = total.saturating_add(delta);
    }

    let mut flat: Vec<(String, u64)> = totals
        .into_iter()
        .map(|(kind, ms)| (kind.to_string(), ms))
        .collect();
    flat.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    (flat, total)
}

/// Generate folded stack lines for flame graph generation.
///
/// Nesting is recovered from the timestamps: an entry that lies entirely
/// inside the interval of an earlier-starting entry is its child. Each
/// line is `outer;inner self_ms\n`, where self time is the entry's duration
/// minus the durations of its direct children.
pub fn folded_stacks<E: ProfilerEntry>(entries: &[E]) -> String {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| {
        let (ea, eb) = (&entries[a], &entries[b]);
        ea.start_time()
            .cmp(&eb.start_time())
            .then_with(|| eb.end_time().cmp(&ea.end_time()))
            .then_with(|| a.cmp(&b))
    });

    let mut paths: Vec<String> = vec![String::new(); entries.len()];
    let mut child_time: Vec<u64> = vec![0; entries.len()];
    let mut open: Vec<usize> = Vec::new();

    for &idx in &order {
        let entry = &entries[idx];

        // Close every section that ends before this one does.
        while let Some(&top) = open.last() {
            if entries[top].end_time() < entry.end_time() {
                open.pop();
            } else {
                break;
            }
        }

        let frame = frame_name(entry.kind());
        let path = match open.last() {
            Some(&parent) => {
                child_time[parent] = child_time[parent].saturating_add(entry.delta_time());
                format!("{};{frame}", paths[parent])
            }
            None => frame,
        };
        paths[idx] = path;
        open.push(idx);
    }

    let mut stacks: HashMap<&str, u64> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let self_time = entry.delta_time().saturating_sub(child_time[idx]);
        let stack = stacks.entry(paths[idx].as_str()).or_default();
        *stack = stack.saturating_add(self_time);
    }

    let mut lines: Vec<(&str, u64)> = stacks.into_iter().filter(|&(_, ms)| ms > 0).collect();
    lines.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut output = String::new();
    for (stack, ms) in lines {
        output.push_str(stack);
        output.push(' ');
        output.push_str(&ms.to_string());
        output.push('\n');
    }
    output
}

/// Section names become frames; `;` separates frames in the folded format.
fn frame_name(kind: &str) -> String {
    kind.replace(';', ":")
}
