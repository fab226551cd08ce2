use bom_rollup::MatrixSet;
use bom_tree::ParsedTree;
use std::path::PathBuf;

/// Lines printed after a successful run
pub fn render_summary(written: &[PathBuf]) -> String {
    let mut out = String::new();
    for path in written {
        out.push_str(&format!("Wrote: {}\n", path.display()));
    }
    out.push_str("Sheets:\n");
    out.push_str("  - DirectChildren (parts + assemblies, direct only)\n");
    out.push_str("  - RollupPartsOnly (parts only, includes nested sub-assemblies)");
    out
}

/// One-line parse and matrix statistics for the log
pub fn describe_run(tree: &ParsedTree, set: &MatrixSet) -> String {
    let stats = &tree.stats;
    let roots: Vec<&str> = tree.roots.iter().map(String::as_str).collect();
    format!(
        "{} lines read ({} items, {} skipped); {} assemblies, {} parts; roots: {}",
        stats.lines_read,
        stats.lines_classified,
        stats.lines_skipped,
        set.direct_children.columns.len(),
        set.rollup_parts_only.rows.len(),
        if roots.is_empty() { "none".to_string() } else { roots.join(", ") }
    )
}
