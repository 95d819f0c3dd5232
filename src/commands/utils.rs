use super::models::LoadArgs;
use crate::parser::TrialParser;
use crate::tree::{Node, TrialTree};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::info;

/// Split a `/`-separated key path such as `S4/fast walking/trial 1`
pub fn parse_node_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate loading arguments before touching any file
pub fn validate_load_args(args: &LoadArgs) -> Result<()> {
    if args.guide.as_os_str().is_empty() {
        anyhow::bail!("Guiding file path cannot be empty");
    }

    if args.conditions.is_empty() {
        anyhow::bail!("At least one condition is required");
    }

    if args.conditions.iter().any(|c| c.trim().is_empty()) {
        anyhow::bail!("Condition names cannot be blank");
    }

    if !(args.max_read_rate > 0.0 && args.max_read_rate <= 1.0) {
        anyhow::bail!("max_read_rate must be in (0, 1], got {}", args.max_read_rate);
    }

    if let Some(layout) = &args.layout {
        if layout.len() < 2 {
            anyhow::bail!("Layout needs at least a root and a leaf layer");
        }
    }

    Ok(())
}

/// Parse the guiding file, restructuring when a layout is given
pub fn load_tree(args: &LoadArgs) -> Result<TrialTree> {
    info!("Loading trials from: {}", args.guide.display());

    let tree = TrialParser::new(&args.conditions)
        .max_read_rate(args.max_read_rate)
        .asc_header_rows(args.asc_header_rows)
        .show_progress(args.progress)
        .parse(&args.guide)
        .with_context(|| format!("Failed to parse {}", args.guide.display()))?;

    match &args.layout {
        Some(layout) => tree
            .restructure(layout)
            .with_context(|| format!("Failed to restructure into [{}]", layout.join(", "))),
        None => Ok(tree),
    }
}

/// Node at `path` below the root
pub fn select_node<'a>(tree: &'a TrialTree, path: &[String]) -> Result<&'a Node> {
    tree.at(path)
        .with_context(|| format!("No node at [{}]", path.join(" / ")))
}

/// Display version information
pub fn display_version() {
    println!("pedar-probe v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Plantar pressure analysis for pedar insole recordings.");
}
