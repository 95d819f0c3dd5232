//! Compare command implementation.
//!
//! Builds one foot heatmap per selected node and combines them, either as
//! the difference of two nodes or as the average of several.

use super::models::{CompareArgs, CompareMode};
use super::utils::{load_tree, select_node, validate_load_args};
use crate::heatmap::{FootHeatmap, FootMask};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Execute the compare command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Path of the exported heatmap
pub fn execute_compare(args: CompareArgs) -> Result<PathBuf> {
    validate_args(&args)?;

    let tree = load_tree(&args.load)?;
    let mask = Arc::new(FootMask::load(&args.mask).context("Failed to load foot mask")?);

    let heatmaps = args
        .nodes
        .iter()
        .map(|path| {
            let node = select_node(&tree, path)?;
            debug!("Building heatmap for [{}]", node.loc().join(" / "));
            FootHeatmap::for_node(node, args.attribute, &mask)
                .with_context(|| format!("Failed to build heatmap for [{}]", path.join(" / ")))
        })
        .collect::<Result<Vec<_>>>()?;

    let combined = combine(&heatmaps, args.mode)?;
    let (min, max) = combined.value_range();
    info!(
        "{:?} of {} heatmaps spans {:.2} to {:.2}",
        args.mode,
        heatmaps.len(),
        min,
        max
    );

    let suffix = format!("_{}_{}{}", mode_label(args.mode), args.attribute, args.suffix);
    let path = combined
        .export_foot_heatmap(args.range, &args.output_dir, &suffix)
        .context("Failed to export foot heatmap")?;

    Ok(path)
}

/// Combine heatmaps according to `mode`
pub fn combine(heatmaps: &[FootHeatmap], mode: CompareMode) -> Result<FootHeatmap> {
    let combined = match (mode, heatmaps) {
        (CompareMode::Difference, [a, b]) => a.difference(b)?,
        (CompareMode::Difference, _) => {
            anyhow::bail!("difference needs exactly 2 nodes, got {}", heatmaps.len())
        }
        (CompareMode::Average, _) => FootHeatmap::average(&heatmaps.iter().collect::<Vec<_>>())?,
    };
    Ok(combined)
}

fn mode_label(mode: CompareMode) -> &'static str {
    match mode {
        CompareMode::Difference => "difference",
        CompareMode::Average => "average",
    }
}

/// Validate compare arguments
pub fn validate_args(args: &CompareArgs) -> Result<()> {
    validate_load_args(&args.load)?;

    if args.nodes.is_empty() {
        anyhow::bail!("At least one node is required");
    }

    if args.mode == CompareMode::Difference && args.nodes.len() != 2 {
        anyhow::bail!(
            "difference compares exactly 2 nodes, got {}",
            args.nodes.len()
        );
    }

    Ok(())
}
