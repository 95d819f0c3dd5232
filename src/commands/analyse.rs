//! Analyse command implementation.
//!
//! The analyse command:
//! 1. Loads the guiding file and recordings
//! 2. Averages an attribute up to the selected node
//! 3. Writes the attribute table of the export layer
//! 4. Optionally writes a JSON report and a foot heatmap

use super::models::AnalyseArgs;
use super::utils::{load_tree, select_node, validate_load_args};
use crate::analysis::{analyse_node, layer_report, AttributeExport};
use crate::heatmap::{FootHeatmap, FootMask};
use crate::output::write_report;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Files written by one analyse run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyseOutputs {
    pub table: PathBuf,
    pub report: Option<PathBuf>,
    pub heatmap: Option<PathBuf>,
}

/// Execute the analyse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Guiding file or recording errors
/// * Unknown node path or export layer
/// * File write errors
pub fn execute_analyse(args: AnalyseArgs) -> Result<AnalyseOutputs> {
    let start_time = Instant::now();
    validate_args(&args)?;

    info!("Step 1/3: Loading trials...");
    let tree = load_tree(&args.load)?;
    let node = select_node(&tree, &args.node)?;

    info!(
        "Step 2/3: Computing {} for [{}]...",
        args.attribute,
        node.loc().join(" / ")
    );
    let export = AttributeExport {
        layer: args.export_layer.clone(),
        folder: args.output_dir.clone(),
        suffix: args.suffix.clone(),
    };
    let table = analyse_node(&tree, node, args.attribute, Some(&export))
        .with_context(|| format!("Failed to analyse {}", args.attribute))?;
    let table_path = export.file_path(args.attribute);

    info!("Step 3/3: Writing optional outputs...");
    let report = match &args.json {
        Some(path) => {
            let report = layer_report(&tree, node, &table, &args.export_layer)?;
            write_report(&report, path).context("Failed to write JSON report")?;
            Some(path.clone())
        }
        None => None,
    };

    let heatmap = match &args.heatmap_mask {
        Some(mask_path) => {
            let mask = Arc::new(FootMask::load(mask_path)?);
            let vector = table.for_node(node)?;
            let path = FootHeatmap::from_attribute(vector, &mask)
                .export_foot_heatmap(
                    args.range,
                    &args.output_dir,
                    &format!("_{}{}", args.attribute, args.suffix),
                )
                .context("Failed to export foot heatmap")?;
            Some(path)
        }
        None => None,
    };

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(AnalyseOutputs {
        table: table_path,
        report,
        heatmap,
    })
}

/// Validate analyse arguments
pub fn validate_args(args: &AnalyseArgs) -> Result<()> {
    validate_load_args(&args.load)?;

    if args.export_layer.trim().is_empty() {
        anyhow::bail!("Export layer cannot be empty");
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    Ok(())
}
