//! Sensor attribute analysis.
//!
//! This module handles:
//! - Computing per-sensor attributes of a stance (peak, pressure-time integral)
//! - Averaging them up the trial tree
//! - Exporting a layer of averaged vectors as a table

pub mod attribute;
pub mod average;

pub use attribute::{sensor_peak, sensor_pti, Attribute, AttributeVector};
pub use average::{attribute_average_up, AttributeTable};

use crate::output::{write_attribute_table, AttributeReport, ReportRow};
use crate::tree::{Node, TrialTree};
use crate::utils::config::DEFAULT_OUTPUT_DIR;
use crate::utils::error::AnalysisError;
use log::info;
use std::path::PathBuf;

/// Where and how to export an attribute table
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeExport {
    /// Layer whose nodes become table rows
    pub layer: String,
    pub folder: PathBuf,
    /// Appended to the attribute name in the file name
    pub suffix: String,
}

impl Default for AttributeExport {
    fn default() -> Self {
        Self {
            layer: "root".to_string(),
            folder: PathBuf::from(DEFAULT_OUTPUT_DIR),
            suffix: String::new(),
        }
    }
}

impl AttributeExport {
    /// `<folder>/<attribute><suffix>.csv`
    pub fn file_path(&self, attribute: Attribute) -> PathBuf {
        self.folder
            .join(format!("{}{}.csv", attribute.name(), self.suffix))
    }
}

/// Peak pressure of every node below `node`, optionally exported
///
/// **Public** - node-level entry point
///
/// # Example
/// ```ignore
/// let export = AttributeExport { layer: "condition".into(), folder: "output".into(), suffix: "_1213".into() };
/// let table = node_sensor_peak(&tree, tree.root(), Some(&export))?; // output/sensor_peak_1213.csv
/// ```
pub fn node_sensor_peak(
    tree: &TrialTree,
    node: &Node,
    export: Option<&AttributeExport>,
) -> Result<AttributeTable, AnalysisError> {
    analyse_node(tree, node, Attribute::SensorPeak, export)
}

/// Pressure-time integral of every node below `node`, optionally exported
pub fn node_sensor_pti(
    tree: &TrialTree,
    node: &Node,
    export: Option<&AttributeExport>,
) -> Result<AttributeTable, AnalysisError> {
    analyse_node(tree, node, Attribute::SensorPti, export)
}

/// Average `attribute` up to `node`; with `export`, also write the table of
/// the export layer's nodes.
///
/// # Errors
/// * `AnalysisError::Tree` - unknown export layer
/// * `AnalysisError::Output` - table cannot be written
/// * any attribute computation error
pub fn analyse_node(
    tree: &TrialTree,
    node: &Node,
    attribute: Attribute,
    export: Option<&AttributeExport>,
) -> Result<AttributeTable, AnalysisError> {
    let table = attribute_average_up(node, attribute)?;

    if let Some(export) = export {
        let rows = layer_rows(tree, node, &table, &export.layer)?;
        let path = export.file_path(attribute);
        let rows: Vec<(String, &AttributeVector)> =
            rows.into_iter().map(|row| (row.label, row.vector)).collect();
        write_attribute_table(&rows, &path)?;
        info!(
            "Exported {} {} rows at layer '{}' to {}",
            rows.len(),
            attribute,
            export.layer,
            path.display()
        );
    }

    Ok(table)
}

/// One node of an export layer with its averaged vector
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow<'a> {
    /// Location names below the root, up to the layer, joined by spaces
    pub label: String,
    pub loc: &'a [String],
    pub vector: &'a AttributeVector,
}

/// Rows for every node of `layer` at or below `node`
///
/// # Errors
/// * `AnalysisError::Tree` - `layer` is not a layer of `tree`
/// * `AnalysisError::MissingAttribute` - `table` was computed for another subtree
pub fn layer_rows<'a>(
    tree: &TrialTree,
    node: &'a Node,
    table: &'a AttributeTable,
    layer: &str,
) -> Result<Vec<LayerRow<'a>>, AnalysisError> {
    let level = tree.layers().level_of(layer)?;

    node.collect_level(level)
        .into_iter()
        .map(|n| {
            Ok(LayerRow {
                label: n.loc()[1..].join(" "),
                loc: n.loc(),
                vector: table.for_node(n)?,
            })
        })
        .collect()
}

/// JSON report of the rows of `layer`
pub fn layer_report(
    tree: &TrialTree,
    node: &Node,
    table: &AttributeTable,
    layer: &str,
) -> Result<AttributeReport, AnalysisError> {
    let mut report = AttributeReport::new(table.attribute(), layer);
    report.rows = layer_rows(tree, node, table, layer)?
        .into_iter()
        .map(|row| ReportRow {
            label: row.label,
            loc: row.loc.to_vec(),
            values: row.vector.clone(),
        })
        .collect();
    Ok(report)
}
