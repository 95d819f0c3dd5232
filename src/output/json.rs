//! JSON attribute report writer.
//!
//! A report holds the same rows as a CSV attribute table plus the metadata
//! needed to read it back: schema version, attribute, export layer and time.

use super::{create_parent_dirs, validate_output_path};
use crate::analysis::{Attribute, AttributeVector};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    /// Schema version for compatibility checking
    pub version: String,

    pub attribute: Attribute,

    /// Layer the rows were taken from
    pub layer: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    pub rows: Vec<ReportRow>,
}

/// One exported node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Location names below the root joined by spaces
    pub label: String,

    /// Full location from the root
    pub loc: Vec<String>,

    /// Sensor id to value
    pub values: AttributeVector,
}

impl AttributeReport {
    /// Empty report stamped with the current time
    pub fn new(attribute: Attribute, layer: impl Into<String>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            attribute,
            layer: layer.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows: Vec::new(),
        }
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(
    report: &AttributeReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Report written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Read a report from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<AttributeReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: AttributeReport = serde_json::from_reader(file)?;

    debug!(
        "Report loaded: version {}, {} rows of {}",
        report.version,
        report.rows.len(),
        report.attribute
    );

    Ok(report)
}
