//! Output writers for attribute tables and heatmaps.
//!
//! This module handles writing data to disk in various formats:
//! - CSV attribute tables
//! - JSON attribute reports
//! - SVG foot heatmaps

pub mod json;
pub mod svg;
pub mod table;

// Re-export main functions
pub use json::{write_report, AttributeReport, ReportRow};
pub use svg::write_svg;
pub use table::write_attribute_table;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate that an output path can be written as a file
///
/// **Private** - shared by all writers
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Refuse to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
