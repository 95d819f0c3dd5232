//! CSV attribute table writer.
//!
//! One row per exported node: a label column followed by one column per
//! sensor id. Sensors missing from a row are left blank.

use super::{create_parent_dirs, validate_output_path};
use crate::analysis::AttributeVector;
use crate::tree::SensorId;
use crate::utils::error::OutputError;
use log::info;
use std::collections::BTreeSet;
use std::path::Path;

/// Header of the label column
pub const LABEL_COLUMN: &str = "condition";

/// Write labelled attribute vectors as a CSV table
///
/// **Public** - used by attribute export
///
/// # Arguments
/// * `rows` - `(label, vector)` pairs in output order
/// * `output_path` - Path to the CSV file
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::CsvFailed` - CSV encoding or write error
pub fn write_attribute_table(
    rows: &[(String, &AttributeVector)],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing attribute table to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let sensors: BTreeSet<SensorId> = rows.iter().flat_map(|(_, v)| v.sensors()).collect();

    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = vec![LABEL_COLUMN.to_string()];
    header.extend(sensors.iter().map(|s| s.to_string()));
    writer.write_record(&header)?;

    for (label, vector) in rows {
        let mut record = vec![label.clone()];
        record.extend(
            sensors
                .iter()
                .map(|&s| vector.get(s).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!(
        "Attribute table written ({} rows, {} sensors)",
        rows.len(),
        sensors.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_table_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sensor_peak.csv");

        let a: AttributeVector = [(0, 1.5), (99, 2.0)].into_iter().collect();
        let b: AttributeVector = [(0, 3.0)].into_iter().collect();
        write_attribute_table(
            &[("S1 fast walking".to_string(), &a), ("S1 slow walking".to_string(), &b)],
            &path,
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "condition,0,99\nS1 fast walking,1.5,2\nS1 slow walking,3,\n"
        );
    }

    #[test]
    fn test_directory_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_attribute_table(&[], dir.path()).unwrap_err();
        assert!(matches!(err, OutputError::InvalidPath(_)));
    }
}
