//! Configuration and constants for the CLI.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current attribute report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// pedar insoles carry 99 sensors per foot.
// Sensor ids 0..=98 are the left foot, 99..=197 the right foot.
pub const SENSORS_PER_FOOT: usize = 99;
pub const TOTAL_SENSORS: usize = SENSORS_PER_FOOT * 2;

/// Lines preceding the first sample row of a pedar `.asc` export
pub const DEFAULT_ASC_HEADER_ROWS: usize = 19;

/// Colour range used for pressure heatmaps (kPa)
pub const STATIC_RANGE: (f64, f64) = (0.0, 300.0);

pub const DEFAULT_MASK_PATH: &str = "data/left_foot_mask.png";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// Guiding file column names
pub const FOOT_COLUMN: &str = "sideFoot";
pub const FIRST_STANCE_COLUMN: &str = "stance phase 1";

/// Conditions used when neither the CLI nor a config file names any
pub const DEFAULT_CONDITIONS: &[&str] = &["fast walking", "slow walking", "normal walking"];

/// User configuration, loaded from a JSON file
///
/// Every field is optional in the file; missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Condition labels accepted in guiding file entries
    pub conditions: Vec<String>,

    /// Greyscale left-foot sensor mask
    pub mask_path: PathBuf,

    /// Folder for exported tables and heatmaps
    pub output_dir: PathBuf,

    /// Header lines to skip in `.asc` recordings
    pub asc_header_rows: usize,

    /// Fraction of guiding file entries to load
    pub max_read_rate: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            conditions: DEFAULT_CONDITIONS.iter().map(|c| c.to_string()).collect(),
            mask_path: PathBuf::from(DEFAULT_MASK_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            asc_header_rows: DEFAULT_ASC_HEADER_ROWS,
            max_read_rate: 1.0,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"conditions": ["running"], "max_read_rate": 0.5}}"#).unwrap();

        let config = ProbeConfig::load(file.path()).unwrap();
        assert_eq!(config.conditions, vec!["running".to_string()]);
        assert_eq!(config.max_read_rate, 0.5);
        assert_eq!(config.asc_header_rows, DEFAULT_ASC_HEADER_ROWS);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_missing_config_is_error() {
        assert!(ProbeConfig::load("/nonexistent/pedar.json").is_err());
    }

    #[test]
    fn test_invalid_config_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = ProbeConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_or_default() {
        let config = ProbeConfig::load_or_default(None).unwrap();
        assert_eq!(config, ProbeConfig::default());
    }
}
