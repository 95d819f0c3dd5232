use crate::analysis::Attribute;
use crate::heatmap::ColorRange;
use crate::utils::config::{
    DEFAULT_ASC_HEADER_ROWS, DEFAULT_CONDITIONS, DEFAULT_MASK_PATH, DEFAULT_OUTPUT_DIR,
};
use std::path::PathBuf;

/// Everything needed to load a trial tree
///
/// **Public** - shared by every command
#[derive(Debug, Clone, PartialEq)]
pub struct LoadArgs {
    /// Guiding file (xlsx/xls/ods or csv)
    pub guide: PathBuf,

    /// Condition labels accepted in entry names
    pub conditions: Vec<String>,

    /// Fraction of guiding file entries to load
    pub max_read_rate: f64,

    /// Header lines to skip in `.asc` recordings
    pub asc_header_rows: usize,

    /// Optional layer layout to restructure the tree into
    pub layout: Option<Vec<String>>,

    /// Draw a progress bar while loading
    pub progress: bool,
}

impl Default for LoadArgs {
    fn default() -> Self {
        Self {
            guide: PathBuf::new(),
            conditions: DEFAULT_CONDITIONS.iter().map(|c| c.to_string()).collect(),
            max_read_rate: 1.0,
            asc_header_rows: DEFAULT_ASC_HEADER_ROWS,
            layout: None,
            progress: false,
        }
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectArgs {
    pub load: LoadArgs,

    /// Key path of the node to print (empty = root)
    pub node: Vec<String>,

    /// Show each stance's (samples, sensors) shape
    pub shapes: bool,
}

/// Arguments for the analyse command
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyseArgs {
    pub load: LoadArgs,

    pub attribute: Attribute,

    /// Key path of the analysed node (empty = root)
    pub node: Vec<String>,

    /// Layer whose nodes become table rows
    pub export_layer: String,

    pub output_dir: PathBuf,

    /// Appended to every output file name
    pub suffix: String,

    /// Also write a JSON report here
    pub json: Option<PathBuf>,

    /// Foot mask; a heatmap of the analysed node is exported when set
    pub heatmap_mask: Option<PathBuf>,

    pub range: ColorRange,
}

impl Default for AnalyseArgs {
    fn default() -> Self {
        Self {
            load: LoadArgs::default(),
            attribute: Attribute::SensorPeak,
            node: Vec::new(),
            export_layer: "condition".to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            suffix: String::new(),
            json: None,
            heatmap_mask: None,
            range: ColorRange::Static,
        }
    }
}

/// How the compared heatmaps are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// First node minus second node
    #[default]
    Difference,
    /// Elementwise mean of all nodes
    Average,
}

/// Arguments for the compare command
#[derive(Debug, Clone, PartialEq)]
pub struct CompareArgs {
    pub load: LoadArgs,

    pub attribute: Attribute,

    /// Key paths of the compared nodes
    pub nodes: Vec<Vec<String>>,

    pub mode: CompareMode,

    pub mask: PathBuf,

    pub range: ColorRange,

    pub output_dir: PathBuf,

    pub suffix: String,
}

impl Default for CompareArgs {
    fn default() -> Self {
        Self {
            load: LoadArgs::default(),
            attribute: Attribute::SensorPeak,
            nodes: Vec::new(),
            mode: CompareMode::Difference,
            mask: PathBuf::from(DEFAULT_MASK_PATH),
            range: ColorRange::Auto,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            suffix: String::new(),
        }
    }
}
