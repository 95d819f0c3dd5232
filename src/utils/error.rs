//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while navigating or reshaping the trial tree
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Key not found: '{key}' under [{loc}]")]
    KeyNotFound { key: String, loc: String },

    #[error("Node [{0}] is a stance leaf and has no branches")]
    NotABranch(String),

    #[error("Node [{0}] is not a stance leaf")]
    NotALeaf(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Invalid layer layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid stance segment: {0}")]
    InvalidSegment(String),
}

/// Errors that can occur while assembling a sensor table
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Value grid is {rows}x{cols} but index has {times} samples and {sensors} sensors")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        times: usize,
        sensors: usize,
    },

    #[error("Time index holds a non-finite value at sample {0}")]
    NonFiniteTime(usize),

    #[error("Time index is not strictly increasing at sample {0}")]
    UnorderedIndex(usize),
}

/// Errors that can occur while loading the guiding file and recordings
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no sheets: {0}")]
    EmptyWorkbook(String),

    #[error("Missing column '{0}' in guiding file")]
    MissingColumn(String),

    #[error("Invalid entry name: {0}")]
    InvalidEntry(String),

    #[error("Invalid stance '{stance}' in entry {entry}: {reason}")]
    InvalidStance {
        entry: String,
        stance: String,
        reason: String,
    },

    #[error("Invalid foot '{0}' (expected L or R)")]
    InvalidFoot(String),

    #[error("Malformed recording {path} at line {line}: {reason}")]
    MalformedRecording {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("max_read_rate must be in (0, 1], got {0}")]
    InvalidReadRate(f64),

    #[error("Tree construction failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Sensor table error: {0}")]
    Frame(#[from] FrameError),
}

/// Errors that can occur while computing sensor attributes
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Stance [{0}] has no samples")]
    EmptySegment(String),

    #[error("Stance [{0}] has a single sample and no known sample interval")]
    NoTimeUnit(String),

    #[error("No '{attribute}' result for node [{loc}]")]
    MissingAttribute { attribute: String, loc: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Export failed: {0}")]
    Output(#[from] OutputError),
}

/// Errors that can occur while building or combining heatmaps
#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Sensor layout mismatch: {left} vs {right}")]
    LayoutMismatch { left: String, right: String },

    #[error("Cannot average an empty set of heatmaps")]
    Empty,

    #[error("Failed to load foot mask {path}: {source}")]
    MaskLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Foot mask {path} must be single-channel greyscale, found {color}")]
    MaskFormat { path: String, color: String },

    #[error("Invalid colour range: {0}")]
    InvalidRange(String),

    #[error("Attribute computation failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Export failed: {0}")]
    Output(#[from] OutputError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
