//! pedar-probe
//!
//! Plantar pressure analysis for pedar insole recordings.
//!
//! This crate provides the core implementation for the
//! `pedar-probe` CLI tool:
//! - `tree`: the subject / condition / trial / foot / stance store
//! - `parser`: guiding file and `.asc` recording loading
//! - `analysis`: peak pressure and pressure-time integral per sensor
//! - `heatmap`: foot heatmaps, their arithmetic and SVG rendering
//! - `output`: CSV, JSON and SVG writers
//!
//! ## Getting Started
//!
//! ```bash
//! pedar-probe inspect --guide "data/subjects/walking plantar pressure time slot.xlsx"
//! pedar-probe analyse --guide guide.xlsx --attribute sensor_pti --export-layer condition
//! ```

pub mod analysis;
pub mod commands;
pub mod heatmap;
pub mod output;
pub mod parser;
pub mod tree;
pub mod utils;

pub use analysis::{attribute_average_up, Attribute, AttributeTable, AttributeVector};
pub use heatmap::{ColorRange, FootHeatmap, FootMask};
pub use parser::trials_parse;
pub use tree::{Node, TrialTree};
