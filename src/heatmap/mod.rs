//! Foot heatmaps.
//!
//! This module handles:
//! - Loading sensor area masks
//! - Painting attribute vectors onto both feet
//! - Heatmap arithmetic (difference, sum, scale, average)
//! - SVG rendering with a static, automatic or manual colour range

pub mod foot;
pub mod mask;
pub mod render;

// Re-export main types
pub use foot::{ColorRange, FootHeatmap};
pub use mask::FootMask;
pub use render::render_foot_heatmap;
