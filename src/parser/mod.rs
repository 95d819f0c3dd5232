//! Loading pedar data.
//!
//! This module handles:
//! - Reading the guiding file that lists recordings and stance ranges
//! - Reading `.asc` recordings exported by pedar
//! - Building the trial tree from both

pub mod asc;
pub mod guide;
pub mod trials;

// Re-export main types
pub use asc::AscRecording;
pub use guide::{read_guide, GuideEntry};
pub use trials::{trials_parse, TrialParser};
