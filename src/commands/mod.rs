//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyse;
pub mod compare;
pub mod inspect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyse::{execute_analyse, AnalyseOutputs};
pub use compare::execute_compare;
pub use inspect::execute_inspect;
pub use models::{AnalyseArgs, CompareArgs, CompareMode, InspectArgs, LoadArgs};
pub use utils::{display_version, parse_node_path};
