//! Inspect command implementation.
//!
//! Loads a guiding file and prints the tree below one node, with a count of
//! nodes per layer.

use super::models::InspectArgs;
use super::utils::{load_tree, select_node, validate_load_args};
use crate::tree::TrialTree;
use anyhow::Result;
use log::info;

/// Execute the inspect command
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(args: InspectArgs) -> Result<()> {
    validate_load_args(&args.load)?;

    let tree = load_tree(&args.load)?;
    let node = select_node(&tree, &args.node)?;
    info!(
        "Inspecting [{}] ({} stances)",
        node.loc().join(" / "),
        node.collect_leaves().len()
    );

    print!("{}", node.render(args.shapes));
    println!();
    println!("{}", layer_summary(&tree));

    Ok(())
}

/// One line per layer: `<layer>: <node count>`
pub fn layer_summary(tree: &TrialTree) -> String {
    tree.layers()
        .names()
        .iter()
        .enumerate()
        .map(|(level, layer)| format!("{}: {}", layer, tree.root().collect_level(level).len()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, SensorFrame, StanceSegment};
    use ndarray::array;

    #[test]
    fn test_layer_summary() {
        let mut tree = TrialTree::new();
        let frame = SensorFrame::new(vec![0.0], vec![0], array![[1.0]]).unwrap();
        for trial in ["trial 1", "trial 2"] {
            tree.root_branch_mut()
                .branch_or_insert("S1")
                .unwrap()
                .branch_or_insert("fast walking")
                .unwrap()
                .branch_or_insert(trial)
                .unwrap()
                .branch_or_insert("L")
                .unwrap()
                .add_branch(Node::Leaf(
                    StanceSegment::new("stance 1", 0.0, 0.0, frame.clone()).unwrap(),
                ));
        }

        assert_eq!(
            layer_summary(&tree),
            "root: 1\nsubject: 1\ncondition: 1\ntrial: 2\nfoot: 2\nstance: 2"
        );
    }
}
