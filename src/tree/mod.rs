//! Hierarchical trial store.
//!
//! Recordings are organised as `subject - condition - trial - foot - stance`
//! below a single root node:
//! - `frame`: time-indexed sensor tables
//! - `segment`: stance leaves
//! - `node`: typed branch/leaf nodes with uniform key lookup
//! - `layer`: layer names for each depth and layout restructuring

pub mod frame;
pub mod layer;
pub mod node;
pub mod segment;

pub use frame::{Foot, SensorFrame, SensorId};
pub use layer::{LayerMap, DEFAULT_LAYOUT};
pub use node::{BranchNode, Node};
pub use segment::StanceSegment;

use crate::utils::error::TreeError;
use log::debug;

/// Parsed recordings rooted at a node named `root`
#[derive(Debug, Clone, PartialEq)]
pub struct TrialTree {
    root: Node,
    layers: LayerMap,
}

impl Default for TrialTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialTree {
    /// Empty tree with the default layer layout
    pub fn new() -> Self {
        Self {
            root: Node::Branch(BranchNode::new("root")),
            layers: LayerMap::default(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_branch_mut(&mut self) -> &mut BranchNode {
        match &mut self.root {
            Node::Branch(b) => b,
            Node::Leaf(_) => unreachable!("tree root is always a branch"),
        }
    }

    pub fn layers(&self) -> &LayerMap {
        &self.layers
    }

    /// Subject node by name
    pub fn get(&self, key: &str) -> Result<&Node, TreeError> {
        self.root.get(key)
    }

    /// Node at a key path below the root
    pub fn at<S: AsRef<str>>(&self, path: &[S]) -> Result<&Node, TreeError> {
        self.root.at(path)
    }

    pub fn branch_names(&self) -> Vec<&str> {
        self.root.branch_names()
    }

    /// Layer names from `node`'s level down to the leaves
    pub fn layer_layout(&self, node: &Node) -> Vec<&str> {
        self.layers.layer_layout(node.level())
    }

    /// Nodes of a named layer, in tree order
    pub fn collect_layer(&self, layer: &str) -> Result<Vec<&Node>, TreeError> {
        let level = self.layers.level_of(layer)?;
        Ok(self.root.collect_level(level))
    }

    pub fn leaf_count(&self) -> usize {
        self.root.collect_leaves().len()
    }

    pub fn render(&self, shapes: bool) -> String {
        self.root.render(shapes)
    }

    pub fn print(&self) {
        self.root.print();
    }

    /// Build a new tree with a different layer layout.
    ///
    /// `layout` lists the root layer first and a (possibly new) leaf layer
    /// name last. Layers in between must exist in the current layout; layers
    /// left out are folded into the leaf names, joined with `" - "`.
    /// The source tree is not modified.
    ///
    /// # Example
    /// ```ignore
    /// let by_condition = tree.restructure(&["root", "condition", "compress"])?;
    /// ```
    pub fn restructure<S: AsRef<str>>(&self, layout: &[S]) -> Result<TrialTree, TreeError> {
        let new_layers = LayerMap::from_layout(layout)?;
        let names = new_layers.names();
        let inner = &names[1..names.len() - 1];

        let inner_levels = inner
            .iter()
            .map(|layer| self.layers.level_of(layer))
            .collect::<Result<Vec<_>, _>>()?;

        if inner_levels.contains(&0) {
            return Err(TreeError::InvalidLayout(
                "the root layer cannot be nested".to_string(),
            ));
        }

        let mut tree = TrialTree {
            root: Node::Branch(BranchNode::new(self.root.name())),
            layers: new_layers,
        };

        for leaf in self.root.collect_leaves() {
            let mut loc: Vec<Option<&str>> = leaf.loc().iter().map(|s| Some(s.as_str())).collect();
            loc[0] = None;

            let mut current = tree.root_branch_mut();
            for &level in &inner_levels {
                let name = loc.get_mut(level).and_then(Option::take).ok_or_else(|| {
                    TreeError::InvalidLayout(format!(
                        "leaf [{}] has no level {}",
                        leaf.loc().join(" / "),
                        level
                    ))
                })?;
                current = current.branch_or_insert(name)?;
            }

            let leaf_name = loc.into_iter().flatten().collect::<Vec<_>>().join(" - ");
            current.add_branch(Node::Leaf(leaf.renamed(leaf_name)));
        }

        debug!(
            "Restructured tree into layout [{}] with {} leaves",
            tree.layers.names().join(", "),
            tree.leaf_count()
        );

        Ok(tree)
    }
}
