//! Typed nodes of the trial tree.
//!
//! A node is either a branch (subject, condition, trial or foot) holding an
//! ordered map of children, or a stance leaf holding sample data. Both expose
//! the same lookup interface; asking a leaf for a child is an error rather
//! than a silent miss.

use super::segment::StanceSegment;
use crate::utils::error::TreeError;
use indexmap::IndexMap;
use log::warn;

/// Intermediate node keyed by a domain label
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode {
    name: String,
    loc: Vec<String>,
    children: IndexMap<String, Node>,
}

/// Any node of the trial tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Branch(BranchNode),
    Leaf(StanceSegment),
}

impl BranchNode {
    /// Create a detached branch; it becomes the root of its own subtree
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            loc: vec![name.clone()],
            name,
            children: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loc(&self) -> &[String] {
        &self.loc
    }

    /// Attach a node under this branch.
    ///
    /// Returns `false` (and keeps the existing child) when the name is taken.
    pub fn add_branch(&mut self, mut node: Node) -> bool {
        let name = node.name().to_string();
        if self.children.contains_key(&name) {
            warn!(
                "node [{}] already in node [{}]'s branch list",
                name,
                self.loc.join(", ")
            );
            return false;
        }

        node.relocate(&self.loc);
        self.children.insert(name, node);
        true
    }

    /// Child branch with `name`, created when missing
    pub fn branch_or_insert(&mut self, name: &str) -> Result<&mut BranchNode, TreeError> {
        if !self.children.contains_key(name) {
            self.add_branch(Node::Branch(BranchNode::new(name)));
        }

        let loc = self.loc.join(" / ");
        match self.children.get_mut(name) {
            Some(Node::Branch(branch)) => Ok(branch),
            Some(Node::Leaf(_)) => Err(TreeError::NotABranch(format!("{} / {}", loc, name))),
            None => Err(TreeError::KeyNotFound {
                key: name.to_string(),
                loc,
            }),
        }
    }

    fn relocate(&mut self, parent_loc: &[String]) {
        self.loc = parent_loc.to_vec();
        self.loc.push(self.name.clone());
        let loc = self.loc.clone();
        for child in self.children.values_mut() {
            child.relocate(&loc);
        }
    }
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Branch(b) => &b.name,
            Node::Leaf(s) => s.name(),
        }
    }

    /// Names from the root down to this node
    pub fn loc(&self) -> &[String] {
        match self {
            Node::Branch(b) => &b.loc,
            Node::Leaf(s) => s.loc(),
        }
    }

    /// Depth below the root (root = 0)
    pub fn level(&self) -> usize {
        self.loc().len() - 1
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Child keys in insertion order (empty for leaves)
    pub fn branch_names(&self) -> Vec<&str> {
        self.branches().map(Node::name).collect()
    }

    /// Child nodes in insertion order (empty for leaves)
    pub fn branches(&self) -> impl Iterator<Item = &Node> + '_ {
        let children = match self {
            Node::Branch(b) => Some(&b.children),
            Node::Leaf(_) => None,
        };
        children.into_iter().flat_map(|c| c.values())
    }

    /// Descend one level by key
    pub fn get(&self, key: &str) -> Result<&Node, TreeError> {
        match self {
            Node::Branch(b) => b.children.get(key).ok_or_else(|| TreeError::KeyNotFound {
                key: key.to_string(),
                loc: b.loc.join(" / "),
            }),
            Node::Leaf(s) => Err(TreeError::NotABranch(s.loc().join(" / "))),
        }
    }

    /// Descend along a key path
    pub fn at<S: AsRef<str>>(&self, path: &[S]) -> Result<&Node, TreeError> {
        path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Stance data of a leaf
    pub fn segment(&self) -> Result<&StanceSegment, TreeError> {
        match self {
            Node::Leaf(s) => Ok(s),
            Node::Branch(b) => Err(TreeError::NotALeaf(b.loc.join(" / "))),
        }
    }

    /// All stance leaves at or below this node, depth first
    pub fn collect_leaves(&self) -> Vec<&StanceSegment> {
        let mut leaves = Vec::new();
        self.walk(&mut |node| {
            if let Node::Leaf(s) = node {
                leaves.push(s);
            }
        });
        leaves
    }

    /// All nodes at `level` at or below this node, depth first
    pub fn collect_level(&self, level: usize) -> Vec<&Node> {
        let mut nodes = Vec::new();
        self.collect_level_into(level, &mut nodes);
        nodes
    }

    fn collect_level_into<'a>(&'a self, level: usize, nodes: &mut Vec<&'a Node>) {
        if self.level() == level {
            nodes.push(self);
            return;
        }
        for branch in self.branches() {
            branch.collect_level_into(level, nodes);
        }
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for branch in self.branches() {
            branch.walk(visit);
        }
    }

    /// Indented outline of the subtree.
    ///
    /// With `shapes`, each leaf also shows its (samples, sensors) table shape.
    pub fn render(&self, shapes: bool) -> String {
        let mut out = String::new();
        let base = self.level();
        self.walk(&mut |node| {
            out.push_str(&" ".repeat(node.level() - base));
            out.push_str(node.name());
            if shapes {
                if let Node::Leaf(s) = node {
                    let (rows, cols) = s.frame().shape();
                    out.push_str(&format!("({}, {})", rows, cols));
                }
            }
            out.push('\n');
        });
        out
    }

    /// Print the subtree outline to stdout
    pub fn print(&self) {
        print!("{}", self.render(false));
    }

    fn relocate(&mut self, parent_loc: &[String]) {
        match self {
            Node::Branch(b) => b.relocate(parent_loc),
            Node::Leaf(s) => {
                s.loc = parent_loc.to_vec();
                s.loc.push(s.name().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::frame::SensorFrame;
    use ndarray::array;

    fn leaf(name: &str) -> Node {
        let frame = SensorFrame::new(vec![0.0, 0.01], vec![0, 1], array![[1.0, 2.0], [3.0, 4.0]])
            .unwrap();
        Node::Leaf(StanceSegment::new(name, 0.0, 0.01, frame).unwrap())
    }

    fn sample_tree() -> Node {
        let mut root = BranchNode::new("root");
        let foot = root
            .branch_or_insert("S4")
            .unwrap()
            .branch_or_insert("fast walking")
            .unwrap()
            .branch_or_insert("trial 1")
            .unwrap()
            .branch_or_insert("L")
            .unwrap();
        foot.add_branch(leaf("stance 1"));
        foot.add_branch(leaf("stance 2"));
        Node::Branch(root)
    }

    #[test]
    fn test_descent_and_loc() {
        let tree = sample_tree();
        let node = tree
            .at(&["S4", "fast walking", "trial 1", "L", "stance 2"])
            .unwrap();

        assert!(node.is_leaf());
        assert_eq!(node.level(), 5);
        assert_eq!(
            node.loc(),
            &["root", "S4", "fast walking", "trial 1", "L", "stance 2"]
        );
    }

    #[test]
    fn test_missing_key() {
        let tree = sample_tree();
        let err = tree.get("S999").unwrap_err();
        assert!(matches!(err, TreeError::KeyNotFound { ref key, .. } if key == "S999"));
    }

    #[test]
    fn test_leaf_has_no_children() {
        let tree = sample_tree();
        let leaf = tree.at(&["S4", "fast walking", "trial 1", "L", "stance 1"]).unwrap();
        assert!(matches!(leaf.get("x"), Err(TreeError::NotABranch(_))));
        assert!(leaf.branch_names().is_empty());
    }

    #[test]
    fn test_branch_is_not_segment() {
        let tree = sample_tree();
        assert!(matches!(tree.segment(), Err(TreeError::NotALeaf(_))));
    }

    #[test]
    fn test_duplicate_branch_keeps_first() {
        let mut branch = BranchNode::new("L");
        assert!(branch.add_branch(leaf("stance 1")));
        assert!(!branch.add_branch(leaf("stance 1")));
        assert_eq!(Node::Branch(branch).branch_names(), vec!["stance 1"]);
    }

    #[test]
    fn test_branch_names_are_descendable() {
        let tree = sample_tree();
        let foot = tree.at(&["S4", "fast walking", "trial 1", "L"]).unwrap();
        for name in foot.branch_names() {
            assert!(foot.get(name).is_ok());
        }
        assert_eq!(foot.branch_names(), vec!["stance 1", "stance 2"]);
    }

    #[test]
    fn test_collect_leaves_and_level() {
        let tree = sample_tree();
        assert_eq!(tree.collect_leaves().len(), 2);
        assert_eq!(tree.collect_level(2).len(), 1);
        assert_eq!(tree.collect_level(2)[0].name(), "fast walking");
    }

    #[test]
    fn test_render_with_shapes() {
        let tree = sample_tree();
        let condition = tree.at(&["S4", "fast walking"]).unwrap();
        let text = condition.render(true);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "fast walking");
        assert_eq!(lines[1], " trial 1");
        assert_eq!(lines[3], "   stance 1(2, 2)");
    }
}
