//! Averaging stance attributes up the trial tree.

use super::attribute::{Attribute, AttributeVector};
use crate::tree::Node;
use crate::utils::error::AnalysisError;
use indexmap::IndexMap;
use log::debug;

/// Attribute vectors of every node below (and including) an analysed node,
/// keyed by node location, in depth-first order
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    attribute: Attribute,
    entries: IndexMap<Vec<String>, AttributeVector>,
}

impl AttributeTable {
    fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            entries: IndexMap::new(),
        }
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Vector of the node at `loc`
    pub fn get<S: AsRef<str>>(&self, loc: &[S]) -> Option<&AttributeVector> {
        let key: Vec<String> = loc.iter().map(|s| s.as_ref().to_string()).collect();
        self.entries.get(&key)
    }

    /// Vector of `node`
    ///
    /// # Errors
    /// * `AnalysisError::MissingAttribute` - `node` lies outside the analysed subtree
    pub fn for_node(&self, node: &Node) -> Result<&AttributeVector, AnalysisError> {
        self.entries
            .get(node.loc())
            .ok_or_else(|| AnalysisError::MissingAttribute {
                attribute: self.attribute.name().to_string(),
                loc: node.loc().join(" / "),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(loc, vector)` pairs in depth-first order
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &AttributeVector)> + '_ {
        self.entries.iter().map(|(loc, v)| (loc.as_slice(), v))
    }
}

/// Compute `attribute` for every stance below `node`, then average it up
/// layer by layer.
///
/// A branch's vector is the per-sensor mean of its children's vectors.
///
/// # Errors
/// * `AnalysisError::EmptySegment` / `AnalysisError::NoTimeUnit` - from a stance
pub fn attribute_average_up(
    node: &Node,
    attribute: Attribute,
) -> Result<AttributeTable, AnalysisError> {
    debug!(
        "Averaging {} up to [{}]",
        attribute,
        node.loc().join(" / ")
    );

    let mut table = AttributeTable::new(attribute);
    average_into(node, attribute, &mut table)?;
    Ok(table)
}

fn average_into(
    node: &Node,
    attribute: Attribute,
    table: &mut AttributeTable,
) -> Result<AttributeVector, AnalysisError> {
    let vector = match node {
        Node::Leaf(segment) => attribute.compute(segment)?,
        Node::Branch(_) => {
            // reserve the parent's slot so the table stays in depth-first order
            table.entries.insert(node.loc().to_vec(), AttributeVector::new());
            let children = node
                .branches()
                .map(|child| average_into(child, attribute, table))
                .collect::<Result<Vec<_>, _>>()?;
            AttributeVector::mean(&children.iter().collect::<Vec<_>>())
        }
    };

    table.entries.insert(node.loc().to_vec(), vector.clone());
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{BranchNode, SensorFrame, StanceSegment};
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, peak: f64) -> Node {
        let frame = SensorFrame::new(
            vec![0.0, 0.01],
            vec![0, 99],
            array![[peak, 1.0], [0.0, 3.0]],
        )
        .unwrap();
        Node::Leaf(StanceSegment::new(name, 0.0, 0.01, frame).unwrap())
    }

    fn sample_tree() -> Node {
        let mut root = BranchNode::new("root");
        let trial = root
            .branch_or_insert("S1")
            .unwrap()
            .branch_or_insert("fast walking")
            .unwrap()
            .branch_or_insert("trial 1")
            .unwrap();
        let left = trial.branch_or_insert("L").unwrap();
        left.add_branch(leaf("stance 1", 100.0));
        left.add_branch(leaf("stance 2", 200.0));
        trial
            .branch_or_insert("R")
            .unwrap()
            .add_branch(leaf("stance 1", 600.0));
        Node::Branch(root)
    }

    #[test]
    fn test_branch_is_mean_of_children() {
        let tree = sample_tree();
        let table = attribute_average_up(&tree, Attribute::SensorPeak).unwrap();

        let left = table.get(&["root", "S1", "fast walking", "trial 1", "L"]).unwrap();
        assert_eq!(left.get(0), Some(150.0));
        assert_eq!(left.get(99), Some(3.0));

        // trial averages its two feet, not its three stances
        let trial = table.get(&["root", "S1", "fast walking", "trial 1"]).unwrap();
        assert_eq!(trial.get(0), Some(375.0));

        assert_eq!(table.for_node(&tree).unwrap(), trial);
    }

    #[test]
    fn test_table_covers_every_node_in_order() {
        let tree = sample_tree();
        let table = attribute_average_up(&tree, Attribute::SensorPti).unwrap();

        // root, S1, condition, trial, L, 2 stances, R, 1 stance
        assert_eq!(table.len(), 9);
        let first: Vec<&[String]> = table.iter().map(|(loc, _)| loc).take(2).collect();
        assert_eq!(first[0], &["root".to_string()]);
        assert_eq!(first[1], &["root".to_string(), "S1".to_string()]);
    }

    #[test]
    fn test_subtree_analysis() {
        let tree = sample_tree();
        let foot = tree.at(&["S1", "fast walking", "trial 1", "R"]).unwrap();
        let table = attribute_average_up(foot, Attribute::SensorPeak).unwrap();

        assert_eq!(table.len(), 2);
        assert!(matches!(
            table.for_node(&tree),
            Err(AnalysisError::MissingAttribute { .. })
        ));
    }
}
