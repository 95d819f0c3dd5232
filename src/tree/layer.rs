//! Layer naming for tree depths.
//!
//! Each depth of the trial tree carries a layer name. The default layout is
//! `root - subject - condition - trial - foot - stance`; restructured trees
//! carry the layout they were built with.

use crate::utils::error::TreeError;

pub const DEFAULT_LAYOUT: &[&str] = &["root", "subject", "condition", "trial", "foot", "stance"];

/// Layer names indexed by level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMap {
    layers: Vec<String>,
}

impl Default for LayerMap {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYOUT.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl LayerMap {
    /// Build a map from an explicit layout (root layer first, leaf layer last)
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, TreeError> {
        if layout.len() < 2 {
            return Err(TreeError::InvalidLayout(
                "layout needs at least a root and a leaf layer".to_string(),
            ));
        }

        let mut layers: Vec<String> = Vec::with_capacity(layout.len());
        for layer in layout {
            let layer = layer.as_ref();
            if layers.iter().any(|l| l == layer) {
                return Err(TreeError::InvalidLayout(format!("duplicate layer '{}'", layer)));
            }
            layers.push(layer.to_string());
        }

        Ok(Self { layers })
    }

    /// Level of a named layer
    pub fn level_of(&self, layer: &str) -> Result<usize, TreeError> {
        self.layers
            .iter()
            .position(|l| l == layer)
            .ok_or_else(|| TreeError::UnknownLayer(layer.to_string()))
    }

    /// Layer names from `level` down to the leaf layer
    pub fn layer_layout(&self, level: usize) -> Vec<&str> {
        self.layers
            .iter()
            .skip(level)
            .map(String::as_str)
            .collect()
    }

    pub fn names(&self) -> &[String] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        let map = LayerMap::default();
        assert_eq!(map.level_of("root").unwrap(), 0);
        assert_eq!(map.level_of("condition").unwrap(), 2);
        assert_eq!(map.level_of("stance").unwrap(), 5);
        assert_eq!(map.names().len(), 6);
    }

    #[test]
    fn test_unknown_layer() {
        let map = LayerMap::default();
        assert!(matches!(map.level_of("session"), Err(TreeError::UnknownLayer(_))));
    }

    #[test]
    fn test_layer_layout_from_trial() {
        let map = LayerMap::default();
        assert_eq!(map.layer_layout(3), vec!["trial", "foot", "stance"]);
    }

    #[test]
    fn test_layout_validation() {
        assert!(LayerMap::from_layout(&["root"]).is_err());
        assert!(LayerMap::from_layout(&["root", "foot", "foot"]).is_err());

        let map = LayerMap::from_layout(&["root", "condition", "compress"]).unwrap();
        assert_eq!(map.level_of("compress").unwrap(), 2);
        assert_eq!(map.layer_layout(1), vec!["condition", "compress"]);
    }
}
