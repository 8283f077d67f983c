use serde::{Deserialize, Serialize};

/// Node of a binary decision tree stored in a flat arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node routing `feature <= threshold` to `left`.
    Split {
        feature_index: u16,
        threshold: f32,
        left: u32,
        right: u32,
    },
    /// Terminal node holding the normalized class distribution.
    Leaf { distribution: Vec<f32> },
}

/// Decision tree with its root at index 0.
///
/// Children are always stored after their parent, so walking from the root
/// terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk the tree and return the class distribution of the reached leaf.
    pub fn leaf_distribution(&self, features: &[f32]) -> Option<&[f32]> {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx)? {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature_index as usize).copied()?;
                    idx = if value <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
                TreeNode::Leaf { distribution } => return Some(distribution),
            }
        }
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let child_depth = depths[idx] + 1;
                for child in [*left as usize, *right as usize] {
                    if let Some(slot) = depths.get_mut(child) {
                        *slot = child_depth;
                        max_depth = max_depth.max(child_depth);
                    }
                }
            }
        }
        max_depth
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Validate structural invariants of the tree.
    pub fn validate(&self, n_classes: usize, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature_index as usize >= n_features {
                        return Err(format!(
                            "Node {idx} splits on feature {feature_index} but only {n_features} exist"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("Node {idx} has a non-finite threshold"));
                    }
                    for child in [*left as usize, *right as usize] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("Node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "Leaf {idx} has {} class weights but expected {n_classes}",
                            distribution.len()
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_tree() -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature_index: 0,
                    threshold: 5.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    distribution: vec![1.0, 0.0],
                },
                TreeNode::Split {
                    feature_index: 1,
                    threshold: 0.5,
                    left: 3,
                    right: 4,
                },
                TreeNode::Leaf {
                    distribution: vec![0.25, 0.75],
                },
                TreeNode::Leaf {
                    distribution: vec![0.0, 1.0],
                },
            ],
        }
    }

    #[test]
    fn walks_to_the_matching_leaf() {
        let tree = two_level_tree();
        assert_eq!(tree.leaf_distribution(&[5.0, 0.0]), Some(&[1.0, 0.0][..]));
        assert_eq!(tree.leaf_distribution(&[6.0, 0.5]), Some(&[0.25, 0.75][..]));
        assert_eq!(tree.leaf_distribution(&[6.0, 1.0]), Some(&[0.0, 1.0][..]));
        assert_eq!(tree.leaf_distribution(&[6.0]), None);
    }

    #[test]
    fn reports_depth_and_leaves() {
        let tree = two_level_tree();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert!(tree.validate(2, 2).is_ok());
    }

    #[test]
    fn rejects_backward_children() {
        let mut tree = two_level_tree();
        tree.nodes[2] = TreeNode::Split {
            feature_index: 1,
            threshold: 0.5,
            left: 0,
            right: 4,
        };
        assert!(tree.validate(2, 2).is_err());
        assert!(two_level_tree().validate(3, 2).is_err());
        assert!(two_level_tree().validate(2, 1).is_err());
    }
}
