use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matrix::Mat;

/// Deepest joint chain accepted from an archive.
pub const MAX_SKELETON_DEPTH: usize = 32;

/// Problems found while validating a skeleton tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkeletonError {
    #[error("joint name {name:?} appears more than once")]
    DuplicateJoint { name: String },

    #[error("skeleton deeper than {max} joints")]
    TooDeep { max: usize },

    #[error("joint {name:?} has a {rows}x{cols} transform, expected 4x4")]
    BadTransform {
        name: String,
        rows: usize,
        cols: usize,
    },
}

/// One joint of a hierarchical skeleton, owning its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonNode {
    pub name: String,
    /// Transform relative to the parent joint (4x4).
    pub transform: Mat,
    #[serde(default)]
    pub children: Vec<SkeletonNode>,
}

impl SkeletonNode {
    pub fn new(name: impl Into<String>, transform: Mat) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SkeletonNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn joint_count(&self) -> usize {
        1 + self.children.iter().map(SkeletonNode::joint_count).sum::<usize>()
    }

    /// Number of joints on the longest root-to-leaf chain.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(SkeletonNode::depth).max().unwrap_or(0)
    }

    /// Depth-first, pre-order traversal.
    pub fn iter(&self) -> impl Iterator<Item = &SkeletonNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, name: &str) -> Option<&SkeletonNode> {
        self.iter().find(|node| node.name == name)
    }

    /// Check the tree can be resolved by joint name: unique names, 4x4
    /// transforms, bounded depth.
    pub fn validate(&self) -> Result<(), SkeletonError> {
        let mut seen = HashSet::new();
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            if depth > MAX_SKELETON_DEPTH {
                return Err(SkeletonError::TooDeep {
                    max: MAX_SKELETON_DEPTH,
                });
            }
            if !node.transform.is_shape(4, 4) {
                return Err(SkeletonError::BadTransform {
                    name: node.name.clone(),
                    rows: node.transform.rows,
                    cols: node.transform.cols,
                });
            }
            if !seen.insert(node.name.as_str()) {
                return Err(SkeletonError::DuplicateJoint {
                    name: node.name.clone(),
                });
            }
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm() -> SkeletonNode {
        SkeletonNode::new("shoulder", Mat::identity(4)).with_child(
            SkeletonNode::new("elbow", Mat::identity(4))
                .with_child(SkeletonNode::new("wrist", Mat::identity(4))),
        )
    }

    #[test]
    fn counts_and_depth() {
        let root = SkeletonNode::new("root", Mat::identity(4))
            .with_child(arm())
            .with_child(SkeletonNode::new("head", Mat::identity(4)));
        assert_eq!(root.joint_count(), 5);
        assert_eq!(root.depth(), 4);
        let names: Vec<_> = root.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["root", "shoulder", "elbow", "wrist", "head"]);
        assert!(root.find("wrist").is_some());
        assert!(root.validate().is_ok());
    }

    #[test]
    fn duplicate_joint_rejected() {
        let root = SkeletonNode::new("root", Mat::identity(4))
            .with_child(SkeletonNode::new("root", Mat::identity(4)));
        assert_eq!(
            root.validate(),
            Err(SkeletonError::DuplicateJoint {
                name: "root".into()
            })
        );
    }

    #[test]
    fn bad_transform_rejected() {
        let root = SkeletonNode::new("root", Mat::identity(3));
        assert!(matches!(
            root.validate(),
            Err(SkeletonError::BadTransform { rows: 3, cols: 3, .. })
        ));
    }

    #[test]
    fn too_deep_rejected() {
        let mut node = SkeletonNode::new("j0", Mat::identity(4));
        for i in 1..=MAX_SKELETON_DEPTH {
            node = SkeletonNode::new(format!("j{i}"), Mat::identity(4)).with_child(node);
        }
        assert!(matches!(node.validate(), Err(SkeletonError::TooDeep { .. })));
    }

    #[test]
    fn children_default_to_empty() {
        let json = r#"{"name":"root","transform":{"rows":4,"cols":4,"data":[1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1]}}"#;
        let node: SkeletonNode = serde_json::from_str(json).unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.transform, Mat::identity(4));
    }
}
