use nalgebra::Matrix4;
use scene_types::{Mat, SkeletonNode};

use crate::error::PipelineError;
use crate::traits::{JointMap, SkeletonBuilder};

/// Composes joint transforms down the hierarchy and moves them into camera
/// space with the frame's extrinsic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchySkeletonBuilder;

impl SkeletonBuilder for HierarchySkeletonBuilder {
    fn build(
        &self,
        root: &SkeletonNode,
        _intrinsic: &Mat,
        extrinsic: &Mat,
    ) -> Result<JointMap, PipelineError> {
        let camera = extrinsic.to_matrix4().ok_or_else(|| {
            PipelineError::collaborator(
                "skeleton building",
                format!(
                    "camera extrinsic is {}x{}, expected 4x4",
                    extrinsic.rows, extrinsic.cols
                ),
            )
        })?;

        let mut joints = JointMap::new();
        let mut stack: Vec<(&SkeletonNode, Matrix4<f32>)> = vec![(root, camera)];
        while let Some((node, parent)) = stack.pop() {
            let local = node.transform.to_matrix4().ok_or_else(|| {
                PipelineError::collaborator(
                    "skeleton building",
                    format!("joint {:?} transform is not 4x4", node.name),
                )
            })?;
            let world = parent * local;
            if joints.insert(node.name.clone(), world).is_some() {
                return Err(PipelineError::collaborator(
                    "skeleton building",
                    format!("joint {:?} appears twice", node.name),
                ));
            }
            stack.extend(node.children.iter().map(|child| (child, world)));
        }
        Ok(joints)
    }
}
