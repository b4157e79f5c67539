use nalgebra::Vector3;
use scene_types::{BodyPartDefinition, BodypartFrameCluster, FrameData};
use tracing::debug;

use crate::error::PipelineError;
use crate::traits::{FrameClusterer, JointMap};

/// Leader clustering on the direction of each body part's bone.
///
/// For every body part, frames are visited in order; a frame joins the first
/// cluster whose representative's bone points within `max_angle` radians of
/// its own, or starts a new cluster. Frames without the body part's crop or
/// without both end joints are left out.
#[derive(Debug, Clone, Copy)]
pub struct OrientationClusterer {
    pub max_angle: f32,
}

impl Default for OrientationClusterer {
    fn default() -> Self {
        Self {
            max_angle: 30f32.to_radians(),
        }
    }
}

fn bone_direction(joints: &JointMap, definition: &BodyPartDefinition) -> Option<Vector3<f32>> {
    let from = joints.get(&definition.node1)?;
    let to = joints.get(&definition.node2)?;
    let dir = to.fixed_view::<3, 1>(0, 3) - from.fixed_view::<3, 1>(0, 3);
    dir.try_normalize(f32::EPSILON)
}

impl FrameClusterer for OrientationClusterer {
    fn cluster(
        &self,
        _feature_dim: usize,
        definitions: &[BodyPartDefinition],
        joint_maps: &[JointMap],
        frames: &[FrameData],
        _iterations: usize,
    ) -> Result<BodypartFrameCluster, PipelineError> {
        PipelineError::check_len("joint maps", frames.len(), joint_maps.len())?;
        let min_cos = self.max_angle.cos();

        let clusters = definitions
            .iter()
            .enumerate()
            .map(|(body_part, definition)| {
                let mut leaders: Vec<Vector3<f32>> = Vec::new();
                let mut groups: Vec<Vec<usize>> = Vec::new();
                for (frame, joints) in joint_maps.iter().enumerate() {
                    if frames[frame].body_part_image(body_part).is_none() {
                        continue;
                    }
                    let Some(dir) = bone_direction(joints, definition) else {
                        continue;
                    };
                    match leaders.iter().position(|leader| leader.dot(&dir) >= min_cos) {
                        Some(group) => groups[group].push(frame),
                        None => {
                            leaders.push(dir);
                            groups.push(vec![frame]);
                        }
                    }
                }
                debug!(body_part, clusters = groups.len(), "clustered frames");
                groups
            })
            .collect();
        Ok(clusters)
    }
}
