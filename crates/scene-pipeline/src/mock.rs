//! Deterministic test doubles for every upstream stage.
//!
//! [`MockCapture`] holds a small synthetic capture session and hands out
//! collaborators that replay it, so writer runs can be tested without any
//! capture files on disk.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use scene_types::{
    BodyPartDefinition, BodypartFrameCluster, CroppedImage, Cylinder, Facing, FrameData, Mat,
    SkeletonNode, Triangle, Volume, VoxelGrid,
};

use crate::error::PipelineError;
use crate::traits::*;

/// Replays a fixed set of definitions and frames.
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    pub definitions: Vec<BodyPartDefinition>,
    pub frames: Vec<FrameData>,
}

impl FrameSource for MockFrameSource {
    fn load_definitions(&self, _path: &Path) -> Result<Vec<BodyPartDefinition>, PipelineError> {
        Ok(self.definitions.clone())
    }

    /// Returns at most one frame per file name.
    fn load_frames(
        &self,
        filenames: &[PathBuf],
        _extension: &str,
        _body_part_count: usize,
    ) -> Result<Vec<FrameData>, PipelineError> {
        Ok(self.frames.iter().take(filenames.len()).cloned().collect())
    }
}

/// Maps every joint to its local transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSkeletonBuilder;

impl SkeletonBuilder for MockSkeletonBuilder {
    fn build(
        &self,
        root: &SkeletonNode,
        _intrinsic: &Mat,
        _extrinsic: &Mat,
    ) -> Result<JointMap, PipelineError> {
        Ok(root
            .iter()
            .map(|node| {
                let m = node.transform.to_matrix4().unwrap_or_else(nalgebra::Matrix4::identity);
                (node.name.clone(), m)
            })
            .collect())
    }
}

/// Either a fixed answer, or one singleton cluster per frame that carries
/// the body part's crop.
#[derive(Debug, Clone, Default)]
pub struct MockClusterer {
    pub fixed: Option<BodypartFrameCluster>,
}

impl FrameClusterer for MockClusterer {
    fn cluster(
        &self,
        _feature_dim: usize,
        definitions: &[BodyPartDefinition],
        _joint_maps: &[JointMap],
        frames: &[FrameData],
        _iterations: usize,
    ) -> Result<BodypartFrameCluster, PipelineError> {
        if let Some(fixed) = &self.fixed {
            return Ok(fixed.clone());
        }
        Ok((0..definitions.len())
            .map(|body_part| {
                frames
                    .iter()
                    .enumerate()
                    .filter(|(_, frame)| frame.body_part_image(body_part).is_some())
                    .map(|(index, _)| vec![index])
                    .collect()
            })
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockVoxelSource {
    pub reconstruction: VoxelReconstruction,
}

impl VoxelSource for MockVoxelSource {
    fn load(&self, _path: &Path) -> Result<VoxelReconstruction, PipelineError> {
        Ok(self.reconstruction.clone())
    }
}

/// Emits one unit quad (two triangles, four distinct corners) lying at the
/// height of the first TSDF sample, or at zero without a TSDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTriangulator;

impl Triangulator for MockTriangulator {
    fn triangulate(
        &self,
        _grid: &VoxelGrid,
        _occupancy: &Volume,
        tsdf: Option<&Volume>,
        voxel_size: f32,
    ) -> Result<Vec<Triangle>, PipelineError> {
        let h = tsdf.and_then(|v| v.values.first().copied()).unwrap_or(0.0);
        let s = voxel_size;
        Ok(vec![
            Triangle::new([0.0, 0.0, h], [s, 0.0, h], [0.0, s, h]),
            Triangle::new([s, 0.0, h], [s, s, h], [0.0, s, h]),
        ])
    }
}

/// A synthetic capture session.
///
/// Body part `i` spans joints `joint{i}` to `joint{i+1}`; frame `f` faces
/// front, back or side by `f % 3` and carries the crop of body part
/// `f % body_part_count`. Body part `i`'s TSDF is filled with `-(i + 1) / 10`.
#[derive(Debug, Clone)]
pub struct MockCapture {
    pub definitions: Vec<BodyPartDefinition>,
    pub frames: Vec<FrameData>,
    pub reconstruction: VoxelReconstruction,
    pub clusters: Option<BodypartFrameCluster>,
}

fn chain(joints: usize) -> SkeletonNode {
    (0..joints).rev().fold(None, |child: Option<SkeletonNode>, j| {
        let mut transform = Mat::identity(4);
        transform.data[7] = 0.25;
        let node = SkeletonNode::new(format!("joint{j}"), transform);
        Some(match child {
            Some(child) => node.with_child(child),
            None => node,
        })
    })
    .unwrap_or_else(|| SkeletonNode::new("joint0", Mat::identity(4)))
}

fn pattern(w: u32, h: u32, seed: u8) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| Rgb([seed, (x * 30) as u8, (y * 30) as u8]))
}

impl MockCapture {
    pub fn new(body_part_count: usize, frame_count: usize) -> Self {
        let palette = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let definitions: Vec<_> = (0..body_part_count)
            .map(|i| {
                BodyPartDefinition::new(
                    i,
                    format!("part{i}"),
                    format!("joint{i}"),
                    format!("joint{}", i + 1),
                    palette[i % palette.len()],
                )
            })
            .collect();

        let frames = (0..frame_count)
            .map(|f| {
                let mut frame = FrameData {
                    camera_extrinsic: Mat::identity(4),
                    camera_intrinsic: Mat::identity(3),
                    skeleton: chain(body_part_count + 1),
                    facing: match f % 3 {
                        0 => Facing::Front,
                        1 => Facing::Back,
                        _ => Facing::Side,
                    },
                    body_image: CroppedImage::new(pattern(3, 4, f as u8), [f as i32, 0]),
                    body_part_images: Vec::new(),
                };
                if body_part_count > 0 {
                    frame.set_body_part_image(
                        f % body_part_count,
                        body_part_count,
                        CroppedImage::new(pattern(2, 2, 100 + f as u8), [f as i32, 1]),
                    );
                }
                frame
            })
            .collect();

        let grid = VoxelGrid::new(2, 2, 2);
        let reconstruction = VoxelReconstruction {
            grids: vec![grid; body_part_count],
            cylinders: (0..body_part_count)
                .map(|i| Cylinder {
                    width: 0.1,
                    height: 0.2 + i as f32 * 0.1,
                })
                .collect(),
            occupancy: vec![Volume::filled(grid, 1.0); body_part_count],
            tsdf: (0..body_part_count)
                .map(|i| Volume::filled(grid, -((i + 1) as f32) / 10.0))
                .collect(),
            voxel_size: 0.5,
        };

        Self {
            definitions,
            frames,
            reconstruction,
            clusters: None,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            frames: Box::new(MockFrameSource {
                definitions: self.definitions.clone(),
                frames: self.frames.clone(),
            }),
            skeletons: Box::new(MockSkeletonBuilder),
            clusterer: Box::new(MockClusterer {
                fixed: self.clusters.clone(),
            }),
            voxels: Box::new(MockVoxelSource {
                reconstruction: self.reconstruction.clone(),
            }),
            triangulator: Box::new(MockTriangulator),
        }
    }
}
