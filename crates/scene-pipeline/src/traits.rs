use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nalgebra::Matrix4;
use scene_types::{
    BodyPartDefinition, BodypartFrameCluster, Cylinder, FrameData, Mat, SkeletonNode, Triangle,
    Volume, VoxelGrid,
};

use crate::error::PipelineError;

/// Joint name to camera-space transform, built per frame for clustering.
pub type JointMap = HashMap<String, Matrix4<f32>>;

/// Everything the voxel reconstruction stage hands to triangulation.
#[derive(Debug, Clone, Default)]
pub struct VoxelReconstruction {
    pub grids: Vec<VoxelGrid>,
    pub cylinders: Vec<Cylinder>,
    /// Occupancy per body part; a cell is solid when its value is positive.
    pub occupancy: Vec<Volume>,
    /// Signed distance per body part; an empty volume means "use occupancy".
    pub tsdf: Vec<Volume>,
    /// World units per voxel.
    pub voxel_size: f32,
}

/// Loads body-part definitions and processed frames from capture files.
pub trait FrameSource {
    fn load_definitions(&self, path: &Path) -> Result<Vec<BodyPartDefinition>, PipelineError>;

    /// Load one frame per file name, in order. Each frame's body-part image
    /// list must be empty or hold `body_part_count` slots.
    fn load_frames(
        &self,
        filenames: &[PathBuf],
        extension: &str,
        body_part_count: usize,
    ) -> Result<Vec<FrameData>, PipelineError>;
}

/// Resolves a skeleton tree into joint transforms.
pub trait SkeletonBuilder {
    fn build(
        &self,
        root: &SkeletonNode,
        intrinsic: &Mat,
        extrinsic: &Mat,
    ) -> Result<JointMap, PipelineError>;
}

/// Groups frames per body part; element 0 of each cluster is its
/// representative and must carry that body part's crop.
pub trait FrameClusterer {
    fn cluster(
        &self,
        feature_dim: usize,
        definitions: &[BodyPartDefinition],
        joint_maps: &[JointMap],
        frames: &[FrameData],
        iterations: usize,
    ) -> Result<BodypartFrameCluster, PipelineError>;
}

/// Loads the per-body-part voxel reconstruction.
pub trait VoxelSource {
    fn load(&self, path: &Path) -> Result<VoxelReconstruction, PipelineError>;
}

/// Turns one body part's volume into a triangle soup.
pub trait Triangulator {
    fn triangulate(
        &self,
        grid: &VoxelGrid,
        occupancy: &Volume,
        tsdf: Option<&Volume>,
        voxel_size: f32,
    ) -> Result<Vec<Triangle>, PipelineError>;
}

/// The set of upstream stages a writer run uses.
pub struct Collaborators {
    pub frames: Box<dyn FrameSource>,
    pub skeletons: Box<dyn SkeletonBuilder>,
    pub clusterer: Box<dyn FrameClusterer>,
    pub voxels: Box<dyn VoxelSource>,
    pub triangulator: Box<dyn Triangulator>,
}

impl Collaborators {
    /// File-based reference implementations.
    pub fn reference() -> Self {
        use crate::reference::*;
        Self {
            frames: Box::new(JsonFrameSource),
            skeletons: Box::new(HierarchySkeletonBuilder),
            clusterer: Box::new(OrientationClusterer::default()),
            voxels: Box::new(JsonVoxelSource),
            triangulator: Box::new(SurfaceTriangulator),
        }
    }
}
