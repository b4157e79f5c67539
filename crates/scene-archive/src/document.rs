//! Serde layout of the archive document.
//!
//! Field order is the on-disk section order.

use serde::{Deserialize, Serialize};

use scene_types::{BodyPartDefinition, Cylinder, Facing, Mat, SkeletonNode, VoxelGrid};

use crate::metadata::ArchiveMetadata;

/// Format identifier written to the header.
pub const FORMAT_ID: &str = "body-scene-archive";

/// Current archive format version.
pub const FORMAT_VERSION: u32 = 1;

/// File name of the document inside the working directory.
pub const DOCUMENT_NAME: &str = "packaged.json";

/// The whole archive document.
///
/// `format`, `version` and `metadata` are optional on read so that bare
/// documents holding only the named sections still load (as version 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArchiveMetadata>,
    pub bodypartdefinitions: Vec<BodyPartDefinition>,
    pub bodypart_frame_cluster: Vec<BodyPartClusters>,
    pub frame_datas: Vec<FrameRecord>,
    /// Vertex positions, one flat list per body part.
    pub triangle_vertices: Vec<Vec<f32>>,
    /// Triangle indices, one flat list per body part.
    pub triangle_indices: Vec<Vec<u32>>,
    pub voxels: Vec<VoxelGrid>,
    pub voxel_size: f32,
    #[serde(default)]
    pub cylinders: Vec<Cylinder>,
}

/// Representative frames of one body part's clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyPartClusters {
    pub bodypart: usize,
    pub clusters: Vec<ClusterRecord>,
}

/// One non-empty cluster: its representative frame and that frame's crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub main_frame: usize,
    /// PNG file relative to the document directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_offset: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<[i32; 2]>,
    /// Embedded crop; takes precedence over `image_path` on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

/// Per-frame camera, pose and full-body crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub camera_extrinsic: Mat,
    pub camera_intrinsic_mat: Mat,
    pub skeleton: SkeletonNode,
    pub facing: Facing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_image_offset: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_image_size: Option<[i32; 2]>,
    /// Embedded crop; takes precedence over `body_image_path` on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_image: Option<InlineImage>,
}

/// A crop embedded in the document as base64-encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub data: String,
    pub offset: [i32; 2],
    pub size: [i32; 2],
}
