//! File-based stand-ins for the upstream reconstruction stages.
//!
//! Capture and voxel inputs are JSON documents; crops are PNG files next to
//! them. The clusterer and triangulator are the simplest workable versions.

mod cluster;
mod frames;
mod skeleton;
mod surface;
mod voxels;

pub use cluster::OrientationClusterer;
pub use frames::{CaptureFrame, CaptureImage, DefinitionsFile, JsonFrameSource};
pub use skeleton::HierarchySkeletonBuilder;
pub use surface::SurfaceTriangulator;
pub use voxels::{JsonVoxelSource, VoxelBodyPart, VoxelFile};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::PipelineError;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| PipelineError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
