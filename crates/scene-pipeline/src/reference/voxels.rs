use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use scene_types::{Cylinder, Volume, VoxelGrid};

use super::read_json;
use crate::error::PipelineError;
use crate::traits::{VoxelReconstruction, VoxelSource};

/// One body part's volume in a voxel file. Values are x-fastest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelBodyPart {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub occupancy: Vec<f32>,
    #[serde(default)]
    pub tsdf: Vec<f32>,
    pub cylinder: Cylinder,
}

/// Voxel reconstruction file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelFile {
    pub voxel_size: f32,
    pub bodyparts: Vec<VoxelBodyPart>,
}

/// Reads a [`VoxelFile`] from JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonVoxelSource;

impl VoxelSource for JsonVoxelSource {
    fn load(&self, path: &Path) -> Result<VoxelReconstruction, PipelineError> {
        let file: VoxelFile = read_json(path)?;
        let mut recon = VoxelReconstruction {
            voxel_size: file.voxel_size,
            ..Default::default()
        };

        for (body_part, part) in file.bodyparts.into_iter().enumerate() {
            let grid = VoxelGrid::new(part.width, part.height, part.depth);
            let cells = grid.cell_count();
            if part.occupancy.len() != cells {
                return Err(PipelineError::Parse {
                    path: path.to_path_buf(),
                    reason: format!(
                        "body part {body_part}: occupancy has {} samples, grid has {cells} cells",
                        part.occupancy.len()
                    ),
                });
            }
            if !part.tsdf.is_empty() && part.tsdf.len() != cells {
                return Err(PipelineError::Parse {
                    path: path.to_path_buf(),
                    reason: format!(
                        "body part {body_part}: tsdf has {} samples, grid has {cells} cells",
                        part.tsdf.len()
                    ),
                });
            }

            recon.grids.push(grid);
            recon.occupancy.push(Volume {
                grid,
                values: part.occupancy,
            });
            recon.tsdf.push(Volume {
                grid,
                values: part.tsdf,
            });
            recon.cylinders.push(part.cylinder);
        }

        debug!(
            path = %path.display(),
            body_parts = recon.grids.len(),
            voxel_size = recon.voxel_size,
            "loaded voxel reconstruction"
        );
        Ok(recon)
    }
}
