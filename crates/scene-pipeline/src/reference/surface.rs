use scene_types::{Triangle, Volume, VoxelGrid};

use crate::error::PipelineError;
use crate::traits::Triangulator;

/// Blocky surface extraction: one quad per solid cell face that borders an
/// empty or out-of-grid cell.
///
/// A cell is solid when its TSDF sample is negative or, without a TSDF, when
/// its occupancy is positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceTriangulator;

type Corner = [u32; 3];

/// Neighbour offset and the face's corners, counter-clockwise seen from
/// outside.
const FACES: [([i64; 3], [Corner; 4]); 6] = [
    ([1, 0, 0], [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]]),
    ([-1, 0, 0], [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]]),
    ([0, 1, 0], [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]]),
    ([0, -1, 0], [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]]),
    ([0, 0, 1], [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]]),
    ([0, 0, -1], [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]]),
];

fn solid(occupancy: &Volume, tsdf: Option<&Volume>, x: i64, y: i64, z: i64) -> bool {
    if x < 0 || y < 0 || z < 0 {
        return false;
    }
    let (x, y, z) = (x as u32, y as u32, z as u32);
    match tsdf {
        Some(tsdf) => tsdf.get(x, y, z).is_some_and(|v| v < 0.0),
        None => occupancy.get(x, y, z).is_some_and(|v| v > 0.0),
    }
}

impl Triangulator for SurfaceTriangulator {
    fn triangulate(
        &self,
        grid: &VoxelGrid,
        occupancy: &Volume,
        tsdf: Option<&Volume>,
        voxel_size: f32,
    ) -> Result<Vec<Triangle>, PipelineError> {
        let samples = tsdf.unwrap_or(occupancy);
        if samples.values.len() != grid.cell_count() {
            return Err(PipelineError::collaborator(
                "triangulation",
                format!(
                    "volume has {} samples, grid has {} cells",
                    samples.values.len(),
                    grid.cell_count()
                ),
            ));
        }

        let corner = |x: u32, y: u32, z: u32, c: Corner| {
            [
                (x + c[0]) as f32 * voxel_size,
                (y + c[1]) as f32 * voxel_size,
                (z + c[2]) as f32 * voxel_size,
            ]
        };

        let mut soup = Vec::new();
        for z in 0..grid.depth {
            for y in 0..grid.height {
                for x in 0..grid.width {
                    let (xi, yi, zi) = (x as i64, y as i64, z as i64);
                    if !solid(occupancy, tsdf, xi, yi, zi) {
                        continue;
                    }
                    for (dir, corners) in &FACES {
                        if solid(occupancy, tsdf, xi + dir[0], yi + dir[1], zi + dir[2]) {
                            continue;
                        }
                        let [a, b, c, d] = corners.map(|c| corner(x, y, z, c));
                        soup.push(Triangle::new(a, b, c));
                        soup.push(Triangle::new(a, c, d));
                    }
                }
            }
        }
        Ok(soup)
    }
}
