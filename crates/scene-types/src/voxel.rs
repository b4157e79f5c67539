use serde::{Deserialize, Serialize};

/// Dimensions of a dense per-body-part voxel volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoxelGrid {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl VoxelGrid {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Linear offset of cell `(x, y, z)`; x varies fastest.
    pub fn linear_index(&self, x: u32, y: u32, z: u32) -> Option<usize> {
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        let (w, h) = (self.width as usize, self.height as usize);
        Some((z as usize * h + y as usize) * w + x as usize)
    }
}

/// Scalar samples over a voxel grid (TSDF or integration weights).
///
/// Never persisted in the archive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Volume {
    pub grid: VoxelGrid,
    pub values: Vec<f32>,
}

impl Volume {
    pub fn filled(grid: VoxelGrid, value: f32) -> Self {
        Self {
            grid,
            values: vec![value; grid.cell_count()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<f32> {
        self.grid
            .linear_index(x, y, z)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Add a constant bias to every sample.
    pub fn offset(&mut self, bias: f32) {
        for v in &mut self.values {
            *v += bias;
        }
    }
}

/// Simplified capsule proxy for one body part.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cylinder {
    pub width: f32,
    pub height: f32,
}
