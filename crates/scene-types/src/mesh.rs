use serde::{Deserialize, Serialize};

/// One triangle of a raw soup: three independent points in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [[f32; 3]; 3],
}

impl Triangle {
    pub fn new(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Self {
        Self { points: [a, b, c] }
    }
}

/// Indexed triangle mesh for one body part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedMesh {
    /// Unique vertex positions [x, y, z, x, y, z, ...] in first-seen order.
    pub positions: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...], winding preserved.
    pub indices: Vec<u32>,
    /// Per-vertex RGB bytes, aligned with `positions`. Empty when not derived.
    pub colors: Vec<u8>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: usize) -> Option<[f32; 3]> {
        let base = index.checked_mul(3)?;
        let p = self.positions.get(base..base + 3)?;
        Some([p[0], p[1], p[2]])
    }

    pub fn add_vertex(&mut self, pos: [f32; 3]) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend_from_slice(&pos);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }
}
