use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// A matrix whose data length disagrees with its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("matrix shape {rows}x{cols} needs {} values, found {len}", rows * cols)]
pub struct ShapeError {
    pub rows: usize,
    pub cols: usize,
    pub len: usize,
}

/// Dense row-major `f32` matrix.
///
/// Used for camera extrinsics (4x4), camera intrinsics (3x3 or 3x4) and
/// skeleton joint transforms (4x4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mat {
    pub rows: usize,
    pub cols: usize,
    /// Row-major values, `rows * cols` of them.
    pub data: Vec<f32>,
}

impl Mat {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
        let mat = Self { rows, cols, data };
        mat.check_shape()?;
        Ok(mat)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zeros(n, n);
        for i in 0..n {
            mat.data[i * n + i] = 1.0;
        }
        mat
    }

    /// Verify that `data` holds exactly `rows * cols` values.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        if self.data.len() != self.rows * self.cols {
            return Err(ShapeError {
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn is_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols && self.data.len() == rows * cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// View a 4x4 matrix as an `nalgebra` transform. `None` for any other shape.
    pub fn to_matrix4(&self) -> Option<Matrix4<f32>> {
        if !self.is_shape(4, 4) {
            return None;
        }
        Some(Matrix4::from_row_slice(&self.data))
    }

    pub fn from_matrix4(m: &Matrix4<f32>) -> Self {
        // nalgebra stores columns contiguously; the transpose's storage is row-major.
        Self {
            rows: 4,
            cols: 4,
            data: m.transpose().as_slice().to_vec(),
        }
    }
}
