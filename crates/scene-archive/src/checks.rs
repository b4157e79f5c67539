//! Shape, value and path rules shared by the writer and the reader.

use std::path::{Component, Path};

use scene_types::Mat;

pub const EXTRINSIC_SHAPES: &[(usize, usize)] = &[(4, 4)];
pub const INTRINSIC_SHAPES: &[(usize, usize)] = &[(3, 3), (3, 4)];

/// Why `mat` is not one of `shapes`, if it is not.
pub fn matrix_problem(mat: &Mat, shapes: &[(usize, usize)]) -> Option<String> {
    if let Err(e) = mat.check_shape() {
        return Some(e.to_string());
    }
    if shapes.iter().any(|&(r, c)| mat.is_shape(r, c)) {
        None
    } else {
        Some(format!("unexpected shape {}x{}", mat.rows, mat.cols))
    }
}

/// Position of the first NaN or infinite value. JSON has no spelling for
/// these, so they cannot be archived.
pub fn first_non_finite(values: &[f32]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

/// Image paths are plain names below the document directory.
pub fn is_confined(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
