//! Converts per-body-part triangle soups into indexed, colored meshes.
//!
//! Welding is exact: two points share a vertex only when all three
//! coordinates have identical bit patterns. No spatial tolerance is applied,
//! so points that differ by floating-point noise stay distinct.

pub mod obj;
pub mod validate;
pub mod weld;

pub use obj::export_obj;
pub use validate::{expand_mesh, validate_mesh};
pub use weld::{derive_colors, index_body_part, index_triangles, vertex_colors};

/// Errors from mesh validation and export.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("{buffer} buffer length {len} is not a multiple of 3")]
    MalformedBuffer { buffer: &'static str, len: usize },

    #[error("index {index} at position {position} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },

    #[error("color buffer has {colors} entries, expected {expected}")]
    ColorMismatch { colors: usize, expected: usize },

    #[error("{meshes} meshes but {definitions} body part definitions")]
    DefinitionMismatch { meshes: usize, definitions: usize },
}
