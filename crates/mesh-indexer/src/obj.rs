//! Wavefront OBJ export with per-vertex colors.

use scene_types::{BodyPartDefinition, IndexedMesh};

use crate::validate::validate_mesh;
use crate::weld::vertex_colors;
use crate::MeshError;

/// Export all body-part meshes as one OBJ document.
///
/// Each body part becomes an `o` object named after its definition. Vertices
/// use the common `v x y z r g b` extension with colors in 0..=1; meshes
/// without a color buffer are painted with their definition color. Face
/// indices are 1-based and offset across objects.
pub fn export_obj(
    meshes: &[IndexedMesh],
    definitions: &[BodyPartDefinition],
) -> Result<String, MeshError> {
    if meshes.len() != definitions.len() {
        return Err(MeshError::DefinitionMismatch {
            meshes: meshes.len(),
            definitions: definitions.len(),
        });
    }

    let vertex_total: usize = meshes.iter().map(IndexedMesh::vertex_count).sum();
    let mut out = String::with_capacity(vertex_total * 48);
    out.push_str("# body scene export\n");

    let mut base = 1usize;
    for (mesh, definition) in meshes.iter().zip(definitions) {
        validate_mesh(mesh)?;

        let derived;
        let colors = if mesh.has_colors() {
            &mesh.colors
        } else {
            derived = vertex_colors(definition.color, mesh.vertex_count());
            &derived
        };

        out.push_str(&format!("o {}\n", definition.name));
        for (p, c) in mesh.positions.chunks_exact(3).zip(colors.chunks_exact(3)) {
            out.push_str(&format!(
                "v {} {} {} {} {} {}\n",
                p[0],
                p[1],
                p[2],
                c[0] as f32 / 255.0,
                c[1] as f32 / 255.0,
                c[2] as f32 / 255.0
            ));
        }
        for tri in mesh.indices.chunks_exact(3) {
            out.push_str(&format!(
                "f {} {} {}\n",
                tri[0] as usize + base,
                tri[1] as usize + base,
                tri[2] as usize + base
            ));
        }
        base += mesh.vertex_count();
    }

    Ok(out)
}
