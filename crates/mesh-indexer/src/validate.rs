use scene_types::{IndexedMesh, Triangle};

use crate::MeshError;

/// Check buffer shapes, index ranges and color alignment.
pub fn validate_mesh(mesh: &IndexedMesh) -> Result<(), MeshError> {
    if mesh.positions.len() % 3 != 0 {
        return Err(MeshError::MalformedBuffer {
            buffer: "vertex",
            len: mesh.positions.len(),
        });
    }
    if mesh.indices.len() % 3 != 0 {
        return Err(MeshError::MalformedBuffer {
            buffer: "index",
            len: mesh.indices.len(),
        });
    }

    let vertex_count = mesh.vertex_count();
    if let Some((position, &index)) = mesh
        .indices
        .iter()
        .enumerate()
        .find(|&(_, &idx)| idx as usize >= vertex_count)
    {
        return Err(MeshError::IndexOutOfRange {
            index,
            position,
            vertex_count,
        });
    }

    if mesh.has_colors() && mesh.colors.len() != mesh.positions.len() {
        return Err(MeshError::ColorMismatch {
            colors: mesh.colors.len(),
            expected: mesh.positions.len(),
        });
    }
    Ok(())
}

/// Expand the index buffer back into a triangle soup.
pub fn expand_mesh(mesh: &IndexedMesh) -> Result<Vec<Triangle>, MeshError> {
    validate_mesh(mesh)?;
    Ok(mesh
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let p = |i: u32| {
                let base = i as usize * 3;
                [
                    mesh.positions[base],
                    mesh.positions[base + 1],
                    mesh.positions[base + 2],
                ]
            };
            Triangle::new(p(tri[0]), p(tri[1]), p(tri[2]))
        })
        .collect())
}
