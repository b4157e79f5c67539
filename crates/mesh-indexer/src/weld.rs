use std::collections::HashMap;

use scene_types::{channel_to_byte, BodyPartDefinition, IndexedMesh, Triangle};
use tracing::{debug, instrument};

/// Bit pattern of a point, used as the exact-equality key.
fn point_key(p: &[f32; 3]) -> [u32; 3] {
    p.map(f32::to_bits)
}

/// Weld a triangle soup into a vertex buffer and an index buffer.
///
/// Vertices appear in the order they are first seen; a repeated point reuses
/// the index of its first occurrence. Indices keep each triangle's winding.
/// The returned mesh carries no colors.
#[instrument(skip(triangles), fields(triangles = triangles.len()))]
pub fn index_triangles(triangles: &[Triangle]) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    mesh.indices.reserve(triangles.len() * 3);
    let mut seen: HashMap<[u32; 3], u32> = HashMap::new();

    for tri in triangles {
        for point in &tri.points {
            let index = *seen
                .entry(point_key(point))
                .or_insert_with(|| mesh.add_vertex(*point));
            mesh.indices.push(index);
        }
    }

    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "welded triangle soup"
    );
    mesh
}

/// One RGB triple per vertex, all equal to `color` scaled to bytes.
pub fn vertex_colors(color: [f32; 3], vertex_count: usize) -> Vec<u8> {
    let rgb = color.map(channel_to_byte);
    let mut colors = Vec::with_capacity(vertex_count * 3);
    for _ in 0..vertex_count {
        colors.extend_from_slice(&rgb);
    }
    colors
}

/// Weld one body part's soup and paint every vertex with its display color.
pub fn index_body_part(triangles: &[Triangle], definition: &BodyPartDefinition) -> IndexedMesh {
    let mut mesh = index_triangles(triangles);
    mesh.colors = vertex_colors(definition.color, mesh.vertex_count());
    mesh
}

/// Fill in the color buffers of meshes loaded without them.
///
/// Meshes are paired with definitions by position; extra entries on either
/// side are left untouched.
pub fn derive_colors(meshes: &mut [IndexedMesh], definitions: &[BodyPartDefinition]) {
    for (mesh, definition) in meshes.iter_mut().zip(definitions) {
        mesh.colors = vertex_colors(definition.color, mesh.vertex_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle() {
        let mesh = index_triangles(&[Triangle::new(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        )]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn shared_edge_reuses_vertices() {
        let mesh = index_triangles(&[
            Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Triangle::new([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ]);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.vertex(3), Some([1.0, 1.0, 0.0]));
    }

    #[test]
    fn near_duplicates_stay_distinct() {
        let nudged = f32::from_bits(1.0f32.to_bits() + 1);
        let mesh = index_triangles(&[
            Triangle::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            Triangle::new([nudged, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ]);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn signed_zeros_are_distinct_bit_patterns() {
        let mesh = index_triangles(&[Triangle::new(
            [0.0, 0.0, 0.0],
            [-0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        )]);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 0]);
    }

    #[test]
    fn empty_soup() {
        let mesh = index_triangles(&[]);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn colors_match_vertex_count() {
        let def = BodyPartDefinition::new(0, "torso", "neck", "pelvis", [0.2, 0.4, 1.0]);
        let mesh = index_body_part(
            &[Triangle::new([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])],
            &def,
        );
        assert_eq!(mesh.colors.len(), mesh.positions.len());
        assert_eq!(mesh.colors, vec![51, 102, 255, 51, 102, 255, 51, 102, 255]);
    }

    #[test]
    fn derive_colors_pairs_by_position() {
        let defs = vec![
            BodyPartDefinition::new(0, "a", "j0", "j1", [1.0, 0.0, 0.0]),
            BodyPartDefinition::new(1, "b", "j1", "j2", [0.0, 0.0, 1.0]),
        ];
        let tri = Triangle::new([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let mut meshes = vec![index_triangles(&[tri]), index_triangles(&[tri, tri])];
        derive_colors(&mut meshes, &defs);
        assert_eq!(&meshes[0].colors[..3], &[255, 0, 0]);
        assert_eq!(&meshes[1].colors[..3], &[0, 0, 255]);
        assert_eq!(meshes[1].colors.len(), 9);
    }
}
