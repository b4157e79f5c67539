use crate::body_part::BodyPartDefinition;
use crate::frame::FrameData;
use crate::mesh::IndexedMesh;
use crate::voxel::{Cylinder, VoxelGrid};

/// Per body part, an ordered list of clusters; each cluster lists frame
/// indices and element 0 is the representative frame.
pub type BodypartFrameCluster = Vec<Vec<Vec<usize>>>;

/// A per-body-part collection whose length disagrees with the definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    pub collection: &'static str,
    pub expected: usize,
    pub found: usize,
}

/// The complete in-memory model of a packaged reconstruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub definitions: Vec<BodyPartDefinition>,
    pub frames: Vec<FrameData>,
    pub clusters: BodypartFrameCluster,
    pub meshes: Vec<IndexedMesh>,
    pub voxels: Vec<VoxelGrid>,
    /// World units per voxel, shared by every grid.
    pub voxel_size: f32,
    pub cylinders: Vec<Cylinder>,
}

impl Scene {
    pub fn body_part_count(&self) -> usize {
        self.definitions.len()
    }

    /// First per-body-part collection that is not sized to the definitions.
    ///
    /// An empty cylinder list is accepted; the other collections must always
    /// be complete.
    pub fn misalignment(&self) -> Option<Misalignment> {
        let expected = self.body_part_count();
        let lengths = [
            ("bodypart_frame_cluster", self.clusters.len()),
            ("meshes", self.meshes.len()),
            ("voxels", self.voxels.len()),
        ];
        let cylinders = (!self.cylinders.is_empty()).then_some(("cylinders", self.cylinders.len()));
        lengths
            .into_iter()
            .chain(cylinders)
            .find(|&(_, found)| found != expected)
            .map(|(collection, found)| Misalignment {
                collection,
                expected,
                found,
            })
            .or_else(|| {
                self.frames
                    .iter()
                    .map(|f| f.body_part_images.len())
                    .find(|&len| len != 0 && len != expected)
                    .map(|found| Misalignment {
                        collection: "body_part_images",
                        expected,
                        found,
                    })
            })
    }

    pub fn total_vertices(&self) -> usize {
        self.meshes.iter().map(IndexedMesh::vertex_count).sum()
    }
}
