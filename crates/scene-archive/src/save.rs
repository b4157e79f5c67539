use std::fs;
use std::path::{Path, PathBuf};

use mesh_indexer::validate_mesh;
use scene_types::{CroppedImage, FrameData, Scene};
use tracing::{debug, info, instrument};

use crate::checks::{first_non_finite, matrix_problem, EXTRINSIC_SHAPES, INTRINSIC_SHAPES};
use crate::document::{
    ArchiveDocument, BodyPartClusters, ClusterRecord, FrameRecord, InlineImage, DOCUMENT_NAME,
    FORMAT_ID, FORMAT_VERSION,
};
use crate::errors::SaveError;
use crate::images::{body_part_image_name, encode_png, frame_image_name, to_inline};
use crate::metadata::ArchiveMetadata;

/// Where crops end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStorage {
    /// Sibling PNG files referenced by relative path.
    #[default]
    External,
    /// Base64 PNG blobs inside the document.
    Inline,
}

/// Output location and image layout for a write.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Directory receiving the document and image files.
    pub directory: PathBuf,
    pub document_name: String,
    pub image_storage: ImageStorage,
}

impl SaveOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            document_name: DOCUMENT_NAME.to_string(),
            image_storage: ImageStorage::External,
        }
    }

    pub fn with_image_storage(mut self, storage: ImageStorage) -> Self {
        self.image_storage = storage;
        self
    }

    pub fn document_path(&self) -> PathBuf {
        self.directory.join(&self.document_name)
    }
}

/// What a write produced.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub document: PathBuf,
    /// Image files written, in write order.
    pub images: Vec<PathBuf>,
    pub frames: usize,
    pub body_parts: usize,
    /// Representative crops recorded across all body parts.
    pub clusters: usize,
}

/// A crop as it appears in the document.
enum StoredImage {
    Path(String),
    Inline(InlineImage),
}

/// Writes crops according to the chosen storage, remembering files written.
struct ImageSink<'a> {
    options: &'a SaveOptions,
    written: Vec<PathBuf>,
}

impl ImageSink<'_> {
    fn store(&mut self, crop: &CroppedImage, name: String) -> Result<StoredImage, SaveError> {
        if crop.is_empty() {
            return Err(SaveError::EmptyImage { name });
        }
        let encode_err = |e: image::ImageError, name: &str| SaveError::ImageEncode {
            name: name.to_string(),
            reason: e.to_string(),
        };
        match self.options.image_storage {
            ImageStorage::Inline => Ok(StoredImage::Inline(
                to_inline(crop).map_err(|e| encode_err(e, &name))?,
            )),
            ImageStorage::External => {
                let bytes = encode_png(&crop.image).map_err(|e| encode_err(e, &name))?;
                let path = self.options.directory.join(&name);
                write_file(&path, &bytes)?;
                debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
                self.written.push(path);
                Ok(StoredImage::Path(name))
            }
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject scenes the reader could not rebuild. Runs before anything is
/// written.
fn check_scene(scene: &Scene) -> Result<(), SaveError> {
    if let Some(m) = scene.misalignment() {
        return Err(SaveError::Mismatch {
            collection: m.collection,
            expected: m.expected,
            found: m.found,
        });
    }
    for (body_part, mesh) in scene.meshes.iter().enumerate() {
        validate_mesh(mesh).map_err(|source| SaveError::InvalidMesh { body_part, source })?;
        check_finite(&mesh.positions, || format!("mesh for body part {body_part}"))?;
    }
    check_finite(&[scene.voxel_size], || "voxel_size".to_string())?;
    for (body_part, cylinder) in scene.cylinders.iter().enumerate() {
        check_finite(&[cylinder.width, cylinder.height], || {
            format!("cylinder for body part {body_part}")
        })?;
    }
    for definition in &scene.definitions {
        check_finite(&definition.color, || {
            format!("color of body part {}", definition.name)
        })?;
    }
    for (index, frame) in scene.frames.iter().enumerate() {
        check_frame(index, frame)?;
    }
    Ok(())
}

fn check_frame(index: usize, frame: &FrameData) -> Result<(), SaveError> {
    let cameras = [
        ("camera_extrinsic", &frame.camera_extrinsic, EXTRINSIC_SHAPES),
        ("camera_intrinsic_mat", &frame.camera_intrinsic, INTRINSIC_SHAPES),
    ];
    for (field, mat, shapes) in cameras {
        if let Some(reason) = matrix_problem(mat, shapes) {
            return Err(SaveError::InvalidMatrix {
                frame: index,
                field,
                reason,
            });
        }
        check_finite(&mat.data, || format!("frame {index} {field}"))?;
    }

    frame
        .skeleton
        .validate()
        .map_err(|source| SaveError::InvalidSkeleton {
            frame: index,
            source,
        })?;
    for joint in frame.skeleton.iter() {
        check_finite(&joint.transform.data, || {
            format!("frame {index} joint {}", joint.name)
        })?;
    }
    Ok(())
}

fn check_finite(values: &[f32], what: impl FnOnce() -> String) -> Result<(), SaveError> {
    match first_non_finite(values) {
        Some(index) => Err(SaveError::NonFinite {
            what: what(),
            index,
        }),
        None => Ok(()),
    }
}

fn cluster_sections(
    scene: &Scene,
    sink: &mut ImageSink<'_>,
) -> Result<Vec<BodyPartClusters>, SaveError> {
    let mut sections = Vec::with_capacity(scene.clusters.len());
    for (body_part, clusters) in scene.clusters.iter().enumerate() {
        let mut records = Vec::new();
        for (cluster, members) in clusters.iter().enumerate() {
            // Only the representative survives; empty clusters are skipped.
            let Some(&frame) = members.first() else {
                continue;
            };
            let frame_data =
                scene
                    .frames
                    .get(frame)
                    .ok_or(SaveError::MissingRepresentative {
                        body_part,
                        cluster,
                        frame,
                        frame_count: scene.frames.len(),
                    })?;
            let crop = frame_data
                .body_part_image(body_part)
                .ok_or(SaveError::MissingBodyPartImage { frame, body_part })?;

            let mut record = ClusterRecord {
                main_frame: frame,
                image_path: None,
                image_offset: None,
                image_size: None,
                image: None,
            };
            match sink.store(crop, body_part_image_name(body_part, frame))? {
                StoredImage::Path(path) => {
                    record.image_path = Some(path);
                    record.image_offset = Some(crop.offset);
                    record.image_size = Some(crop.size);
                }
                StoredImage::Inline(inline) => record.image = Some(inline),
            }
            records.push(record);
        }
        sections.push(BodyPartClusters {
            bodypart: body_part,
            clusters: records,
        });
    }
    Ok(sections)
}

fn frame_records(scene: &Scene, sink: &mut ImageSink<'_>) -> Result<Vec<FrameRecord>, SaveError> {
    scene
        .frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let mut record = FrameRecord {
                camera_extrinsic: frame.camera_extrinsic.clone(),
                camera_intrinsic_mat: frame.camera_intrinsic.clone(),
                skeleton: frame.skeleton.clone(),
                facing: frame.facing,
                body_image_path: None,
                body_image_offset: None,
                body_image_size: None,
                body_image: None,
            };
            match sink.store(&frame.body_image, frame_image_name(index))? {
                StoredImage::Path(path) => {
                    record.body_image_path = Some(path);
                    record.body_image_offset = Some(frame.body_image.offset);
                    record.body_image_size = Some(frame.body_image.size);
                }
                StoredImage::Inline(inline) => record.body_image = Some(inline),
            }
            Ok(record)
        })
        .collect()
}

/// Build the document for `scene`, writing external images as a side effect.
///
/// Returns the document and the image files written.
pub fn build_document(
    scene: &Scene,
    options: &SaveOptions,
) -> Result<(ArchiveDocument, Vec<PathBuf>), SaveError> {
    check_scene(scene)?;

    let mut sink = ImageSink {
        options,
        written: Vec::new(),
    };
    let bodypart_frame_cluster = cluster_sections(scene, &mut sink)?;
    let frame_datas = frame_records(scene, &mut sink)?;

    let document = ArchiveDocument {
        format: Some(FORMAT_ID.to_string()),
        version: Some(FORMAT_VERSION),
        metadata: Some(ArchiveMetadata::new(
            scene.frames.len(),
            scene.body_part_count(),
        )),
        bodypartdefinitions: scene.definitions.clone(),
        bodypart_frame_cluster,
        frame_datas,
        // Colors are derivable from the definitions and are not stored.
        triangle_vertices: scene.meshes.iter().map(|m| m.positions.clone()).collect(),
        triangle_indices: scene.meshes.iter().map(|m| m.indices.clone()).collect(),
        voxels: scene.voxels.clone(),
        voxel_size: scene.voxel_size,
        cylinders: scene.cylinders.clone(),
    };
    Ok((document, sink.written))
}

/// Write `scene` as a document plus crops into `options.directory`.
///
/// Every image is written before the document; the document is written last.
#[instrument(skip(scene, options), fields(directory = %options.directory.display()))]
pub fn save_archive(scene: &Scene, options: &SaveOptions) -> Result<ArchiveSummary, SaveError> {
    fs::create_dir_all(&options.directory).map_err(|source| SaveError::Io {
        path: options.directory.clone(),
        source,
    })?;

    let (document, images) = build_document(scene, options)?;
    let clusters = document
        .bodypart_frame_cluster
        .iter()
        .map(|section| section.clusters.len())
        .sum();

    let json =
        serde_json::to_string_pretty(&document).map_err(|e| SaveError::Serialize(e.to_string()))?;
    let path = options.document_path();
    write_file(&path, json.as_bytes())?;

    info!(
        document = %path.display(),
        frames = scene.frames.len(),
        body_parts = scene.body_part_count(),
        clusters,
        images = images.len(),
        "archive written"
    );

    Ok(ArchiveSummary {
        document: path,
        images,
        frames: scene.frames.len(),
        body_parts: scene.body_part_count(),
        clusters,
    })
}
