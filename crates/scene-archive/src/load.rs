use std::fs;
use std::path::Path;

use mesh_indexer::validate_mesh;
use scene_types::{CroppedImage, FrameData, IndexedMesh, Mat, Scene};
use tracing::{debug, info, instrument};

use crate::checks::{is_confined, matrix_problem, EXTRINSIC_SHAPES, INTRINSIC_SHAPES};
use crate::document::{ArchiveDocument, FrameRecord, InlineImage, FORMAT_ID};
use crate::errors::LoadError;
use crate::images::{from_inline, read_png};

/// Parse a document, check its header and upgrade it to the current version.
///
/// Documents without `format`/`version` are treated as version 1.
pub fn parse_document(json: &str) -> Result<ArchiveDocument, LoadError> {
    let document: ArchiveDocument =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if let Some(format) = &document.format {
        if format != FORMAT_ID {
            return Err(LoadError::UnknownFormat(format.clone()));
        }
    }

    crate::migrate::upgrade(document)
}

/// Read the document at `path` and rebuild the scene, resolving image paths
/// relative to the document's directory.
#[instrument]
pub fn load_archive(path: &Path) -> Result<Scene, LoadError> {
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&json)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_document(document, base)
}

/// Resolve a crop: an embedded blob wins, otherwise the PNG at `path`, which
/// must name a file below `base`.
fn resolve_image(
    inline: Option<&InlineImage>,
    path: Option<&str>,
    offset: Option<[i32; 2]>,
    size: Option<[i32; 2]>,
    base: &Path,
    what: &str,
) -> Result<CroppedImage, LoadError> {
    if let Some(inline) = inline {
        return from_inline(inline).map_err(|reason| LoadError::ImageDecode {
            name: what.to_string(),
            reason,
        });
    }

    let path = path.ok_or_else(|| LoadError::MissingImage(what.to_string()))?;
    if !is_confined(path) {
        return Err(LoadError::UnconfinedImagePath(path.to_string()));
    }
    let full = base.join(path);
    let image = read_png(&full).map_err(|e| LoadError::ImageDecode {
        name: full.display().to_string(),
        reason: e.to_string(),
    })?;
    let size = size.unwrap_or([image.width() as i32, image.height() as i32]);
    Ok(CroppedImage {
        image,
        offset: offset.unwrap_or([0, 0]),
        size,
    })
}

fn check_matrix(
    mat: &Mat,
    frame: usize,
    field: &'static str,
    shapes: &[(usize, usize)],
) -> Result<(), LoadError> {
    match matrix_problem(mat, shapes) {
        Some(reason) => Err(LoadError::InvalidMatrix {
            frame,
            field,
            reason,
        }),
        None => Ok(()),
    }
}

fn resolve_frame(index: usize, record: FrameRecord, base: &Path) -> Result<FrameData, LoadError> {
    check_matrix(&record.camera_extrinsic, index, "camera_extrinsic", EXTRINSIC_SHAPES)?;
    check_matrix(
        &record.camera_intrinsic_mat,
        index,
        "camera_intrinsic_mat",
        INTRINSIC_SHAPES,
    )?;
    record
        .skeleton
        .validate()
        .map_err(|source| LoadError::InvalidSkeleton {
            frame: index,
            source,
        })?;

    let body_image = resolve_image(
        record.body_image.as_ref(),
        record.body_image_path.as_deref(),
        record.body_image_offset,
        record.body_image_size,
        base,
        &format!("frame {index} body image"),
    )?;

    Ok(FrameData {
        camera_extrinsic: record.camera_extrinsic,
        camera_intrinsic: record.camera_intrinsic_mat,
        skeleton: record.skeleton,
        facing: record.facing,
        body_image,
        body_part_images: Vec::new(),
    })
}

fn expect_len(collection: &'static str, expected: usize, found: usize) -> Result<(), LoadError> {
    if expected != found {
        return Err(LoadError::Mismatch {
            collection,
            expected,
            found,
        });
    }
    Ok(())
}

/// Rebuild a scene from a parsed document.
///
/// Each persisted cluster becomes a singleton `[main_frame]`; membership
/// beyond the representative is not stored. Mesh colors are left empty.
pub fn resolve_document(document: ArchiveDocument, base: &Path) -> Result<Scene, LoadError> {
    let definitions = document.bodypartdefinitions;
    let body_parts = definitions.len();

    let mut frames = document
        .frame_datas
        .into_iter()
        .enumerate()
        .map(|(index, record)| resolve_frame(index, record, base))
        .collect::<Result<Vec<_>, _>>()?;

    let mut clusters = vec![Vec::new(); body_parts];
    for section in &document.bodypart_frame_cluster {
        let body_part = section.bodypart;
        if body_part >= body_parts {
            return Err(LoadError::BodyPartOutOfRange {
                body_part,
                count: body_parts,
            });
        }
        for record in &section.clusters {
            let frame = record.main_frame;
            let frame_count = frames.len();
            let target = frames.get_mut(frame).ok_or(LoadError::FrameOutOfRange {
                body_part,
                frame,
                count: frame_count,
            })?;
            let crop = resolve_image(
                record.image.as_ref(),
                record.image_path.as_deref(),
                record.image_offset,
                record.image_size,
                base,
                &format!("body part {body_part} frame {frame}"),
            )?;
            target.set_body_part_image(body_part, body_parts, crop);
            clusters[body_part].push(vec![frame]);
            debug!(body_part, frame, "restored cluster representative");
        }
    }

    expect_len("triangle_vertices", body_parts, document.triangle_vertices.len())?;
    expect_len("triangle_indices", body_parts, document.triangle_indices.len())?;
    let meshes = document
        .triangle_vertices
        .into_iter()
        .zip(document.triangle_indices)
        .enumerate()
        .map(|(body_part, (positions, indices))| {
            let mesh = IndexedMesh {
                positions,
                indices,
                colors: Vec::new(),
            };
            validate_mesh(&mesh).map_err(|source| LoadError::InvalidMesh { body_part, source })?;
            Ok(mesh)
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    expect_len("voxels", body_parts, document.voxels.len())?;
    if !document.cylinders.is_empty() {
        expect_len("cylinders", body_parts, document.cylinders.len())?;
    }

    let scene = Scene {
        definitions,
        frames,
        clusters,
        meshes,
        voxels: document.voxels,
        voxel_size: document.voxel_size,
        cylinders: document.cylinders,
    };

    info!(
        frames = scene.frames.len(),
        body_parts,
        vertices = scene.total_vertices(),
        "archive loaded"
    );
    Ok(scene)
}
