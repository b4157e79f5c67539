use std::fs;

use mesh_indexer::{derive_colors, export_obj};
use scene_archive::load_archive;
use scene_types::Scene;
use tracing::{info, instrument};

use crate::config::LoadConfig;
use crate::error::PipelineError;

/// Load the archive, re-derive mesh colors and optionally export an OBJ.
#[instrument(skip_all, fields(directory = %config.directory.display()))]
pub fn read_scene(config: &LoadConfig) -> Result<Scene, PipelineError> {
    let mut scene = load_archive(&config.document_path())?;
    derive_colors(&mut scene.meshes, &scene.definitions);

    if let Some(path) = &config.obj_path {
        let obj = export_obj(&scene.meshes, &scene.definitions)?;
        fs::write(path, obj).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "exported meshes");
    }

    let representatives: usize = scene.clusters.iter().map(Vec::len).sum();
    info!(
        frames = scene.frames.len(),
        body_parts = scene.body_part_count(),
        representatives,
        vertices = scene.total_vertices(),
        voxel_size = scene.voxel_size,
        "scene ready"
    );
    Ok(scene)
}
