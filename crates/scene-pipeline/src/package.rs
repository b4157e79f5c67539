use mesh_indexer::index_body_part;
use scene_archive::{save_archive, ArchiveSummary};
use scene_types::{Facing, Scene};
use tracing::{debug, info, instrument};

use crate::config::PackageConfig;
use crate::error::PipelineError;
use crate::traits::{Collaborators, JointMap};

/// Feature dimension requested from the clusterer.
pub const CLUSTER_FEATURE_DIM: usize = 64;

/// Iteration budget requested from the clusterer.
pub const CLUSTER_ITERATIONS: usize = 1000;

/// Run every upstream stage and assemble the in-memory scene.
#[instrument(skip_all, fields(directory = %config.directory.display()))]
pub fn build_scene(
    config: &PackageConfig,
    collaborators: &Collaborators,
) -> Result<Scene, PipelineError> {
    let definitions = collaborators
        .frames
        .load_definitions(&config.definitions_path())?;
    let body_parts = definitions.len();

    let filenames = config.frame_filenames();
    let mut frames =
        collaborators
            .frames
            .load_frames(&filenames, &config.extension, body_parts)?;
    PipelineError::check_len("frames", filenames.len(), frames.len())?;

    if config.skip_side {
        let before = frames.len();
        frames.retain(|frame| frame.facing != Facing::Side);
        info!(skipped = before - frames.len(), "dropped side-facing frames");
    }

    let joint_maps = frames
        .iter()
        .map(|frame| {
            collaborators.skeletons.build(
                &frame.skeleton,
                &frame.camera_intrinsic,
                &frame.camera_extrinsic,
            )
        })
        .collect::<Result<Vec<JointMap>, _>>()?;

    let clusters = collaborators.clusterer.cluster(
        CLUSTER_FEATURE_DIM,
        &definitions,
        &joint_maps,
        &frames,
        CLUSTER_ITERATIONS,
    )?;
    PipelineError::check_len("bodypart_frame_cluster", body_parts, clusters.len())?;

    let mut recon = collaborators.voxels.load(&config.voxel_path)?;
    PipelineError::check_len("voxel grids", body_parts, recon.grids.len())?;
    PipelineError::check_len("occupancy volumes", body_parts, recon.occupancy.len())?;
    PipelineError::check_len("tsdf volumes", body_parts, recon.tsdf.len())?;
    PipelineError::check_len("cylinders", body_parts, recon.cylinders.len())?;

    let mut meshes = Vec::with_capacity(body_parts);
    for (body_part, definition) in definitions.iter().enumerate() {
        let tsdf = &mut recon.tsdf[body_part];
        tsdf.offset(config.tsdf_offset);
        let tsdf = (!tsdf.is_empty()).then_some(&*tsdf);

        let soup = collaborators.triangulator.triangulate(
            &recon.grids[body_part],
            &recon.occupancy[body_part],
            tsdf,
            recon.voxel_size,
        )?;
        let mesh = index_body_part(&soup, definition);
        debug!(
            body_part,
            triangles = soup.len(),
            vertices = mesh.vertex_count(),
            "meshed body part"
        );
        meshes.push(mesh);
    }

    let scene = Scene {
        definitions,
        frames,
        clusters,
        meshes,
        voxels: recon.grids,
        voxel_size: recon.voxel_size,
        cylinders: recon.cylinders,
    };
    info!(
        frames = scene.frames.len(),
        body_parts,
        vertices = scene.total_vertices(),
        "scene assembled"
    );
    Ok(scene)
}

/// Build the scene and write it as an archive into the capture directory.
pub fn package_scene(
    config: &PackageConfig,
    collaborators: &Collaborators,
) -> Result<ArchiveSummary, PipelineError> {
    let scene = build_scene(config, collaborators)?;
    Ok(save_archive(&scene, &config.save_options())?)
}
