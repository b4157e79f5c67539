use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use scene_archive::ImageStorage;
use scene_pipeline::mock::MockCapture;
use scene_pipeline::reference::{
    CaptureFrame, CaptureImage, DefinitionsFile, VoxelBodyPart, VoxelFile,
};
use scene_pipeline::{
    build_scene, package_scene, read_scene, Collaborators, LoadConfig, PackageConfig,
    PipelineError,
};
use scene_types::{BodyPartDefinition, Cylinder, Facing, Mat, SkeletonNode};

// ── Helper Functions ─────────────────────────────────────────────────────

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene_pipeline_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config(dir: &Path, frames: usize) -> PackageConfig {
    let mut config = PackageConfig::new(dir, dir.join("voxels.json"));
    config.frame_count = frames;
    config
}

// ── Scene Assembly ───────────────────────────────────────────────────────

#[test]
fn build_scene_with_mocks() {
    let capture = MockCapture::new(2, 4);
    let scene = build_scene(&config(Path::new("unused"), 4), &capture.collaborators()).unwrap();

    assert_eq!(scene.frames.len(), 4);
    assert_eq!(scene.body_part_count(), 2);
    assert_eq!(scene.clusters, vec![vec![vec![0], vec![2]], vec![vec![1], vec![3]]]);
    assert!(scene.misalignment().is_none());
    for (mesh, definition) in scene.meshes.iter().zip(&scene.definitions) {
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(&mesh.colors[..3], &definition.color_bytes());
    }
    assert_eq!(scene.cylinders.len(), 2);
    assert_relative_eq!(scene.voxel_size, 0.5);
}

#[test]
fn tsdf_offset_is_applied_before_triangulation() {
    let capture = MockCapture::new(2, 2);
    let mut config = config(Path::new("unused"), 2);
    config.tsdf_offset = 0.3;
    let scene = build_scene(&config, &capture.collaborators()).unwrap();

    // Body part i's TSDF starts at -(i + 1) / 10.
    assert_relative_eq!(scene.meshes[0].positions[2], 0.2, epsilon = 1e-6);
    assert_relative_eq!(scene.meshes[1].positions[2], 0.1, epsilon = 1e-6);
}

#[test]
fn empty_tsdf_falls_back_to_occupancy() {
    let mut capture = MockCapture::new(1, 1);
    capture.reconstruction.tsdf[0].values.clear();
    let mut config = config(Path::new("unused"), 1);
    config.tsdf_offset = 5.0;
    let scene = build_scene(&config, &capture.collaborators()).unwrap();
    assert_eq!(scene.meshes[0].positions[2], 0.0);
}

#[test]
fn skip_side_drops_frames_before_clustering() {
    let capture = MockCapture::new(2, 6);
    let mut config = config(Path::new("unused"), 6);
    config.skip_side = true;
    let scene = build_scene(&config, &capture.collaborators()).unwrap();

    // Frames 2 and 5 face sideways; survivors are 0, 1, 3, 4.
    assert_eq!(scene.frames.len(), 4);
    assert!(scene.frames.iter().all(|f| f.facing != Facing::Side));
    assert_eq!(scene.clusters, vec![vec![vec![0], vec![3]], vec![vec![1], vec![2]]]);
}

#[test]
fn short_frame_source_is_a_mismatch() {
    let capture = MockCapture::new(1, 3);
    let err = build_scene(&config(Path::new("unused"), 10), &capture.collaborators()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Mismatch {
            collection: "frames",
            expected: 10,
            found: 3
        }
    ));
}

#[test]
fn cluster_count_must_match_body_parts() {
    let mut capture = MockCapture::new(2, 2);
    capture.clusters = Some(vec![vec![vec![0]]]);
    let err = build_scene(&config(Path::new("unused"), 2), &capture.collaborators()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Mismatch {
            collection: "bodypart_frame_cluster",
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn voxel_count_must_match_body_parts() {
    let mut capture = MockCapture::new(2, 2);
    capture.reconstruction.cylinders.pop();
    let err = build_scene(&config(Path::new("unused"), 2), &capture.collaborators()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Mismatch {
            collection: "cylinders",
            ..
        }
    ));
}

// ── Write and Read ───────────────────────────────────────────────────────

#[test]
fn package_then_read_with_obj_export() {
    let dir = temp_dir("roundtrip");
    let capture = MockCapture::new(2, 4);
    let summary = package_scene(&config(&dir, 4), &capture.collaborators()).unwrap();
    assert_eq!(summary.frames, 4);
    assert_eq!(summary.clusters, 4);
    assert!(summary.document.ends_with("packaged.json"));

    let obj_path = dir.join("scene.obj");
    let mut load = LoadConfig::new(&dir);
    load.obj_path = Some(obj_path.clone());
    let scene = read_scene(&load).unwrap();

    assert_eq!(scene.frames.len(), 4);
    assert_eq!(scene.clusters, vec![vec![vec![0], vec![2]], vec![vec![1], vec![3]]]);
    assert_eq!(
        scene.frames[2].body_part_image(0),
        capture.frames[2].body_part_image(0)
    );
    assert_eq!(scene.meshes[1].colors, vec![0, 255, 0].repeat(4));
    assert_eq!(scene.cylinders.len(), 2);

    let obj = fs::read_to_string(obj_path).unwrap();
    assert!(obj.contains("o part0"));
    assert!(obj.contains("o part1"));
    assert!(obj.contains("f 5 6 7"));
}

#[test]
fn inline_images_leave_no_png_files() {
    let dir = temp_dir("inline");
    let capture = MockCapture::new(1, 2);
    let mut config = config(&dir, 2);
    config.image_storage = ImageStorage::Inline;
    let summary = package_scene(&config, &capture.collaborators()).unwrap();
    assert!(summary.images.is_empty());

    let pngs = fs::read_dir(&dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|x| x == "png")
        })
        .count();
    assert_eq!(pngs, 0);

    let scene = read_scene(&LoadConfig::new(&dir)).unwrap();
    assert_eq!(scene.frames[1].body_image, capture.frames[1].body_image);
}

#[test]
fn reading_missing_archive_fails() {
    let dir = temp_dir("missing");
    let err = read_scene(&LoadConfig::new(&dir)).unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));
}

// ── Reference Collaborators ──────────────────────────────────────────────

fn translation(y: f32) -> Mat {
    let mut m = Mat::identity(4);
    m.data[7] = y;
    m
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn write_capture(dir: &Path, frames: usize) {
    write_json(
        &dir.join("bodypartdefinitions.json"),
        &DefinitionsFile {
            bodypartdefinitions: vec![BodyPartDefinition::new(
                0,
                "thigh",
                "hip",
                "knee",
                [0.2, 0.4, 0.6],
            )],
        },
    );

    for f in 0..frames {
        let body = format!("body{f}.png");
        let part = format!("thigh{f}.png");
        RgbImage::from_pixel(4, 5, Rgb([f as u8, 10, 20]))
            .save(dir.join(&body))
            .unwrap();
        RgbImage::from_pixel(2, 3, Rgb([90, f as u8, 30]))
            .save(dir.join(&part))
            .unwrap();

        let frame = CaptureFrame {
            camera_extrinsic: Mat::identity(4),
            camera_intrinsic_mat: Mat::identity(3),
            skeleton: SkeletonNode::new("hip", translation(1.0))
                .with_child(SkeletonNode::new("knee", translation(-0.45 - f as f32 * 0.01))),
            facing: Facing::Front,
            body_image: CaptureImage {
                path: body,
                offset: [f as i32, 0],
            },
            body_part_images: vec![Some(CaptureImage {
                path: part,
                offset: [3, 4],
            })],
        };
        write_json(&dir.join(format!("{f}.json")), &frame);
    }

    write_json(
        &dir.join("voxels.json"),
        &VoxelFile {
            voxel_size: 0.5,
            bodyparts: vec![VoxelBodyPart {
                width: 1,
                height: 1,
                depth: 1,
                occupancy: vec![1.0],
                tsdf: Vec::new(),
                cylinder: Cylinder {
                    width: 0.15,
                    height: 0.45,
                },
            }],
        },
    );
}

#[test]
fn reference_collaborators_end_to_end() {
    let dir = temp_dir("reference");
    write_capture(&dir, 3);

    let summary = package_scene(&config(&dir, 3), &Collaborators::reference()).unwrap();
    assert_eq!(summary.frames, 3);
    // All thighs point the same way, so one cluster led by frame 0.
    assert_eq!(summary.clusters, 1);

    let scene = read_scene(&LoadConfig::new(&dir)).unwrap();
    assert_eq!(scene.clusters, vec![vec![vec![0]]]);
    assert_eq!(scene.meshes[0].vertex_count(), 8);
    assert_eq!(scene.meshes[0].triangle_count(), 12);
    assert_eq!(&scene.meshes[0].colors[..3], &[51, 102, 153]);
    assert_eq!(scene.frames[2].body_image.offset, [2, 0]);
    assert_eq!(scene.frames[0].body_part_image(0).unwrap().size, [2, 3]);
    assert_relative_eq!(scene.cylinders[0].height, 0.45);
}

#[test]
fn reference_source_rejects_non_json_extension() {
    let dir = temp_dir("extension");
    write_capture(&dir, 1);
    fs::copy(
        dir.join("bodypartdefinitions.json"),
        dir.join("bodypartdefinitions.xml.gz"),
    )
    .unwrap();
    let mut config = config(&dir, 1);
    config.extension = ".xml.gz".into();

    let err = package_scene(&config, &Collaborators::reference()).unwrap_err();
    assert!(matches!(err, PipelineError::Collaborator { .. }));
}

#[test]
fn reference_source_reports_missing_frame() {
    let dir = temp_dir("missing_frame");
    write_capture(&dir, 1);
    let err = package_scene(&config(&dir, 2), &Collaborators::reference()).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}
