use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use scene_types::{BodyPartDefinition, CroppedImage, Facing, FrameData, Mat, SkeletonNode};

use super::read_json;
use crate::error::PipelineError;
use crate::traits::FrameSource;

/// `bodypartdefinitions<ext>` layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsFile {
    pub bodypartdefinitions: Vec<BodyPartDefinition>,
}

/// A crop on disk, relative to the capture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureImage {
    pub path: String,
    pub offset: [i32; 2],
}

/// `<frame><ext>` layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureFrame {
    pub camera_extrinsic: Mat,
    pub camera_intrinsic_mat: Mat,
    pub skeleton: SkeletonNode,
    pub facing: Facing,
    pub body_image: CaptureImage,
    #[serde(default)]
    pub body_part_images: Vec<Option<CaptureImage>>,
}

/// Reads JSON capture files and their PNG crops.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFrameSource;

fn load_crop(base: &Path, capture: &CaptureImage) -> Result<CroppedImage, PipelineError> {
    let path = base.join(&capture.path);
    let image = image::open(&path)
        .map_err(|e| PipelineError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?
        .to_rgb8();
    Ok(CroppedImage::new(image, capture.offset))
}

impl JsonFrameSource {
    fn load_frame(
        &self,
        path: &Path,
        body_part_count: usize,
    ) -> Result<FrameData, PipelineError> {
        let capture: CaptureFrame = read_json(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        if !capture.body_part_images.is_empty() {
            PipelineError::check_len(
                "body_part_images",
                body_part_count,
                capture.body_part_images.len(),
            )?;
        }

        let body_part_images = capture
            .body_part_images
            .iter()
            .map(|slot| slot.as_ref().map(|c| load_crop(base, c)).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FrameData {
            camera_extrinsic: capture.camera_extrinsic,
            camera_intrinsic: capture.camera_intrinsic_mat,
            skeleton: capture.skeleton,
            facing: capture.facing,
            body_image: load_crop(base, &capture.body_image)?,
            body_part_images,
        })
    }
}

impl FrameSource for JsonFrameSource {
    fn load_definitions(&self, path: &Path) -> Result<Vec<BodyPartDefinition>, PipelineError> {
        let file: DefinitionsFile = read_json(path)?;
        Ok(file.bodypartdefinitions)
    }

    fn load_frames(
        &self,
        filenames: &[PathBuf],
        extension: &str,
        body_part_count: usize,
    ) -> Result<Vec<FrameData>, PipelineError> {
        if !extension.ends_with("json") {
            return Err(PipelineError::collaborator(
                "frame loading",
                format!("capture extension {extension:?} is not a JSON extension"),
            ));
        }
        filenames
            .iter()
            .map(|path| {
                debug!(path = %path.display(), "loading capture frame");
                self.load_frame(path, body_part_count)
            })
            .collect()
    }
}
