use std::path::PathBuf;

use scene_archive::{ImageStorage, SaveOptions, DOCUMENT_NAME};

/// Frames packaged when no count is given.
pub const DEFAULT_FRAME_COUNT: usize = 10;

/// Extension of capture files when none is given.
pub const DEFAULT_EXTENSION: &str = ".json";

/// Parameters of one writer run.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Capture directory; also receives the archive.
    pub directory: PathBuf,
    /// Voxel reconstruction file.
    pub voxel_path: PathBuf,
    pub start_frame: usize,
    pub frame_count: usize,
    /// Drop frames facing sideways before clustering.
    pub skip_side: bool,
    /// Bias added to every TSDF sample before triangulation.
    pub tsdf_offset: f32,
    /// Capture file extension, including the leading dot.
    pub extension: String,
    pub image_storage: ImageStorage,
}

impl PackageConfig {
    pub fn new(directory: impl Into<PathBuf>, voxel_path: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            voxel_path: voxel_path.into(),
            start_frame: 0,
            frame_count: DEFAULT_FRAME_COUNT,
            skip_side: false,
            tsdf_offset: 0.0,
            extension: DEFAULT_EXTENSION.to_string(),
            image_storage: ImageStorage::External,
        }
    }

    /// `<directory>/bodypartdefinitions<ext>`
    pub fn definitions_path(&self) -> PathBuf {
        self.directory
            .join(format!("bodypartdefinitions{}", self.extension))
    }

    /// `<directory>/<frame><ext>` for every frame in the configured range.
    pub fn frame_filenames(&self) -> Vec<PathBuf> {
        (self.start_frame..self.start_frame + self.frame_count)
            .map(|frame| self.directory.join(format!("{frame}{}", self.extension)))
            .collect()
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions::new(&self.directory).with_image_storage(self.image_storage)
    }
}

/// Parameters of one reader run.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Directory holding the archive.
    pub directory: PathBuf,
    /// Where to export the colored meshes, if anywhere.
    pub obj_path: Option<PathBuf>,
}

impl LoadConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            obj_path: None,
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.directory.join(DOCUMENT_NAME)
    }
}
