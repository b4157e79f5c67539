//! Command-line surface for the scene writer and reader.
//!
//! # Usage
//!
//! ```bash
//! # Package frames 0..10 of a capture into <dir>/packaged.json
//! scene-writer -d capture/ -v capture/voxels.json
//!
//! # Skip side-facing frames, bias the TSDF and inline every crop
//! scene-writer -d capture/ -v capture/voxels.json -n 40 -s -t -0.01 --inline-images
//!
//! # Load the archive back and export colored meshes
//! scene-reader -d capture/ --obj capture/scene.obj
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use scene_archive::ImageStorage;
use scene_pipeline::config::{DEFAULT_EXTENSION, DEFAULT_FRAME_COUNT};
use scene_pipeline::{LoadConfig, PackageConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const MISSING_DIRECTORY: &str = "Specify video directory!";
pub const MISSING_VOXELS: &str = "Specify voxel path!";

/// Package a processed capture session into a scene archive.
#[derive(Parser, Debug)]
#[command(name = "scene-writer")]
#[command(version, about = "Package a capture session into a scene archive", long_about = None)]
pub struct WriterArgs {
    /// Capture directory; the archive is written here
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Voxel reconstruction file
    #[arg(short, long)]
    pub voxels: Option<PathBuf>,

    /// Number of frames to package
    #[arg(short = 'n', long, default_value_t = DEFAULT_FRAME_COUNT)]
    pub frames: usize,

    /// First frame to package
    #[arg(long, default_value_t = 0)]
    pub start_frame: usize,

    /// Drop side-facing frames before clustering
    #[arg(short, long)]
    pub skip_side: bool,

    /// Bias added to every TSDF sample before triangulation
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub tsdf_offset: f32,

    /// Capture file extension
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Embed crops in the document instead of writing PNG files
    #[arg(long)]
    pub inline_images: bool,

    /// Logging verbosity level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl WriterArgs {
    /// Build the writer configuration, or the message to print when a
    /// required path is missing.
    pub fn into_config(self) -> Result<PackageConfig, &'static str> {
        let directory = self.directory.ok_or(MISSING_DIRECTORY)?;
        let voxels = self.voxels.ok_or(MISSING_VOXELS)?;
        let mut config = PackageConfig::new(directory, voxels);
        config.start_frame = self.start_frame;
        config.frame_count = self.frames;
        config.skip_side = self.skip_side;
        config.tsdf_offset = self.tsdf_offset;
        config.extension = self.extension;
        if self.inline_images {
            config.image_storage = ImageStorage::Inline;
        }
        Ok(config)
    }
}

/// Load a scene archive and optionally export its meshes.
#[derive(Parser, Debug)]
#[command(name = "scene-reader")]
#[command(version, about = "Load a scene archive", long_about = None)]
pub struct ReaderArgs {
    /// Directory holding packaged.json
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Write the colored meshes as Wavefront OBJ
    #[arg(long)]
    pub obj: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ReaderArgs {
    pub fn into_config(self) -> Result<LoadConfig, &'static str> {
        let mut config = LoadConfig::new(self.directory.ok_or(MISSING_DIRECTORY)?);
        config.obj_path = self.obj;
        Ok(config)
    }
}

/// Parse `args` (program name first).
///
/// Returns `None` after printing usage when there are no arguments or they
/// do not parse; the caller should then exit successfully.
pub fn parse_or_usage<T, I, S>(args: I) -> Option<T>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        println!("{}", T::command().render_help());
        return None;
    }
    match T::try_parse_from(args) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            let _ = err.print();
            None
        }
    }
}

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber.
pub fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
