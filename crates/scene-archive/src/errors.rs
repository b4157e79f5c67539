use std::path::PathBuf;

use mesh_indexer::MeshError;
use scene_types::SkeletonError;

/// Errors while writing an archive and its images.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{collection} has {found} entries but there are {expected} body parts")]
    Mismatch {
        collection: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("mesh for body part {body_part} is invalid: {source}")]
    InvalidMesh {
        body_part: usize,
        #[source]
        source: MeshError,
    },

    #[error("frame {frame} {field}: {reason}")]
    InvalidMatrix {
        frame: usize,
        field: &'static str,
        reason: String,
    },

    #[error("frame {frame} skeleton: {source}")]
    InvalidSkeleton {
        frame: usize,
        #[source]
        source: SkeletonError,
    },

    #[error("{what} holds a non-finite value at element {index}")]
    NonFinite { what: String, index: usize },

    #[error("body part {body_part} cluster {cluster} names frame {frame}, but only {frame_count} frames exist")]
    MissingRepresentative {
        body_part: usize,
        cluster: usize,
        frame: usize,
        frame_count: usize,
    },

    #[error("frame {frame} has no cropped image for body part {body_part}")]
    MissingBodyPartImage { frame: usize, body_part: usize },

    #[error("image {name} has no pixels")]
    EmptyImage { name: String },

    #[error("failed to encode image {name}: {reason}")]
    ImageEncode { name: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize archive: {0}")]
    Serialize(String),
}

/// Errors while reading an archive and resolving its images.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse archive: {0}")]
    ParseError(String),

    #[error("unknown archive format: {0}")]
    UnknownFormat(String),

    #[error("archive version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("{collection} has {found} entries but there are {expected} body parts")]
    Mismatch {
        collection: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("mesh for body part {body_part} is invalid: {source}")]
    InvalidMesh {
        body_part: usize,
        #[source]
        source: MeshError,
    },

    #[error("frame {frame} {field}: {reason}")]
    InvalidMatrix {
        frame: usize,
        field: &'static str,
        reason: String,
    },

    #[error("frame {frame} skeleton: {source}")]
    InvalidSkeleton {
        frame: usize,
        #[source]
        source: SkeletonError,
    },

    #[error("cluster entry names body part {body_part}, but there are {count} body parts")]
    BodyPartOutOfRange { body_part: usize, count: usize },

    #[error("cluster for body part {body_part} names frame {frame}, but there are {count} frames")]
    FrameOutOfRange {
        body_part: usize,
        frame: usize,
        count: usize,
    },

    #[error("no image stored for {0}")]
    MissingImage(String),

    #[error("image path {0} leaves the archive directory")]
    UnconfinedImagePath(String),

    #[error("failed to decode image {name}: {reason}")]
    ImageDecode { name: String, reason: String },
}
