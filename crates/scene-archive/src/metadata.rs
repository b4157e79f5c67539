use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance stored in the archive header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    /// Fresh for every write.
    pub id: Uuid,
    /// Tool that wrote the archive.
    pub generator: String,
    /// When the archive was written.
    pub created: DateTime<Utc>,
    pub frame_count: usize,
    pub body_part_count: usize,
}

impl ArchiveMetadata {
    /// Metadata stamped with the current time.
    pub fn new(frame_count: usize, body_part_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            generator: concat!("scene-archive ", env!("CARGO_PKG_VERSION")).to_string(),
            created: Utc::now(),
            frame_count,
            body_part_count,
        }
    }
}
