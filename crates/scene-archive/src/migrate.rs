use std::cmp::Ordering;

use crate::document::{ArchiveDocument, FORMAT_ID, FORMAT_VERSION};
use crate::errors::LoadError;

/// Bring a parsed document up to [`FORMAT_VERSION`] and stamp its header.
///
/// A document without `version` is a bare version 1 document. Version 1 is
/// the first layout ever written, so older numbers have no upgrade path.
pub fn upgrade(mut document: ArchiveDocument) -> Result<ArchiveDocument, LoadError> {
    let version = document.version.unwrap_or(1);
    match version.cmp(&FORMAT_VERSION) {
        Ordering::Greater => Err(LoadError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        }),
        Ordering::Less => Err(LoadError::MigrationFailed {
            from: version,
            to: FORMAT_VERSION,
            reason: format!("version {version} predates the first archive layout"),
        }),
        Ordering::Equal => {
            document
                .format
                .get_or_insert_with(|| FORMAT_ID.to_string());
            document.version = Some(FORMAT_VERSION);
            Ok(document)
        }
    }
}
