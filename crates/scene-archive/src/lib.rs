mod checks;
pub mod document;
pub mod errors;
pub mod images;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use document::{ArchiveDocument, DOCUMENT_NAME, FORMAT_ID, FORMAT_VERSION};
pub use errors::{LoadError, SaveError};
pub use load::{load_archive, parse_document, resolve_document};
pub use metadata::ArchiveMetadata;
pub use save::{build_document, save_archive, ArchiveSummary, ImageStorage, SaveOptions};
