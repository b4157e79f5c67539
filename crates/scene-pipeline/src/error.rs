use std::path::PathBuf;

use mesh_indexer::MeshError;
use scene_archive::{LoadError, SaveError};

/// Errors from a writer or reader run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} failed: {reason}")]
    Collaborator { stage: &'static str, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{collection} has {found} entries but there are {expected} body parts")]
    Mismatch {
        collection: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl PipelineError {
    pub(crate) fn collaborator(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::Collaborator {
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn check_len(
        collection: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), Self> {
        if expected != found {
            return Err(Self::Mismatch {
                collection,
                expected,
                found,
            });
        }
        Ok(())
    }
}
