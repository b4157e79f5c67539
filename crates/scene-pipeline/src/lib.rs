//! Writer and reader orchestration around the scene archive.
//!
//! Upstream reconstruction stages are reached through the traits in
//! [`traits`]; [`reference`] holds simple file-based implementations and
//! [`mock`] deterministic test doubles.

pub mod config;
pub mod error;
pub mod mock;
pub mod package;
pub mod read;
pub mod reference;
pub mod traits;

pub use config::{LoadConfig, PackageConfig};
pub use error::PipelineError;
pub use package::{build_scene, package_scene, CLUSTER_FEATURE_DIM, CLUSTER_ITERATIONS};
pub use read::read_scene;
pub use traits::*;
