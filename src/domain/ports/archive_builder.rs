//! Archive Builder Port
//!
//! Packs a source folder into a single archive artifact.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::ArchiveArtifact;
use crate::domain::value_objects::ArchiveKey;

/// Archive build failure. Nothing has been uploaded when this is raised.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("source folder not found: {path}")]
    MissingFolder { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk source folder: {0}")]
    Walk(String),

    #[error("failed to write archive: {0}")]
    Zip(String),
}

pub trait ArchiveBuilder {
    /// Archive every file under `source`, keyed by `key`
    fn build(&self, source: &Path, key: ArchiveKey) -> Result<ArchiveArtifact, ArchiveError>;
}
