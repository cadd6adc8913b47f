//! Artifact Store Port
//!
//! Where built archives are uploaded before the stack is deployed.

use thiserror::Error;

use crate::domain::entities::ArchiveArtifact;

/// Upload failure. Fatal: the run stops before orchestration.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Store could not be reached (network, DNS, credentials resolution)
    #[error("artifact store unreachable while uploading s3://{bucket}/{key}: {message}")]
    Unreachable {
        bucket: String,
        key: String,
        message: String,
    },

    /// Store answered and refused (permissions, missing bucket, quota)
    #[error("artifact store rejected s3://{bucket}/{key}: {message}")]
    Rejected {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Where an artifact landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub size: usize,
    pub etag: Option<String>,
}

pub trait ArtifactStore {
    /// Store `artifact` in `bucket` under its own key. Takes ownership:
    /// an artifact is uploaded at most once.
    fn upload(&self, bucket: &str, artifact: ArchiveArtifact) -> Result<UploadReceipt, UploadError>;
}
