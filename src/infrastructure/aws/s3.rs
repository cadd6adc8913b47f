//! S3 artifact store

use std::sync::Arc;

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;

use super::error_message;
use crate::domain::entities::ArchiveArtifact;
use crate::domain::ports::{ArtifactStore, UploadError, UploadReceipt};

const CONTENT_TYPE: &str = "application/zip";

pub struct S3ArtifactStore {
    runtime: Arc<Runtime>,
    client: aws_sdk_s3::Client,
}

impl S3ArtifactStore {
    pub fn new(runtime: Arc<Runtime>, client: aws_sdk_s3::Client) -> Self {
        Self { runtime, client }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn upload(&self, bucket: &str, artifact: ArchiveArtifact) -> Result<UploadReceipt, UploadError> {
        let key = artifact.key().to_string();
        let size = artifact.len();
        tracing::info!(bucket, key = %key, size, "uploading archive");

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .content_type(CONTENT_TYPE)
            .metadata("sha256", artifact.sha256())
            .body(ByteStream::from(artifact.bytes().to_vec()))
            .send();

        let output = self.runtime.block_on(request).map_err(|e| {
            let message = error_message(&e);
            match e {
                SdkError::ServiceError(_) => UploadError::Rejected {
                    bucket: bucket.to_string(),
                    key: key.clone(),
                    message,
                },
                _ => UploadError::Unreachable {
                    bucket: bucket.to_string(),
                    key: key.clone(),
                    message,
                },
            }
        })?;

        // Scratch copy goes away with the artifact; the remote object stays.
        drop(artifact);

        Ok(UploadReceipt {
            bucket: bucket.to_string(),
            key,
            size,
            etag: output.e_tag().map(str::to_string),
        })
    }
}
