//! AWS adapters
//!
//! The SDK is async while the ports are synchronous. One current-thread
//! tokio runtime is shared by every client built from an [`AwsContext`];
//! each port call blocks on it.

mod cloudformation;
mod s3;

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tokio::runtime::{Builder, Runtime};

use crate::error::ConfigError;

pub use cloudformation::CloudFormationOrchestrator;
pub use s3::S3ArtifactStore;

/// Loaded AWS configuration plus the runtime that drives it
#[derive(Clone)]
pub struct AwsContext {
    runtime: Arc<Runtime>,
    sdk: SdkConfig,
}

impl AwsContext {
    /// Resolve credentials and pin the region. No network calls yet.
    pub fn connect(region: &str) -> Result<Self, ConfigError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::AccountCheck(format!("failed to start AWS runtime: {e}")))?;

        let sdk = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        tracing::debug!(region, "AWS configuration loaded");

        Ok(Self {
            runtime: Arc::new(runtime),
            sdk,
        })
    }

    /// Fail unless the active credentials belong to `expected`
    pub fn verify_account(&self, expected: &str) -> Result<(), ConfigError> {
        let sts = aws_sdk_sts::Client::new(&self.sdk);
        let identity = self
            .runtime
            .block_on(sts.get_caller_identity().send())
            .map_err(|e| ConfigError::AccountCheck(error_message(&e)))?;

        let actual = identity.account().unwrap_or_default();
        if actual != expected {
            return Err(ConfigError::AccountMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        tracing::debug!(account = actual, "credentials match configured account");
        Ok(())
    }

    pub fn artifact_store(&self) -> S3ArtifactStore {
        S3ArtifactStore::new(self.runtime.clone(), aws_sdk_s3::Client::new(&self.sdk))
    }

    pub fn orchestrator(&self, poll_interval: Duration) -> CloudFormationOrchestrator {
        CloudFormationOrchestrator::new(
            self.runtime.clone(),
            aws_sdk_cloudformation::Client::new(&self.sdk),
            poll_interval,
        )
    }
}

/// Service message when there is one, otherwise the full error chain
pub(crate) fn error_message<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error().and_then(|e| e.message()) {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    }
}
