//! Error types for yippie
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow` at the
//! top. Every step of a run returns one of the step errors below, and the
//! coordinator folds them into [`DeployError`].

use std::path::PathBuf;
use thiserror::Error;

pub use crate::domain::ports::archive_builder::ArchiveError;
pub use crate::domain::ports::artifact_store::UploadError;
pub use crate::domain::ports::orchestrator::OrchestrationError;

/// Result type alias for coordinator operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Missing or invalid configuration. Always raised before any side effect.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required keys were absent or empty
    #[error("missing required configuration: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    /// A key was present but its value is unusable
    #[error("invalid value for {key} '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Stack template could not be loaded or bound
    #[error("stack template {origin}: {message}")]
    Template { origin: String, message: String },

    /// Active credentials belong to another account
    #[error("AWS credentials belong to account {actual}, expected {expected}")]
    AccountMismatch { expected: String, actual: String },

    /// Could not reach STS to verify the account
    #[error("could not verify AWS account: {0}")]
    AccountCheck(String),
}

/// Top-level error of a deploy or destroy run
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Archive build failed; nothing was uploaded
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Upload failed; no orchestration was attempted
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Remote deploy or destroy failed
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

impl DeployError {
    /// Short kind label used in JSON events and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Archive(_) => "io",
            Self::Upload(_) => "upload",
            Self::Orchestration(_) => "orchestration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_lists_every_key() {
        let err = ConfigError::MissingKeys {
            keys: vec!["NAMESPACE (namespace)".into(), "DOMAINNAME (domain_name)".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required configuration: NAMESPACE (namespace), DOMAINNAME (domain_name)"
        );
    }

    #[test]
    fn deploy_error_is_transparent_over_step_errors() {
        let err: DeployError = OrchestrationError::StackNotFound {
            stack_name: "demo-StackStatic".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Stack demo-StackStatic not found");
        assert_eq!(err.kind(), "orchestration");
    }

    #[test]
    fn upload_error_kind() {
        let err: DeployError = UploadError::Rejected {
            bucket: "artifacts".into(),
            key: "demo-1.zip".into(),
            message: "AccessDenied".into(),
        }
        .into();
        assert_eq!(err.kind(), "upload");
        assert!(err.to_string().contains("AccessDenied"));
    }
}
