//! yippie - static-site deployment coordinator
//!
//! yippie zips a static website folder, uploads the archive to an S3
//! artifact bucket and deploys (or destroys) the CloudFormation stack that
//! serves it under a namespace-derived production and preview host.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;

// Re-exports for convenience
pub use application::{DeploySummary, DeploymentCoordinator, RunOutcome, StackTemplate};
pub use config::{DeploymentConfig, LoadOptions};
pub use domain::value_objects::{ArchiveKey, DeploymentNamespace, Phase, UpdateMode};
pub use error::{ConfigError, DeployError, DeployResult};
