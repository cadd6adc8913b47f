//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::value_objects::{DeploymentNamespace, UpdateMode};

/// Default source folder when `--folder` is not given
pub const DEFAULT_FOLDER: &str = "example/website";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "yippie.toml";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1500;

/// Config file shape. Every field is optional here; required keys are
/// enforced when the file and environment have been merged.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawConfig {
    pub namespace: Option<String>,
    pub domain_name: Option<String>,
    pub certificate_arn: Option<String>,
    pub hosted_zone_id: Option<String>,
    pub region: Option<String>,
    pub account: Option<String>,
    pub artifact_bucket: Option<String>,
    pub fast_update: Option<bool>,
    pub content_deployer_arn: Option<String>,
    pub template: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
}

/// Field names accepted in the config file, for typo suggestions
pub const KNOWN_KEYS: &[&str] = &[
    "namespace",
    "domain_name",
    "certificate_arn",
    "hosted_zone_id",
    "region",
    "account",
    "artifact_bucket",
    "fast_update",
    "content_deployer_arn",
    "template",
    "poll_interval_ms",
];

/// Immutable, validated configuration of one invocation.
///
/// Built once by the entry point and passed by reference from there on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub namespace: DeploymentNamespace,
    pub domain_name: String,
    pub certificate_arn: String,
    pub hosted_zone_id: String,
    pub region: String,
    pub account: String,
    pub artifact_bucket: String,
    pub source_folder: PathBuf,
    pub fast_update: bool,
    pub content_deployer_arn: Option<String>,
    pub template: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl DeploymentConfig {
    pub fn update_mode(&self) -> UpdateMode {
        UpdateMode::from_fast_flag(self.fast_update)
    }
}
