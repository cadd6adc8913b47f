//! Configuration loading
//!
//! Merges the optional config file with environment overrides and CLI
//! flags, then validates the result into a [`DeploymentConfig`]. Every
//! failure here happens before any archive, upload or AWS call.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::value_objects::naming::preview_host;
use crate::domain::value_objects::{DeploymentNamespace, MAX_LABEL_LEN};
use crate::error::ConfigError;

use super::env_validator::{self, parse_bool, EnvVarValidator, BOOL_VALUES};
use super::types::{
    DeploymentConfig, RawConfig, DEFAULT_CONFIG_FILE, DEFAULT_POLL_INTERVAL_MS, KNOWN_KEYS,
};

/// Non-fatal configuration warning (unknown key in the config file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(s) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", s)?;
        }
        Ok(())
    }
}

/// Inputs the CLI hands to the loader
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit `--config` path. When set, the file must exist.
    pub config_path: Option<PathBuf>,
    /// `--folder` value
    pub folder: PathBuf,
}

/// Required keys as `(environment name, config file key)`
const REQUIRED: &[(&str, &str)] = &[
    ("NAMESPACE", "namespace"),
    ("DOMAINNAME", "domain_name"),
    ("AWS_CERTIFICATEARN", "certificate_arn"),
    ("AWS_HOSTEDZONEID", "hosted_zone_id"),
    ("AWS_REGION", "region"),
    ("AWS_ACCOUNT", "account"),
    ("AWS_ARTIFACTBUCKET", "artifact_bucket"),
];

const ENV_FAST_UPDATE: &str = "YIPPIE_FAST_UPDATE";
const ENV_CONTENT_DEPLOYER: &str = "AWS_CONTENTDEPLOYERARN";
const ENV_TEMPLATE: &str = "YIPPIE_TEMPLATE";
const ENV_POLL_INTERVAL: &str = "YIPPIE_POLL_INTERVAL_MS";

const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

/// S3 bucket names share the DNS label limit
const MAX_BUCKET_NAME_LEN: usize = MAX_LABEL_LEN;

/// Load using the process environment
pub fn load(options: &LoadOptions) -> Result<(DeploymentConfig, Vec<ConfigWarning>), ConfigError> {
    load_with_env(options, |key| std::env::var(key).ok())
}

/// Load with an injectable environment lookup
pub fn load_with_env(
    options: &LoadOptions,
    get_env: impl Fn(&str) -> Option<String>,
) -> Result<(DeploymentConfig, Vec<ConfigWarning>), ConfigError> {
    let (raw, warnings) = match &options.config_path {
        Some(path) => read_file(path)?,
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                read_file(implicit)?
            } else {
                (RawConfig::default(), Vec::new())
            }
        }
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let merged = with_env_overrides(raw, &get_env)?;
    let config = validate(merged, options.folder.clone())?;
    tracing::debug!(namespace = %config.namespace, region = %config.region, "configuration loaded");
    Ok((config, warnings))
}

/// Parse a config file, collecting unknown keys as warnings
pub fn read_file(path: &Path) -> Result<(RawConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let raw: RawConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown
        .into_iter()
        .map(|key| ConfigWarning {
            suggestion: env_validator::suggest(&key, KNOWN_KEYS).map(str::to_string),
            key,
            file: path.to_path_buf(),
        })
        .collect();

    Ok((raw, warnings))
}

/// Environment values win over the config file
pub fn with_env_overrides(
    mut raw: RawConfig,
    get_env: &impl Fn(&str) -> Option<String>,
) -> Result<RawConfig, ConfigError> {
    let fields: [(&str, &mut Option<String>); 8] = [
        ("NAMESPACE", &mut raw.namespace),
        ("DOMAINNAME", &mut raw.domain_name),
        ("AWS_CERTIFICATEARN", &mut raw.certificate_arn),
        ("AWS_HOSTEDZONEID", &mut raw.hosted_zone_id),
        ("AWS_REGION", &mut raw.region),
        ("AWS_ACCOUNT", &mut raw.account),
        ("AWS_ARTIFACTBUCKET", &mut raw.artifact_bucket),
        (ENV_CONTENT_DEPLOYER, &mut raw.content_deployer_arn),
    ];
    for (env_key, slot) in fields {
        if let Some(value) = get_env(env_key) {
            *slot = Some(value);
        }
    }

    if let Some(value) = get_env(ENV_FAST_UPDATE) {
        let fast = EnvVarValidator::new(ENV_FAST_UPDATE, BOOL_VALUES).parse(&value, parse_bool)?;
        raw.fast_update = Some(fast);
    }

    if let Some(value) = get_env(ENV_TEMPLATE) {
        if !value.trim().is_empty() {
            raw.template = Some(PathBuf::from(value));
        }
    }

    if let Some(value) = get_env(ENV_POLL_INTERVAL) {
        let ms = value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue {
                key: ENV_POLL_INTERVAL.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        raw.poll_interval_ms = Some(ms);
    }

    Ok(raw)
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check required keys and value formats
pub fn validate(raw: RawConfig, source_folder: PathBuf) -> Result<DeploymentConfig, ConfigError> {
    let values = [
        present(&raw.namespace),
        present(&raw.domain_name),
        present(&raw.certificate_arn),
        present(&raw.hosted_zone_id),
        present(&raw.region),
        present(&raw.account),
        present(&raw.artifact_bucket),
    ];

    let missing: Vec<String> = REQUIRED
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_none())
        .map(|((env, key), _)| format!("{} ({})", env, key))
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys { keys: missing });
    }

    let [namespace, domain_name, certificate_arn, hosted_zone_id, region, account, artifact_bucket] =
        values.map(Option::unwrap_or_default);

    let namespace =
        DeploymentNamespace::parse(&namespace).map_err(|e| ConfigError::InvalidValue {
            key: "NAMESPACE".to_string(),
            value: namespace.clone(),
            reason: e.to_string(),
        })?;

    // The preview host doubles as the S3 bucket name
    let preview_bucket = preview_host(&namespace, &domain_name);
    if preview_bucket.len() > MAX_BUCKET_NAME_LEN {
        return Err(ConfigError::InvalidValue {
            key: "DOMAINNAME".to_string(),
            value: domain_name,
            reason: format!(
                "preview bucket name '{}' is longer than {} characters; shorten the namespace or domain",
                preview_bucket, MAX_BUCKET_NAME_LEN
            ),
        });
    }

    if account.len() != 12 || !account.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidValue {
            key: "AWS_ACCOUNT".to_string(),
            value: account,
            reason: "must be a 12-digit account id".to_string(),
        });
    }

    let hosted_zone_id = hosted_zone_id
        .strip_prefix(HOSTED_ZONE_PREFIX)
        .unwrap_or(hosted_zone_id.as_str())
        .to_string();

    let poll_ms = raw.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: "poll_interval_ms".to_string(),
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(DeploymentConfig {
        namespace,
        domain_name,
        certificate_arn,
        hosted_zone_id,
        region,
        account,
        artifact_bucket,
        source_folder,
        fast_update: raw.fast_update.unwrap_or(true),
        content_deployer_arn: present(&raw.content_deployer_arn),
        template: raw.template,
        poll_interval: Duration::from_millis(poll_ms),
    })
}
