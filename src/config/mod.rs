//! Configuration module for yippie
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (`NAMESPACE`, `DOMAINNAME`, `AWS_*`, `YIPPIE_*`)
//! 3. Config file (`yippie.toml` or `--config <path>`)
//! 4. Built-in defaults (lowest priority)

pub mod env_validator;
mod loader;
mod types;

pub use loader::{
    load, load_with_env, read_file, validate, with_env_overrides, ConfigWarning, LoadOptions,
};
pub use types::{
    DeploymentConfig, RawConfig, DEFAULT_CONFIG_FILE, DEFAULT_FOLDER, DEFAULT_POLL_INTERVAL_MS,
    KNOWN_KEYS,
};
