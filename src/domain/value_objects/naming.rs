//! Derived resource names
//!
//! External DNS records and buckets depend on these strings, so the formats
//! are fixed. Every function here is pure in its inputs.

use super::DeploymentNamespace;

/// Suffix appended to the namespace to form the stack name
pub const STACK_SUFFIX: &str = "-StackStatic";

/// Root of the SSM parameter paths written by the stack
pub const PARAMETER_ROOT: &str = "/yippiecloud";

/// `<namespace>-StackStatic`
pub fn stack_name(namespace: &DeploymentNamespace) -> String {
    format!("{}{}", namespace, STACK_SUFFIX)
}

/// `<namespace>-preview.<domain>`, also the preview bucket name
pub fn preview_host(namespace: &DeploymentNamespace, domain: &str) -> String {
    format!("{}-preview.{}", namespace, domain)
}

/// `<namespace>.<domain>`, the CloudFront alias
pub fn production_host(namespace: &DeploymentNamespace, domain: &str) -> String {
    format!("{}.{}", namespace, domain)
}

/// `/yippiecloud/<namespace>/PRODUCTION_URL`
pub fn production_url_parameter(namespace: &DeploymentNamespace) -> String {
    parameter_path(namespace, "PRODUCTION_URL")
}

/// `/yippiecloud/<namespace>/PREVIEW_URL`
pub fn preview_url_parameter(namespace: &DeploymentNamespace) -> String {
    parameter_path(namespace, "PREVIEW_URL")
}

fn parameter_path(namespace: &DeploymentNamespace, name: &str) -> String {
    format!("{}/{}/{}", PARAMETER_ROOT, namespace, name)
}

/// Object key of an uploaded archive: `<namespace>-<unixMillis>.zip`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveKey(String);

impl ArchiveKey {
    pub fn new(namespace: &DeploymentNamespace, unix_millis: i64) -> Self {
        Self(format!("{}-{}.zip", namespace, unix_millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
