//! Resolved deployment target
//!
//! The stable identifiers of one namespace. Deploy and destroy resolve the
//! same target; only deploy goes on to synthesize a descriptor.

use serde::Serialize;

use crate::domain::value_objects::naming;
use crate::domain::value_objects::{ArchiveKey, DeploymentNamespace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub namespace: String,
    pub stack_name: String,
    pub production_host: String,
    pub preview_host: String,
    pub production_url_parameter: String,
    pub preview_url_parameter: String,
    pub region: String,
}

impl ResolvedTarget {
    pub fn resolve(namespace: &DeploymentNamespace, domain: &str, region: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            stack_name: naming::stack_name(namespace),
            production_host: naming::production_host(namespace, domain),
            preview_host: naming::preview_host(namespace, domain),
            production_url_parameter: naming::production_url_parameter(namespace),
            preview_url_parameter: naming::preview_url_parameter(namespace),
            region: region.to_string(),
        }
    }
}

/// One CloudFormation parameter binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything the orchestrator needs to deploy a stack
#[derive(Debug, Clone)]
pub struct StackDescriptor {
    pub target: ResolvedTarget,
    pub artifact_key: ArchiveKey,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
}

impl StackDescriptor {
    pub fn stack_name(&self) -> &str {
        &self.target.stack_name
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}
