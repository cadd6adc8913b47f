//! Deploy and destroy results

use std::collections::BTreeMap;

use crate::domain::ports::StackChange;

/// Successful deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    pub stack_name: String,
    /// Production host, e.g. `demo.example.org`
    pub production_url: String,
    /// Preview host, e.g. `demo-preview.example.org`
    pub preview_url: String,
    pub bucket: String,
    pub artifact_key: String,
    pub change: StackChange,
    /// Stack outputs as reported after the deploy
    pub outputs: BTreeMap<String, String>,
}

/// Successful destroy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroySummary {
    pub stack_name: String,
}

/// Result of [`run`](super::DeploymentCoordinator::run)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Deployed(DeploySummary),
    Destroyed(DestroySummary),
}

impl RunOutcome {
    pub fn stack_name(&self) -> &str {
        match self {
            RunOutcome::Deployed(s) => &s.stack_name,
            RunOutcome::Destroyed(s) => &s.stack_name,
        }
    }
}
