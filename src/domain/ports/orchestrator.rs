//! Orchestrator Port
//!
//! The remote engine that owns the stack. Atomicity, rollback and locking
//! all live on the other side of this trait.

use std::collections::BTreeMap;

use thiserror::Error;

use super::deploy_events::DeployEventSink;
use crate::domain::entities::{ResolvedTarget, StackDescriptor};
use crate::domain::value_objects::UpdateMode;

#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Stack {stack_name} not found")]
    StackNotFound { stack_name: String },

    /// The engine rejected the request outright (validation, permissions)
    #[error("{operation} {stack_name} failed: {message}")]
    Rejected {
        operation: &'static str,
        stack_name: String,
        message: String,
    },

    /// The stack exists but is stuck in a state no update can leave
    #[error("stack {stack_name} is in {status} and cannot be updated")]
    Unrecoverable { stack_name: String, status: String },

    /// The engine accepted the request but the stack ended in a failed state
    #[error("stack {stack_name} ended in {status}: {reason}")]
    Failed {
        stack_name: String,
        status: String,
        reason: String,
    },
}

/// What a deploy did to the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackChange {
    Created,
    Updated,
    Unchanged,
}

impl StackChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StackChange::Created => "created",
            StackChange::Updated => "updated",
            StackChange::Unchanged => "unchanged",
        }
    }
}

/// Successful deploy as reported by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutcome {
    pub change: StackChange,
    pub outputs: BTreeMap<String, String>,
}

pub trait Orchestrator {
    /// Create or update the stack, forwarding progress to `events`
    fn deploy(
        &self,
        descriptor: &StackDescriptor,
        mode: UpdateMode,
        events: &dyn DeployEventSink,
    ) -> Result<StackOutcome, OrchestrationError>;

    /// Delete the stack and wait for it to be gone
    fn destroy(
        &self,
        target: &ResolvedTarget,
        events: &dyn DeployEventSink,
    ) -> Result<(), OrchestrationError>;
}
