//! Deploy Event Port
//!
//! Provides an observable interface for deploy and destroy runs.
//! Enables progress reporting, JSON event streams, and debugging.

use crate::domain::value_objects::{Phase, UpdateMode};

/// Which top-level operation a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deploy,
    Destroy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deploy => "deploy",
            Operation::Destroy => "destroy",
        }
    }
}

/// Event emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Run started
    Started {
        operation: Operation,
        namespace: String,
        stack_name: String,
    },

    /// State machine moved to a new phase
    PhaseChanged { phase: Phase },

    /// Archive built in the scratch directory
    Archived {
        key: String,
        entry_count: usize,
        size: usize,
        sha256: String,
    },

    /// Archive stored in the artifact bucket
    Uploaded { bucket: String, key: String, size: usize },

    /// Stack descriptor ready
    Synthesized {
        stack_name: String,
        parameter_count: usize,
        mode: UpdateMode,
    },

    /// Resource-level progress reported by the orchestrator
    StackProgress {
        timestamp: String,
        logical_id: String,
        resource_type: String,
        status: String,
        reason: Option<String>,
    },

    /// Run finished successfully
    Completed {
        operation: Operation,
        stack_name: String,
        production_url: Option<String>,
        preview_url: Option<String>,
        change: Option<&'static str>,
    },

    /// Run failed
    Failed { kind: &'static str, message: String },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: Progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-resource stack progress
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
