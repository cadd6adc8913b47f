//! Run phases
//!
//! One invocation walks
//! `Start -> (Archiving -> Uploading -> Synthesizing ->) Orchestrating -> Success | Failed`.
//! The parenthesized steps only happen on deploy. Both terminal phases end
//! the process; there is no resume.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Archiving,
    Uploading,
    Synthesizing,
    Orchestrating,
    Success,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Archiving => "archiving",
            Phase::Uploading => "uploading",
            Phase::Synthesizing => "synthesizing",
            Phase::Orchestrating => "orchestrating",
            Phase::Success => "success",
            Phase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Success | Phase::Failed)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn allows(&self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Success | Failed, _) => false,
            (_, Failed) => true,
            (Start, Archiving) | (Start, Orchestrating) => true,
            (Archiving, Uploading) => true,
            (Uploading, Synthesizing) => true,
            (Synthesizing, Orchestrating) => true,
            (Orchestrating, Success) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
