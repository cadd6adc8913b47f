//! Stack update strategy

use serde::Serialize;

/// How the orchestrator applies a deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Update an existing stack directly, without computing a change set.
    /// New stacks still go through a change set.
    #[default]
    Fast,
    /// Always create and execute a change set
    ChangeSet,
}

impl UpdateMode {
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast {
            UpdateMode::Fast
        } else {
            UpdateMode::ChangeSet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Fast => "fast",
            UpdateMode::ChangeSet => "change-set",
        }
    }
}

impl std::fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
