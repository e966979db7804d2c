//! One-line feedback for CLI actions.

use std::fmt;

use crate::engine::SaveOutcome;

/// How an action went, from the operator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    /// The action applied locally but something needs attention
    Warning,
    Error,
}

/// An action message with its level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub message: String,
    pub level: StatusLevel,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Warning,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Error,
        }
    }

    /// Reports `action` followed by what happened to the save that came
    /// with it. A failed save is a warning: the edit itself was applied.
    pub fn after_save(action: &str, save: &SaveOutcome) -> Self {
        let message = format!("{action}. {save}");
        match save {
            SaveOutcome::Failed { .. } => Self::warning(message),
            SaveOutcome::Saved { .. } | SaveOutcome::Skipped(_) => Self::success(message),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            StatusLevel::Success => "Success:",
            StatusLevel::Warning => "Warning:",
            StatusLevel::Error => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}
