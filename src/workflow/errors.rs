use std::path::PathBuf;
use thiserror::Error;

use super::types::State;

/// Errors surfaced by the workflow engine
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unknown action: {id}")]
    UnknownAction { id: String },

    #[error("Unknown task: {id}")]
    UnknownTask { id: String },

    #[error("Unknown component: {id}")]
    UnknownComponent { id: String },

    #[error("Action {action} belongs to task {task}, which is not available")]
    TaskLocked { action: String, task: String },

    #[error("Task {task} cannot be {requested}: its actions make it {derived}")]
    InconsistentTaskState {
        task: String,
        requested: State,
        derived: State,
    },

    #[error("Rule cascade exceeded depth {depth} while updating {component}")]
    CascadeDepthExceeded { component: String, depth: usize },

    #[error("Invalid workflow definition {path:?}: {reason}")]
    Definition { path: PathBuf, reason: String },

    #[error("Unsupported workflow definition format: {path:?}")]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkflowError {
    /// True for the "identifier not present in configuration" family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkflowError::UnknownAction { .. }
                | WorkflowError::UnknownTask { .. }
                | WorkflowError::UnknownComponent { .. }
        )
    }
}
