// Static workflow description, read once at startup

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::WorkflowError;
use super::rules::{RuleGuard, TransitionRule};
use super::types::State;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: String,
    pub name: String,
}

impl ActionDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub name: String,
    /// 1-based position in the workflow
    pub rank: u32,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

/// Workflow id/name, ranked tasks and an optional explicit rule set.
///
/// Shape is not validated: duplicate ids or rank gaps are a caller
/// precondition violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
    /// `None` means "derive the sequential rule set"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<TransitionRule>>,
}

impl WorkflowDefinition {
    /// Load a definition, picking the parser from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => {
                return Err(WorkflowError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let definition = parsed.map_err(|e| WorkflowError::Definition {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            workflow_id = %definition.id,
            tasks = definition.tasks.len(),
            "Loaded workflow definition"
        );
        Ok(definition)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, WorkflowError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Tasks ordered by rank
    pub fn ordered_tasks(&self) -> Vec<&TaskDefinition> {
        let mut tasks: Vec<&TaskDefinition> = self.tasks.iter().collect();
        tasks.sort_by_key(|t| t.rank);
        tasks
    }

    /// Explicit rules if present, otherwise [`WorkflowDefinition::sequential_rules`]
    pub fn effective_rules(&self) -> Vec<TransitionRule> {
        match &self.rules {
            Some(rules) => rules.clone(),
            None => self.sequential_rules(),
        }
    }

    /// Standard linear rule set.
    ///
    /// Completing rank N marks rank N+1 as `InProgress`; completing the last
    /// rank completes the workflow, guarded on every task being complete.
    pub fn sequential_rules(&self) -> Vec<TransitionRule> {
        let tasks = self.ordered_tasks();
        let mut rules: Vec<TransitionRule> = tasks
            .windows(2)
            .map(|pair| {
                TransitionRule::new(&pair[0].id, State::Completed, &pair[1].id, State::InProgress)
            })
            .collect();

        if let Some(last) = tasks.last() {
            rules.push(
                TransitionRule::new(&last.id, State::Completed, &self.id, State::Completed)
                    .when(RuleGuard::AllTasksCompleted),
            );
        }
        rules
    }

    /// Three-task checklist used by the CLI when no definition is configured
    pub fn sample() -> Self {
        let task = |id: &str, name: &str, rank: u32, actions: &[(&str, &str)]| TaskDefinition {
            id: id.to_string(),
            name: name.to_string(),
            rank,
            actions: actions
                .iter()
                .map(|(id, name)| ActionDefinition::new(*id, *name))
                .collect(),
        };

        Self {
            id: "w1".to_string(),
            name: "Release checklist".to_string(),
            tasks: vec![
                task("t1", "Prepare", 1, &[("a1", "Bump version"), ("a2", "Update changelog")]),
                task("t2", "Verify", 2, &[("a3", "Run test suite"), ("a4", "Review diff")]),
                task(
                    "t3",
                    "Publish",
                    3,
                    &[("a5", "Tag release"), ("a6", "Publish artifacts"), ("a7", "Announce")],
                ),
            ],
            rules: None,
        }
    }
}
