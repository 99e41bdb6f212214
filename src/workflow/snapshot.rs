use serde::{Deserialize, Serialize};

use super::store::WorkflowStore;
use super::types::{Action, State, WorkflowProgress};

/// Serializable view of the store for adapters that render JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub id: String,
    pub name: String,
    pub state: State,
    pub progress: WorkflowProgress,
    pub tasks: Vec<TaskSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: String,
    pub name: String,
    pub rank: u32,
    pub state: State,
    pub available: bool,
    pub actions: Vec<Action>,
}

impl From<&WorkflowStore> for WorkflowSnapshot {
    fn from(store: &WorkflowStore) -> Self {
        let tasks = store
            .tasks()
            .iter()
            .enumerate()
            .map(|(index, task)| TaskSnapshot {
                id: task.id.clone(),
                name: task.name.clone(),
                rank: task.rank,
                state: task.state,
                available: store.is_available_at(index),
                actions: task.actions.clone(),
            })
            .collect();

        Self {
            id: store.workflow_id().to_string(),
            name: store.workflow_name().to_string(),
            state: store.workflow_state(),
            progress: store.progress(),
            tasks,
        }
    }
}
