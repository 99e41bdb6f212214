// Core types for the workflow progress engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued state shared by the workflow and its tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Nothing has been done yet
    #[default]
    Pending,
    /// Some, but not all, of the work is done
    InProgress,
    /// All of the work is done
    Completed,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Pending => "pending",
            State::InProgress => "in_progress",
            State::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, State::Completed)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic, user-toggleable unit of completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

impl Action {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completed: false,
        }
    }
}

/// Ranked unit of work holding an ordered list of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub rank: u32,
    pub actions: Vec<Action>,
    pub state: State,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rank: u32, actions: Vec<Action>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
            actions,
            state: State::Pending,
        }
    }

    pub fn completed_actions(&self) -> usize {
        self.actions.iter().filter(|a| a.completed).count()
    }

    /// True when every action is complete. A task without actions is vacuously complete.
    pub fn is_completed(&self) -> bool {
        self.actions.iter().all(|a| a.completed)
    }

    /// State as a pure function of the action flags.
    ///
    /// Zero complete is `Pending`, all complete is `Completed`, anything
    /// in between is `InProgress`. Completion is checked first, so an
    /// action-less task derives to `Completed` like [`Task::is_completed`].
    pub fn derived_state(&self) -> State {
        if self.is_completed() {
            State::Completed
        } else if self.completed_actions() == 0 {
            State::Pending
        } else {
            State::InProgress
        }
    }

    /// Whether `state` may be stored without contradicting [`Task::derived_state`].
    ///
    /// Besides the derived state itself, a task with no progress may be
    /// marked `InProgress` to flag it as unlocked.
    pub fn accepts(&self, state: State) -> bool {
        let derived = self.derived_state();
        state == derived || (derived == State::Pending && state == State::InProgress)
    }

    /// `requested` if acceptable, otherwise the derived state
    pub fn reconcile(&self, requested: State) -> State {
        if self.accepts(requested) {
            requested
        } else {
            self.derived_state()
        }
    }

    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    pub(crate) fn reset(&mut self) {
        self.state = State::Pending;
        for action in &mut self.actions {
            action.completed = false;
        }
    }
}

/// What kind of component an identifier resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Workflow,
    Task(usize),
}

/// Read-only completion summary for adapters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub completed_actions: usize,
    pub total_actions: usize,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

impl WorkflowProgress {
    /// Whole-number percentage of completed actions
    pub fn percent(&self) -> u8 {
        if self.total_actions == 0 {
            return 0;
        }
        ((self.completed_actions * 100) / self.total_actions) as u8
    }
}
