// Workflow State Store
//
// Owns the workflow, task and action state. Every mutation runs to
// completion, including its rule cascade, or is rolled back as a whole.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::definition::WorkflowDefinition;
use super::errors::WorkflowError;
use super::history::{TransitionCause, TransitionHistory, TransitionRecord};
use super::rules::TransitionRule;
use super::snapshot::WorkflowSnapshot;
use super::types::{Action, ComponentKind, State, Task, WorkflowProgress};

/// Tuning knobs for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Maximum rule hops below a single requested change
    pub max_cascade_depth: usize,
    pub record_history: bool,
    pub history_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_cascade_depth: 16,
            record_history: true,
            history_limit: 256,
        }
    }
}

/// Result of a successful toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionToggled {
    pub action_id: String,
    pub task_id: String,
    pub completed: bool,
    pub task_state: State,
}

/// Values restored when a mutation fails part-way
struct Checkpoint {
    state: State,
    tasks: Vec<Task>,
    history: TransitionHistory,
}

#[derive(Debug, Clone)]
pub struct WorkflowStore {
    id: String,
    name: String,
    state: State,
    /// Sorted by rank
    tasks: Vec<Task>,
    rules: Vec<TransitionRule>,
    /// action id -> (task index, action index)
    action_index: HashMap<String, (usize, usize)>,
    settings: EngineSettings,
    history: TransitionHistory,
}

impl WorkflowStore {
    pub fn new(definition: WorkflowDefinition) -> Self {
        Self::with_settings(definition, EngineSettings::default())
    }

    pub fn with_settings(definition: WorkflowDefinition, settings: EngineSettings) -> Self {
        let rules = definition.effective_rules();
        let tasks: Vec<Task> = definition
            .ordered_tasks()
            .into_iter()
            .map(|t| {
                let actions = t
                    .actions
                    .iter()
                    .map(|a| Action::new(a.id.clone(), a.name.clone()))
                    .collect();
                Task::new(t.id.clone(), t.name.clone(), t.rank, actions)
            })
            .collect();

        let mut action_index = HashMap::new();
        for (task_idx, task) in tasks.iter().enumerate() {
            for (action_idx, action) in task.actions.iter().enumerate() {
                action_index.insert(action.id.clone(), (task_idx, action_idx));
            }
        }

        info!(
            workflow_id = %definition.id,
            tasks = tasks.len(),
            actions = action_index.len(),
            rules = rules.len(),
            "Workflow store initialized"
        );

        let history = TransitionHistory::new(settings.record_history, settings.history_limit);
        Self {
            id: definition.id,
            name: definition.name,
            state: State::Pending,
            tasks,
            rules,
            action_index,
            settings,
            history,
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Flip an action's completion flag and re-derive its task's state.
    ///
    /// The derived state goes through the general update path so rules can
    /// react to task completion. Availability is not checked here; see
    /// [`WorkflowStore::try_toggle_action`].
    pub fn toggle_action(&mut self, action_id: &str) -> Result<ActionToggled, WorkflowError> {
        let (task_idx, action_idx) = self.locate_action(action_id)?;

        self.atomically(|store| {
            let task = &mut store.tasks[task_idx];
            let action = &mut task.actions[action_idx];
            action.completed = !action.completed;
            let completed = action.completed;
            let task_id = task.id.clone();
            let derived = task.derived_state();

            debug!(action_id = %action_id, task_id = %task_id, completed, "Action toggled");

            store.apply_state(
                &task_id,
                derived,
                TransitionCause::Toggle {
                    action: action_id.to_string(),
                },
                0,
            )?;

            Ok(ActionToggled {
                action_id: action_id.to_string(),
                task_id,
                completed,
                task_state: derived,
            })
        })
    }

    /// Toggle only if the owning task is currently available
    pub fn try_toggle_action(&mut self, action_id: &str) -> Result<ActionToggled, WorkflowError> {
        let (task_idx, _) = self.locate_action(action_id)?;

        if !self.is_available_at(task_idx) {
            let task_id = self.tasks[task_idx].id.clone();
            warn!(action_id = %action_id, task_id = %task_id, "Rejected toggle on locked task");
            return Err(WorkflowError::TaskLocked {
                action: action_id.to_string(),
                task: task_id,
            });
        }

        self.toggle_action(action_id)
    }

    /// Set the workflow's or a task's state, then run matching rules in registration order
    pub fn update_state(&mut self, component_id: &str, new_state: State) -> Result<(), WorkflowError> {
        self.resolve(component_id)?;
        self.atomically(|store| store.apply_state(component_id, new_state, TransitionCause::Direct, 0))
    }

    /// Move the workflow out of `Pending` once any action is complete.
    ///
    /// Returns whether the workflow state changed.
    pub fn check_and_update_workflow_progress(&mut self) -> Result<bool, WorkflowError> {
        if self.state != State::Pending || !self.any_action_completed() {
            return Ok(false);
        }

        let workflow_id = self.id.clone();
        self.atomically(|store| {
            store.apply_state(&workflow_id, State::InProgress, TransitionCause::Progress, 0)
        })?;
        Ok(true)
    }

    /// Reinitialize every state and flag to its startup value
    pub fn reset_workflow(&mut self) {
        self.state = State::Pending;
        for task in &mut self.tasks {
            task.reset();
        }
        self.history.clear();
        info!(workflow_id = %self.id, "Workflow reset");
    }

    fn apply_state(
        &mut self,
        component_id: &str,
        new_state: State,
        cause: TransitionCause,
        depth: usize,
    ) -> Result<(), WorkflowError> {
        let limit = self.cascade_limit();
        if depth > limit {
            warn!(
                component = %component_id,
                depth,
                limit,
                "Rule cascade exceeded maximum depth"
            );
            return Err(WorkflowError::CascadeDepthExceeded {
                component: component_id.to_string(),
                depth: limit,
            });
        }

        let kind = self.resolve(component_id)?;

        // A task never stores a state its actions contradict. Rules are
        // reconciled to the derived state; direct requests are refused.
        let new_state = match kind {
            ComponentKind::Workflow => new_state,
            ComponentKind::Task(index) => {
                let task = &self.tasks[index];
                match cause {
                    TransitionCause::Rule { .. } => {
                        let reconciled = task.reconcile(new_state);
                        if reconciled != new_state {
                            debug!(
                                task_id = %component_id,
                                requested = %new_state,
                                assigned = %reconciled,
                                "Rule assignment reconciled with action completion"
                            );
                        }
                        reconciled
                    }
                    _ if task.accepts(new_state) => new_state,
                    _ => {
                        return Err(WorkflowError::InconsistentTaskState {
                            task: component_id.to_string(),
                            requested: new_state,
                            derived: task.derived_state(),
                        })
                    }
                }
            }
        };

        let previous = match kind {
            ComponentKind::Workflow => std::mem::replace(&mut self.state, new_state),
            ComponentKind::Task(index) => std::mem::replace(&mut self.tasks[index].state, new_state),
        };

        if previous != new_state {
            info!(
                component = %component_id,
                from = %previous,
                to = %new_state,
                cause = ?cause,
                depth,
                "State transition"
            );
            self.history.record(TransitionRecord {
                component: component_id.to_string(),
                from: previous,
                to: new_state,
                cause,
                depth,
                timestamp: Utc::now(),
            });
        }

        // Each rule's cascade finishes before the next rule's guard is evaluated,
        // so a later rule targeting the same component wins.
        for index in 0..self.rules.len() {
            if !self.rules[index].should_transition(self, component_id, new_state) {
                continue;
            }
            let target = self.rules[index].target.clone();
            let target_state = self.rules[index].target_state;
            debug!(
                rule = index,
                source = %component_id,
                target = %target,
                target_state = %target_state,
                "Transition rule matched"
            );
            self.apply_state(&target, target_state, TransitionCause::Rule { index }, depth + 1)?;
        }

        Ok(())
    }

    /// Deepest rule hop allowed below one requested change.
    ///
    /// An acyclic chain fires each rule at most once, so the bound never
    /// drops below the number of rules plus one.
    fn cascade_limit(&self) -> usize {
        self.settings.max_cascade_depth.max(self.rules.len() + 1)
    }

    fn atomically<T>(
        &mut self,
        mutation: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        let checkpoint = Checkpoint {
            state: self.state,
            tasks: self.tasks.clone(),
            history: self.history.clone(),
        };

        match mutation(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(error = %e, "Mutation failed, restoring previous state");
                self.state = checkpoint.state;
                self.tasks = checkpoint.tasks;
                self.history = checkpoint.history;
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn workflow_id(&self) -> &str {
        &self.id
    }

    pub fn workflow_name(&self) -> &str {
        &self.name
    }

    pub fn workflow_state(&self) -> State {
        self.state
    }

    /// Stored state, not recomputed on read
    pub fn task_state(&self, task_id: &str) -> Option<State> {
        self.task(task_id).map(|t| t.state)
    }

    pub fn action_completed(&self, action_id: &str) -> Option<bool> {
        self.action_index
            .get(action_id)
            .map(|&(t, a)| self.tasks[t].actions[a].completed)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_for_action(&self, action_id: &str) -> Option<&Task> {
        self.action_index.get(action_id).map(|&(t, _)| &self.tasks[t])
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Ground truth for task completion, independent of the stored state
    pub fn is_task_completed(&self, task_id: &str) -> Result<bool, WorkflowError> {
        self.task(task_id)
            .map(Task::is_completed)
            .ok_or_else(|| WorkflowError::UnknownTask {
                id: task_id.to_string(),
            })
    }

    pub fn is_workflow_completed(&self) -> bool {
        self.tasks.iter().all(Task::is_completed)
    }

    pub fn any_action_completed(&self) -> bool {
        self.tasks
            .iter()
            .flat_map(|t| t.actions.iter())
            .any(|a| a.completed)
    }

    /// Whether the task's actions may currently be toggled
    pub fn is_task_available(&self, task_id: &str) -> Result<bool, WorkflowError> {
        let index = self.task_position(task_id)?;
        Ok(self.is_available_at(index))
    }

    pub fn available_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(index, _)| self.is_available_at(*index))
            .map(|(_, task)| task)
            .collect()
    }

    pub fn progress(&self) -> WorkflowProgress {
        WorkflowProgress {
            completed_actions: self.tasks.iter().map(Task::completed_actions).sum(),
            total_actions: self.action_index.len(),
            completed_tasks: self.tasks.iter().filter(|t| t.is_completed()).count(),
            total_tasks: self.tasks.len(),
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot::from(self)
    }

    pub(crate) fn is_available_at(&self, index: usize) -> bool {
        if self.state.is_completed() {
            return false;
        }
        if self.tasks[index].state.is_completed() || index == 0 {
            return true;
        }
        self.tasks[index - 1].state.is_completed()
    }

    fn locate_action(&self, action_id: &str) -> Result<(usize, usize), WorkflowError> {
        self.action_index
            .get(action_id)
            .copied()
            .ok_or_else(|| WorkflowError::UnknownAction {
                id: action_id.to_string(),
            })
    }

    fn task_position(&self, task_id: &str) -> Result<usize, WorkflowError> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| WorkflowError::UnknownTask {
                id: task_id.to_string(),
            })
    }

    fn resolve(&self, component_id: &str) -> Result<ComponentKind, WorkflowError> {
        if component_id == self.id {
            return Ok(ComponentKind::Workflow);
        }
        self.tasks
            .iter()
            .position(|t| t.id == component_id)
            .map(ComponentKind::Task)
            .ok_or_else(|| WorkflowError::UnknownComponent {
                id: component_id.to_string(),
            })
    }
}
