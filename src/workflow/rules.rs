use serde::{Deserialize, Serialize};
use std::fmt;

use super::store::WorkflowStore;
use super::types::State;

/// Predicate kinds that can gate a transition rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleGuard {
    /// Every task has all of its actions complete
    AllTasksCompleted,
    /// The named task has all of its actions complete
    TaskCompleted { task: String },
    /// At least one action anywhere is complete
    AnyActionCompleted,
}

impl RuleGuard {
    pub fn evaluate(&self, store: &WorkflowStore) -> bool {
        match self {
            RuleGuard::AllTasksCompleted => store.is_workflow_completed(),
            RuleGuard::TaskCompleted { task } => store.is_task_completed(task).unwrap_or(false),
            RuleGuard::AnyActionCompleted => store.any_action_completed(),
        }
    }
}

impl fmt::Display for RuleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleGuard::AllTasksCompleted => write!(f, "all tasks completed"),
            RuleGuard::TaskCompleted { task } => write!(f, "task {task} completed"),
            RuleGuard::AnyActionCompleted => write!(f, "any action completed"),
        }
    }
}

/// "When `source` enters `trigger`, set `target` to `target_state`", optionally guarded.
///
/// Rules hold no state; they are evaluated in registration order after every
/// state change. A rule set must be acyclic: the store bounds cascades and
/// reports a cycle as [`super::WorkflowError::CascadeDepthExceeded`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub source: String,
    pub trigger: State,
    pub target: String,
    pub target_state: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<RuleGuard>,
}

impl TransitionRule {
    pub fn new(
        source: impl Into<String>,
        trigger: State,
        target: impl Into<String>,
        target_state: State,
    ) -> Self {
        Self {
            source: source.into(),
            trigger,
            target: target.into(),
            target_state,
            guard: None,
        }
    }

    pub fn when(mut self, guard: RuleGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether this rule fires for `changed_id` having just entered `new_state`
    pub fn should_transition(&self, store: &WorkflowStore, changed_id: &str, new_state: State) -> bool {
        self.source == changed_id
            && self.trigger == new_state
            && self.guard.as_ref().map_or(true, |guard| guard.evaluate(store))
    }
}

impl fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} : {} := {}",
            self.source, self.trigger, self.target, self.target_state
        )?;
        if let Some(guard) = &self.guard {
            write!(f, " (if {guard})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::definition::{ActionDefinition, TaskDefinition, WorkflowDefinition};

    fn two_task_store() -> WorkflowStore {
        let definition = WorkflowDefinition {
            id: "w1".to_string(),
            name: "Workflow".to_string(),
            tasks: vec![
                TaskDefinition {
                    id: "t1".to_string(),
                    name: "First".to_string(),
                    rank: 1,
                    actions: vec![ActionDefinition::new("a1", "One")],
                },
                TaskDefinition {
                    id: "t2".to_string(),
                    name: "Second".to_string(),
                    rank: 2,
                    actions: vec![ActionDefinition::new("a2", "Two")],
                },
            ],
            rules: Some(Vec::new()),
        };
        WorkflowStore::new(definition)
    }

    #[test]
    fn test_unguarded_rule_matches_source_and_trigger() {
        let store = two_task_store();
        let rule = TransitionRule::new("t1", State::Completed, "t2", State::InProgress);

        assert!(rule.should_transition(&store, "t1", State::Completed));
        assert!(!rule.should_transition(&store, "t1", State::InProgress));
        assert!(!rule.should_transition(&store, "t2", State::Completed));
    }

    #[test]
    fn test_guard_blocks_until_satisfied() {
        let mut store = two_task_store();
        let rule = TransitionRule::new("t2", State::Completed, "w1", State::Completed)
            .when(RuleGuard::AllTasksCompleted);

        assert!(!rule.should_transition(&store, "t2", State::Completed));

        store.toggle_action("a1").unwrap();
        assert!(!rule.should_transition(&store, "t2", State::Completed));

        store.toggle_action("a2").unwrap();
        assert!(rule.should_transition(&store, "t2", State::Completed));
    }

    #[test]
    fn test_task_completed_guard_with_unknown_task_is_false() {
        let store = two_task_store();
        let guard = RuleGuard::TaskCompleted {
            task: "missing".to_string(),
        };
        assert!(!guard.evaluate(&store));
    }

    #[test]
    fn test_rule_deserializes_from_toml() {
        let rule: TransitionRule = toml::from_str(
            r#"
            source = "t3"
            trigger = "completed"
            target = "w1"
            target_state = "completed"
            guard = { kind = "all_tasks_completed" }
            "#,
        )
        .unwrap();

        assert_eq!(rule.guard, Some(RuleGuard::AllTasksCompleted));
        assert_eq!(
            rule.to_string(),
            "t3 -> completed : w1 := completed (if all tasks completed)"
        );
    }
}
