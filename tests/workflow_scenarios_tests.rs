//! Scenario tests for the workflow progress engine
//!
//! These walk a three-task workflow (2, 2 and 3 actions) through the
//! adapter contract: toggle an action, then check workflow progress.

use stepwise::workflow::{
    ActionDefinition, State, TaskDefinition, TransitionCause, WorkflowDefinition, WorkflowStore,
};

fn three_task_definition() -> WorkflowDefinition {
    let task = |id: &str, rank: u32, actions: &[&str]| TaskDefinition {
        id: id.to_string(),
        name: format!("Task {id}"),
        rank,
        actions: actions
            .iter()
            .map(|a| ActionDefinition::new(*a, format!("Action {a}")))
            .collect(),
    };

    WorkflowDefinition {
        id: "w1".to_string(),
        name: "Scenario workflow".to_string(),
        tasks: vec![
            task("t1", 1, &["a1", "a2"]),
            task("t2", 2, &["a3", "a4"]),
            task("t3", 3, &["a5", "a6", "a7"]),
        ],
        rules: None,
    }
}

/// What a UI would do on a checkbox change
fn click(store: &mut WorkflowStore, action_id: &str) {
    store.toggle_action(action_id).unwrap();
    store.check_and_update_workflow_progress().unwrap();
}

fn assert_empty_start(store: &WorkflowStore) {
    assert_eq!(store.workflow_state(), State::Pending);
    for task in ["t1", "t2", "t3"] {
        assert_eq!(store.task_state(task), Some(State::Pending), "{task}");
    }
    for action in ["a1", "a2", "a3", "a4", "a5", "a6", "a7"] {
        assert_eq!(store.action_completed(action), Some(false), "{action}");
    }
    assert!(store.is_task_available("t1").unwrap());
    assert!(!store.is_task_available("t2").unwrap());
    assert!(!store.is_task_available("t3").unwrap());
}

#[test]
fn test_empty_start() {
    let store = WorkflowStore::new(three_task_definition());
    assert_empty_start(&store);
    assert!(!store.is_workflow_completed());
}

#[test]
fn test_first_action_moves_task_and_workflow_in_progress() {
    let mut store = WorkflowStore::new(three_task_definition());

    store.toggle_action("a1").unwrap();
    assert_eq!(store.task_state("t1"), Some(State::InProgress));
    assert_eq!(store.workflow_state(), State::Pending);

    assert!(store.check_and_update_workflow_progress().unwrap());
    assert_eq!(store.workflow_state(), State::InProgress);
}

#[test]
fn test_task_completion_cascades_to_next_task() {
    let mut store = WorkflowStore::new(three_task_definition());

    click(&mut store, "a1");
    click(&mut store, "a2");

    assert_eq!(store.task_state("t1"), Some(State::Completed));
    assert_eq!(store.task_state("t2"), Some(State::InProgress));
    assert!(store.is_task_available("t2").unwrap());
    assert!(!store.is_task_available("t3").unwrap());

    let t2_record = store.history().for_component("t2").last().unwrap();
    assert_eq!(t2_record.cause, TransitionCause::Rule { index: 0 });
    assert_eq!(t2_record.depth, 1);
}

#[test]
fn test_full_completion_then_everything_disabled() {
    let mut store = WorkflowStore::new(three_task_definition());

    click(&mut store, "a1");
    click(&mut store, "a2");
    assert_eq!(store.task_state("t1"), Some(State::Completed));

    click(&mut store, "a3");
    click(&mut store, "a4");
    assert_eq!(store.task_state("t2"), Some(State::Completed));
    assert_eq!(store.task_state("t3"), Some(State::InProgress));
    assert_eq!(store.workflow_state(), State::InProgress);

    click(&mut store, "a5");
    click(&mut store, "a6");
    assert_eq!(store.workflow_state(), State::InProgress);
    click(&mut store, "a7");

    assert_eq!(store.task_state("t3"), Some(State::Completed));
    assert_eq!(store.workflow_state(), State::Completed);
    assert!(store.is_workflow_completed());

    for task in ["t1", "t2", "t3"] {
        assert!(!store.is_task_available(task).unwrap(), "{task}");
    }
    assert!(store.available_tasks().is_empty());
    assert!(store.try_toggle_action("a7").is_err());
    assert_eq!(store.action_completed("a7"), Some(true));
}

#[test]
fn test_reset_after_completion_equals_empty_start() {
    let mut store = WorkflowStore::new(three_task_definition());
    for action in ["a1", "a2", "a3", "a4", "a5", "a6", "a7"] {
        click(&mut store, action);
    }
    assert_eq!(store.workflow_state(), State::Completed);

    store.reset_workflow();
    assert_empty_start(&store);
    assert!(store.history().is_empty());

    let fresh = WorkflowStore::new(three_task_definition());
    assert_eq!(store.snapshot(), fresh.snapshot());
}

#[test]
fn test_unchecking_completed_task_is_allowed() {
    let mut store = WorkflowStore::new(three_task_definition());
    click(&mut store, "a1");
    click(&mut store, "a2");

    assert!(store.is_task_available("t1").unwrap());
    store.try_toggle_action("a2").unwrap();

    assert_eq!(store.task_state("t1"), Some(State::InProgress));
    assert!(!store.is_task_completed("t1").unwrap());
    assert!(!store.is_task_available("t2").unwrap());
}

#[test]
fn test_unknown_ids_are_no_ops_for_ui_callers() {
    let mut store = WorkflowStore::new(three_task_definition());
    let before = store.snapshot();

    // A UI adapter discards the error and gets a silent no-op
    let _ = store.toggle_action("missing");
    let _ = store.update_state("missing", State::Completed);

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_definition_file_round_trip_through_store() {
    let definition = WorkflowDefinition::from_path(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/onboarding.toml"),
    )
    .unwrap();
    let mut store = WorkflowStore::new(definition);

    assert_eq!(store.rules().len(), 3);
    for action in ["contract", "tax-forms", "email", "vpn", "intro", "buddy", "first-pr"] {
        click(&mut store, action);
    }
    assert_eq!(store.workflow_state(), State::Completed);
    assert_eq!(store.progress().percent(), 100);
}
