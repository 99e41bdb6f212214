// Property-Based Testing for the workflow progress engine
// Random toggle sequences must never break the derivation, unlock and reset invariants

use proptest::prelude::*;
use stepwise::workflow::{
    ActionDefinition, State, TaskDefinition, WorkflowDefinition, WorkflowStore,
};

/// Workflow shape as a list of per-task action counts
fn workflow_shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 1..=5)
}

fn build_definition(shape: &[usize]) -> WorkflowDefinition {
    let tasks = shape
        .iter()
        .enumerate()
        .map(|(t, &count)| TaskDefinition {
            id: format!("t{}", t + 1),
            name: format!("Task {}", t + 1),
            rank: (t + 1) as u32,
            actions: (0..count)
                .map(|a| ActionDefinition::new(format!("t{}a{}", t + 1, a + 1), "action"))
                .collect(),
        })
        .collect();

    WorkflowDefinition {
        id: "w".to_string(),
        name: "Generated".to_string(),
        tasks,
        rules: None,
    }
}

fn all_action_ids(store: &WorkflowStore) -> Vec<String> {
    store
        .tasks()
        .iter()
        .flat_map(|t| t.actions.iter().map(|a| a.id.clone()))
        .collect()
}

/// Shape plus a sequence of indexes into the flattened action list
fn scenario_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<prop::sample::Index>)> {
    (
        workflow_shape_strategy(),
        prop::collection::vec(any::<prop::sample::Index>(), 0..40),
    )
}

proptest! {
    #[test]
    fn prop_derived_state_matches_action_flags((shape, picks) in scenario_strategy()) {
        let mut store = WorkflowStore::new(build_definition(&shape));
        let ids = all_action_ids(&store);

        for pick in picks {
            let id = pick.get(&ids[..]);
            let _ = store.try_toggle_action(id);
            store.check_and_update_workflow_progress().unwrap();

            for task in store.tasks() {
                let done = task.completed_actions();
                let expected = if done == task.actions.len() {
                    State::Completed
                } else if done == 0 {
                    State::Pending
                } else {
                    State::InProgress
                };
                prop_assert_eq!(task.derived_state(), expected);
                prop_assert_eq!(store.is_task_completed(&task.id).unwrap(), expected == State::Completed);
                // A toggled task always stores its derived state; only the
                // rule-driven unlock marker may read ahead of it
                if task.state != task.derived_state() {
                    prop_assert_eq!(task.state, State::InProgress);
                    prop_assert_eq!(task.derived_state(), State::Pending);
                }
            }

            prop_assert_eq!(
                store.is_workflow_completed(),
                store.workflow_state() == State::Completed
            );
        }
    }

    #[test]
    fn prop_task_unlocks_only_after_predecessor((shape, picks) in scenario_strategy()) {
        let mut store = WorkflowStore::new(build_definition(&shape));
        let ids = all_action_ids(&store);

        for pick in picks {
            let _ = store.try_toggle_action(pick.get::<String>(&ids[..]));
            store.check_and_update_workflow_progress().unwrap();

            let tasks = store.tasks();
            for n in 1..tasks.len() {
                let available = store.is_task_available(&tasks[n].id).unwrap();
                if available && tasks[n].state != State::Completed {
                    prop_assert_eq!(tasks[n - 1].state, State::Completed);
                }
            }
        }
    }

    #[test]
    fn prop_toggle_twice_restores_flag_and_task_state((shape, picks) in scenario_strategy(), target in any::<prop::sample::Index>()) {
        let mut store = WorkflowStore::new(build_definition(&shape));
        let ids = all_action_ids(&store);

        for pick in picks {
            let _ = store.try_toggle_action(pick.get::<String>(&ids[..]));
        }

        let id = target.get(&ids[..]);
        let owner = store.task_for_action(id).unwrap().id.clone();
        let flag_before = store.action_completed(id);
        let derived_before = store.task(&owner).unwrap().derived_state();

        store.toggle_action(id).unwrap();
        store.toggle_action(id).unwrap();

        prop_assert_eq!(store.action_completed(id), flag_before);
        prop_assert_eq!(store.task(&owner).unwrap().derived_state(), derived_before);
        prop_assert_eq!(store.task_state(&owner), Some(derived_before));
    }

    #[test]
    fn prop_reset_is_idempotent((shape, picks) in scenario_strategy()) {
        let mut store = WorkflowStore::new(build_definition(&shape));
        let pristine = store.snapshot();
        let ids = all_action_ids(&store);

        for pick in picks {
            let _ = store.try_toggle_action(pick.get::<String>(&ids[..]));
            store.check_and_update_workflow_progress().unwrap();
        }

        store.reset_workflow();
        let once = store.snapshot();
        store.reset_workflow();

        prop_assert_eq!(&once, &pristine);
        prop_assert_eq!(store.snapshot(), once);
    }
}
