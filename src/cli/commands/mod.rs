use anyhow::Result;

use crate::telemetry::{create_mutation_span, generate_correlation_id};
use crate::workflow::{WorkflowError, WorkflowStore};

pub mod reset;
pub mod rules;
pub mod status;
pub mod toggle;

pub trait Command {
    fn execute(&self, store: &mut WorkflowStore) -> Result<()>;
}

/// Outcome of one adapter-driven toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied { completed: bool },
    Locked { task: String },
    /// Every task stays locked once the workflow is complete
    Finished,
    Unknown,
}

/// Toggle through the availability check, then advance workflow progress.
///
/// Locked and unknown actions are reported rather than treated as failures,
/// matching how an interactive checklist simply ignores them. Any other
/// error, including a rule targeting an unknown component, is returned.
pub fn toggle_and_progress(store: &mut WorkflowStore, action_id: &str) -> Result<ToggleOutcome> {
    let correlation_id = generate_correlation_id();
    let span = create_mutation_span("toggle_action", Some(action_id), Some(&correlation_id));
    let _guard = span.enter();

    match store.try_toggle_action(action_id) {
        Ok(toggled) => {
            store.check_and_update_workflow_progress()?;
            Ok(ToggleOutcome::Applied {
                completed: toggled.completed,
            })
        }
        Err(WorkflowError::TaskLocked { .. }) if store.workflow_state().is_completed() => {
            Ok(ToggleOutcome::Finished)
        }
        Err(WorkflowError::TaskLocked { task, .. }) => Ok(ToggleOutcome::Locked { task }),
        Err(WorkflowError::UnknownAction { .. }) => Ok(ToggleOutcome::Unknown),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn report_outcome(action_id: &str, outcome: &ToggleOutcome) {
    match outcome {
        ToggleOutcome::Applied { completed: true } => println!("✅ {action_id} checked"),
        ToggleOutcome::Applied { completed: false } => println!("↩️  {action_id} unchecked"),
        ToggleOutcome::Locked { task } => {
            println!("🔒 {action_id} skipped: task {task} is not available yet")
        }
        ToggleOutcome::Finished => {
            println!("🏁 {action_id} skipped: workflow is already complete")
        }
        ToggleOutcome::Unknown => println!("⚠️  {action_id} skipped: unknown action"),
    }
}
