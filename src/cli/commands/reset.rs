use anyhow::Result;

use super::{report_outcome, toggle_and_progress, Command};
use crate::cli::render::render;
use crate::telemetry::{create_mutation_span, generate_correlation_id};
use crate::workflow::WorkflowStore;

pub struct ResetCommand {
    pub actions: Vec<String>,
    pub json: bool,
}

impl ResetCommand {
    pub fn new(actions: Vec<String>) -> Self {
        Self {
            actions,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for ResetCommand {
    fn execute(&self, store: &mut WorkflowStore) -> Result<()> {
        for action_id in &self.actions {
            let outcome = toggle_and_progress(store, action_id)?;
            if !self.json {
                report_outcome(action_id, &outcome);
            }
        }

        let correlation_id = generate_correlation_id();
        let span = create_mutation_span("reset_workflow", Some(store.workflow_id()), Some(&correlation_id));
        span.in_scope(|| store.reset_workflow());

        if !self.json {
            println!("🧹 Workflow reset");
            println!();
        }
        print!("{}", render(store, self.json)?);
        if self.json {
            println!();
        }
        Ok(())
    }
}
