use anyhow::Result;

use super::{report_outcome, toggle_and_progress, Command, ToggleOutcome};
use crate::cli::render::render;
use crate::workflow::WorkflowStore;

pub struct ToggleCommand {
    pub actions: Vec<String>,
    pub json: bool,
}

impl ToggleCommand {
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

    /// Apply every toggle in order and collect the outcomes
    pub fn apply(&self, store: &mut WorkflowStore) -> Result<Vec<ToggleOutcome>> {
        self.actions
            .iter()
            .map(|action_id| toggle_and_progress(store, action_id))
            .collect()
    }
}

impl Command for ToggleCommand {
    fn execute(&self, store: &mut WorkflowStore) -> Result<()> {
        let outcomes = self.apply(store)?;

        if self.json {
            println!("{}", render(store, true)?);
            return Ok(());
        }

        for (action_id, outcome) in self.actions.iter().zip(&outcomes) {
            report_outcome(action_id, outcome);
        }
        println!();
        print!("{}", render(store, false)?);
        Ok(())
    }
}
