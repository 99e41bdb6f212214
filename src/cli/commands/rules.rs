use anyhow::Result;

use super::Command;
use crate::workflow::WorkflowStore;

pub struct RulesCommand {
    pub json: bool,
}

impl RulesCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for RulesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for RulesCommand {
    fn execute(&self, store: &mut WorkflowStore) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(store.rules())?);
            return Ok(());
        }

        println!("📐 TRANSITION RULES ({})", store.rules().len());
        for (index, rule) in store.rules().iter().enumerate() {
            println!("  {index}. {rule}");
        }
        Ok(())
    }
}
