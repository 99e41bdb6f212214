use anyhow::Result;

use super::Command;
use crate::cli::render::render;
use crate::workflow::WorkflowStore;

pub struct StatusCommand {
    pub json: bool,
}

impl StatusCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for StatusCommand {
    fn execute(&self, store: &mut WorkflowStore) -> Result<()> {
        print!("{}", render(store, self.json)?);
        if self.json {
            println!();
        }
        Ok(())
    }
}
