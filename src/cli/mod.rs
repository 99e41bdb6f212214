use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod render;

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Track progress through an ordered checklist of tasks and actions")]
#[command(long_about = "Stepwise loads a workflow of ranked tasks, each with a list of actions. \
                       Tasks unlock one after another as their actions are completed. State is \
                       not persisted: every invocation starts from the workflow definition.")]
pub struct Cli {
    /// Workflow definition file (.toml or .json)
    #[arg(long, global = true, help = "Path to a workflow definition; defaults to the built-in sample")]
    pub workflow: Option<PathBuf>,

    /// Emit a JSON snapshot instead of text
    #[arg(long, global = true, help = "Render the workflow as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the workflow, its tasks and their actions (default)
    Status,
    /// Toggle one or more actions in order, then show the result
    Toggle {
        /// Action identifiers to toggle
        #[arg(required = true, help = "Action ids, applied left to right")]
        actions: Vec<String>,
    },
    /// Toggle the given actions, reset the workflow, then show the result
    Reset {
        /// Action identifiers to toggle before resetting
        #[arg(help = "Action ids applied before the reset")]
        actions: Vec<String>,
    },
    /// List the registered transition rules in evaluation order
    Rules,
}
