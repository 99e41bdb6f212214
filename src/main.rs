use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use stepwise::cli::commands::reset::ResetCommand;
use stepwise::cli::commands::rules::RulesCommand;
use stepwise::cli::commands::status::StatusCommand;
use stepwise::cli::commands::toggle::ToggleCommand;
use stepwise::cli::commands::Command;
use stepwise::cli::{Cli, Commands};
use stepwise::{init_telemetry, StepwiseConfig, WorkflowDefinition, WorkflowStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    StepwiseConfig::load_env_file()?;
    let config = StepwiseConfig::load().context("Failed to load configuration")?;
    init_telemetry(&config.observability)?;

    let definition = match cli.workflow.clone().or_else(|| config.workflow_path.as_ref().map(PathBuf::from)) {
        Some(path) => WorkflowDefinition::from_path(&path)
            .with_context(|| format!("Failed to load workflow from {}", path.display()))?,
        None => WorkflowDefinition::sample(),
    };
    let mut store = WorkflowStore::with_settings(definition, config.engine_settings());

    let command: Box<dyn Command> = match cli.command {
        None | Some(Commands::Status) => Box::new(StatusCommand::new().with_json(cli.json)),
        Some(Commands::Toggle { actions }) => Box::new(ToggleCommand::new(actions).with_json(cli.json)),
        Some(Commands::Reset { actions }) => Box::new(ResetCommand::new(actions).with_json(cli.json)),
        Some(Commands::Rules) => Box::new(RulesCommand::new().with_json(cli.json)),
    };

    command.execute(&mut store)
}
