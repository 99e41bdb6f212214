use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::workflow::EngineSettings;

/// Main configuration structure for Stepwise
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StepwiseConfig {
    /// Workflow definition to load when none is given on the command line
    pub workflow_path: Option<String>,
    /// Rule engine settings
    pub engine: EngineConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on rule hops triggered by one change
    pub max_cascade_depth: usize,
    /// Keep an audit trail of state transitions
    pub record_history: bool,
    /// Maximum transitions kept in the audit trail
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            max_cascade_depth: settings.max_cascade_depth,
            record_history: settings.record_history,
            history_limit: settings.history_limit,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
        }
    }
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_cascade_depth: config.max_cascade_depth,
            record_history: config.record_history,
            history_limit: config.history_limit,
        }
    }
}

impl StepwiseConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (stepwise.toml)
    /// 3. Environment variables (prefixed with STEPWISE_)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("stepwise.toml"))
    }

    /// Same as [`StepwiseConfig::load`] with an explicit file location
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Double underscore separates nesting so snake_case keys survive,
        // e.g. STEPWISE_ENGINE__MAX_CASCADE_DEPTH
        builder = builder.add_source(
            Environment::with_prefix("STEPWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::from(&self.engine)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
