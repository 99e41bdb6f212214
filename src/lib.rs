// Stepwise Library - Sequential Workflow Progress Engine
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::StepwiseConfig;
pub use telemetry::{create_mutation_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    Action, ActionToggled, EngineSettings, RuleGuard, State, Task, TransitionRule,
    WorkflowDefinition, WorkflowError, WorkflowSnapshot, WorkflowStore,
};
