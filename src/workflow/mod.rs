// Workflow progress engine
//
// Tasks are ranked and unlock one after another; a task's state follows the
// completion of its actions, and declarative transition rules propagate
// state changes to other components.

pub mod definition;
pub mod errors;
pub mod history;
pub mod rules;
pub mod snapshot;
pub mod store;
pub mod types;

pub use definition::{ActionDefinition, TaskDefinition, WorkflowDefinition};
pub use errors::WorkflowError;
pub use history::{TransitionCause, TransitionHistory, TransitionRecord};
pub use rules::{RuleGuard, TransitionRule};
pub use snapshot::{TaskSnapshot, WorkflowSnapshot};
pub use store::{ActionToggled, EngineSettings, WorkflowStore};
pub use types::{Action, ComponentKind, State, Task, WorkflowProgress};
