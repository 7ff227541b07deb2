//! Actions
//!
//! Definitions, tool selection, the per-actor step machine and the scheduler
//! that drives it.

pub mod definition;
pub mod scheduler;
pub mod task;
pub mod tools;

pub use definition::{
    ActionDefinition, Activity, ActivityCatalog, ContainerFullPolicy, DepletionPolicy,
    RespawnPolicy, Reward, TargetRef, DEFAULT_RADIUS, DEPLETION_DRAW_RANGE,
};
pub use scheduler::ActionScheduler;
pub use task::{Action, ActionState, Phase, TickContext};
pub use tools::{Tool, ToolCatalog};
