//! Skill Action Engine
//!
//! Per-actor action scheduling and a deferred world-event queue for timed,
//! resumable gameplay activities, plus a bevy_ecs reference host that runs
//! them headless.

pub mod action;
pub mod components;
pub mod config;
pub mod deferred;
pub mod error;
pub mod events;
pub mod host;
pub mod interaction;
pub mod setup;
pub mod systems;

#[cfg(test)]
mod testing;

pub use action::{
    Action, ActionDefinition, ActionScheduler, ActionState, Activity, ActivityCatalog,
    ContainerFullPolicy, DepletionPolicy, RespawnPolicy, Reward, TargetRef, Tool, ToolCatalog,
};
pub use config::SimConfig;
pub use deferred::{DeferredEventQueue, EventKey, MutationOutcome, RestoreObject, WorldMutation};
pub use error::{ActionError, ConfigError};
pub use events::{ActionJournal, ActionLogger};
pub use host::{ActorAccess, Container, GameHost, RandomSource, SimRng, WorldAccess, WorldObject};
pub use interaction::{DispatchOutcome, InteractionDispatcher, InteractionEvent};
pub use setup::Simulation;
