//! ECS Systems
//!
//! The per-tick pipeline of the reference host, run in a fixed order:
//! clock, movement, interaction dispatch, actions, deferred events, journal.

pub mod host;
pub mod movement;
pub mod tick;

pub use host::EcsHost;
pub use movement::move_actors;
pub use tick::{
    advance_clock, collect_journal, dispatch_interactions, fire_deferred_events, run_actions,
};
