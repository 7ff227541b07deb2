//! Shared identifiers, notices and journal events for the skill action engine.
//!
//! This crate contains pure data structures with no scheduling logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod ids;
pub mod notice;
pub mod position;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use event::{ActionEvent, ActionEventKind, StopReason};
pub use ids::{ActorId, AnimationId, ItemId, ObjectId, SkillId, Tick};
pub use notice::Notice;
pub use position::Position;
