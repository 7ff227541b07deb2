//! ECS Components
//!
//! Actor components and world resources of the reference host.

pub mod actor;
pub mod world;

pub use actor::*;
pub use world::*;
