//! World Setup
//!
//! Building the reference-host world from configuration and running it.

pub mod simulation;

pub use simulation::*;
