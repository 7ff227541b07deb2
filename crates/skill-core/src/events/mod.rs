//! Event System
//!
//! The in-memory action journal and its append-only JSONL writer.

pub mod logger;

pub use logger::*;
