//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // skill-events = { path = "../skill-events", features = ["test-fixtures"] }
//!
//! use skill_events::fixtures;
//!
//! let events = fixtures::sample_journal();
//! ```

use crate::ActionEvent;

/// Returns a recorded journal of one chop-until-depleted run.
///
/// Contains 8 events for `player_1`: start, approach, running, one swing,
/// the reward, the depletion, the stop, and the restore firing 120 ticks later.
pub fn sample_journal() -> Vec<ActionEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_journal.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            ActionEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse journal line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
