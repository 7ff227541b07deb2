//! Grid Positions
//!
//! Tile coordinates with a height plane, and the Chebyshev distance used for
//! proximity gating.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile in the world.
///
/// Ordering is (plane, x, y) so registries keyed by position iterate in a
/// stable order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub plane: u8,
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, plane: u8) -> Self {
        Self { plane, x, y }
    }

    /// Chebyshev (king-move) distance, or `None` across planes.
    pub fn distance_to(&self, other: &Position) -> Option<u32> {
        if self.plane != other.plane {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }

    /// True when `other` lies on the same plane within `radius` tiles.
    pub fn is_within(&self, other: &Position, radius: u32) -> bool {
        self.distance_to(other).is_some_and(|d| d <= radius)
    }

    /// One king-move step toward `target` (no-op when already there or across planes).
    pub fn step_toward(&self, target: &Position) -> Position {
        if self.plane != target.plane {
            return *self;
        }
        Position {
            plane: self.plane,
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}
