//! Movement System
//!
//! Walks actors one tile per tick toward their approach target.

use bevy_ecs::prelude::*;

use crate::components::{ActorPosition, Approach};

/// System: step every approaching actor once; clear targets that are reached
pub fn move_actors(mut query: Query<(&mut ActorPosition, &mut Approach)>) {
    for (mut position, mut approach) in query.iter_mut() {
        let Some((target, radius)) = approach.target else {
            continue;
        };
        if position.0.is_within(&target, radius) {
            approach.target = None;
            continue;
        }
        position.0 = position.0.step_toward(&target);
        if position.0.is_within(&target, radius) {
            approach.target = None;
        }
    }
}
