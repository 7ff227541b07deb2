//! Actor Components
//!
//! Per-actor state the reference host keeps: identity, position, skills,
//! containers and the cues the action core sends.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use skill_events::{ActorId, AnimationId, ItemId, Notice, Position, SkillId};

/// Default inventory size
pub const INVENTORY_CAPACITY: usize = 28;

/// Component: identity of an actor entity
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self { id }
    }
}

/// Component: the tile an actor stands on
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorPosition(pub Position);

/// Component: skill levels and accumulated experience
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skills {
    levels: BTreeMap<SkillId, u32>,
    experience: BTreeMap<SkillId, f64>,
}

impl Skills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, skill: SkillId, level: u32) -> Self {
        self.levels.insert(skill, level);
        self
    }

    /// Current level; untrained skills are level 1
    pub fn level(&self, skill: &SkillId) -> u32 {
        self.levels.get(skill).copied().unwrap_or(1)
    }

    pub fn experience(&self, skill: &SkillId) -> f64 {
        self.experience.get(skill).copied().unwrap_or(0.0)
    }

    pub fn add_experience(&mut self, skill: &SkillId, amount: f64) {
        *self.experience.entry(skill.clone()).or_default() += amount;
    }
}

/// Component: a fixed-capacity item container
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemId>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Add one item. False when every slot is taken.
    pub fn add(&mut self, item: ItemId) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn count(&self, item: ItemId) -> usize {
        self.items.iter().filter(|i| **i == item).count()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }
}

/// Component: worn items
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub items: Vec<ItemId>,
}

impl Equipment {
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }
}

/// Component: notices delivered to the actor, oldest first
#[derive(Component, Debug, Clone, Default)]
pub struct Mailbox {
    pub notices: Vec<Notice>,
}

/// Component: tile the actor is turned toward
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Facing(pub Option<Position>);

/// Component: last animation cue
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Animation {
    pub current: Option<AnimationId>,
    pub played: u32,
}

/// Component: where the actor is walking, and how close is close enough
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Approach {
    pub target: Option<(Position, u32)>,
}
