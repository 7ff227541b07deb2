//! World Components
//!
//! Resources for the tick clock, actor lookup and the objects placed on the map.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use skill_events::{ActorId, ObjectId, Position, Tick};

use crate::host::{WorldAccess, WorldObject};

/// Resource: the global tick clock
#[derive(Resource, Debug, Clone, Default)]
pub struct TickClock {
    /// Tick currently being processed
    pub current_tick: Tick,
    started: bool,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the next tick. The first call enters tick 0.
    pub fn begin_tick(&mut self) -> Tick {
        if self.started {
            self.current_tick += 1;
        } else {
            self.started = true;
        }
        self.current_tick
    }

    /// Tick the next [`begin_tick`](Self::begin_tick) will enter
    pub fn upcoming(&self) -> Tick {
        if self.started {
            self.current_tick + 1
        } else {
            self.current_tick
        }
    }
}

/// Resource: actor id to entity
#[derive(Resource, Debug, Default)]
pub struct ActorIndex {
    entities: BTreeMap<ActorId, Entity>,
}

impl ActorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorId, entity: Entity) {
        self.entities.insert(actor, entity);
    }

    pub fn remove(&mut self, actor: &ActorId) -> Option<Entity> {
        self.entities.remove(actor)
    }

    pub fn get(&self, actor: &ActorId) -> Option<Entity> {
        self.entities.get(actor).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Resource: objects on the map, several may share a tile
#[derive(Resource, Debug, Default)]
pub struct ObjectRegistry {
    tiles: BTreeMap<Position, Vec<ObjectId>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, position: Position, id: ObjectId) {
        self.tiles.entry(position).or_default().push(id);
    }

    /// Remove one instance of `id` from the tile. False when it was not there.
    pub fn remove(&mut self, position: Position, id: ObjectId) -> bool {
        let Some(objects) = self.tiles.get_mut(&position) else {
            return false;
        };
        let Some(index) = objects.iter().position(|o| *o == id) else {
            return false;
        };
        objects.remove(index);
        if objects.is_empty() {
            self.tiles.remove(&position);
        }
        true
    }

    pub fn objects_at(&self, position: Position) -> &[ObjectId] {
        self.tiles.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl WorldAccess for ObjectRegistry {
    fn find_object(&self, position: Position, id: ObjectId) -> Option<WorldObject> {
        self.objects_at(position)
            .contains(&id)
            .then_some(WorldObject { id, position })
    }

    fn replace_object(&mut self, position: Position, from: ObjectId, to: ObjectId) -> bool {
        let Some(slot) = self
            .tiles
            .get_mut(&position)
            .and_then(|objects| objects.iter_mut().find(|o| **o == from))
        else {
            return false;
        };
        *slot = to;
        true
    }
}

/// Resource: pathing limits of the reference host
#[derive(Resource, Debug, Clone, Copy)]
pub struct MovementRules {
    /// Farthest Chebyshev distance an actor will set out for
    pub max_approach_distance: u32,
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            max_approach_distance: 64,
        }
    }
}
