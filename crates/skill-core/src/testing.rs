//! In-memory host and scripted random source for unit tests.

use std::collections::{BTreeMap, HashMap, VecDeque};

use skill_events::{ActorId, AnimationId, ItemId, Notice, ObjectId, Position, SkillId};

use crate::host::{ActorAccess, Container, RandomSource, WorldAccess, WorldObject};

/// Returns the scripted values in order, then `fallback` forever
pub struct ScriptedRandom {
    values: VecDeque<u32>,
    fallback: u32,
    pub draws: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0,
            draws: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.draws += 1;
        self.values.pop_front().unwrap_or(self.fallback) % bound
    }
}

#[derive(Debug, Default)]
pub struct FakeActor {
    pub position: Position,
    pub levels: HashMap<SkillId, u32>,
    pub experience: HashMap<SkillId, f64>,
    pub inventory: Vec<ItemId>,
    pub capacity: usize,
    pub equipment: Vec<ItemId>,
    pub notices: Vec<Notice>,
    pub animations: Vec<AnimationId>,
    pub facing: Option<Position>,
    pub approaching: Option<Position>,
}

#[derive(Debug)]
pub struct FakeHost {
    pub actors: BTreeMap<ActorId, FakeActor>,
    pub objects: BTreeMap<Position, Vec<ObjectId>>,
    pub reachable: bool,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            actors: BTreeMap::new(),
            objects: BTreeMap::new(),
            reachable: true,
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor with a woodcutting level and a 28-slot inventory.
    pub fn add_actor(&mut self, actor: &ActorId, position: Position, level: u32) {
        let mut fake = FakeActor {
            position,
            capacity: 28,
            ..Default::default()
        };
        fake.levels.insert(SkillId::new("woodcutting"), level);
        self.actors.insert(actor.clone(), fake);
    }

    pub fn actor(&self, actor: &ActorId) -> &FakeActor {
        &self.actors[actor]
    }

    pub fn actor_mut(&mut self, actor: &ActorId) -> &mut FakeActor {
        self.actors.get_mut(actor).expect("unknown fake actor")
    }

    pub fn give(&mut self, actor: &ActorId, item: ItemId) {
        self.actor_mut(actor).inventory.push(item);
    }

    pub fn equip(&mut self, actor: &ActorId, item: ItemId) {
        self.actor_mut(actor).equipment.push(item);
    }

    pub fn move_actor(&mut self, actor: &ActorId, position: Position) {
        self.actor_mut(actor).position = position;
    }

    pub fn place_object(&mut self, position: Position, id: ObjectId) {
        self.objects.entry(position).or_default().push(id);
    }

    pub fn remove_object(&mut self, position: Position, id: ObjectId) {
        if let Some(objects) = self.objects.get_mut(&position) {
            objects.retain(|o| *o != id);
        }
    }

    pub fn count_items(&self, actor: &ActorId, item: ItemId) -> usize {
        self.actor(actor).inventory.iter().filter(|i| **i == item).count()
    }
}

impl WorldAccess for FakeHost {
    fn find_object(&self, position: Position, id: ObjectId) -> Option<WorldObject> {
        self.objects
            .get(&position)
            .filter(|objects| objects.contains(&id))
            .map(|_| WorldObject { id, position })
    }

    fn replace_object(&mut self, position: Position, from: ObjectId, to: ObjectId) -> bool {
        let Some(objects) = self.objects.get_mut(&position) else {
            return false;
        };
        match objects.iter_mut().find(|o| **o == from) {
            Some(slot) => {
                *slot = to;
                true
            }
            None => false,
        }
    }
}

impl ActorAccess for FakeHost {
    fn position(&self, actor: &ActorId) -> Option<Position> {
        self.actors.get(actor).map(|a| a.position)
    }

    fn skill_level(&self, actor: &ActorId, skill: &SkillId) -> u32 {
        self.actors
            .get(actor)
            .and_then(|a| a.levels.get(skill).copied())
            .unwrap_or(1)
    }

    fn add_experience(&mut self, actor: &ActorId, skill: &SkillId, amount: f64) {
        if let Some(a) = self.actors.get_mut(actor) {
            *a.experience.entry(skill.clone()).or_default() += amount;
        }
    }

    fn contains(&self, actor: &ActorId, container: Container, item: ItemId) -> bool {
        self.actors.get(actor).is_some_and(|a| match container {
            Container::Inventory => a.inventory.contains(&item),
            Container::Equipment => a.equipment.contains(&item),
        })
    }

    fn add_item(&mut self, actor: &ActorId, item: ItemId) -> bool {
        match self.actors.get_mut(actor) {
            Some(a) if a.inventory.len() < a.capacity => {
                a.inventory.push(item);
                true
            }
            _ => false,
        }
    }

    fn free_slots(&self, actor: &ActorId) -> usize {
        self.actors
            .get(actor)
            .map(|a| a.capacity.saturating_sub(a.inventory.len()))
            .unwrap_or(0)
    }

    fn approach(&mut self, actor: &ActorId, target: Position, _radius: u32) -> bool {
        if !self.reachable {
            return false;
        }
        match self.actors.get_mut(actor) {
            Some(a) => {
                a.approaching = Some(target);
                true
            }
            None => false,
        }
    }

    fn halt(&mut self, actor: &ActorId) {
        if let Some(a) = self.actors.get_mut(actor) {
            a.approaching = None;
        }
    }

    fn turn_to(&mut self, actor: &ActorId, target: Position) {
        if let Some(a) = self.actors.get_mut(actor) {
            a.facing = Some(target);
        }
    }

    fn play_animation(&mut self, actor: &ActorId, animation: AnimationId) {
        if let Some(a) = self.actors.get_mut(actor) {
            a.animations.push(animation);
        }
    }

    fn notify(&mut self, actor: &ActorId, notice: Notice) {
        if let Some(a) = self.actors.get_mut(actor) {
            a.notices.push(notice);
        }
    }
}
