//! ECS Host Adapter
//!
//! Exposes a bevy `World` through the collaborator traits the action core
//! consumes. Actors are found through [`ActorIndex`], objects through
//! [`ObjectRegistry`].

use bevy_ecs::prelude::*;

use skill_events::{ActorId, AnimationId, ItemId, Notice, ObjectId, Position, SkillId};

use crate::components::{
    ActorIndex, ActorPosition, Animation, Approach, Equipment, Facing, Inventory, Mailbox,
    MovementRules, ObjectRegistry, Skills,
};
use crate::host::{ActorAccess, Container, WorldAccess, WorldObject};

/// Borrowed view of the world implementing [`WorldAccess`] and [`ActorAccess`]
pub struct EcsHost<'w> {
    world: &'w mut World,
}

impl<'w> EcsHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn entity(&self, actor: &ActorId) -> Option<Entity> {
        self.world.get_resource::<ActorIndex>()?.get(actor)
    }

    fn component<T: Component>(&self, actor: &ActorId) -> Option<&T> {
        let entity = self.entity(actor)?;
        self.world.get::<T>(entity)
    }

    fn component_mut<T: Component>(&mut self, actor: &ActorId) -> Option<Mut<'_, T>> {
        let entity = self.entity(actor)?;
        self.world.get_mut::<T>(entity)
    }

    fn max_approach_distance(&self) -> u32 {
        self.world
            .get_resource::<MovementRules>()
            .copied()
            .unwrap_or_default()
            .max_approach_distance
    }
}

impl WorldAccess for EcsHost<'_> {
    fn find_object(&self, position: Position, id: ObjectId) -> Option<WorldObject> {
        self.world
            .get_resource::<ObjectRegistry>()?
            .find_object(position, id)
    }

    fn replace_object(&mut self, position: Position, from: ObjectId, to: ObjectId) -> bool {
        self.world
            .get_resource_mut::<ObjectRegistry>()
            .is_some_and(|mut objects| objects.replace_object(position, from, to))
    }
}

impl ActorAccess for EcsHost<'_> {
    fn position(&self, actor: &ActorId) -> Option<Position> {
        self.component::<ActorPosition>(actor).map(|p| p.0)
    }

    fn skill_level(&self, actor: &ActorId, skill: &SkillId) -> u32 {
        self.component::<Skills>(actor)
            .map(|skills| skills.level(skill))
            .unwrap_or(1)
    }

    fn add_experience(&mut self, actor: &ActorId, skill: &SkillId, amount: f64) {
        if let Some(mut skills) = self.component_mut::<Skills>(actor) {
            skills.add_experience(skill, amount);
        }
    }

    fn contains(&self, actor: &ActorId, container: Container, item: ItemId) -> bool {
        match container {
            Container::Inventory => self
                .component::<Inventory>(actor)
                .is_some_and(|inventory| inventory.contains(item)),
            Container::Equipment => self
                .component::<Equipment>(actor)
                .is_some_and(|equipment| equipment.contains(item)),
        }
    }

    fn add_item(&mut self, actor: &ActorId, item: ItemId) -> bool {
        self.component_mut::<Inventory>(actor)
            .is_some_and(|mut inventory| inventory.add(item))
    }

    fn free_slots(&self, actor: &ActorId) -> usize {
        self.component::<Inventory>(actor)
            .map(Inventory::free_slots)
            .unwrap_or(0)
    }

    fn approach(&mut self, actor: &ActorId, target: Position, radius: u32) -> bool {
        let limit = self.max_approach_distance();
        let reachable = self
            .position(actor)
            .and_then(|position| position.distance_to(&target))
            .is_some_and(|distance| distance <= limit);
        if !reachable {
            return false;
        }
        match self.component_mut::<Approach>(actor) {
            Some(mut approach) => {
                approach.target = Some((target, radius));
                true
            }
            None => false,
        }
    }

    fn halt(&mut self, actor: &ActorId) {
        if let Some(mut approach) = self.component_mut::<Approach>(actor) {
            approach.target = None;
        }
    }

    fn turn_to(&mut self, actor: &ActorId, target: Position) {
        if let Some(mut facing) = self.component_mut::<Facing>(actor) {
            facing.0 = Some(target);
        }
    }

    fn play_animation(&mut self, actor: &ActorId, animation: AnimationId) {
        if let Some(mut cue) = self.component_mut::<Animation>(actor) {
            cue.current = Some(animation);
            cue.played += 1;
        }
    }

    fn notify(&mut self, actor: &ActorId, notice: Notice) {
        tracing::debug!(actor = %actor, %notice, "notice");
        if let Some(mut mailbox) = self.component_mut::<Mailbox>(actor) {
            mailbox.notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Actor;

    fn world_with_actor(id: &ActorId, position: Position) -> World {
        let mut world = World::new();
        world.insert_resource(ObjectRegistry::new());
        world.insert_resource(MovementRules {
            max_approach_distance: 10,
        });
        let entity = world
            .spawn((
                Actor::new(id.clone()),
                ActorPosition(position),
                Skills::new().with_level(SkillId::new("woodcutting"), 12),
                Inventory::with_capacity(1),
                Equipment::default(),
                Mailbox::default(),
                Facing::default(),
                Animation::default(),
                Approach::default(),
            ))
            .id();
        let mut index = ActorIndex::new();
        index.insert(id.clone(), entity);
        world.insert_resource(index);
        world
    }

    #[test]
    fn test_actor_access_through_components() {
        let id = ActorId::new("player_1");
        let mut world = world_with_actor(&id, Position::new(0, 0, 0));
        let mut host = EcsHost::new(&mut world);
        let skill = SkillId::new("woodcutting");

        assert_eq!(host.position(&id), Some(Position::new(0, 0, 0)));
        assert_eq!(host.skill_level(&id, &skill), 12);
        assert_eq!(host.free_slots(&id), 1);
        assert!(host.add_item(&id, ItemId(1511)));
        assert!(!host.add_item(&id, ItemId(1511)));
        assert!(host.contains(&id, Container::Inventory, ItemId(1511)));
        assert!(!host.contains(&id, Container::Equipment, ItemId(1511)));

        host.add_experience(&id, &skill, 25.0);
        host.notify(&id, Notice::InventoryFull);
        host.play_animation(&id, AnimationId(879));

        let entity = world.resource::<ActorIndex>().get(&id).unwrap();
        assert_eq!(world.get::<Skills>(entity).unwrap().experience(&skill), 25.0);
        assert_eq!(
            world.get::<Mailbox>(entity).unwrap().notices,
            vec![Notice::InventoryFull]
        );
        assert_eq!(world.get::<Animation>(entity).unwrap().played, 1);
    }

    #[test]
    fn test_approach_respects_distance_and_plane() {
        let id = ActorId::new("player_1");
        let mut world = world_with_actor(&id, Position::new(0, 0, 0));
        let mut host = EcsHost::new(&mut world);

        assert!(!host.approach(&id, Position::new(11, 0, 0), 2));
        assert!(!host.approach(&id, Position::new(1, 0, 1), 2));
        assert!(host.approach(&id, Position::new(10, 0, 0), 2));
        assert!(!host.approach(&ActorId::new("ghost"), Position::new(1, 0, 0), 2));
    }

    #[test]
    fn test_halt_clears_walk_target() {
        let id = ActorId::new("player_1");
        let mut world = world_with_actor(&id, Position::new(0, 0, 0));
        let mut host = EcsHost::new(&mut world);
        assert!(host.approach(&id, Position::new(8, 0, 0), 2));
        host.halt(&id);
        host.halt(&ActorId::new("ghost"));

        let entity = world.resource::<ActorIndex>().get(&id).unwrap();
        assert!(world.get::<Approach>(entity).unwrap().target.is_none());
    }

    #[test]
    fn test_missing_actor_is_gone() {
        let mut world = world_with_actor(&ActorId::new("player_1"), Position::new(0, 0, 0));
        let host = EcsHost::new(&mut world);
        let ghost = ActorId::new("ghost");
        assert_eq!(host.position(&ghost), None);
        assert_eq!(host.free_slots(&ghost), 0);
    }

    #[test]
    fn test_object_replacement() {
        let id = ActorId::new("player_1");
        let tile = Position::new(2, 2, 0);
        let mut world = world_with_actor(&id, Position::new(0, 0, 0));
        world.resource_mut::<ObjectRegistry>().place(tile, ObjectId(1276));

        let mut host = EcsHost::new(&mut world);
        assert!(host.replace_object(tile, ObjectId(1276), ObjectId(1342)));
        assert!(host.find_object(tile, ObjectId(1342)).is_some());
        assert!(host.find_object(tile, ObjectId(1276)).is_none());
    }
}
