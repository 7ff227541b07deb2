//! Simulation Runner
//!
//! Owns a bevy `World` with every resource the action pipeline needs and the
//! fixed per-tick schedule.

use bevy_ecs::prelude::*;

use skill_events::{ActionEvent, ActorId, ObjectId, Position, SkillId, Tick};

use crate::action::ActionScheduler;
use crate::components::{
    Actor, ActorIndex, ActorPosition, Animation, Approach, Equipment, Facing, Inventory, Mailbox,
    MovementRules, ObjectRegistry, Skills, TickClock,
};
use crate::config::{ActorSetup, ScenarioConfig, ScriptedInteraction, SimConfig};
use crate::deferred::DeferredEventQueue;
use crate::events::{ActionJournal, ActionLogger};
use crate::host::{ActorAccess, SimRng};
use crate::interaction::{InteractionEvent, PendingInteractions};
use crate::systems::{
    advance_clock, collect_journal, dispatch_interactions, fire_deferred_events, move_actors,
    run_actions, EcsHost,
};

/// A headless world plus its schedule
pub struct Simulation {
    world: World,
    schedule: Schedule,
    scripted: Vec<ScriptedInteraction>,
}

impl Simulation {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(TickClock::new());
        world.insert_resource(ActorIndex::new());
        world.insert_resource(ObjectRegistry::new());
        world.insert_resource(MovementRules {
            max_approach_distance: config.actions.max_approach_distance,
        });
        world.insert_resource(ActionScheduler::new());
        world.insert_resource(DeferredEventQueue::new());
        world.insert_resource(config.dispatcher());
        world.insert_resource(PendingInteractions::new());
        world.insert_resource(SimRng::seeded(seed));
        world.insert_resource(ActionJournal::new());

        let mut schedule = Schedule::default();
        // Actions run before deferred events within a tick.
        schedule.add_systems(
            (
                advance_clock,
                move_actors,
                dispatch_interactions,
                run_actions,
                fire_deferred_events,
                collect_journal,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            scripted: Vec::new(),
        }
    }

    /// Build a simulation and load the configured scenario, if any
    pub fn from_config(config: &SimConfig, seed: u64) -> Self {
        let mut sim = Self::new(config, seed);
        if let Some(scenario) = &config.scenario {
            sim.apply_scenario(scenario);
        }
        sim
    }

    /// Write the journal to `logger` as the run progresses
    pub fn with_logger(mut self, logger: ActionLogger) -> Self {
        self.world.insert_resource(logger);
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Last tick processed (0 before the first tick as well)
    pub fn current_tick(&self) -> Tick {
        self.world.resource::<TickClock>().current_tick
    }

    pub fn spawn_actor(&mut self, setup: &ActorSetup) -> Entity {
        let mut skills = Skills::new();
        for (skill, level) in &setup.skills {
            skills = skills.with_level(skill.clone(), *level);
        }
        let mut inventory = Inventory::with_capacity(setup.capacity);
        for item in &setup.inventory {
            if !inventory.add(*item) {
                tracing::warn!(actor = %setup.id, %item, "starting inventory overflows capacity");
            }
        }

        let entity = self
            .world
            .spawn((
                Actor::new(setup.id.clone()),
                ActorPosition(setup.position),
                skills,
                inventory,
                Equipment {
                    items: setup.equipment.clone(),
                },
                Mailbox::default(),
                Facing::default(),
                Animation::default(),
                Approach::default(),
            ))
            .id();
        self.world
            .resource_mut::<ActorIndex>()
            .insert(setup.id.clone(), entity);
        entity
    }

    /// Remove an actor. Its action stops the next time it is driven.
    pub fn despawn_actor(&mut self, actor: &ActorId) -> bool {
        let Some(entity) = self.world.resource_mut::<ActorIndex>().remove(actor) else {
            return false;
        };
        self.world.despawn(entity)
    }

    pub fn place_object(&mut self, id: ObjectId, position: Position) {
        self.world.resource_mut::<ObjectRegistry>().place(position, id);
    }

    /// Queue an interaction for the next tick's dispatch pass
    pub fn queue_interaction(&mut self, event: InteractionEvent) {
        self.world.resource_mut::<PendingInteractions>().push(event);
    }

    /// Cancel the actor's action from outside the tick loop. The actor also
    /// stops walking toward the abandoned target.
    pub fn cancel_action(&mut self, actor: &ActorId) -> bool {
        let now = self.current_tick();
        let (cancelled, records) = {
            let mut scheduler = self.world.resource_mut::<ActionScheduler>();
            let cancelled = scheduler.cancel(now, actor).is_some();
            (cancelled, scheduler.drain_events())
        };
        self.world.resource_mut::<ActionJournal>().extend(records);
        if cancelled {
            EcsHost::new(&mut self.world).halt(actor);
        }
        cancelled
    }

    pub fn apply_scenario(&mut self, scenario: &ScenarioConfig) {
        for actor in &scenario.actors {
            self.spawn_actor(actor);
        }
        for object in &scenario.objects {
            self.place_object(object.id, object.position);
        }
        self.scripted.extend(scenario.interactions.iter().cloned());
        self.scripted.sort_by_key(|interaction| interaction.tick);
        tracing::info!(
            actors = scenario.actors.len(),
            objects = scenario.objects.len(),
            interactions = scenario.interactions.len(),
            "scenario loaded"
        );
    }

    /// Process one tick
    pub fn tick(&mut self) {
        let upcoming = self.world.resource::<TickClock>().upcoming();
        let due = self
            .scripted
            .iter()
            .take_while(|interaction| interaction.tick <= upcoming)
            .count();
        for interaction in self.scripted.drain(..due) {
            self.world
                .resource_mut::<PendingInteractions>()
                .push(InteractionEvent::new(
                    interaction.actor,
                    interaction.object,
                    interaction.position,
                    interaction.option,
                ));
        }
        self.schedule.run(&mut self.world);
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Records not yet handed to a logger. With a logger installed this only
    /// holds what happened since the last tick.
    pub fn journal(&self) -> &[ActionEvent] {
        self.world.resource::<ActionJournal>().events()
    }

    pub fn drain_journal(&mut self) -> Vec<ActionEvent> {
        self.world.resource_mut::<ActionJournal>().drain()
    }

    pub fn logger(&self) -> Option<&ActionLogger> {
        self.world.get_resource::<ActionLogger>()
    }

    /// Flush buffered journal lines to disk
    pub fn flush_logger(&mut self) -> std::io::Result<()> {
        match self.world.get_resource_mut::<ActionLogger>() {
            Some(mut logger) => logger.flush(),
            None => Ok(()),
        }
    }

    pub fn scheduler(&self) -> &ActionScheduler {
        self.world.resource::<ActionScheduler>()
    }

    pub fn deferred(&self) -> &DeferredEventQueue {
        self.world.resource::<DeferredEventQueue>()
    }

    pub fn objects(&self) -> &ObjectRegistry {
        self.world.resource::<ObjectRegistry>()
    }

    /// A component of the named actor
    pub fn actor_component<T: Component>(&self, actor: &ActorId) -> Option<&T> {
        let entity = self.world.resource::<ActorIndex>().get(actor)?;
        self.world.get::<T>(entity)
    }

    pub fn experience(&self, actor: &ActorId, skill: &SkillId) -> f64 {
        self.actor_component::<Skills>(actor)
            .map(|skills| skills.experience(skill))
            .unwrap_or(0.0)
    }
}
