//! Tick Systems
//!
//! Exclusive systems that hand the world to the action core. Each one pulls the
//! resources it drives out of the world with `resource_scope`, so the rest of
//! the world can be lent to [`EcsHost`] at the same time.

use bevy_ecs::prelude::*;

use crate::action::ActionScheduler;
use crate::components::{ObjectRegistry, TickClock};
use crate::deferred::DeferredEventQueue;
use crate::events::{ActionJournal, ActionLogger};
use crate::host::SimRng;
use crate::interaction::{DispatchOutcome, InteractionDispatcher, PendingInteractions};

use super::host::EcsHost;

/// System: enter the next tick
pub fn advance_clock(mut clock: ResMut<TickClock>) {
    let tick = clock.begin_tick();
    tracing::trace!(tick, "tick");
}

/// System: route queued interactions through the dispatcher
pub fn dispatch_interactions(world: &mut World) {
    let now = world.resource::<TickClock>().current_tick;
    let events = world.resource_mut::<PendingInteractions>().drain();
    if events.is_empty() {
        return;
    }

    world.resource_scope(|world, dispatcher: Mut<InteractionDispatcher>| {
        world.resource_scope(|world, mut scheduler: Mut<ActionScheduler>| {
            let mut host = EcsHost::new(world);
            for mut event in events {
                let outcome = dispatcher.dispatch(now, &mut event, &mut host, &mut scheduler);
                if outcome == DispatchOutcome::Ignored {
                    tracing::debug!(
                        actor = %event.actor,
                        object = %event.object,
                        option = event.option,
                        "interaction not handled"
                    );
                }
            }
            let records = scheduler.drain_events();
            world.resource_mut::<ActionJournal>().extend(records);
        });
    });
}

/// System: advance every held action by one tick
pub fn run_actions(world: &mut World) {
    let now = world.resource::<TickClock>().current_tick;

    world.resource_scope(|world, mut scheduler: Mut<ActionScheduler>| {
        world.resource_scope(|world, mut deferred: Mut<DeferredEventQueue>| {
            world.resource_scope(|world, mut rng: Mut<SimRng>| {
                let mut host = EcsHost::new(world);
                scheduler.tick(now, &mut host, &mut *rng, &mut deferred);
            });
        });
        let records = scheduler.drain_events();
        world.resource_mut::<ActionJournal>().extend(records);
    });
}

/// System: apply deferred mutations due this tick
pub fn fire_deferred_events(world: &mut World) {
    let now = world.resource::<TickClock>().current_tick;

    world.resource_scope(|world, mut deferred: Mut<DeferredEventQueue>| {
        let fired = {
            let mut objects = world.resource_mut::<ObjectRegistry>();
            deferred.tick(now, &mut *objects)
        };
        world
            .resource_mut::<ActionJournal>()
            .extend(fired.iter().map(|event| event.to_event(now)));
    });
}

/// System: hand this tick's journal records to the logger, if one is installed.
/// Without a logger the journal keeps accumulating for inspection.
pub fn collect_journal(mut journal: ResMut<ActionJournal>, logger: Option<ResMut<ActionLogger>>) {
    let Some(mut logger) = logger else {
        return;
    };
    let records = journal.drain();
    if let Err(e) = logger.append(&records) {
        tracing::warn!(error = %e, dropped = records.len(), "failed to write action log");
    }
}
