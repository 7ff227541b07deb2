//! Action Scheduler
//!
//! Holds at most one action per actor and drives every held action once per
//! world tick, in actor id order.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use skill_events::{ActionEvent, ActionEventKind, ActorId, StopReason, Tick};

use crate::deferred::DeferredEventQueue;
use crate::host::{GameHost, RandomSource};

use super::definition::ActionDefinition;
use super::task::{Action, ActionState, TickContext};

/// Resource: the action slot of every actor that currently has one
#[derive(Resource, Debug, Default)]
pub struct ActionScheduler {
    slots: BTreeMap<ActorId, Action>,
    journal: Vec<ActionEvent>,
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new action to `actor`, stopping whatever held the slot before.
    ///
    /// Returns the replaced action, already stopped. The new action begins in
    /// `AwaitingProximity` and is first driven by the next [`tick`](Self::tick).
    pub fn start_action(
        &mut self,
        now: Tick,
        actor: ActorId,
        definition: ActionDefinition,
    ) -> Option<Action> {
        let replaced = self.release(now, &actor, StopReason::Replaced);

        self.journal.push(ActionEvent::for_actor(
            now,
            actor.clone(),
            ActionEventKind::Started {
                skill: definition.skill.clone(),
                object: definition.target.object,
                position: definition.target.position,
                tool: definition.tool,
            },
        ));
        tracing::info!(
            actor = %actor,
            skill = %definition.skill,
            target = %definition.target.object,
            position = %definition.target.position,
            "action started"
        );

        let mut action = Action::new(actor.clone(), definition);
        action.begin();
        self.slots.insert(actor, action);
        replaced
    }

    /// Stop and remove the actor's action. Calling it on an empty slot does nothing.
    pub fn cancel(&mut self, now: Tick, actor: &ActorId) -> Option<Action> {
        self.release(now, actor, StopReason::Cancelled)
    }

    fn release(&mut self, now: Tick, actor: &ActorId, reason: StopReason) -> Option<Action> {
        let mut action = self.slots.remove(actor)?;
        action.stop(reason);
        self.journal.push(ActionEvent::for_actor(
            now,
            actor.clone(),
            ActionEventKind::Stopped { reason },
        ));
        tracing::debug!(actor = %actor, ?reason, "action released");
        Some(action)
    }

    /// Advance every held action by one tick and drop the ones that stopped.
    pub fn tick<H, R>(
        &mut self,
        now: Tick,
        host: &mut H,
        rng: &mut R,
        deferred: &mut DeferredEventQueue,
    ) where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut cx = TickContext {
            now,
            host,
            rng,
            deferred,
            journal: &mut self.journal,
        };
        for action in self.slots.values_mut() {
            action.advance(&mut cx);
        }
        self.slots.retain(|_, action| action.is_running());
    }

    pub fn action(&self, actor: &ActorId) -> Option<&Action> {
        self.slots.get(actor)
    }

    /// State of the actor's slot; `None` means empty
    pub fn state_of(&self, actor: &ActorId) -> Option<ActionState> {
        self.slots.get(actor).map(Action::state)
    }

    pub fn has_action(&self, actor: &ActorId) -> bool {
        self.slots.contains_key(actor)
    }

    pub fn active_count(&self) -> usize {
        self.slots.len()
    }

    /// Take the journal records produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.journal)
    }
}
