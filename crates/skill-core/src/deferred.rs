//! Deferred Event Queue
//!
//! Tick-indexed one-shot world mutations. Events belong to the queue from the
//! moment they are scheduled until they fire, so they keep firing after the
//! actor or action that created them is gone.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

use skill_events::{ActionEvent, ActionEventKind, ObjectId, Position, Tick};

use crate::host::WorldAccess;

/// Result of applying a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Precondition no longer held; nothing changed
    Skipped,
}

/// A world change applied when its tick comes up.
///
/// Implementations must be idempotent: if the world no longer matches what the
/// mutation expects, it returns [`MutationOutcome::Skipped`] and changes nothing.
pub trait WorldMutation: Send + Sync {
    fn apply(&self, world: &mut dyn WorldAccess) -> MutationOutcome;

    fn describe(&self) -> String {
        "deferred mutation".to_string()
    }
}

impl<F> WorldMutation for F
where
    F: Fn(&mut dyn WorldAccess) -> MutationOutcome + Send + Sync,
{
    fn apply(&self, world: &mut dyn WorldAccess) -> MutationOutcome {
        self(world)
    }
}

/// Put the original object back in place of its temporary replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreObject {
    pub position: Position,
    pub replacement: ObjectId,
    pub original: ObjectId,
}

impl RestoreObject {
    pub fn new(position: Position, replacement: ObjectId, original: ObjectId) -> Self {
        Self {
            position,
            replacement,
            original,
        }
    }
}

impl WorldMutation for RestoreObject {
    fn apply(&self, world: &mut dyn WorldAccess) -> MutationOutcome {
        if world.replace_object(self.position, self.replacement, self.original) {
            MutationOutcome::Applied
        } else {
            MutationOutcome::Skipped
        }
    }

    fn describe(&self) -> String {
        format!(
            "restore {} over {} at {}",
            self.original, self.replacement, self.position
        )
    }
}

/// Handle to a scheduled event; orders by fire tick, then insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    pub fire_at: Tick,
    seq: u64,
}

/// A scheduled mutation
pub struct DeferredEvent {
    pub key: EventKey,
    mutation: Box<dyn WorldMutation>,
}

impl DeferredEvent {
    pub fn fire_at(&self) -> Tick {
        self.key.fire_at
    }

    pub fn describe(&self) -> String {
        self.mutation.describe()
    }
}

impl fmt::Debug for DeferredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEvent")
            .field("key", &self.key)
            .field("mutation", &self.mutation.describe())
            .finish()
    }
}

/// Report of one fired event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEvent {
    pub key: EventKey,
    pub outcome: MutationOutcome,
    pub description: String,
}

impl FiredEvent {
    /// Journal record for this firing.
    pub fn to_event(&self, tick: Tick) -> ActionEvent {
        let description = self.description.clone();
        let kind = match self.outcome {
            MutationOutcome::Applied => ActionEventKind::MutationFired { description },
            MutationOutcome::Skipped => ActionEventKind::MutationSkipped { description },
        };
        ActionEvent::world(tick, kind)
    }
}

/// Resource: pending deferred events, bucketed by fire tick
#[derive(Resource, Default)]
pub struct DeferredEventQueue {
    buckets: BTreeMap<Tick, Vec<DeferredEvent>>,
    next_seq: u64,
}

impl DeferredEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `mutation` to fire `ticks_from_now` ticks after `now`.
    ///
    /// Nothing is applied here; a zero delay fires at the end of the current
    /// tick when the queue is next ticked.
    pub fn schedule(
        &mut self,
        now: Tick,
        ticks_from_now: u64,
        mutation: impl WorldMutation + 'static,
    ) -> EventKey {
        let key = EventKey {
            fire_at: now.saturating_add(ticks_from_now),
            seq: self.next_seq,
        };
        self.next_seq += 1;

        tracing::debug!(
            fire_at = key.fire_at,
            mutation = %mutation.describe(),
            "deferred event scheduled"
        );

        self.buckets.entry(key.fire_at).or_default().push(DeferredEvent {
            key,
            mutation: Box::new(mutation),
        });
        key
    }

    /// Remove a pending event. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, key: EventKey) -> bool {
        let Some(bucket) = self.buckets.get_mut(&key.fire_at) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|event| event.key != key);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.buckets.remove(&key.fire_at);
        }
        removed
    }

    /// Fire every event due at or before `now`, in scheduling order.
    pub fn tick(&mut self, now: Tick, world: &mut dyn WorldAccess) -> Vec<FiredEvent> {
        let mut fired = Vec::new();

        while let Some(entry) = self.buckets.first_entry() {
            if *entry.key() > now {
                break;
            }
            for event in entry.remove() {
                let outcome = event.mutation.apply(world);
                let description = event.mutation.describe();
                match outcome {
                    MutationOutcome::Applied => {
                        tracing::debug!(tick = now, %description, "deferred event fired")
                    }
                    MutationOutcome::Skipped => {
                        tracing::warn!(tick = now, %description, "deferred event skipped, world changed")
                    }
                }
                fired.push(FiredEvent {
                    key: event.key,
                    outcome,
                    description,
                });
            }
        }

        fired
    }

    pub fn pending_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Earliest tick with a pending event
    pub fn next_fire_tick(&self) -> Option<Tick> {
        self.buckets.keys().next().copied()
    }

    /// Pending events in firing order
    pub fn iter(&self) -> impl Iterator<Item = &DeferredEvent> {
        self.buckets.values().flatten()
    }
}

impl fmt::Debug for DeferredEventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
