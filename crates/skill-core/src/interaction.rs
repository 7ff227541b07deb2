//! Interaction Dispatch
//!
//! Maps an inbound "actor clicked object" event onto an activity start.

use bevy_ecs::prelude::*;

use skill_events::{ActorId, ObjectId, Position, Tick};

use crate::action::{
    ActionDefinition, ActionScheduler, Activity, ActivityCatalog, ContainerFullPolicy, TargetRef,
    Tool, ToolCatalog,
};
use crate::error::ActionError;
use crate::host::GameHost;

/// Option selector that starts an activity unless configured otherwise
pub const DEFAULT_TRIGGER_OPTION: u8 = 1;

/// An actor used an option on a world object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    pub actor: ActorId,
    pub object: ObjectId,
    pub position: Position,
    pub option: u8,
    consumed: bool,
}

impl InteractionEvent {
    pub fn new(actor: ActorId, object: ObjectId, position: Position, option: u8) -> Self {
        Self {
            actor,
            object,
            position,
            option,
            consumed: false,
        }
    }

    /// Stop any further handler from seeing this event.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// What the dispatcher did with an event
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Not ours: wrong option or an object without an activity
    Ignored,
    Started,
    /// Ours, but refused before any action was created
    Rejected(ActionError),
}

/// Resource: activity and tool tables plus the option that triggers them
#[derive(Resource, Debug, Clone)]
pub struct InteractionDispatcher {
    activities: ActivityCatalog,
    tools: ToolCatalog,
    trigger_option: u8,
    on_container_full: ContainerFullPolicy,
}

impl InteractionDispatcher {
    pub fn new(activities: ActivityCatalog, tools: ToolCatalog) -> Self {
        Self {
            activities,
            tools,
            trigger_option: DEFAULT_TRIGGER_OPTION,
            on_container_full: ContainerFullPolicy::default(),
        }
    }

    pub fn with_trigger_option(mut self, option: u8) -> Self {
        self.trigger_option = option;
        self
    }

    pub fn with_container_full_policy(mut self, policy: ContainerFullPolicy) -> Self {
        self.on_container_full = policy;
        self
    }

    pub fn activities(&self) -> &ActivityCatalog {
        &self.activities
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    /// Handle one interaction.
    ///
    /// Events this dispatcher owns are consumed whether or not an action
    /// starts; anything else is left for other handlers.
    pub fn dispatch<H: GameHost + ?Sized>(
        &self,
        now: Tick,
        event: &mut InteractionEvent,
        host: &mut H,
        scheduler: &mut ActionScheduler,
    ) -> DispatchOutcome {
        if event.is_consumed() || event.option != self.trigger_option {
            return DispatchOutcome::Ignored;
        }
        let Some(activity) = self.activities.lookup(event.object) else {
            return DispatchOutcome::Ignored;
        };
        event.consume();

        match self.prepare(activity, event, &*host) {
            Ok(definition) => {
                scheduler.start_action(now, event.actor.clone(), definition);
                DispatchOutcome::Started
            }
            Err(err) => {
                if let Some(notice) = err.notice() {
                    host.notify(&event.actor, notice);
                }
                tracing::debug!(
                    actor = %event.actor,
                    object = %event.object,
                    error = %err,
                    "interaction rejected"
                );
                DispatchOutcome::Rejected(err)
            }
        }
    }

    fn prepare<H: GameHost + ?Sized>(
        &self,
        activity: &Activity,
        event: &InteractionEvent,
        host: &H,
    ) -> Result<ActionDefinition, ActionError> {
        let tool = self.tools.best_for(host, &event.actor, &activity.skill)?;
        if host.free_slots(&event.actor) == 0 {
            return Err(ActionError::ContainerFull);
        }
        Ok(self.definition(activity, tool, event))
    }

    fn definition(
        &self,
        activity: &Activity,
        tool: &Tool,
        event: &InteractionEvent,
    ) -> ActionDefinition {
        ActionDefinition {
            skill: activity.skill.clone(),
            target: TargetRef::new(event.object, event.position),
            radius: activity.radius,
            required_level: activity.level,
            step_ticks: tool.step_ticks,
            tool: tool.item,
            animation: tool.animation,
            reward: activity.reward,
            depletion: activity.depletion,
            on_container_full: self.on_container_full,
        }
    }
}

/// Resource: interactions waiting for the next dispatch pass
#[derive(Resource, Debug, Default)]
pub struct PendingInteractions {
    events: Vec<InteractionEvent>,
}

impl PendingInteractions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InteractionEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
