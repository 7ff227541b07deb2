//! Action Journal Events
//!
//! Lifecycle records emitted by the action scheduler and the deferred event
//! queue. One JSON object per line when written to disk.

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, ItemId, ObjectId, SkillId, Tick};
use crate::position::Position;

/// Why an action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Level or other requirement not met at the first step
    PreconditionFailed,
    /// Target no longer present on resume
    TargetVanished,
    /// Target depleted; a respawn was scheduled
    Depleted,
    /// Explicit cancel from outside the tick loop
    Cancelled,
    /// A newer action took the actor's slot
    Replaced,
    /// Host reported no path to the target
    Unreachable,
    /// The owning actor no longer exists
    ActorGone,
    /// Inventory full with the stop-on-full policy
    ContainerFull,
}

impl StopReason {
    /// Returns all stop reason variants.
    pub fn all() -> &'static [StopReason] {
        &[
            StopReason::PreconditionFailed,
            StopReason::TargetVanished,
            StopReason::Depleted,
            StopReason::Cancelled,
            StopReason::Replaced,
            StopReason::Unreachable,
            StopReason::ActorGone,
            StopReason::ContainerFull,
        ]
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEventKind {
    /// An action was bound to the actor's slot
    Started {
        skill: SkillId,
        object: ObjectId,
        position: Position,
        tool: ItemId,
    },
    /// Actor is out of range and walking
    Approaching { distance: Option<u32> },
    /// Actor reached the target radius
    Running,
    /// A step began; the action is suspended until `resume_at`
    Performing { resume_at: Tick },
    /// A step produced its reward
    Rewarded { item: ItemId, experience: f64 },
    /// A step completed but the container refused the reward
    RewardMissed { item: ItemId },
    /// Target replaced and its restoration queued
    DepletionScheduled {
        object: ObjectId,
        replacement: ObjectId,
        position: Position,
        fire_at: Tick,
    },
    /// The action ended
    Stopped { reason: StopReason },
    /// A deferred mutation was applied
    MutationFired { description: String },
    /// A deferred mutation found its precondition gone
    MutationSkipped { description: String },
}

impl ActionEventKind {
    /// Short label for summaries
    pub fn label(&self) -> &'static str {
        match self {
            ActionEventKind::Started { .. } => "started",
            ActionEventKind::Approaching { .. } => "approaching",
            ActionEventKind::Running => "running",
            ActionEventKind::Performing { .. } => "performing",
            ActionEventKind::Rewarded { .. } => "rewarded",
            ActionEventKind::RewardMissed { .. } => "reward_missed",
            ActionEventKind::DepletionScheduled { .. } => "depletion_scheduled",
            ActionEventKind::Stopped { .. } => "stopped",
            ActionEventKind::MutationFired { .. } => "mutation_fired",
            ActionEventKind::MutationSkipped { .. } => "mutation_skipped",
        }
    }
}

/// A single journal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub tick: Tick,
    /// Absent for deferred mutations, which outlive their creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
    #[serde(flatten)]
    pub kind: ActionEventKind,
}

impl ActionEvent {
    /// Create an event attributed to an actor.
    pub fn for_actor(tick: Tick, actor: ActorId, kind: ActionEventKind) -> Self {
        Self {
            tick,
            actor: Some(actor),
            kind,
        }
    }

    /// Create an event not tied to any actor.
    pub fn world(tick: Tick, kind: ActionEventKind) -> Self {
        Self {
            tick,
            actor: None,
            kind,
        }
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_jsonl() {
        let event = ActionEvent::for_actor(
            3,
            ActorId::new("player_1"),
            ActionEventKind::Stopped {
                reason: StopReason::Depleted,
            },
        );

        let line = event.to_jsonl().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"kind\":\"stopped\""));
        assert!(line.contains("\"reason\":\"depleted\""));

        let parsed = ActionEvent::from_jsonl(&line).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_world_event_omits_actor() {
        let event = ActionEvent::world(
            90,
            ActionEventKind::MutationSkipped {
                description: "restore object#1276".to_string(),
            },
        );
        let line = event.to_jsonl().unwrap();
        assert!(!line.contains("actor"));
        assert_eq!(ActionEvent::from_jsonl(&line).unwrap().actor, None);
    }

    #[test]
    fn test_stop_reason_snake_case() {
        for reason in StopReason::all() {
            let json = serde_json::to_string(reason).unwrap();
            assert!(json.chars().all(|c| c != ' ' && !c.is_uppercase()));
        }
    }
}
