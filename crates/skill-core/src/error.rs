//! Error Types
//!
//! Every failure the action core can hit is local: it resolves into a notice
//! plus a stop, a silent stop, or a no-op. Nothing here is fatal to the host.

use skill_events::{Notice, SkillId, StopReason};

/// Reasons an action is refused or ends early
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("{skill} level {current} is below the required {required}")]
    PreconditionFailed {
        skill: SkillId,
        required: u32,
        current: u32,
    },

    #[error("no {skill} tool the actor can use")]
    NoToolAvailable { skill: SkillId },

    #[error("inventory has no free slot")]
    ContainerFull,

    #[error("target is no longer present")]
    TargetVanished,

    #[error("no path to the target")]
    Unreachable,

    #[error("actor no longer exists")]
    ActorGone,
}

impl ActionError {
    /// Notice shown to the actor, if this failure is user-facing.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ActionError::PreconditionFailed { skill, required, .. } => {
                Some(Notice::InsufficientLevel {
                    skill: skill.clone(),
                    required: *required,
                })
            }
            ActionError::NoToolAvailable { skill } => Some(Notice::NoToolAvailable {
                skill: skill.clone(),
            }),
            ActionError::ContainerFull => Some(Notice::InventoryFull),
            ActionError::TargetVanished | ActionError::Unreachable | ActionError::ActorGone => None,
        }
    }

    /// Journal reason recorded when this error stops a running action.
    pub fn stop_reason(&self) -> StopReason {
        match self {
            ActionError::PreconditionFailed { .. } | ActionError::NoToolAvailable { .. } => {
                StopReason::PreconditionFailed
            }
            ActionError::ContainerFull => StopReason::ContainerFull,
            ActionError::TargetVanished => StopReason::TargetVanished,
            ActionError::Unreachable => StopReason::Unreachable,
            ActionError::ActorGone => StopReason::ActorGone,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_errors_have_no_notice() {
        assert_eq!(ActionError::TargetVanished.notice(), None);
        assert_eq!(ActionError::Unreachable.notice(), None);
        assert_eq!(ActionError::ActorGone.notice(), None);
    }

    #[test]
    fn test_precondition_maps_to_level_notice() {
        let err = ActionError::PreconditionFailed {
            skill: SkillId::new("woodcutting"),
            required: 15,
            current: 3,
        };
        assert_eq!(
            err.notice(),
            Some(Notice::InsufficientLevel {
                skill: SkillId::new("woodcutting"),
                required: 15
            })
        );
        assert_eq!(err.stop_reason(), StopReason::PreconditionFailed);
        assert_eq!(err.to_string(), "woodcutting level 3 is below the required 15");
    }
}
