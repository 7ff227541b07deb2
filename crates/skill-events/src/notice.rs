//! Actor Notices
//!
//! Typed messages delivered to an actor's message channel. The host decides how
//! to render them; `Display` gives a plain default wording.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{ItemId, SkillId};

/// A fire-and-forget message for an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// No possessed tool qualifies for the activity
    NoToolAvailable { skill: SkillId },
    /// Skill level is below the target's requirement
    InsufficientLevel { skill: SkillId, required: u32 },
    /// No free inventory slot
    InventoryFull,
    /// A step of the activity has begun
    Performing { skill: SkillId },
    /// A step produced an item
    Rewarded { item: ItemId },
}

impl Notice {
    /// Short machine-friendly label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Notice::NoToolAvailable { .. } => "no_tool_available",
            Notice::InsufficientLevel { .. } => "insufficient_level",
            Notice::InventoryFull => "inventory_full",
            Notice::Performing { .. } => "performing",
            Notice::Rewarded { .. } => "rewarded",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoToolAvailable { skill } => write!(
                f,
                "You do not have a {} tool for which you have the level to use.",
                skill
            ),
            Notice::InsufficientLevel { skill, required } => write!(
                f,
                "You need a {} level of {} to do that.",
                skill, required
            ),
            Notice::InventoryFull => {
                write!(f, "You don't have enough inventory space to hold that item.")
            }
            Notice::Performing { skill } => write!(f, "You begin {}.", skill),
            Notice::Rewarded { item } => write!(f, "You manage to get some {}.", item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_serialization_is_tagged() {
        let notice = Notice::InsufficientLevel {
            skill: SkillId::new("woodcutting"),
            required: 15,
        };
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"type\":\"insufficient_level\""));
        assert!(json.contains("\"skill\":\"woodcutting\""));

        let parsed: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, notice);
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(
            Notice::InsufficientLevel { skill: SkillId::new("woodcutting"), required: 15 }.to_string(),
            "You need a woodcutting level of 15 to do that."
        );
        assert_eq!(Notice::InventoryFull.label(), "inventory_full");
    }
}
