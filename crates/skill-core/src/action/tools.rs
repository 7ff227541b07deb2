//! Tool Selection
//!
//! Picks the single best tool an actor can use for a skill: among tools whose
//! level requirement the actor meets and which it carries (equipped or in the
//! inventory), the one with the highest requirement.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use skill_events::{ActorId, AnimationId, ItemId, SkillId};

use crate::error::ActionError;
use crate::host::{ActorAccess, Container};

/// A tool usable for one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub skill: SkillId,
    pub item: ItemId,
    /// Skill level needed to use it
    pub level: u32,
    /// Ticks one step takes with this tool
    pub step_ticks: u32,
    pub animation: AnimationId,
}

/// Ordered table of tools; order is the tie-breaker between equal levels
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    pub fn for_skill<'a>(&'a self, skill: &'a SkillId) -> impl Iterator<Item = &'a Tool> + 'a {
        self.tools.iter().filter(move |tool| &tool.skill == skill)
    }

    /// Highest-level tool for `skill` with `level <= current` that `possesses` accepts.
    /// Equal levels resolve to the earliest catalog entry.
    pub fn select_best<F>(&self, skill: &SkillId, current: u32, possesses: F) -> Option<&Tool>
    where
        F: Fn(ItemId) -> bool,
    {
        self.tools
            .iter()
            .enumerate()
            .filter(|(_, tool)| &tool.skill == skill)
            .filter(|(_, tool)| tool.level <= current)
            .filter(|(_, tool)| possesses(tool.item))
            .max_by_key(|(index, tool)| (tool.level, Reverse(*index)))
            .map(|(_, tool)| tool)
    }

    /// Best tool `actor` can use right now, looking in equipment and inventory.
    pub fn best_for<A: ActorAccess + ?Sized>(
        &self,
        host: &A,
        actor: &ActorId,
        skill: &SkillId,
    ) -> Result<&Tool, ActionError> {
        let current = host.skill_level(actor, skill);
        self.select_best(skill, current, |item| {
            host.contains(actor, Container::Equipment, item)
                || host.contains(actor, Container::Inventory, item)
        })
        .ok_or_else(|| ActionError::NoToolAvailable {
            skill: skill.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
