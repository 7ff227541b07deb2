//! Action Definitions
//!
//! Immutable descriptions of one activity instance, and the catalog of
//! activities keyed by the object ids that offer them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use skill_events::{AnimationId, ItemId, ObjectId, Position, SkillId};

use crate::host::{RandomSource, WorldAccess, WorldObject};

/// Width of the uniform draw used for depletion rolls
pub const DEPLETION_DRAW_RANGE: u32 = 100;

/// Proximity radius used when an activity does not set one
pub const DEFAULT_RADIUS: u32 = 2;

/// A target referenced by identity, never by live handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub object: ObjectId,
    pub position: Position,
}

impl TargetRef {
    pub fn new(object: ObjectId, position: Position) -> Self {
        Self { object, position }
    }

    /// Look the target up in the current world state.
    pub fn resolve<W: WorldAccess + ?Sized>(&self, world: &W) -> Option<WorldObject> {
        world.find_object(self.position, self.object)
    }
}

/// What one successful step yields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub item: ItemId,
    pub experience: f64,
}

/// Respawn delay: `min_ticks + uniform[0, window_ticks)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespawnPolicy {
    pub min_ticks: u64,
    pub window_ticks: u32,
}

impl RespawnPolicy {
    pub fn roll_delay<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u64 {
        self.min_ticks + u64::from(rng.next_below(self.window_ticks))
    }
}

/// Per-step chance that the target is exhausted, and what replaces it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepletionPolicy {
    /// Probability in [0, 1]
    pub chance: f64,
    pub replacement: ObjectId,
    pub respawn: RespawnPolicy,
}

impl DepletionPolicy {
    /// Whether a draw in `[0, 100)` depletes the target: `draw < 100 * chance`.
    pub fn depletes_on(&self, draw: u32) -> bool {
        f64::from(draw) < self.chance.clamp(0.0, 1.0) * f64::from(DEPLETION_DRAW_RANGE)
    }

    /// One independent roll; consumes exactly one draw.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> bool {
        self.depletes_on(rng.next_below(DEPLETION_DRAW_RANGE))
    }
}

/// What to do when a step's reward does not fit in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFullPolicy {
    /// Lose this step's reward and keep going
    #[default]
    SkipReward,
    /// Tell the actor the inventory is full and stop
    Stop,
}

/// An activity offered by a set of world objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub skill: SkillId,
    pub objects: Vec<ObjectId>,
    pub level: u32,
    pub reward: Reward,
    pub depletion: DepletionPolicy,
    #[serde(default = "default_radius")]
    pub radius: u32,
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS
}

/// Activities indexed by object id
#[derive(Debug, Clone, Default)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
    by_object: HashMap<ObjectId, usize>,
}

impl ActivityCatalog {
    /// Build the index. When two activities claim the same object the first wins.
    pub fn new(activities: Vec<Activity>) -> Self {
        let mut by_object = HashMap::new();
        for (index, activity) in activities.iter().enumerate() {
            for object in &activity.objects {
                by_object.entry(*object).or_insert(index);
            }
        }
        Self {
            activities,
            by_object,
        }
    }

    pub fn lookup(&self, object: ObjectId) -> Option<&Activity> {
        self.by_object.get(&object).map(|&i| &self.activities[i])
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Everything one running action needs, fixed when it is created
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub skill: SkillId,
    pub target: TargetRef,
    pub radius: u32,
    pub required_level: u32,
    pub step_ticks: u32,
    pub tool: ItemId,
    pub animation: AnimationId,
    pub reward: Reward,
    pub depletion: DepletionPolicy,
    pub on_container_full: ContainerFullPolicy,
}

impl ActionDefinition {
    /// Suspension length of one step. Never zero.
    pub fn step_ticks(&self) -> u32 {
        self.step_ticks.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRandom;

    fn depletion(chance: f64) -> DepletionPolicy {
        DepletionPolicy {
            chance,
            replacement: ObjectId(1342),
            respawn: RespawnPolicy {
                min_ticks: 50,
                window_ticks: 250,
            },
        }
    }

    #[test]
    fn test_depletion_bounds() {
        assert!(depletion(1.0).depletes_on(99));
        assert!(!depletion(0.0).depletes_on(0));
        assert!(depletion(3.0).depletes_on(99));
        assert!(!depletion(-1.0).depletes_on(0));
    }

    #[test]
    fn test_fractional_percentage_is_not_rounded() {
        let policy = depletion(0.121);
        assert!(policy.depletes_on(12));
        assert!(!policy.depletes_on(13));

        let policy = depletion(0.125);
        assert!(policy.depletes_on(12));
        assert!(!policy.depletes_on(13));

        let policy = depletion(0.005);
        assert!(policy.depletes_on(0));
        assert!(!policy.depletes_on(1));
    }

    #[test]
    fn test_depletion_roll_against_draws() {
        let policy = depletion(0.25);
        let mut rng = ScriptedRandom::new([0, 24, 25, 99]);
        let rolls: Vec<bool> = (0..4).map(|_| policy.roll(&mut rng)).collect();
        assert_eq!(rolls, vec![true, true, false, false]);
    }

    #[test]
    fn test_certain_and_impossible_depletion() {
        let mut rng = ScriptedRandom::new([99, 0]);
        assert!(depletion(1.0).roll(&mut rng));
        assert!(!depletion(0.0).roll(&mut rng));
    }

    #[test]
    fn test_respawn_delay_range() {
        let policy = depletion(1.0).respawn;
        let mut rng = ScriptedRandom::new([0, 249]);
        assert_eq!(policy.roll_delay(&mut rng), 50);
        assert_eq!(policy.roll_delay(&mut rng), 299);

        let fixed = RespawnPolicy {
            min_ticks: 7,
            window_ticks: 0,
        };
        assert_eq!(fixed.roll_delay(&mut rng), 7);
    }

    #[test]
    fn test_catalog_lookup() {
        let activity = Activity {
            skill: SkillId::new("woodcutting"),
            objects: vec![ObjectId(1276), ObjectId(1278)],
            level: 1,
            reward: Reward {
                item: ItemId(1511),
                experience: 25.0,
            },
            depletion: depletion(1.0),
            radius: DEFAULT_RADIUS,
        };
        let catalog = ActivityCatalog::new(vec![activity]);
        assert!(catalog.lookup(ObjectId(1278)).is_some());
        assert!(catalog.lookup(ObjectId(1342)).is_none());
        assert_eq!(catalog.len(), 1);
    }
}
