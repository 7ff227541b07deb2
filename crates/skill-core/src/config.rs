//! Configuration System
//!
//! Loads activity, tool and scenario tables from a TOML file so content can be
//! tuned without recompiling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use skill_events::{ActorId, ItemId, ObjectId, Position, SkillId, Tick};

use crate::action::{Activity, ActivityCatalog, ContainerFullPolicy, Tool, ToolCatalog};
use crate::error::ConfigError;
use crate::interaction::{InteractionDispatcher, DEFAULT_TRIGGER_OPTION};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/woodcutting.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub scenario: Option<ScenarioConfig>,
}

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_ticks: u64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_ticks: 400,
            seed: 42,
        }
    }
}

/// Dispatch and action behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Option selector that starts an activity
    pub interaction_option: u8,
    pub on_container_full: ContainerFullPolicy,
    /// Farthest tile (Chebyshev) the reference host will path to
    pub max_approach_distance: u32,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            interaction_option: DEFAULT_TRIGGER_OPTION,
            on_container_full: ContainerFullPolicy::SkipReward,
            max_approach_distance: 64,
        }
    }
}

/// Actors, objects and scripted interactions for a headless run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub actors: Vec<ActorSetup>,
    #[serde(default)]
    pub objects: Vec<ObjectSetup>,
    #[serde(default)]
    pub interactions: Vec<ScriptedInteraction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSetup {
    pub id: ActorId,
    pub position: Position,
    #[serde(default)]
    pub skills: BTreeMap<SkillId, u32>,
    #[serde(default)]
    pub inventory: Vec<ItemId>,
    #[serde(default)]
    pub equipment: Vec<ItemId>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    28
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSetup {
    pub id: ObjectId,
    pub position: Position,
}

/// An interaction injected at a given tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedInteraction {
    pub tick: Tick,
    pub actor: ActorId,
    pub object: ObjectId,
    pub position: Position,
    #[serde(default = "default_option")]
    pub option: u8,
}

fn default_option() -> u8 {
    DEFAULT_TRIGGER_OPTION
}

impl SimConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default path, falling back to built-in defaults
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!(path = DEFAULT_CONFIG_PATH, error = %e, "using default configuration");
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for activity in &self.activities {
            if activity.objects.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} activity lists no objects",
                    activity.skill
                )));
            }
            let chance = activity.depletion.chance;
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "{} depletion chance {chance} is outside [0, 1]",
                    activity.skill
                )));
            }
        }
        for tool in &self.tools {
            if tool.step_ticks == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} tool {} has zero step ticks",
                    tool.skill, tool.item
                )));
            }
        }
        Ok(())
    }

    /// Build the interaction dispatcher from the activity and tool tables
    pub fn dispatcher(&self) -> InteractionDispatcher {
        InteractionDispatcher::new(
            ActivityCatalog::new(self.activities.clone()),
            ToolCatalog::new(self.tools.clone()),
        )
        .with_trigger_option(self.actions.interaction_option)
        .with_container_full_policy(self.actions.on_container_full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[simulation]
default_ticks = 200
seed = 7

[actions]
on_container_full = "stop"

[[activities]]
skill = "woodcutting"
objects = [1276, 1278]
level = 1
reward = { item = 1511, experience = 25.0 }
depletion = { chance = 1.0, replacement = 1342, respawn = { min_ticks = 50, window_ticks = 250 } }

[[tools]]
skill = "woodcutting"
item = 1351
level = 1
step_ticks = 4
animation = 879

[[scenario.actors]]
id = "player_1"
position = { x = 3208, y = 3210, plane = 0 }
skills = { woodcutting = 1 }
equipment = [1351]

[[scenario.objects]]
id = 1276
position = { x = 3205, y = 3210, plane = 0 }

[[scenario.interactions]]
tick = 0
actor = "player_1"
object = 1276
position = { x = 3205, y = 3210, plane = 0 }
"#;

    #[test]
    fn test_parse_sample() {
        let config = SimConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.simulation.default_ticks, 200);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.actions.interaction_option, 1);
        assert_eq!(config.actions.on_container_full, ContainerFullPolicy::Stop);
        assert_eq!(config.actions.max_approach_distance, 64);
        assert_eq!(config.activities[0].radius, 2);
        assert_eq!(config.tools[0].item, ItemId(1351));

        let scenario = config.scenario.unwrap();
        assert_eq!(scenario.actors[0].capacity, 28);
        assert_eq!(scenario.actors[0].skills[&SkillId::new("woodcutting")], 1);
        assert_eq!(scenario.interactions[0].option, 1);
    }

    #[test]
    fn test_dispatcher_from_config() {
        let config = SimConfig::from_str(SAMPLE).unwrap();
        let dispatcher = config.dispatcher();
        assert!(dispatcher.activities().lookup(ObjectId(1278)).is_some());
        assert_eq!(dispatcher.tools().len(), 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SimConfig::from_str("").unwrap();
        assert_eq!(config.simulation.seed, 42);
        assert!(config.activities.is_empty());
        assert!(config.scenario.is_none());
    }

    #[test]
    fn test_rejects_bad_chance() {
        let bad = SAMPLE.replace("chance = 1.0", "chance = 1.5");
        let err = SimConfig::from_str(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_step_ticks() {
        let bad = SAMPLE.replace("step_ticks = 4", "step_ticks = 0");
        assert!(matches!(
            SimConfig::from_str(&bad),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimConfig::from_str("[simulation"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/woodcutting.toml");
        let config = SimConfig::load(path).unwrap();
        assert!(!config.activities.is_empty());
        assert!(!config.tools.is_empty());
        assert!(config.scenario.is_some());
    }
}
