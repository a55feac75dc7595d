//! Robot archetypes and their difficulty tuning

use crate::context::SoundId;
use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use warden_combat::{Difficulty, Model, WeaponId, DIFFICULTY_TIERS};

/// Index into the archetype table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeId(pub u16);

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "archetype:{}", self.0)
    }
}

/// How an archetype deals damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    #[default]
    Ranged,
    Melee,
}

/// Tuning for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotDifficulty {
    /// Top speed; thrust is capped to an eighth of this per tick
    pub max_speed: f32,
    /// Seconds for a full turn
    pub turn_time: f32,
    /// Cosine of the sight cone half-angle
    pub field_of_view: f32,
    /// Primary fire delay after a full burst
    pub fire_delay: f32,
    /// Secondary fire delay
    pub fire_delay2: f32,
    /// Shots per primary burst
    pub rapidfire_count: u8,
}

impl Default for RobotDifficulty {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            turn_time: 0.5,
            field_of_view: 0.0,
            fire_delay: 1.0,
            fire_delay2: 2.0,
            rapidfire_count: 1,
        }
    }
}

impl RobotDifficulty {
    /// Linear thrust applied when steering
    #[inline]
    pub fn thrust(&self) -> f32 {
        self.max_speed / 8.0
    }

    /// Angular thrust applied when turning
    #[inline]
    pub fn angular_thrust(&self) -> f32 {
        1.0 / self.turn_time / 8.0
    }
}

/// Static data for one robot archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotInfo {
    pub name: String,
    /// Number of gunpoints used for primary fire
    #[serde(default)]
    pub guns: u8,
    /// Primary weapon
    pub weapon: WeaponId,
    /// Secondary weapon, fired from gun 0
    #[serde(default)]
    pub weapon2: Option<WeaponId>,
    #[serde(default)]
    pub attack: AttackType,
    /// Accuracy, 255 is the most accurate
    #[serde(default)]
    pub aim: u8,
    /// Played when the robot first notices the target
    #[serde(default)]
    pub see_sound: Option<SoundId>,
    #[serde(default)]
    pub model: Model,
    /// Tuning per difficulty tier
    pub difficulty: [RobotDifficulty; DIFFICULTY_TIERS],
}

impl RobotInfo {
    /// Create an archetype with default tuning on every tier
    pub fn new(name: impl Into<String>, weapon: WeaponId) -> Self {
        Self {
            name: name.into(),
            guns: 1,
            weapon,
            weapon2: None,
            attack: AttackType::Ranged,
            aim: 0,
            see_sound: None,
            model: Model::default(),
            difficulty: [RobotDifficulty::default(); DIFFICULTY_TIERS],
        }
    }

    /// Use the same tuning on every tier
    pub fn with_tuning(mut self, tuning: RobotDifficulty) -> Self {
        self.difficulty = [tuning; DIFFICULTY_TIERS];
        self
    }

    pub fn with_guns(mut self, guns: u8) -> Self {
        self.guns = guns;
        self
    }

    pub fn with_secondary(mut self, weapon: WeaponId) -> Self {
        self.weapon2 = Some(weapon);
        self
    }

    pub fn with_attack(mut self, attack: AttackType) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_aim(mut self, aim: u8) -> Self {
        self.aim = aim;
        self
    }

    pub fn with_see_sound(mut self, sound: SoundId) -> Self {
        self.see_sound = Some(sound);
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Tuning for the current difficulty
    #[inline]
    pub fn tuning(&self, difficulty: Difficulty) -> &RobotDifficulty {
        &self.difficulty[difficulty.index()]
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| AiError::InvalidArchetype {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        for tuning in &self.difficulty {
            if !(tuning.turn_time > 0.0) {
                return Err(invalid("turn_time must be positive"));
            }
            if !(tuning.max_speed >= 0.0) {
                return Err(invalid("max_speed must be non-negative"));
            }
            if !(-1.0..=1.0).contains(&tuning.field_of_view) {
                return Err(invalid("field_of_view is a cosine in [-1, 1]"));
            }
        }
        Ok(())
    }
}

/// All archetypes, indexed by [`ArchetypeId`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTable {
    #[serde(rename = "robot", default)]
    robots: Vec<RobotInfo>,
}

impl ArchetypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from TOML (`[[robot]]` entries, ids in file order)
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: Self = toml::from_str(source)?;
        for robot in &table.robots {
            robot.validate()?;
        }
        log::debug!("Loaded {} robot archetypes", table.robots.len());
        Ok(table)
    }

    /// Add an archetype, returning its id
    pub fn insert(&mut self, info: RobotInfo) -> ArchetypeId {
        let id = ArchetypeId(self.robots.len() as u16);
        self.robots.push(info);
        id
    }

    pub fn get(&self, id: ArchetypeId) -> Option<&RobotInfo> {
        self.robots.get(id.0 as usize)
    }

    /// Lookup that reports a missing archetype as an error
    pub fn require(&self, id: ArchetypeId) -> Result<&RobotInfo> {
        self.get(id).ok_or(AiError::UnknownArchetype(id))
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HULK: &str = r#"
        [[robot]]
        name = "hulk"
        guns = 2
        weapon = 0
        weapon2 = 1
        aim = 200
        see_sound = 4

        [[robot.difficulty]]
        max_speed = 30.0
        turn_time = 1.0
        field_of_view = 0.5
        fire_delay = 2.0
        fire_delay2 = 4.0
        rapidfire_count = 1

        [[robot.difficulty]]
        max_speed = 35.0
        turn_time = 0.9
        field_of_view = 0.4
        fire_delay = 1.8
        fire_delay2 = 3.5
        rapidfire_count = 1

        [[robot.difficulty]]
        max_speed = 40.0
        turn_time = 0.8
        field_of_view = 0.3
        fire_delay = 1.5
        fire_delay2 = 3.0
        rapidfire_count = 2

        [[robot.difficulty]]
        max_speed = 45.0
        turn_time = 0.7
        field_of_view = 0.2
        fire_delay = 1.2
        fire_delay2 = 2.5
        rapidfire_count = 3

        [[robot.difficulty]]
        max_speed = 50.0
        turn_time = 0.6
        field_of_view = 0.1
        fire_delay = 1.0
        fire_delay2 = 2.0
        rapidfire_count = 4
    "#;

    #[test]
    fn test_from_toml() {
        let table = ArchetypeTable::from_toml_str(HULK).unwrap();
        let hulk = table.require(ArchetypeId(0)).unwrap();

        assert_eq!(hulk.guns, 2);
        assert_eq!(hulk.weapon2, Some(WeaponId(1)));
        assert_eq!(hulk.attack, AttackType::Ranged);
        assert_eq!(hulk.see_sound, Some(SoundId(4)));
        assert_eq!(hulk.tuning(Difficulty::Ace).rapidfire_count, 3);
        assert_eq!(hulk.tuning(Difficulty::Trainee).max_speed, 30.0);
    }

    #[test]
    fn test_unknown_archetype() {
        let table = ArchetypeTable::new();
        assert!(table.get(ArchetypeId(3)).is_none());
        assert!(matches!(
            table.require(ArchetypeId(3)),
            Err(AiError::UnknownArchetype(ArchetypeId(3)))
        ));
    }

    #[test]
    fn test_rejects_zero_turn_time() {
        let source = HULK.replace("turn_time = 0.6", "turn_time = 0.0");
        assert!(matches!(
            ArchetypeTable::from_toml_str(&source),
            Err(AiError::InvalidArchetype { .. })
        ));
    }

    #[test]
    fn test_thrust_limits() {
        let tuning = RobotDifficulty {
            max_speed: 80.0,
            turn_time: 0.25,
            ..Default::default()
        };
        assert_eq!(tuning.thrust(), 10.0);
        assert_eq!(tuning.angular_thrust(), 0.5);
    }

    #[test]
    fn test_builder() {
        let mut table = ArchetypeTable::new();
        let id = table.insert(
            RobotInfo::new("class 1 drone", WeaponId(0))
                .with_guns(3)
                .with_secondary(WeaponId(2))
                .with_attack(AttackType::Melee),
        );
        let info = table.get(id).unwrap();
        assert_eq!(info.guns, 3);
        assert_eq!(info.attack, AttackType::Melee);
        assert_eq!(table.len(), 1);
    }
}
