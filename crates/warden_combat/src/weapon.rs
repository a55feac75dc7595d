//! Weapon data table

use crate::difficulty::{Difficulty, DIFFICULTY_TIERS};
use crate::error::{CombatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into the weapon table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(pub u16);

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weapon:{}", self.0)
    }
}

/// Static data for one weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponInfo {
    /// Weapon name
    pub name: String,
    /// Projectile speed per difficulty tier
    pub speed: [f32; DIFFICULTY_TIERS],
    /// Damage per hit (carried for the spawner)
    #[serde(default)]
    pub damage: f32,
}

impl WeaponInfo {
    /// Create a weapon with the same speed on every tier
    pub fn new(name: impl Into<String>, speed: f32) -> Self {
        Self {
            name: name.into(),
            speed: [speed; DIFFICULTY_TIERS],
            damage: 0.0,
        }
    }

    /// Set damage
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Projectile speed at a difficulty
    #[inline]
    pub fn speed_at(&self, difficulty: Difficulty) -> f32 {
        self.speed[difficulty.index()]
    }
}

/// All weapons, indexed by [`WeaponId`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    #[serde(rename = "weapon", default)]
    weapons: Vec<WeaponInfo>,
}

impl WeaponTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from TOML (`[[weapon]]` entries, ids in file order)
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: Self = toml::from_str(source)?;
        for weapon in &table.weapons {
            if weapon.speed.iter().any(|s| !s.is_finite() || *s < 0.0) {
                return Err(CombatError::InvalidWeapon(format!(
                    "'{}' has a negative or non-finite speed",
                    weapon.name
                )));
            }
        }
        log::debug!("Loaded {} weapons", table.weapons.len());
        Ok(table)
    }

    /// Add a weapon, returning its id
    pub fn insert(&mut self, weapon: WeaponInfo) -> WeaponId {
        let id = WeaponId(self.weapons.len() as u16);
        self.weapons.push(weapon);
        id
    }

    /// Weapon data, `None` for unknown ids
    pub fn get(&self, id: WeaponId) -> Option<&WeaponInfo> {
        self.weapons.get(id.0 as usize)
    }

    /// Projectile speed; unknown weapons report zero, which disables leading
    pub fn speed(&self, id: WeaponId, difficulty: Difficulty) -> f32 {
        self.get(id).map_or(0.0, |w| w.speed_at(difficulty))
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}
