//! Difficulty tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of difficulty tiers every tuning table holds
pub const DIFFICULTY_TIERS: usize = 5;

/// Game difficulty, selecting a column of the per-archetype tuning tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Trainee,
    Rookie,
    Hotshot,
    Ace,
    Insane,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Hotshot
    }
}

impl Difficulty {
    /// All tiers from easiest to hardest
    pub const ALL: [Difficulty; DIFFICULTY_TIERS] = [
        Difficulty::Trainee,
        Difficulty::Rookie,
        Difficulty::Hotshot,
        Difficulty::Ace,
        Difficulty::Insane,
    ];

    /// Column index into tuning tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Tier for a column index, clamped to the hardest tier
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(DIFFICULTY_TIERS - 1)]
    }

    /// Distance from the hardest tier (Insane = 0, Trainee = 4)
    #[inline]
    pub fn skill_gap(self) -> f32 {
        (DIFFICULTY_TIERS - 1 - self.index()) as f32
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trainee => write!(f, "trainee"),
            Self::Rookie => write!(f, "rookie"),
            Self::Hotshot => write!(f, "hotshot"),
            Self::Ace => write!(f, "ace"),
            Self::Insane => write!(f, "insane"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trainee" | "0" => Ok(Self::Trainee),
            "rookie" | "1" => Ok(Self::Rookie),
            "hotshot" | "2" => Ok(Self::Hotshot),
            "ace" | "3" => Ok(Self::Ace),
            "insane" | "4" => Ok(Self::Insane),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}
