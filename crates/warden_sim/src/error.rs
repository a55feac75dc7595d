//! Demo driver errors

use thiserror::Error;
use warden_ai::AiError;
use warden_combat::CombatError;
use warden_level::LevelError;

/// Errors that stop a demo run
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("AI data error: {0}")]
    Ai(#[from] AiError),

    #[error("Weapon data error: {0}")]
    Combat(#[from] CombatError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for the demo driver
pub type Result<T> = std::result::Result<T, SimError>;
