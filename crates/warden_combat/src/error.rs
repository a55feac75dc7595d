//! Error types for combat data

use thiserror::Error;

/// Combat data errors
#[derive(Debug, Error)]
pub enum CombatError {
    /// Table source failed to parse
    #[error("Failed to parse weapon table: {0}")]
    Parse(#[from] toml::de::Error),

    /// Table parsed but holds unusable values
    #[error("Invalid weapon: {0}")]
    InvalidWeapon(String),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;
