//! Error types for AI data loading

use crate::archetype::ArchetypeId;
use thiserror::Error;

/// AI system errors
///
/// Only produced while loading tables and configuration; agent updates
/// never fail.
#[derive(Debug, Error)]
pub enum AiError {
    /// Archetype missing from the table
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(ArchetypeId),

    /// Archetype parsed but holds unusable tuning
    #[error("Invalid archetype '{name}': {reason}")]
    InvalidArchetype { name: String, reason: String },

    /// Invalid configuration
    #[error("Invalid AI configuration: {0}")]
    InvalidConfig(String),

    /// TOML source failed to parse
    #[error("Failed to parse AI data: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
