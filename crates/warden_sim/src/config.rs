//! Demo run configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `WARDEN_DIFFICULTY`, `WARDEN_TICKS`, `WARDEN_SEED`
//! 2. Config file: first positional argument, else `warden.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! difficulty = "ace"
//! ticks = 1920
//! seed = 7
//! robots = 3
//! snapshot = "snapshot.json"
//!
//! [ai]
//! lookahead = 3
//! edge_avoidance = true
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warden_ai::AiConfig;
use warden_combat::Difficulty;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "warden.toml";

/// Everything a demo run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub difficulty: Difficulty,

    /// Fixed ticks to run
    pub ticks: u32,

    /// Seed for aim jitter and patrol choices
    pub seed: u64,

    /// Tick length in seconds
    pub tick: f32,

    /// Patrolling robots to spawn
    pub robots: u32,

    /// Spawn a reactor turret guarding the side chamber
    pub reactor: bool,

    /// How far, in segments, a patrol goal may be from the robot
    pub patrol_depth: usize,

    /// Write the final agent snapshot here instead of stdout
    pub snapshot: Option<PathBuf>,

    pub ai: AiConfig,

    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            ticks: 64 * 30,
            seed: 0,
            tick: warden_ai::Clock::DEFAULT_TICK,
            robots: 3,
            reactor: true,
            patrol_depth: 4,
            snapshot: None,
            ai: AiConfig::default(),
            config_path: None,
        }
    }
}

impl SimConfig {
    /// Load from the config file and environment, falling back to defaults
    pub fn load() -> Self {
        let path = std::env::args()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .map(PathBuf::from);

        let mut config = match &path {
            Some(path) => Self::load_or_default(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&source)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.ai.validate()?;
        Ok(config)
    }

    /// Apply `WARDEN_*` overrides; unparsable values are ignored with a warning
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("WARDEN_DIFFICULTY") {
            match value.parse() {
                Ok(difficulty) => {
                    self.difficulty = difficulty;
                    log::info!("Difficulty from env: {}", self.difficulty);
                }
                Err(e) => log::warn!("WARDEN_DIFFICULTY: {}", e),
            }
        }

        if let Some(value) = var("WARDEN_TICKS") {
            match value.parse() {
                Ok(ticks) => self.ticks = ticks,
                Err(_) => log::warn!("WARDEN_TICKS: not a tick count: {}", value),
            }
        }

        if let Some(value) = var("WARDEN_SEED") {
            match value.parse() {
                Ok(seed) => self.seed = seed,
                Err(_) => log::warn!("WARDEN_SEED: not a seed: {}", value),
            }
        }
    }

    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run length in simulated seconds
    pub fn duration(&self) -> f64 {
        self.ticks as f64 * self.tick as f64
    }

    pub fn print_summary(&self) {
        log::info!("Run configuration:");
        log::info!("  Difficulty: {}", self.difficulty);
        log::info!("  Ticks: {} ({:.1}s at {:.4}s)", self.ticks, self.duration(), self.tick);
        log::info!("  Seed: {}", self.seed);
        log::info!("  Robots: {}, reactor: {}", self.robots, self.reactor);
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.difficulty, Difficulty::Hotshot);
        assert_eq!(config.duration(), 30.0);
        assert!(config.reactor);
    }

    #[test]
    fn test_partial_toml() {
        let config = SimConfig::from_toml_str(
            r#"
            difficulty = "insane"
            robots = 5

            [ai]
            lookahead = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.difficulty, Difficulty::Insane);
        assert_eq!(config.robots, 5);
        assert_eq!(config.ai.lookahead, 2);
        assert_eq!(config.ai.awareness_decay, AiConfig::default().awareness_decay);
        assert_eq!(config.ticks, SimConfig::default().ticks);
    }

    #[test]
    fn test_invalid_ai_config_rejected() {
        let result = SimConfig::from_toml_str("[ai]\nwake_threshold = 2.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("WARDEN_DIFFICULTY", "trainee"),
            ("WARDEN_TICKS", "128"),
            ("WARDEN_SEED", "not a number"),
        ]
        .into_iter()
        .collect();

        let mut config = SimConfig::default().with_seed(9);
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.difficulty, Difficulty::Trainee);
        assert_eq!(config.ticks, 128);
        assert_eq!(config.seed, 9);
    }
}
