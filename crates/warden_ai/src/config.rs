//! AI tuning configuration

use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};

/// Tunables shared by every agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Awareness lost per second without sight of the target
    pub awareness_decay: f32,

    /// Awareness below which an agent counts as asleep (wake sound threshold)
    pub wake_threshold: f32,

    /// Awareness above which an agent is in combat
    pub combat_threshold: f32,

    /// Minimum distance to the goal position that counts as arrival
    pub min_arrival_radius: f32,

    /// Path segments ahead of the current one considered for shortcuts
    pub lookahead: usize,

    /// Seconds between visibility polls while dormant
    pub dormant_poll_interval: f64,

    /// Nudge path targets away from wall edges in the current room
    pub edge_avoidance: bool,

    /// Walls farther than this along the travel ray are ignored
    pub edge_avoid_range: f32,

    /// Distance an edge nudge pushes past the edge midpoint
    pub edge_push: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            awareness_decay: 0.2,
            wake_threshold: 0.3,
            combat_threshold: 0.5,
            min_arrival_radius: 5.0,
            lookahead: 3,
            dormant_poll_interval: 1.0,
            edge_avoidance: false,
            edge_avoid_range: 20.0,
            edge_push: 25.0,
        }
    }
}

impl AiConfig {
    /// Parse and validate a configuration; missing keys take defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.wake_threshold) || !unit.contains(&self.combat_threshold) {
            return Err(AiError::InvalidConfig(
                "awareness thresholds must lie in [0, 1]".into(),
            ));
        }
        if !(self.awareness_decay >= 0.0) {
            return Err(AiError::InvalidConfig(
                "awareness_decay must be non-negative".into(),
            ));
        }
        if !(self.dormant_poll_interval > 0.0) {
            return Err(AiError::InvalidConfig(
                "dormant_poll_interval must be positive".into(),
            ));
        }
        if !(self.min_arrival_radius >= 0.0 && self.edge_avoid_range >= 0.0) {
            return Err(AiError::InvalidConfig("distances must be non-negative".into()));
        }
        Ok(())
    }

    /// Set awareness decay rate
    pub fn with_awareness_decay(mut self, rate: f32) -> Self {
        self.awareness_decay = rate;
        self
    }

    /// Set path lookahead
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set dormant poll interval
    pub fn with_dormant_poll_interval(mut self, seconds: f64) -> Self {
        self.dormant_poll_interval = seconds;
        self
    }

    /// Enable or disable edge avoidance
    pub fn with_edge_avoidance(mut self, enabled: bool) -> Self {
        self.edge_avoidance = enabled;
        self
    }
}
