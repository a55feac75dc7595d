//! Fire timing and the pending-spawn queue

use crate::weapon::WeaponId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short delay cap between shots inside a burst
pub const BURST_DELAY: f32 = 1.0 / 8.0;

/// Next primary fire delay after a shot
///
/// Shots inside a burst use a short delay; the shot completing a burst of
/// `burst_size` resets the counter and waits the full `base_delay`.
pub fn advance_burst(rapidfire_count: &mut u8, burst_size: u8, base_delay: f32) -> f32 {
    *rapidfire_count = rapidfire_count.saturating_add(1);

    if *rapidfire_count < burst_size {
        BURST_DELAY.min(base_delay / 2.0)
    } else {
        *rapidfire_count = 0;
        base_delay
    }
}

/// Stable identifier of a live agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent:{}", self.0)
    }
}

/// A projectile the outer loop should spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireRequest {
    /// Shooter
    pub agent: AgentId,
    /// Gun the shot left from
    pub gun: u8,
    pub weapon: WeaponId,
    /// Muzzle position in world space
    pub origin: Vec3,
    /// Unit direction of travel
    pub direction: Vec3,
}

/// Receives fire requests during an agent update
pub trait FireSink {
    fn request_fire(&mut self, request: FireRequest);
}

/// Spawns requested during a tick, applied after every agent has updated
#[derive(Debug, Clone, Default)]
pub struct SpawnQueue {
    pending: Vec<FireRequest>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: FireRequest) {
        self.pending.push(request);
    }

    /// Take every pending spawn in request order
    pub fn drain(&mut self) -> Vec<FireRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[FireRequest] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FireSink for SpawnQueue {
    fn request_fire(&mut self, request: FireRequest) {
        log::trace!("{} fires {} from gun {}", request.agent, request.weapon, request.gun);
        self.push(request);
    }
}
