//! Simulation context passed into agent updates
//!
//! Everything an agent reads besides its own state arrives through
//! [`SimContext`]: shared read-only tables, the target snapshot, the clock
//! and the sinks that receive fire and sound requests.

use crate::archetype::ArchetypeTable;
use crate::config::AiConfig;
use glam::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use warden_combat::{AgentId, Difficulty, FireSink, WeaponTable};
use warden_level::{LevelQuery, PathFinder, SegId};

/// The target agents hunt, as seen at the start of the tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Vec3,
    pub velocity: Vec3,
    pub segment: SegId,
    /// Cloaked targets can't be seen
    pub cloaked: bool,
}

impl Target {
    pub fn new(position: Vec3, segment: SegId) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            segment,
            cloaked: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_cloak(mut self, cloaked: bool) -> Self {
        self.cloaked = cloaked;
        self
    }
}

/// Simulation time source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    /// Seconds since simulation start
    pub time: f64,
    /// Fixed tick duration in seconds
    pub tick: f32,
}

impl Clock {
    /// Default fixed tick, 64 Hz
    pub const DEFAULT_TICK: f32 = 1.0 / 64.0;

    pub fn new(tick: f32) -> Self {
        Self { time: 0.0, tick }
    }

    /// Time one tick from now
    #[inline]
    pub fn next_tick(&self) -> f64 {
        self.time + self.tick as f64
    }

    pub fn advance(&mut self) {
        self.time += self.tick as f64;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICK)
    }
}

/// Sound resource id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(pub u16);

/// A sound to play attached to an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRequest {
    pub sound: SoundId,
    pub agent: AgentId,
}

/// Receives sound requests during an agent update
pub trait SoundSink {
    fn request_sound(&mut self, request: SoundRequest);
}

/// Sound requests collected during a tick
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    pending: Vec<SoundRequest>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[SoundRequest] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl SoundSink for SoundQueue {
    fn request_sound(&mut self, request: SoundRequest) {
        self.pending.push(request);
    }
}

/// Everything an agent update reads or writes outside the agent itself
pub struct SimContext<'a> {
    pub level: &'a dyn LevelQuery,
    pub paths: &'a dyn PathFinder,
    pub archetypes: &'a ArchetypeTable,
    pub weapons: &'a WeaponTable,
    pub config: &'a AiConfig,
    pub target: &'a Target,
    pub clock: Clock,
    pub difficulty: Difficulty,
    /// Receives projectile spawns
    pub fire: &'a mut dyn FireSink,
    /// Receives sound requests
    pub sounds: &'a mut dyn SoundSink,
    /// Aim jitter source
    pub rng: &'a mut dyn RngCore,
}

impl SimContext<'_> {
    /// Current simulation time
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.time
    }
}

/// Unit direction and distance from `from` to `to`
pub fn direction_to(from: Vec3, to: Vec3) -> (Vec3, f32) {
    let delta = to - from;
    let distance = delta.length();
    (delta.normalize_or_zero(), distance)
}
