//! Fixed-tick simulation driver
//!
//! Owns the agents and everything [`SimContext`] borrows, runs
//! [`update_agent`] over every agent in order, then hands back the spawns
//! requested during the tick. Runs are deterministic for a given seed.

use crate::agent::{Agent, AgentKind};
use crate::archetype::{ArchetypeId, ArchetypeTable};
use crate::config::AiConfig;
use crate::context::{Clock, SimContext, SoundQueue, SoundRequest, Target};
use crate::scheduler::update_agent;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use warden_combat::{AgentId, Difficulty, FireRequest, SpawnQueue, WeaponTable};
use warden_level::{LevelQuery, PathFinder, SegId};

/// Frame time backlog beyond which ticks are dropped
pub const MAX_BACKLOG: f64 = 2.0;

/// Result of [`Simulation::advance`]
#[derive(Debug, Clone, Default)]
pub struct Advance {
    /// Ticks run
    pub ticks: u32,
    /// Spawns from every tick, in order
    pub spawned: Vec<FireRequest>,
    /// Fraction of a tick left in the accumulator, for interpolation
    pub alpha: f32,
}

/// Agents plus the world they act in
pub struct Simulation<L, P> {
    level: L,
    paths: P,
    archetypes: ArchetypeTable,
    weapons: WeaponTable,
    config: AiConfig,
    difficulty: Difficulty,
    agents: Vec<Agent>,
    target: Target,
    clock: Clock,
    spawns: SpawnQueue,
    sounds: SoundQueue,
    rng: ChaCha8Rng,
    accumulator: f64,
    next_id: u32,
}

impl<L: LevelQuery, P: PathFinder> Simulation<L, P> {
    pub fn new(
        level: L,
        paths: P,
        archetypes: ArchetypeTable,
        weapons: WeaponTable,
        target: Target,
    ) -> Self {
        Self {
            level,
            paths,
            archetypes,
            weapons,
            config: AiConfig::default(),
            difficulty: Difficulty::default(),
            agents: Vec::new(),
            target,
            clock: Clock::default(),
            spawns: SpawnQueue::new(),
            sounds: SoundQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(0),
            accumulator: 0.0,
            next_id: 0,
        }
    }

    pub fn with_config(mut self, config: AiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Seed the aim jitter RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Set the fixed tick length in seconds
    pub fn with_tick(mut self, tick: f32) -> Self {
        self.clock.tick = tick;
        self
    }

    /// Add an agent with archetype defaults
    pub fn spawn(
        &mut self,
        kind: AgentKind,
        archetype: ArchetypeId,
        segment: SegId,
        position: Vec3,
    ) -> AgentId {
        let id = AgentId(self.next_id);
        let agent = Agent::new(id, kind, archetype, segment, position)
            .with_room(self.level.room_of(segment));
        self.add_agent(agent);
        id
    }

    /// Add a fully built agent
    pub fn add_agent(&mut self, agent: Agent) {
        self.next_id = self.next_id.max(agent.id.0 + 1);
        log::debug!("Spawned {} ({:?}) in {}", agent.id, agent.kind, agent.segment);
        self.agents.push(agent);
    }

    /// Remove an agent, returning it
    pub fn despawn(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.agents.iter().position(|a| a.id == id)?;
        Some(self.agents.remove(index))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn level(&self) -> &L {
        &self.level
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Replace the target snapshot used from the next tick on
    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    /// Take the sound requests emitted since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundRequest> {
        self.sounds.drain()
    }

    /// Run one fixed tick and return the spawns it requested
    pub fn step(&mut self) -> Vec<FireRequest> {
        let tick = self.clock.tick;
        let mut ctx = SimContext {
            level: &self.level,
            paths: &self.paths,
            archetypes: &self.archetypes,
            weapons: &self.weapons,
            config: &self.config,
            target: &self.target,
            clock: self.clock,
            difficulty: self.difficulty,
            fire: &mut self.spawns,
            sounds: &mut self.sounds,
            rng: &mut self.rng,
        };

        for agent in &mut self.agents {
            update_agent(agent, tick, &mut ctx);
        }

        self.clock.advance();
        self.spawns.drain()
    }

    /// Run as many fixed ticks as `frame_dt` covers
    ///
    /// Leftover time carries into the next call. Backlog beyond
    /// [`MAX_BACKLOG`] seconds is dropped.
    pub fn advance(&mut self, frame_dt: f64) -> Advance {
        let tick = self.clock.tick as f64;
        let mut result = Advance::default();
        if !(tick > 0.0) {
            return result;
        }

        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(MAX_BACKLOG);
        while self.accumulator >= tick {
            result.spawned.extend(self.step());
            result.ticks += 1;
            self.accumulator -= tick;
        }

        result.alpha = (self.accumulator / tick) as f32;
        result
    }
}
