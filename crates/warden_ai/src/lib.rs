//! Warden AI - per-tick behavior for robot agents
//!
//! This crate turns what an agent perceives into thrust, torque and fire
//! requests, once per fixed simulation tick.
//!
//! # Features
//!
//! - Line-of-sight perception with awareness hysteresis
//! - Segment path following with lookahead shortcuts
//! - Optional wall edge avoidance
//! - Thrust and torque accumulation with per-difficulty clamps
//! - Target leading, aim cone gating and burst fire
//! - Think-time throttling for dormant agents
//! - Deterministic fixed-tick simulation driver
//!
//! # Example
//!
//! ```ignore
//! use warden_ai::prelude::*;
//!
//! let mut sim = Simulation::new(level, BreadthFirstSearch::default(), archetypes, weapons, target)
//!     .with_difficulty(Difficulty::Ace)
//!     .with_seed(7);
//! sim.spawn(AgentKind::Robot, ArchetypeId(0), SegId(0), Vec3::splat(10.0));
//!
//! for _ in 0..64 {
//!     for shot in sim.step() {
//!         spawn_projectile(shot);
//!     }
//! }
//! ```

pub mod agent;
pub mod archetype;
pub mod combat;
pub mod config;
pub mod context;
pub mod error;
pub mod navigator;
pub mod perception;
pub mod scheduler;
pub mod simulation;
pub mod steering;

pub mod prelude {
    pub use crate::agent::{facing_basis, Agent, AgentKind, AgentState, AiRuntime, NEVER_THINK};
    pub use crate::archetype::{ArchetypeId, ArchetypeTable, AttackType, RobotDifficulty, RobotInfo};
    pub use crate::combat::{advance_fire_timer, try_fire};
    pub use crate::config::AiConfig;
    pub use crate::context::{
        direction_to, Clock, SimContext, SoundId, SoundQueue, SoundRequest, SoundSink, Target,
    };
    pub use crate::error::{AiError, Result};
    pub use crate::navigator::{
        avoid_room_edges, is_path_valid, path_towards_goal, recompute, select_target,
    };
    pub use crate::perception::{can_see, check_visibility, decay};
    pub use crate::scheduler::{classify, update_agent};
    pub use crate::simulation::{Advance, Simulation};
    pub use crate::steering::{clamp_thrust, move_toward, turn_toward, turn_toward_direction};
}

pub use prelude::*;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures: a corridor of 20-unit cubes along +Z with the
    //! target parked in the last one.

    use crate::agent::{Agent, AgentKind};
    use crate::archetype::{ArchetypeId, ArchetypeTable, RobotInfo};
    use crate::config::AiConfig;
    use crate::context::{Clock, SimContext, SoundId, SoundQueue, Target};
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use warden_combat::{AgentId, Difficulty, SpawnQueue, WeaponId, WeaponInfo, WeaponTable};
    use warden_level::{BreadthFirstSearch, Level, LevelBuilder, LevelQuery, SegId};

    pub struct Harness {
        pub level: Level,
        pub paths: BreadthFirstSearch,
        pub archetypes: ArchetypeTable,
        pub weapons: WeaponTable,
        pub config: AiConfig,
        pub target: Target,
        pub clock: Clock,
        pub difficulty: Difficulty,
        pub spawns: SpawnQueue,
        pub sounds: SoundQueue,
        pub rng: ChaCha8Rng,
    }

    impl Harness {
        pub fn corridor(count: usize) -> Self {
            Self::corridor_with(count, |_, _| {})
        }

        pub fn corridor_with(count: usize, edit: impl FnOnce(&mut LevelBuilder, &[SegId])) -> Self {
            Self::build(|builder| {
                let ids = builder.add_corridor(Vec3::ZERO, count, 20.0);
                edit(builder, ids.as_slice());
            })
        }

        pub fn build(setup: impl FnOnce(&mut LevelBuilder)) -> Self {
            let mut builder = Level::builder();
            setup(&mut builder);
            let level = builder.build();

            let last = SegId(level.segment_count().saturating_sub(1) as u32);
            let target_position = level.segment(last).map_or(Vec3::ZERO, |s| s.center());

            let mut weapons = WeaponTable::new();
            weapons.insert(WeaponInfo::new("laser", 100.0));

            let mut archetypes = ArchetypeTable::new();
            archetypes.insert(RobotInfo::new("drone", WeaponId(0)).with_see_sound(SoundId(1)));

            Self {
                level,
                paths: BreadthFirstSearch::default(),
                archetypes,
                weapons,
                config: AiConfig::default(),
                target: Target::new(target_position, last),
                clock: Clock::default(),
                difficulty: Difficulty::default(),
                spawns: SpawnQueue::new(),
                sounds: SoundQueue::new(),
                rng: ChaCha8Rng::seed_from_u64(1),
            }
        }

        pub fn robot(&self, segment: u32, position: Vec3) -> Agent {
            let segment = SegId(segment);
            Agent::new(AgentId(1), AgentKind::Robot, ArchetypeId(0), segment, position)
                .with_room(self.level.room_of(segment))
        }

        pub fn ctx(&mut self) -> SimContext<'_> {
            SimContext {
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
            }
        }
    }
}
