//! Warden demo driver
//!
//! Runs patrolling robots and a reactor turret against a target walking
//! through a small level, logs what happened and prints a JSON snapshot of
//! every agent at the end.
//!
//! Run with: cargo run -p warden_sim -- [config.toml]

mod config;
mod error;
mod world;

use config::SimConfig;
use error::Result;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use warden_ai::{facing_basis, Agent, AgentKind, ArchetypeId, ArchetypeTable, Simulation, Target};
use warden_combat::{Difficulty, FireRequest, WeaponTable};
use warden_level::{BreadthFirstSearch, Level, LevelQuery, SegId};
use world::{Layout, Route};

const WEAPONS: &str = include_str!("../data/weapons.toml");
const ROBOTS: &str = include_str!("../data/robots.toml");

/// Archetype ids in `data/robots.toml`
const HULK: ArchetypeId = ArchetypeId(0);
const TURRET: ArchetypeId = ArchetypeId(1);

/// Target walking speed, units per second
const TARGET_SPEED: f32 = 12.0;

/// Per-tick chance that an idle robot sets off on a patrol
const PATROL_CHANCE: f64 = 1.0 / 256.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::load();
    config.print_summary();

    match run(&config) {
        Ok(report) => report.print_summary(),
        Err(e) => {
            log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Tallies collected over a run
#[derive(Debug, Default)]
struct Report {
    ticks: u32,
    shots: usize,
    shots_per_weapon: Vec<usize>,
    sounds: usize,
    patrols: usize,
    engaged: usize,
}

impl Report {
    fn record(&mut self, shot: &FireRequest) {
        let index = shot.weapon.0 as usize;
        if self.shots_per_weapon.len() <= index {
            self.shots_per_weapon.resize(index + 1, 0);
        }
        self.shots_per_weapon[index] += 1;
        self.shots += 1;
    }

    fn print_summary(&self) {
        log::info!("Run complete after {} ticks:", self.ticks);
        log::info!("  Shots: {} (per weapon {:?})", self.shots, self.shots_per_weapon);
        log::info!("  Wake sounds: {}", self.sounds);
        log::info!("  Patrol goals issued: {}", self.patrols);
        log::info!("  Agents engaged at the end: {}", self.engaged);
    }
}

/// Final state written as JSON
#[derive(Serialize)]
struct Snapshot<'a> {
    time: f64,
    difficulty: Difficulty,
    target: &'a Target,
    agents: &'a [Agent],
}

fn center(level: &Level, segment: SegId) -> Vec3 {
    level.segment(segment).map_or(Vec3::ZERO, |s| s.center())
}

/// Make sure every archetype the run spawns is in the table
fn check_archetypes(archetypes: &ArchetypeTable, config: &SimConfig) -> Result<()> {
    if config.robots > 0 {
        let hulk = archetypes.require(HULK)?;
        log::info!("Patrol robots: {} x {}", config.robots, hulk.name);
    }
    if config.reactor {
        let turret = archetypes.require(TURRET)?;
        log::info!("Reactor guard: {}", turret.name);
    }
    Ok(())
}

fn spawn_agents(
    sim: &mut Simulation<Level, BreadthFirstSearch>,
    level: &Level,
    layout: &Layout,
    config: &SimConfig,
) {
    for i in 0..config.robots as usize {
        let segment = layout.hall[i % layout.hall.len()];
        sim.spawn(AgentKind::Robot, HULK, segment, center(level, segment));
    }

    if config.reactor {
        let id = sim.spawn(
            AgentKind::Reactor,
            TURRET,
            layout.chamber,
            center(level, layout.chamber),
        );
        // Looks out through the chamber door
        if let Some(reactor) = sim.agent_mut(id) {
            reactor.orientation = facing_basis(Vec3::X);
        }
    }
}

fn run(config: &SimConfig) -> Result<Report> {
    let weapons = WeaponTable::from_toml_str(WEAPONS)?;
    let archetypes = ArchetypeTable::from_toml_str(ROBOTS)?;
    check_archetypes(&archetypes, config)?;
    let (level, layout) = world::build_level()?;
    let map = level.clone();

    // In front of the chamber, up the hallway, then along the wing
    let mut points = vec![center(&map, layout.hall[2])];
    points.extend(layout.hall.last().map(|&s| center(&map, s)));
    points.extend(layout.wing.last().map(|&s| center(&map, s)));
    let mut route = Route::new(points, TARGET_SPEED);
    let mut target_segment = layout.hall[2];

    let target = Target::new(center(&map, target_segment), target_segment);
    let mut sim = Simulation::new(level, BreadthFirstSearch::default(), archetypes, weapons, target)
        .with_config(config.ai.clone())
        .with_difficulty(config.difficulty)
        .with_seed(config.seed)
        .with_tick(config.tick);
    spawn_agents(&mut sim, &map, &layout, config);

    let mut patrol_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
    let mut report = Report::default();

    for _ in 0..config.ticks {
        let (position, velocity) = route.step(config.tick);
        target_segment = map.locate(position, target_segment).unwrap_or(target_segment);
        sim.set_target(Target::new(position, target_segment).with_velocity(velocity));

        for agent in sim.agents_mut() {
            if !patrol_rng.gen_bool(PATROL_CHANCE) {
                continue;
            }
            let goal =
                world::assign_patrol(agent, &map, &config.ai, config.patrol_depth, &mut patrol_rng);
            report.patrols += usize::from(goal.is_some());
        }

        for shot in sim.step() {
            log::trace!("{} fired {} from gun {}", shot.agent, shot.weapon, shot.gun);
            report.record(&shot);
        }

        for agent in sim.agents_mut() {
            world::integrate(agent, &map, config.tick);
        }

        for sound in sim.drain_sounds() {
            log::info!("{} noticed the target (sound {})", sound.agent, sound.sound.0);
            report.sounds += 1;
        }
        report.ticks += 1;
    }

    report.engaged = sim
        .agents()
        .iter()
        .filter(|a| a.ai.awareness > config.ai.combat_threshold)
        .count();

    let snapshot = Snapshot {
        time: sim.clock().time,
        difficulty: sim.difficulty(),
        target: sim.target(),
        agents: sim.agents(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    match &config.snapshot {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Snapshot written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(report)
}
