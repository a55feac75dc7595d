//! Demo world: level layout, target motion, movement integration and patrols
//!
//! The behavior core only accumulates thrust. This module stands in for the
//! physics and game code around it with deliberately naive rules.

use crate::error::Result;
use glam::{EulerRot, Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;
use warden_ai::{facing_basis, Agent, AgentKind, AiConfig};
use warden_level::{nearby_segments, Level, LevelQuery, SegId, SideId};

/// Thrust is an eighth of top speed; scale it back up
const THRUST_SCALE: f32 = 8.0;

/// Edge length of every demo segment
const CELL: f32 = 20.0;

/// Segment ids of the demo layout
#[derive(Debug, Clone)]
pub struct Layout {
    pub hall: Vec<SegId>,
    pub wing: Vec<SegId>,
    pub chamber: SegId,
}

/// Hallway along +Z, a wing turning +X at its far end, and a side chamber
/// off the hallway behind a door
pub fn build_level() -> Result<(Level, Layout)> {
    let mut builder = Level::builder();
    let hall = builder.add_corridor(Vec3::ZERO, 6, CELL);
    let far = CELL * (hall.len() - 1) as f32;

    let wing: Vec<SegId> = (0..4)
        .map(|i| {
            let min = Vec3::new(CELL * (i + 1) as f32, 0.0, far);
            builder.add_box(min, min + Vec3::splat(CELL))
        })
        .collect();
    let chamber = builder.add_box(
        Vec3::new(-CELL, 0.0, CELL * 2.0),
        Vec3::new(0.0, CELL, CELL * 3.0),
    );

    if let (Some(&end), Some(&first)) = (hall.last(), wing.first()) {
        builder.connect(end, SideId::Right, first, SideId::Left)?;
    }
    for pair in wing.windows(2) {
        builder.connect(pair[0], SideId::Right, pair[1], SideId::Left)?;
    }
    builder.connect(hall[2], SideId::Left, chamber, SideId::Right)?;

    builder.add_room(hall.clone())?;
    builder.add_room(wing.clone())?;
    builder.add_room(vec![chamber])?;

    Ok((builder.build(), Layout { hall, wing, chamber }))
}

/// Target walking a polyline back and forth at constant speed
#[derive(Debug, Clone)]
pub struct Route {
    points: Vec<Vec3>,
    speed: f32,
    travelled: f32,
    forward: bool,
}

impl Route {
    pub fn new(points: Vec<Vec3>, speed: f32) -> Self {
        Self {
            points,
            speed,
            travelled: 0.0,
            forward: true,
        }
    }

    /// Total polyline length
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|leg| leg[0].distance(leg[1])).sum()
    }

    /// Advance by `dt`, returning the new position and velocity
    pub fn step(&mut self, dt: f32) -> (Vec3, Vec3) {
        let length = self.length();
        let delta = self.speed * dt;
        if self.forward {
            self.travelled += delta;
            if self.travelled >= length {
                self.travelled = length;
                self.forward = false;
            }
        } else {
            self.travelled -= delta;
            if self.travelled <= 0.0 {
                self.travelled = 0.0;
                self.forward = true;
            }
        }

        let (position, direction) = self.sample(self.travelled);
        let sign = if self.forward { 1.0 } else { -1.0 };
        (position, direction * self.speed * sign)
    }

    /// Point and leg direction at a distance along the route
    fn sample(&self, mut distance: f32) -> (Vec3, Vec3) {
        let Some(&first) = self.points.first() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };

        let mut last = (first, Vec3::ZERO);
        for leg in self.points.windows(2) {
            let span = leg[0].distance(leg[1]);
            let direction = (leg[1] - leg[0]).normalize_or_zero();
            if distance <= span {
                return (leg[0] + direction * distance, direction);
            }
            distance -= span;
            last = (leg[1], direction);
        }
        last
    }
}

/// Apply one tick of accumulated thrust
///
/// Moves are rejected when they leave the level, which stands in for
/// collision response. The segment follows the agent through portals.
pub fn integrate(agent: &mut Agent, level: &Level, dt: f32) {
    let turn = agent.angular_thrust * THRUST_SCALE * dt;
    if turn != Vec3::ZERO {
        let rotation = Quat::from_euler(EulerRot::YXZ, turn.y, turn.x, 0.0);
        let forward = agent.orientation * (rotation * Vec3::Z);
        agent.orientation = facing_basis(forward);
    }

    let moved = agent.position + agent.thrust * THRUST_SCALE * dt;
    if moved == agent.position {
        return;
    }

    match level.locate(moved, agent.segment) {
        Some(segment) => {
            if segment != agent.segment {
                log::trace!("{} moved {} -> {}", agent.id, agent.segment, segment);
            }
            agent.position = moved;
            agent.segment = segment;
        }
        None => log::trace!("{} blocked at {}", agent.id, agent.position),
    }
}

/// Give an idle robot somewhere to go
///
/// Returns the chosen goal segment. Reactors and robots that are already
/// busy or engaged are left alone.
pub fn assign_patrol<R: Rng + ?Sized>(
    agent: &mut Agent,
    level: &Level,
    config: &AiConfig,
    depth: usize,
    rng: &mut R,
) -> Option<SegId> {
    if agent.kind != AgentKind::Robot
        || agent.ai.has_goal()
        || agent.ai.awareness > config.combat_threshold
    {
        return None;
    }

    let candidates: Vec<SegId> = nearby_segments(level, agent.segment, depth)
        .into_iter()
        .filter(|&id| id != agent.segment)
        .collect();
    let &goal = candidates.choose(rng)?;
    let position = level.segment(goal)?.center();

    log::debug!("{} patrols to {}", agent.id, goal);
    agent.set_goal(goal, level.room_of(goal), position);
    Some(goal)
}
