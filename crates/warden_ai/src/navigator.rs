//! Goal path following with line-of-sight shortcuts
//!
//! The navigator keeps a segment path to the goal and picks a steering
//! target a few segments ahead when nothing solid is in the way. The far
//! target is blended with the next portal's center so agents don't cut
//! corners at segment boundaries.

use crate::agent::Agent;
use crate::archetype::RobotInfo;
use crate::config::AiConfig;
use crate::context::SimContext;
use crate::steering::{move_toward, turn_toward};
use glam::Vec3;
use warden_level::{project_ray_onto_plane, LevelQuery, Ray, SegId, Segment, SideId};

/// Whether the agent's path still leads from where it is to its goal
pub fn is_path_valid(agent: &Agent) -> bool {
    let ai = &agent.ai;
    match (ai.goal_path.last(), ai.goal_segment) {
        (Some(&last), Some(goal)) if last == goal => ai.goal_path.contains(&agent.segment),
        _ => false,
    }
}

/// Request a fresh path to the goal
///
/// An unreachable goal is abandoned; it is not retried until a new goal is
/// set.
pub fn recompute(ctx: &SimContext, agent: &mut Agent) -> bool {
    let Some(goal) = agent.ai.goal_segment else {
        return false;
    };

    let path = ctx.paths.find_path(ctx.level, agent.segment, goal);
    if path.is_empty() {
        log::debug!("{} can't reach {} from {}, dropping goal", agent.id, goal, agent.segment);
        agent.clear_goal();
        return false;
    }

    log::trace!("{} path to {} has {} segments", agent.id, goal, path.len());
    agent.ai.goal_path = path;
    true
}

/// Pick the point to steer toward this tick
///
/// Inside the goal segment this is the goal position, and reaching it
/// clears the goal. Elsewhere it is the farthest visible segment center
/// in the lookahead window, blended 2:1 with the next portal center.
/// Returns `None` when the agent has no goal or is not on its path.
pub fn select_target(level: &dyn LevelQuery, agent: &mut Agent, config: &AiConfig) -> Option<Vec3> {
    let goal = agent.ai.goal_segment?;

    if agent.segment == goal {
        let target = agent.ai.goal_position;
        let arrival = agent.radius.max(config.min_arrival_radius);
        if agent.position.distance(target) <= arrival {
            log::debug!("{} reached its goal in {}", agent.id, goal);
            agent.clear_goal();
        }
        return Some(target);
    }

    let path = &agent.ai.goal_path;
    let index = path.iter().position(|&seg| seg == agent.segment)?;
    let next = *path.get(index + 1)?;
    let end = (index + config.lookahead).min(path.len() - 1);
    let window = &path[index..=end];

    let current = level.segment(agent.segment)?;
    let portal = match current.side_towards(next) {
        Some(side) => current.face(side).center(),
        None => level.segment(next).map_or(agent.ai.goal_position, Segment::center),
    };

    let mut target = portal;
    for far in (1..window.len()).rev() {
        let Some(candidate) = level.segment(window[far]).map(Segment::center) else {
            continue;
        };
        if line_is_clear(level, agent, candidate, &window[..=far], current) {
            target = candidate;
            break;
        }
    }

    if config.edge_avoidance {
        let (ray, _) = Ray::between(agent.position, target);
        avoid_room_edges(level, agent, &ray, config, &mut target);
    }

    Some((target * 2.0 + portal) / 3.0)
}

/// Whether a straight line to `point` stays inside open space
///
/// Checks the level raycast from the agent's segment, every window segment
/// up to the candidate and every neighbor of the current segment.
fn line_is_clear(
    level: &dyn LevelQuery,
    agent: &Agent,
    point: Vec3,
    window: &[SegId],
    current: &Segment,
) -> bool {
    let (ray, distance) = Ray::between(agent.position, point);
    if distance <= f32::EPSILON {
        return true;
    }

    if level.raycast(&ray, agent.segment, distance).is_some() {
        return false;
    }

    if window
        .iter()
        .any(|&seg| level.ray_hits_segment(&ray, seg, distance))
    {
        return false;
    }

    !SideId::ALL
        .into_iter()
        .filter_map(|side| current.connection(side))
        .any(|seg| level.ray_hits_segment(&ray, seg, distance))
}

/// Nudge `target` away from wall edges the travel ray passes close to
///
/// Scans the solid sides of every segment in the agent's room. A side is
/// considered when the ray heads into it and meets its plane ahead of the
/// agent within the avoidance range. Each side nudges at most once, for the
/// first edge the ray passes within the agent's radius of.
pub fn avoid_room_edges(
    level: &dyn LevelQuery,
    agent: &Agent,
    ray: &Ray,
    config: &AiConfig,
    target: &mut Vec3,
) {
    let Some(room) = level.room_of(agent.segment) else {
        return;
    };

    for &seg_id in level.room_segments(room) {
        let Some(segment) = level.segment(seg_id) else {
            continue;
        };
        for side in SideId::ALL {
            if level.is_side_solid(seg_id, side) {
                avoid_side_edges(level, seg_id, segment, side, agent, ray, config, target);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn avoid_side_edges(
    level: &dyn LevelQuery,
    seg_id: SegId,
    segment: &Segment,
    side: SideId,
    agent: &Agent,
    ray: &Ray,
    config: &AiConfig,
    target: &mut Vec3,
) {
    let face = segment.face(side);
    if face.normal.dot(ray.direction) <= 0.0 {
        return;
    }

    let Some(point) = project_ray_onto_plane(ray, face.center(), face.normal) else {
        return;
    };
    if point.distance(agent.position) > config.edge_avoid_range {
        return;
    }
    if (point - agent.position).dot(ray.direction) <= 0.0 {
        return;
    }

    for edge in 0..4 {
        let closest = face.closest_point_on_edge(edge, point);
        if closest.distance(point) >= agent.radius {
            continue;
        }

        let adjacent = Segment::adjacent_side(side, edge);
        let midpoint = face.edge_midpoint(edge);
        let away = if level.is_side_solid(seg_id, adjacent) {
            midpoint - face.center()
        } else {
            segment.face(adjacent).center() - face.center()
        };

        let nudged = midpoint + away.normalize_or_zero() * config.edge_push;
        *target = (*target + nudged) / 2.0;
        return;
    }
}

/// Steer one tick along the goal path
pub fn path_towards_goal(ctx: &mut SimContext, agent: &mut Agent, info: &RobotInfo) {
    if !is_path_valid(agent) {
        log::trace!("{} updating goal path", agent.id);
        if !recompute(ctx, agent) {
            return;
        }
    }

    let Some(target) = select_target(ctx.level, agent, ctx.config) else {
        return;
    };

    let tuning = info.tuning(ctx.difficulty);
    move_toward(agent, target, tuning.thrust());
    turn_toward(agent, target, tuning.angular_thrust());
}
