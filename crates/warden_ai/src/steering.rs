//! Thrust and torque accumulation
//!
//! Steering only adds to the agent's accumulators; the physics integrator
//! applies and clears them. [`clamp_thrust`] bounds the totals so thrust
//! builds up over several ticks.

use crate::agent::Agent;
use crate::archetype::RobotDifficulty;
use glam::{EulerRot, Quat, Vec3};

/// Push toward a point
pub fn move_toward(agent: &mut Agent, point: Vec3, thrust: f32) {
    let dir = (point - agent.position).normalize_or_zero();
    agent.thrust += dir * thrust;
}

/// Turn toward a point
pub fn turn_toward(agent: &mut Agent, point: Vec3, angular_thrust: f32) {
    turn_toward_direction(agent, point - agent.position, angular_thrust);
}

/// Turn toward a world-space direction
///
/// The direction is brought into the agent's frame and the shortest
/// rotation from local forward is split into pitch and yaw. Roll is
/// dropped so agents stay upright.
pub fn turn_toward_direction(agent: &mut Agent, direction: Vec3, angular_thrust: f32) {
    let Some(dir) = direction.try_normalize() else {
        return;
    };

    let local = (agent.orientation.transpose() * dir).normalize_or_zero();
    if local == Vec3::ZERO {
        return;
    }

    let rotation = Quat::from_rotation_arc(Vec3::Z, local);
    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    let euler = Vec3::new(pitch, yaw, 0.0);
    if euler.is_finite() {
        agent.angular_thrust += euler * angular_thrust;
    }
}

/// Cap accumulated thrust to the archetype's per-tick limits
///
/// Linear thrust is held to `max_speed / 8` per axis and angular thrust to
/// `1 / turn_time / 8`. Applying the clamp twice changes nothing.
pub fn clamp_thrust(agent: &mut Agent, tuning: &RobotDifficulty) {
    let linear = axis_limit(tuning.thrust());
    agent.thrust = agent
        .thrust
        .clamp(Vec3::splat(-linear), Vec3::splat(linear));

    let angular = axis_limit(tuning.angular_thrust());
    agent.angular_thrust = agent
        .angular_thrust
        .clamp(Vec3::splat(-angular), Vec3::splat(angular));
}

fn axis_limit(limit: f32) -> f32 {
    if limit.is_nan() {
        0.0
    } else {
        limit.abs()
    }
}
