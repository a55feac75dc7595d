//! Target visibility and awareness
//!
//! Awareness jumps to 1 when the target is seen inside the sight cone and
//! decays linearly otherwise. The "noticed" sound is edge triggered: it
//! only plays when an agent that was asleep becomes aware.

use crate::agent::{Agent, AiRuntime};
use crate::archetype::RobotInfo;
use crate::context::{direction_to, SimContext, SoundRequest, Target};
use glam::Vec3;
use warden_level::{LevelQuery, Ray};

/// Whether the agent has an unobstructed line of sight to the target
///
/// `dir` and `dist` describe the line from the agent to the target.
pub fn can_see(level: &dyn LevelQuery, agent: &Agent, target: &Target, dir: Vec3, dist: f32) -> bool {
    if target.cloaked {
        return false;
    }

    let ray = Ray::new(agent.position, dir);
    level.raycast(&ray, agent.segment, dist).is_none()
}

/// Look for the target and refresh awareness if it is noticed
///
/// Returns false without side effects when the target is hidden or outside
/// the sight cone for the current difficulty.
pub fn check_visibility(ctx: &mut SimContext, agent: &mut Agent, info: &RobotInfo) -> bool {
    let (dir, dist) = direction_to(agent.position, ctx.target.position);
    if !can_see(ctx.level, agent, ctx.target, dir, dist) {
        return false;
    }

    let tuning = info.tuning(ctx.difficulty);
    if agent.forward().dot(dir) < tuning.field_of_view {
        return false;
    }

    let previous = agent.ai.awareness;
    agent.ai.awareness = 1.0;

    if previous < ctx.config.wake_threshold {
        log::debug!("{} noticed the target at {:.1}", agent.id, dist);
        if let Some(sound) = info.see_sound {
            ctx.sounds.request_sound(SoundRequest {
                sound,
                agent: agent.id,
            });
        }
    }

    true
}

/// Lose awareness over `elapsed` seconds at `rate` per second
pub fn decay(ai: &mut AiRuntime, elapsed: f32, rate: f32) {
    let loss = rate * elapsed.max(0.0);
    ai.awareness = (ai.awareness - loss).clamp(0.0, 1.0);
}
