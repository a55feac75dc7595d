//! Per-tick agent scheduling
//!
//! [`update_agent`] is the single entry point the simulation loop calls for
//! every live agent each fixed tick. Timers always run; the decision step
//! only runs once the agent's think time has come.

use crate::agent::{Agent, AgentKind, AgentState};
use crate::archetype::{AttackType, RobotInfo};
use crate::combat::try_fire;
use crate::config::AiConfig;
use crate::context::{direction_to, SimContext};
use crate::navigator::path_towards_goal;
use crate::perception::{can_see, check_visibility, decay};
use crate::steering::{clamp_thrust, turn_toward_direction};
use glam::Vec3;

/// Which behavior an agent runs on its next think
pub fn classify(agent: &Agent, config: &AiConfig) -> AgentState {
    if agent.ai.has_goal() {
        AgentState::Pathing
    } else if agent.ai.awareness > config.combat_threshold {
        AgentState::Combat
    } else {
        AgentState::Dormant
    }
}

/// Advance one agent by one tick
///
/// Resets the thrust accumulators, runs the fire timers and, when the
/// agent is due to think, dispatches on its kind. Never fails: missing data
/// results in no action.
pub fn update_agent(agent: &mut Agent, dt: f32, ctx: &mut SimContext) {
    agent.thrust = Vec3::ZERO;
    agent.angular_thrust = Vec3::ZERO;
    agent.ai.fire_delay -= dt;
    agent.ai.fire_delay2 -= dt;

    if agent.ai.next_think_time > ctx.now() {
        return;
    }

    let archetypes = ctx.archetypes;
    let Some(info) = archetypes.get(agent.archetype) else {
        log::warn!("{} has unknown {}, parking it", agent.id, agent.archetype);
        agent.park();
        return;
    };

    agent.room = ctx.level.room_of(agent.segment);

    match agent.kind {
        AgentKind::Robot => think_robot(agent, ctx, info),
        AgentKind::Reactor => think_reactor(agent, ctx, info),
    }

    agent.ai.last_update = ctx.now();
}

fn transition(agent: &mut Agent, state: AgentState) {
    if agent.ai.state != state {
        log::debug!("{} {:?} -> {:?}", agent.id, agent.ai.state, state);
        agent.ai.state = state;
    }
}

fn think_robot(agent: &mut Agent, ctx: &mut SimContext, info: &RobotInfo) {
    let state = classify(agent, ctx.config);
    transition(agent, state);

    match state {
        AgentState::Pathing => path_towards_goal(ctx, agent, info),
        AgentState::Combat => {
            engage(agent, ctx, info, true);
            agent.ai.next_think_time = ctx.clock.next_tick();
        }
        AgentState::Dormant => watch(agent, ctx, info),
    }

    clamp_thrust(agent, info.tuning(ctx.difficulty));
}

/// Stationary turret: no goals, no movement
fn think_reactor(agent: &mut Agent, ctx: &mut SimContext, info: &RobotInfo) {
    let state = if agent.ai.awareness > ctx.config.combat_threshold {
        AgentState::Combat
    } else {
        AgentState::Dormant
    };
    transition(agent, state);

    match state {
        AgentState::Combat => {
            engage(agent, ctx, info, false);
            agent.ai.next_think_time = ctx.clock.next_tick();
        }
        _ => watch(agent, ctx, info),
    }
}

/// Face and shoot a visible target, or lose interest in a hidden one
fn engage(agent: &mut Agent, ctx: &mut SimContext, info: &RobotInfo, mobile: bool) {
    let (dir, dist) = direction_to(agent.position, ctx.target.position);
    if !can_see(ctx.level, agent, ctx.target, dir, dist) {
        let elapsed = (ctx.now() - agent.ai.last_update) as f32;
        decay(&mut agent.ai, elapsed, ctx.config.awareness_decay);
        return;
    }

    if mobile {
        let angular = info.tuning(ctx.difficulty).angular_thrust();
        turn_toward_direction(agent, dir, angular);
    }

    if info.attack != AttackType::Ranged {
        return;
    }

    if mobile && info.weapon2.is_some() && agent.ai.fire_delay2 < 0.0 {
        try_fire(ctx, agent, info, false);
    }
    if agent.ai.fire_delay < 0.0 {
        try_fire(ctx, agent, info, true);
    }
}

/// Dormant poll: every tick once something is seen, otherwise slowly
fn watch(agent: &mut Agent, ctx: &mut SimContext, info: &RobotInfo) {
    if check_visibility(ctx, agent, info) {
        agent.ai.next_think_time = ctx.clock.next_tick();
    } else {
        let elapsed = (ctx.now() - agent.ai.last_update) as f32;
        decay(&mut agent.ai, elapsed, ctx.config.awareness_decay);
        agent.ai.next_think_time = ctx.now() + ctx.config.dormant_poll_interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::NEVER_THINK;
    use crate::archetype::ArchetypeId;
    use crate::testing::Harness;
    use warden_level::{SegId, SideId};

    #[test]
    fn test_classify_priority() {
        let harness = Harness::corridor(2);
        let config = AiConfig::default();
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));

        assert_eq!(classify(&agent, &config), AgentState::Dormant);
        agent.ai.awareness = 0.5;
        assert_eq!(classify(&agent, &config), AgentState::Dormant);
        agent.ai.awareness = 0.8;
        assert_eq!(classify(&agent, &config), AgentState::Combat);
        agent.set_goal(SegId(1), None, Vec3::new(10.0, 10.0, 30.0));
        assert_eq!(classify(&agent, &config), AgentState::Pathing);
    }

    #[test]
    fn test_think_gating_keeps_timers_running() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.ai.next_think_time = 5.0;
        agent.ai.fire_delay = 1.0;
        agent.thrust = Vec3::ONE;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, 0.25, &mut ctx);
        drop(ctx);

        assert_eq!(agent.thrust, Vec3::ZERO);
        assert_eq!(agent.ai.fire_delay, 0.75);
        assert_eq!(agent.ai.awareness, 0.0);
        assert!(harness.sounds.is_empty());
    }

    #[test]
    fn test_dormant_wakes_on_sight() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        let next = ctx.clock.next_tick();
        drop(ctx);

        assert_eq!(agent.ai.awareness, 1.0);
        assert_eq!(agent.ai.next_think_time, next);
        assert_eq!(harness.sounds.len(), 1);
    }

    #[test]
    fn test_dormant_polls_slowly_when_blind() {
        let mut harness = Harness::corridor_with(4, |builder, ids| {
            builder.block_side(ids[0], SideId::Front).unwrap();
        });
        harness.clock.time = 3.0;
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.ai.awareness = 0.4;
        agent.ai.last_update = 2.0;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert_eq!(agent.ai.next_think_time, 4.0);
        assert!((agent.ai.awareness - 0.2).abs() < 1e-6);
        assert_eq!(agent.ai.last_update, 3.0);
    }

    #[test]
    fn test_combat_fires_and_turns() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness
            .robot(0, Vec3::new(10.0, 10.0, 10.0))
            .with_facing(Vec3::new(0.05, 0.0, 1.0));
        agent.ai.awareness = 1.0;
        agent.ai.fire_delay = -0.1;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert_eq!(agent.ai.state, AgentState::Combat);
        assert_eq!(harness.spawns.len(), 1);
        assert!(agent.angular_thrust.y.abs() > 0.0);
    }

    #[test]
    fn test_combat_waits_for_strictly_negative_delay() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.ai.awareness = 1.0;
        agent.ai.fire_delay = 0.5;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, 0.5, &mut ctx);
        drop(ctx);

        assert_eq!(agent.ai.fire_delay, 0.0);
        assert!(harness.spawns.is_empty());
    }

    #[test]
    fn test_melee_does_not_shoot() {
        let mut harness = Harness::corridor(4);
        let info = harness
            .archetypes
            .get(ArchetypeId(0))
            .unwrap()
            .clone()
            .with_attack(AttackType::Melee);
        let melee = harness.archetypes.insert(info);

        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.archetype = melee;
        agent.ai.awareness = 1.0;
        agent.ai.fire_delay = -1.0;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);
        assert!(harness.spawns.is_empty());
    }

    #[test]
    fn test_lost_target_decays() {
        let mut harness = Harness::corridor(4);
        harness.target.cloaked = true;
        harness.clock.time = 1.0;
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.ai.awareness = 1.0;
        agent.ai.last_update = 0.0;

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert!((agent.ai.awareness - 0.8).abs() < 1e-6);
        assert_eq!(agent.ai.next_think_time, 1.0 + harness.clock.tick as f64);
    }

    #[test]
    fn test_pathing_takes_priority() {
        let mut harness = Harness::corridor(5);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.ai.awareness = 1.0;
        agent.ai.fire_delay = -1.0;
        agent.set_goal(SegId(4), None, Vec3::new(10.0, 10.0, 90.0));

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert_eq!(agent.ai.state, AgentState::Pathing);
        assert!(agent.thrust.z > 0.0);
        assert!(harness.spawns.is_empty());
    }

    #[test]
    fn test_thrust_is_clamped() {
        let mut harness = Harness::corridor(5);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.set_goal(SegId(4), None, Vec3::new(10.0, 10.0, 90.0));
        let limit = harness
            .archetypes
            .get(agent.archetype)
            .unwrap()
            .tuning(harness.difficulty)
            .thrust();

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert!(agent.thrust.abs().max_element() <= limit + 1e-5);
    }

    #[test]
    fn test_unknown_archetype_parks_agent() {
        let mut harness = Harness::corridor(2);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        agent.archetype = ArchetypeId(99);

        let mut ctx = harness.ctx();
        update_agent(&mut agent, ctx.clock.tick, &mut ctx);
        drop(ctx);
        assert_eq!(agent.ai.next_think_time, NEVER_THINK);
    }

    #[test]
    fn test_reactor_stays_put_and_fires() {
        let mut harness = Harness::corridor(4);
        let mut reactor = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        reactor.kind = AgentKind::Reactor;
        reactor.ai.awareness = 1.0;
        reactor.ai.fire_delay = -0.1;

        let mut ctx = harness.ctx();
        update_agent(&mut reactor, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert_eq!(reactor.thrust, Vec3::ZERO);
        assert_eq!(reactor.angular_thrust, Vec3::ZERO);
        assert_eq!(harness.spawns.len(), 1);
    }

    #[test]
    fn test_reactor_wakes_like_robot() {
        let mut harness = Harness::corridor(4);
        let mut reactor = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        reactor.kind = AgentKind::Reactor;

        let mut ctx = harness.ctx();
        update_agent(&mut reactor, ctx.clock.tick, &mut ctx);
        drop(ctx);

        assert_eq!(reactor.ai.awareness, 1.0);
        assert_eq!(harness.sounds.len(), 1);
    }
}
