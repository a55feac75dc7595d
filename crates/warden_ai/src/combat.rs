//! Weapon fire for engaged agents

use crate::agent::{Agent, AiRuntime};
use crate::archetype::{RobotDifficulty, RobotInfo};
use crate::context::{direction_to, SimContext};
use warden_combat::{
    advance_burst, aim_spread, choose_gun, constrain_aim, jitter, lead_offset, max_aim_angle,
    FireRequest,
};

/// Try to shoot at the target with the primary or secondary weapon
///
/// Picks a gun, leads the target and refuses the shot when the aim falls
/// outside the cone around the agent's forward axis. A taken shot is
/// queued on the fire sink and restarts the weapon's timer.
pub fn try_fire(ctx: &mut SimContext, agent: &mut Agent, info: &RobotInfo, primary: bool) -> bool {
    let weapon = if primary {
        info.weapon
    } else {
        match info.weapon2 {
            Some(weapon) => weapon,
            None => return false,
        }
    };

    let speed = ctx.weapons.speed(weapon, ctx.difficulty);
    let (target_dir, target_dist) = direction_to(agent.position, ctx.target.position);
    let gun = choose_gun(
        &mut agent.ai.gun_index,
        info.guns,
        info.weapon2.is_some(),
        primary,
    );

    let lead = lead_offset(
        target_dir,
        target_dist,
        ctx.target.velocity,
        speed,
        ctx.difficulty,
    );
    let aim_point = ctx.target.position + lead;
    let muzzle = agent.position + agent.orientation * info.model.gunpoint_offset(gun);

    if constrain_aim(aim_point - muzzle, agent.forward(), max_aim_angle(speed)).is_none() {
        log::trace!("{} can't bring gun {} to bear", agent.id, gun);
        return false;
    }

    let spread = aim_spread(info.aim, ctx.difficulty);
    let aimed = jitter(aim_point, spread, &mut *ctx.rng);
    let direction = (aimed - muzzle).try_normalize().unwrap_or(agent.forward());

    ctx.fire.request_fire(FireRequest {
        agent: agent.id,
        gun,
        weapon,
        origin: muzzle,
        direction,
    });

    advance_fire_timer(&mut agent.ai, info.tuning(ctx.difficulty), primary);
    true
}

/// Restart a weapon's timer after a shot
///
/// Primary fire runs in bursts of `rapidfire_count` shots; secondary fire
/// always waits its full delay.
pub fn advance_fire_timer(ai: &mut AiRuntime, tuning: &RobotDifficulty, primary: bool) {
    if primary {
        ai.fire_delay = advance_burst(
            &mut ai.rapidfire_count,
            tuning.rapidfire_count,
            tuning.fire_delay,
        );
    } else {
        ai.fire_delay2 = tuning.fire_delay2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use warden_combat::{Difficulty, Model, Submodel, WeaponId};

    fn tuning(burst: u8) -> RobotDifficulty {
        RobotDifficulty {
            fire_delay: 2.0,
            fire_delay2: 3.0,
            rapidfire_count: burst,
            ..Default::default()
        }
    }

    #[test]
    fn test_burst_pattern_repeats() {
        let tuning = tuning(4);
        let mut ai = AiRuntime::default();

        for _ in 0..2 {
            for _ in 0..3 {
                advance_fire_timer(&mut ai, &tuning, true);
                assert!(ai.fire_delay <= tuning.fire_delay / 2.0);
                assert!(ai.fire_delay <= 0.125);
                assert_ne!(ai.rapidfire_count, 0);
            }
            advance_fire_timer(&mut ai, &tuning, true);
            assert_eq!(ai.fire_delay, 2.0);
            assert_eq!(ai.rapidfire_count, 0);
        }
    }

    #[test]
    fn test_secondary_timer_uses_secondary_delay() {
        let mut ai = AiRuntime::default();
        advance_fire_timer(&mut ai, &tuning(3), false);
        assert_eq!(ai.fire_delay2, 3.0);
        assert_eq!(ai.rapidfire_count, 0);
    }

    #[test]
    fn test_fire_at_target_ahead() {
        let mut harness = Harness::corridor(4);
        harness.difficulty = Difficulty::Insane;
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        let info = harness.archetypes.get(agent.archetype).unwrap().clone();

        let mut ctx = harness.ctx();
        assert!(try_fire(&mut ctx, &mut agent, &info, true));
        drop(ctx);

        let shots = harness.spawns.drain();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].agent, agent.id);
        assert_eq!(shots[0].weapon, info.weapon);
        // No spread on the hardest tier
        assert_relative_eq!(shots[0].direction.z, 1.0, epsilon = 1e-5);
        assert!(agent.ai.fire_delay > 0.0);
    }

    #[test]
    fn test_no_fire_behind() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness
            .robot(0, Vec3::new(10.0, 10.0, 10.0))
            .with_facing(-Vec3::Z);
        let info = harness.archetypes.get(agent.archetype).unwrap().clone();

        let mut ctx = harness.ctx();
        assert!(!try_fire(&mut ctx, &mut agent, &info, true));
        drop(ctx);
        assert!(harness.spawns.is_empty());
        assert_eq!(agent.ai.fire_delay, 0.0);
    }

    #[test]
    fn test_secondary_without_weapon() {
        let mut harness = Harness::corridor(4);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));
        let info = harness.archetypes.get(agent.archetype).unwrap().clone();
        assert!(info.weapon2.is_none());

        let mut ctx = harness.ctx();
        assert!(!try_fire(&mut ctx, &mut agent, &info, false));
    }

    #[test]
    fn test_secondary_fires_from_gun_zero() {
        let mut harness = Harness::corridor(4);
        let model = Model::new()
            .with_submodel(Submodel::root())
            .with_gunpoint(0, Vec3::new(-2.0, 0.0, 1.0))
            .with_gunpoint(0, Vec3::new(2.0, 0.0, 1.0));
        let info = harness
            .archetypes
            .get(crate::archetype::ArchetypeId(0))
            .unwrap()
            .clone()
            .with_guns(2)
            .with_secondary(WeaponId(0))
            .with_model(model);
        let mut agent = harness.robot(0, Vec3::new(10.0, 10.0, 10.0));

        let mut ctx = harness.ctx();
        assert!(try_fire(&mut ctx, &mut agent, &info, false));
        assert!(try_fire(&mut ctx, &mut agent, &info, true));
        drop(ctx);

        let shots = harness.spawns.drain();
        assert_eq!(shots[0].gun, 0);
        assert_eq!(shots[0].origin, Vec3::new(8.0, 10.0, 11.0));
        assert_eq!(shots[1].gun, 1);
        assert_eq!(shots[1].origin, Vec3::new(12.0, 10.0, 11.0));
    }
}
