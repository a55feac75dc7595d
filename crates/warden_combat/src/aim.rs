//! Aim prediction and gating
//!
//! Target leading, aim cone checks and difficulty-scaled spread. All
//! functions are pure except [`jitter`], which draws from a caller-owned RNG.

use crate::difficulty::Difficulty;
use glam::Vec3;
use rand::Rng;

/// Projectiles faster than this are treated as hitscan-like
pub const FAST_WEAPON_SPEED: f32 = 200.0;

/// Targets farther than this are never led
pub const MAX_LEAD_DISTANCE: f32 = 200.0;

/// Targets slower than this are never led
pub const MIN_LEAD_SPEED: f32 = 4.0;

/// Projectiles at or below this speed are never led
pub const MIN_PROJECTILE_SPEED: f32 = 5.0;

/// Maximum angle between target velocity and line of sight for leading
pub const LEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Aim cone half-angle for fast projectiles
pub const FAST_AIM_ANGLE: f32 = 7.5 * std::f32::consts::PI / 180.0;

/// Aim cone half-angle for slow projectiles
pub const SLOW_AIM_ANGLE: f32 = 15.0 * std::f32::consts::PI / 180.0;

/// Offset to add to a target's position so a projectile meets it
///
/// `target_dir` is the unit direction from shooter to target. Returns zero
/// whenever leading is pointless or disallowed at `difficulty`.
pub fn lead_offset(
    target_dir: Vec3,
    target_dist: f32,
    target_velocity: Vec3,
    projectile_speed: f32,
    difficulty: Difficulty,
) -> Vec3 {
    let mut speed = projectile_speed;
    if speed > FAST_WEAPON_SPEED {
        if difficulty <= Difficulty::Rookie {
            return Vec3::ZERO;
        }
        speed *= (5 - difficulty.index()) as f32;
    }

    if speed <= MIN_PROJECTILE_SPEED || target_dist > MAX_LEAD_DISTANCE {
        return Vec3::ZERO;
    }

    let target_speed = target_velocity.length();
    if !target_speed.is_finite() || target_speed < MIN_LEAD_SPEED {
        return Vec3::ZERO;
    }

    let cos = target_dir.dot(target_velocity / target_speed).clamp(-1.0, 1.0);
    if cos.acos() > LEAD_ANGLE {
        return Vec3::ZERO;
    }

    target_velocity * (target_dist / speed)
}

/// Aim cone half-angle for a projectile speed
#[inline]
pub fn max_aim_angle(projectile_speed: f32) -> f32 {
    if projectile_speed > FAST_WEAPON_SPEED {
        FAST_AIM_ANGLE
    } else {
        SLOW_AIM_ANGLE
    }
}

/// Fit an aim direction into the cone around `forward`
///
/// A direction outside the cone is averaged with `forward` once; if that
/// still falls outside, the shot is refused with `None`.
pub fn constrain_aim(aim_dir: Vec3, forward: Vec3, max_angle: f32) -> Option<Vec3> {
    let aim = aim_dir.try_normalize()?;
    if aim.angle_between(forward) <= max_angle {
        return Some(aim);
    }

    let corrected = ((aim + forward) * 0.5).try_normalize()?;
    (corrected.angle_between(forward) <= max_angle).then_some(corrected)
}

/// Per-axis spread radius for an archetype's accuracy byte
///
/// Zero at the hardest tier; `aim = 255` is the most accurate archetype.
#[inline]
pub fn aim_spread(aim: u8, difficulty: Difficulty) -> f32 {
    let accuracy = 8.0 - 7.0 * (aim as f32 / 256.0);
    difficulty.skill_gap() * accuracy
}

/// Displace a point by up to `spread` on each axis
pub fn jitter<R: Rng + ?Sized>(point: Vec3, spread: f32, rng: &mut R) -> Vec3 {
    if spread <= 0.0 {
        return point;
    }
    point
        + Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        ) * spread
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_lead_moving_away() {
        let offset = lead_offset(Vec3::Z, 100.0, Vec3::Z * 20.0, 50.0, Difficulty::Hotshot);
        assert_relative_eq!(offset.z, 40.0);
    }

    #[test]
    fn test_no_lead_with_fast_weapon_on_easy() {
        for tier in [Difficulty::Trainee, Difficulty::Rookie] {
            assert_eq!(lead_offset(Vec3::Z, 100.0, Vec3::Z * 20.0, 250.0, tier), Vec3::ZERO);
        }
        let hard = lead_offset(Vec3::Z, 100.0, Vec3::Z * 20.0, 250.0, Difficulty::Insane);
        assert_relative_eq!(hard.z, 20.0 * 100.0 / 250.0);
    }

    #[test]
    fn test_fast_weapon_scaled_by_difficulty() {
        // Hotshot multiplies by 3
        let offset = lead_offset(Vec3::Z, 150.0, Vec3::Z * 10.0, 250.0, Difficulty::Hotshot);
        assert_relative_eq!(offset.z, 10.0 * 150.0 / 750.0);
    }

    #[test]
    fn test_no_lead_cases() {
        let d = Difficulty::Ace;
        assert_eq!(lead_offset(Vec3::Z, 100.0, Vec3::Z * 20.0, 5.0, d), Vec3::ZERO);
        assert_eq!(lead_offset(Vec3::Z, 201.0, Vec3::Z * 20.0, 50.0, d), Vec3::ZERO);
        assert_eq!(lead_offset(Vec3::Z, 100.0, Vec3::Z * 3.9, 50.0, d), Vec3::ZERO);
        assert_eq!(lead_offset(Vec3::Z, 100.0, Vec3::X * 20.0, 50.0, d), Vec3::ZERO);
        assert_eq!(lead_offset(Vec3::Z, 100.0, -Vec3::Z * 20.0, 50.0, d), Vec3::ZERO);
    }

    #[test]
    fn test_lead_within_angle() {
        let vel = Vec3::new(1.0, 0.0, 2.0).normalize() * 10.0;
        assert_ne!(lead_offset(Vec3::Z, 100.0, vel, 50.0, Difficulty::Ace), Vec3::ZERO);
    }

    #[test]
    fn test_max_aim_angle() {
        assert_eq!(max_aim_angle(250.0), FAST_AIM_ANGLE);
        assert_eq!(max_aim_angle(200.0), SLOW_AIM_ANGLE);
    }

    #[test]
    fn test_constrain_aim_inside_cone() {
        let aim = Vec3::new(0.1, 0.0, 1.0);
        let result = constrain_aim(aim, Vec3::Z, SLOW_AIM_ANGLE).unwrap();
        assert_relative_eq!(result.x, aim.normalize().x);
    }

    #[test]
    fn test_constrain_aim_corrects_once() {
        // 25 degrees halves to 12.5, inside the slow cone
        let angle = 25f32.to_radians();
        let aim = Vec3::new(angle.sin(), 0.0, angle.cos());
        let result = constrain_aim(aim, Vec3::Z, SLOW_AIM_ANGLE).unwrap();
        assert!(result.angle_between(Vec3::Z) <= SLOW_AIM_ANGLE);

        assert!(constrain_aim(aim, Vec3::Z, FAST_AIM_ANGLE).is_none());
    }

    #[test]
    fn test_constrain_aim_rejects_behind() {
        assert!(constrain_aim(-Vec3::Z, Vec3::Z, SLOW_AIM_ANGLE).is_none());
        assert!(constrain_aim(Vec3::ZERO, Vec3::Z, SLOW_AIM_ANGLE).is_none());
    }

    #[test]
    fn test_aim_spread() {
        assert_eq!(aim_spread(0, Difficulty::Insane), 0.0);
        assert_relative_eq!(aim_spread(0, Difficulty::Trainee), 32.0);
        assert_relative_eq!(aim_spread(128, Difficulty::Hotshot), 2.0 * 4.5);
    }

    #[test]
    fn test_jitter_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(jitter(Vec3::ZERO, 3.0, &mut a), jitter(Vec3::ZERO, 3.0, &mut b));
    }

    proptest! {
        #[test]
        fn prop_jitter_stays_in_box(seed in any::<u64>(), spread in 0.0f32..50.0) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = jitter(Vec3::ONE, spread, &mut rng) - Vec3::ONE;
            prop_assert!(p.abs().max_element() <= spread + 1e-4);
        }

        #[test]
        fn prop_constrained_aim_inside_cone(x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0) {
            if let Some(dir) = constrain_aim(Vec3::new(x, y, z), Vec3::Z, SLOW_AIM_ANGLE) {
                prop_assert!(dir.angle_between(Vec3::Z) <= SLOW_AIM_ANGLE + 1e-4);
            }
        }
    }
}
