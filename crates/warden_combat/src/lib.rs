//! Warden Combat - weapon data and firing primitives
//!
//! Pure building blocks the agent scheduler composes into a shot:
//! difficulty tiers, the weapon table, target leading, aim gating,
//! gun rotation, gunpoint geometry and burst timing. Shots are emitted as
//! [`FireRequest`]s into a [`FireSink`], normally the [`SpawnQueue`].
//!
//! # Features
//!
//! - Five-tier difficulty tuning
//! - Target lead prediction with difficulty gates
//! - Aim cone with a single averaging correction
//! - Deterministic spread via a caller-owned RNG
//! - Submodel chains with root sentinel
//!
//! # Example
//!
//! ```ignore
//! use warden_combat::prelude::*;
//!
//! let lead = lead_offset(dir, dist, target_velocity, 120.0, Difficulty::Ace);
//! if let Some(aim) = constrain_aim(aim_point - muzzle, forward, max_aim_angle(120.0)) {
//!     queue.request_fire(FireRequest { agent, gun, weapon, origin: muzzle, direction: aim });
//! }
//! ```

pub mod aim;
pub mod difficulty;
pub mod error;
pub mod fire;
pub mod gun;
pub mod weapon;

pub mod prelude {
    pub use crate::aim::{
        aim_spread, constrain_aim, jitter, lead_offset, max_aim_angle, FAST_WEAPON_SPEED,
    };
    pub use crate::difficulty::{Difficulty, DIFFICULTY_TIERS};
    pub use crate::error::{CombatError, Result};
    pub use crate::fire::{advance_burst, AgentId, FireRequest, FireSink, SpawnQueue};
    pub use crate::gun::{choose_gun, Gunpoint, Model, Submodel, ROOT_SUBMODEL};
    pub use crate::weapon::{WeaponId, WeaponInfo, WeaponTable};
}

pub use prelude::*;
