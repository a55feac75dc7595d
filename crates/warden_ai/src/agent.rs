//! Agent state

use crate::archetype::ArchetypeId;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use warden_combat::AgentId;
use warden_level::{RoomId, SegId};

/// Think time that parks an agent until something resets it
pub const NEVER_THINK: f64 = f64::INFINITY;

/// Behavior family of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Mobile combatant that paths, turns and fires
    Robot,
    /// Stationary turret that only watches and fires
    Reactor,
}

/// Scheduler state, derived each think from the runtime fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentState {
    /// Nothing noticed; polls visibility slowly
    #[default]
    Dormant,
    /// Aware of the target
    Combat,
    /// Following a goal path
    Pathing,
}

/// Mutable AI state owned by the behavior core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRuntime {
    /// Confidence the agent knows where the target is, in [0, 1]
    pub awareness: f32,
    /// Navigation goal; `None` means no active goal
    pub goal_segment: Option<SegId>,
    pub goal_room: Option<RoomId>,
    pub goal_position: Vec3,
    /// Segments from the current segment to the goal
    pub goal_path: Vec<SegId>,
    /// Last gun used for primary fire
    pub gun_index: u8,
    /// Seconds until primary fire is allowed
    pub fire_delay: f32,
    /// Seconds until secondary fire is allowed
    pub fire_delay2: f32,
    /// Shots fired in the current burst
    pub rapidfire_count: u8,
    /// Simulation time of the last think
    pub last_update: f64,
    /// Simulation time of the next think
    pub next_think_time: f64,
    pub state: AgentState,
}

impl Default for AiRuntime {
    fn default() -> Self {
        Self {
            awareness: 0.0,
            goal_segment: None,
            goal_room: None,
            goal_position: Vec3::ZERO,
            goal_path: Vec::new(),
            gun_index: 0,
            fire_delay: 0.0,
            fire_delay2: 0.0,
            rapidfire_count: 0,
            last_update: 0.0,
            next_think_time: 0.0,
            state: AgentState::Dormant,
        }
    }
}

impl AiRuntime {
    /// Whether a navigation goal is active
    #[inline]
    pub fn has_goal(&self) -> bool {
        self.goal_segment.is_some()
    }
}

/// A non-player combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub archetype: ArchetypeId,
    /// Segment containing the agent
    pub segment: SegId,
    /// Room containing `segment`
    pub room: Option<RoomId>,
    pub position: Vec3,
    /// Orthonormal basis; columns are right, up and forward
    pub orientation: Mat3,
    pub radius: f32,
    /// Linear thrust accumulated this tick
    pub thrust: Vec3,
    /// Pitch, yaw and roll thrust accumulated this tick
    pub angular_thrust: Vec3,
    pub ai: AiRuntime,
}

impl Agent {
    /// Create an agent facing +Z with archetype defaults
    pub fn new(
        id: AgentId,
        kind: AgentKind,
        archetype: ArchetypeId,
        segment: SegId,
        position: Vec3,
    ) -> Self {
        Self {
            id,
            kind,
            archetype,
            segment,
            room: None,
            position,
            orientation: Mat3::IDENTITY,
            radius: 4.0,
            thrust: Vec3::ZERO,
            angular_thrust: Vec3::ZERO,
            ai: AiRuntime::default(),
        }
    }

    pub fn with_room(mut self, room: Option<RoomId>) -> Self {
        self.room = room;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Face a direction, keeping +Y as up where possible
    pub fn with_facing(mut self, direction: Vec3) -> Self {
        self.orientation = facing_basis(direction);
        self
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation.z_axis
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation.y_axis
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation.x_axis
    }

    /// Start navigating to a point in a segment; thinks on the next update
    pub fn set_goal(&mut self, segment: SegId, room: Option<RoomId>, position: Vec3) {
        self.ai.goal_segment = Some(segment);
        self.ai.goal_room = room;
        self.ai.goal_position = position;
        self.ai.goal_path.clear();
        self.ai.next_think_time = 0.0;
    }

    /// Abandon the navigation goal
    pub fn clear_goal(&mut self) {
        self.ai.goal_segment = None;
        self.ai.goal_room = None;
        self.ai.goal_path.clear();
        self.ai.next_think_time = 0.0;
    }

    /// Force full awareness and an immediate think
    pub fn wake(&mut self) {
        self.ai.awareness = 1.0;
        self.ai.next_think_time = 0.0;
    }

    /// Stop thinking until `set_goal`, `clear_goal` or `wake`
    pub fn park(&mut self) {
        self.ai.next_think_time = NEVER_THINK;
    }

    #[inline]
    pub fn is_parked(&self) -> bool {
        self.ai.next_think_time == NEVER_THINK
    }
}

/// Orthonormal basis whose forward column points along `direction`
pub fn facing_basis(direction: Vec3) -> Mat3 {
    let Some(forward) = direction.try_normalize() else {
        return Mat3::IDENTITY;
    };
    let hint = if forward.dot(Vec3::Y).abs() > 0.999 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let right = hint.cross(forward).normalize();
    let up = forward.cross(right);
    Mat3::from_cols(right, up, forward)
}
