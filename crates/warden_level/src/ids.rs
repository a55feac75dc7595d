//! Identifiers for segments, sides and rooms

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a segment (a convex cell) in a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegId(pub u32);

impl SegId {
    /// Index into level arrays
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// Index of a room (a group of connected segments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    /// Index into the room list
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room:{}", self.0)
    }
}

/// One of the six sides of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    /// -X
    Left,
    /// +Y
    Top,
    /// +X
    Right,
    /// -Y
    Bottom,
    /// -Z
    Back,
    /// +Z
    Front,
}

impl SideId {
    /// All sides in storage order
    pub const ALL: [SideId; 6] = [
        SideId::Left,
        SideId::Top,
        SideId::Right,
        SideId::Bottom,
        SideId::Back,
        SideId::Front,
    ];

    /// Storage index of this side
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SideId::Left => 0,
            SideId::Top => 1,
            SideId::Right => 2,
            SideId::Bottom => 3,
            SideId::Back => 4,
            SideId::Front => 5,
        }
    }

    /// The side facing the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            SideId::Left => SideId::Right,
            SideId::Right => SideId::Left,
            SideId::Top => SideId::Bottom,
            SideId::Bottom => SideId::Top,
            SideId::Back => SideId::Front,
            SideId::Front => SideId::Back,
        }
    }
}

/// A specific side of a specific segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub segment: SegId,
    pub side: SideId,
}

impl Tag {
    pub fn new(segment: SegId, side: SideId) -> Self {
        Self { segment, side }
    }
}
