//! Error types for level construction

use crate::ids::{SegId, SideId};
use thiserror::Error;

/// Level building errors
#[derive(Debug, Error)]
pub enum LevelError {
    /// Segment id out of range
    #[error("Segment not found: {0}")]
    SegmentNotFound(SegId),

    /// Side already connected to another segment
    #[error("Side {side:?} of {segment} is already connected")]
    SideInUse { segment: SegId, side: SideId },

    /// Segment assigned to more than one room
    #[error("Segment {0} already belongs to a room")]
    SegmentInRoom(SegId),
}

/// Result type for level operations
pub type Result<T> = std::result::Result<T, LevelError>;
