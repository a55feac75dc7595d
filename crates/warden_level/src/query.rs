//! The narrow geometry query interface consumed by agent behavior

use crate::ids::{RoomId, SegId, SideId};
use crate::ray::Ray;
use crate::segment::Segment;
use glam::Vec3;

/// Where a ray was stopped by level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelHit {
    /// Segment containing the blocking side
    pub segment: SegId,
    /// Blocking side, `None` when the ray started outside known geometry
    pub side: Option<SideId>,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Read-only level geometry
///
/// Implementations are shared by every agent in a tick and must not be
/// mutated while agents update.
pub trait LevelQuery {
    /// Number of segment slots (sizes visited sets for graph searches)
    fn segment_count(&self) -> usize;

    /// Segment data, `None` for unknown ids
    fn segment(&self, id: SegId) -> Option<&Segment>;

    /// Whether the side stops movement and sight. Unknown segments are solid.
    fn is_side_solid(&self, id: SegId, side: SideId) -> bool {
        self.segment(id).map_or(true, |seg| seg.side(side).is_solid())
    }

    /// Segment reachable through a side, if it is open
    fn connection(&self, id: SegId, side: SideId) -> Option<SegId> {
        let seg = self.segment(id)?;
        let side = seg.side(side);
        if side.is_solid() {
            None
        } else {
            side.connection
        }
    }

    /// Room a segment belongs to
    fn room_of(&self, id: SegId) -> Option<RoomId>;

    /// Segments grouped into a room (empty for unknown rooms)
    fn room_segments(&self, room: RoomId) -> &[SegId];

    /// Cast a ray through the segment graph starting in `origin`
    ///
    /// Returns the first solid side crossed within `max_distance`.
    fn raycast(&self, ray: &Ray, origin: SegId, max_distance: f32) -> Option<LevelHit>;

    /// Whether the ray crosses any solid side of one segment within `max_distance`
    fn ray_hits_segment(&self, ray: &Ray, id: SegId, max_distance: f32) -> bool {
        let Some(seg) = self.segment(id) else {
            return false;
        };

        SideId::ALL.into_iter().any(|side| {
            seg.side(side).is_solid()
                && seg
                    .face(side)
                    .intersect(ray)
                    .is_some_and(|t| t <= max_distance)
        })
    }
}
