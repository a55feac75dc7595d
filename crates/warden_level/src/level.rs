//! In-memory segment level
//!
//! An arena of segments plus room groupings. Implements [`LevelQuery`]
//! with a portal-walking raycast: the ray leaves each convex segment
//! through exactly one side, so it either stops at a solid side or
//! continues into the connected segment.

use crate::error::{LevelError, Result};
use crate::ids::{RoomId, SegId, SideId};
use crate::query::{LevelHit, LevelQuery};
use crate::ray::Ray;
use crate::segment::Segment;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A group of connected segments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub segments: Vec<SegId>,
}

/// Segment arena with room membership
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    segments: Vec<Segment>,
    rooms: Vec<Room>,
    segment_rooms: Vec<Option<RoomId>>,
}

impl Level {
    /// Start building a level
    pub fn builder() -> LevelBuilder {
        LevelBuilder::default()
    }

    /// All segments in id order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All rooms in id order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Find the segment containing `point`, trying `hint` and its neighbors first
    pub fn locate(&self, point: Vec3, hint: SegId) -> Option<SegId> {
        if let Some(seg) = self.segments.get(hint.index()) {
            if seg.contains(point) {
                return Some(hint);
            }
            for side in SideId::ALL {
                if let Some(next) = seg.connection(side) {
                    if self.segment(next).is_some_and(|s| s.contains(point)) {
                        return Some(next);
                    }
                }
            }
        }

        self.segments
            .iter()
            .position(|seg| seg.contains(point))
            .map(|i| SegId(i as u32))
    }
}

impl LevelQuery for Level {
    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn segment(&self, id: SegId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    fn room_of(&self, id: SegId) -> Option<RoomId> {
        self.segment_rooms.get(id.index()).copied().flatten()
    }

    fn room_segments(&self, room: RoomId) -> &[SegId] {
        self.rooms
            .get(room.index())
            .map_or(&[], |r| r.segments.as_slice())
    }

    fn raycast(&self, ray: &Ray, origin: SegId, max_distance: f32) -> Option<LevelHit> {
        let Some(mut segment) = self.segment(origin) else {
            // Outside known geometry: nothing can be seen from here
            return Some(LevelHit {
                segment: origin,
                side: None,
                point: ray.origin,
                distance: 0.0,
            });
        };
        let mut current = origin;

        // Each step enters a new segment; a convex cell graph can't need more
        for _ in 0..=self.segments.len() {
            let mut exit: Option<(f32, SideId)> = None;

            for side in SideId::ALL {
                let face = segment.face(side);
                let denom = face.normal.dot(ray.direction);
                if denom <= 1e-6 {
                    continue; // entering or parallel
                }
                let t = (face.center() - ray.origin).dot(face.normal) / denom;
                if !t.is_finite() {
                    continue;
                }
                if exit.map_or(true, |(best, _)| t < best) {
                    exit = Some((t, side));
                }
            }

            let (t, side) = exit?;
            if t >= max_distance {
                return None;
            }

            let next = segment.side(side);
            match (next.is_solid(), next.connection) {
                (false, Some(id)) => {
                    let Some(next_segment) = self.segment(id) else {
                        log::warn!("{current} connects to missing segment {id}");
                        return None;
                    };
                    current = id;
                    segment = next_segment;
                }
                _ => {
                    return Some(LevelHit {
                        segment: current,
                        side: Some(side),
                        point: ray.at(t.max(0.0)),
                        distance: t.max(0.0),
                    });
                }
            }
        }

        log::debug!("Raycast from {origin} exceeded segment walk budget");
        None
    }
}

/// Incrementally builds a [`Level`]
#[derive(Debug, Clone, Default)]
pub struct LevelBuilder {
    segments: Vec<Segment>,
    rooms: Vec<Room>,
}

impl LevelBuilder {
    /// Add a segment, returning its id
    pub fn add_segment(&mut self, segment: Segment) -> SegId {
        let id = SegId(self.segments.len() as u32);
        self.segments.push(segment);
        id
    }

    /// Add an axis-aligned box segment
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> SegId {
        self.add_segment(Segment::from_box(min, max))
    }

    /// Add `count` cubes of edge `size` in a row along +Z starting at `origin`
    pub fn add_corridor(&mut self, origin: Vec3, count: usize, size: f32) -> Vec<SegId> {
        let ids: Vec<SegId> = (0..count)
            .map(|i| {
                let min = origin + Vec3::new(0.0, 0.0, i as f32 * size);
                self.add_box(min, min + Vec3::splat(size))
            })
            .collect();

        for pair in ids.windows(2) {
            self.link(pair[0], SideId::Front, pair[1], SideId::Back);
        }
        ids
    }

    /// Connect two segments through the given sides
    pub fn connect(&mut self, a: SegId, side_a: SideId, b: SegId, side_b: SideId) -> Result<()> {
        for (id, side) in [(a, side_a), (b, side_b)] {
            let seg = self
                .segments
                .get(id.index())
                .ok_or(LevelError::SegmentNotFound(id))?;
            if seg.connection(side).is_some() {
                return Err(LevelError::SideInUse { segment: id, side });
            }
        }

        self.link(a, side_a, b, side_b);
        Ok(())
    }

    /// Join two sides without checks; both ids must be in range
    fn link(&mut self, a: SegId, side_a: SideId, b: SegId, side_b: SideId) {
        self.segments[a.index()].side_mut(side_a).connection = Some(b);
        self.segments[b.index()].side_mut(side_b).connection = Some(a);
    }

    /// Connect every pair of free sides whose faces coincide
    pub fn connect_adjacent(&mut self) -> usize {
        const TOLERANCE: f32 = 0.01;
        let mut connected = 0;

        for a in 0..self.segments.len() {
            for b in (a + 1)..self.segments.len() {
                for side_a in SideId::ALL {
                    if self.segments[a].connection(side_a).is_some() {
                        continue;
                    }
                    let face_a = self.segments[a].face(side_a);

                    for side_b in SideId::ALL {
                        if self.segments[b].connection(side_b).is_some() {
                            continue;
                        }
                        let face_b = self.segments[b].face(side_b);
                        let coincident = face_a.center().distance(face_b.center()) < TOLERANCE
                            && face_a.normal.dot(face_b.normal) < -0.99;

                        if coincident {
                            self.segments[a].side_mut(side_a).connection = Some(SegId(b as u32));
                            self.segments[b].side_mut(side_b).connection = Some(SegId(a as u32));
                            connected += 1;
                            break;
                        }
                    }
                }
            }
        }

        connected
    }

    /// Mark a connected side as impassable (closed door) on both segments
    pub fn block_side(&mut self, id: SegId, side: SideId) -> Result<()> {
        let seg = self
            .segments
            .get_mut(id.index())
            .ok_or(LevelError::SegmentNotFound(id))?;
        seg.side_mut(side).blocked = true;

        if let Some(other) = seg.connection(side) {
            if let Some(other_seg) = self.segments.get_mut(other.index()) {
                if let Some(back) = other_seg.side_towards(id) {
                    other_seg.side_mut(back).blocked = true;
                }
            }
        }
        Ok(())
    }

    /// Group segments into a room
    pub fn add_room(&mut self, segments: Vec<SegId>) -> Result<RoomId> {
        for &id in &segments {
            if id.index() >= self.segments.len() {
                return Err(LevelError::SegmentNotFound(id));
            }
            if self.rooms.iter().any(|room| room.segments.contains(&id)) {
                return Err(LevelError::SegmentInRoom(id));
            }
        }

        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Room { segments });
        Ok(id)
    }

    /// Finish the level; segments without a room get their own single-segment room
    pub fn build(mut self) -> Level {
        let mut segment_rooms = vec![None; self.segments.len()];
        for (room_index, room) in self.rooms.iter().enumerate() {
            for seg in &room.segments {
                segment_rooms[seg.index()] = Some(RoomId(room_index as u32));
            }
        }

        for (index, slot) in segment_rooms.iter_mut().enumerate() {
            if slot.is_none() {
                let id = RoomId(self.rooms.len() as u32);
                self.rooms.push(Room {
                    segments: vec![SegId(index as u32)],
                });
                *slot = Some(id);
            }
        }

        log::debug!(
            "Built level with {} segments in {} rooms",
            self.segments.len(),
            self.rooms.len()
        );

        Level {
            segments: self.segments,
            rooms: self.rooms,
            segment_rooms,
        }
    }
}
