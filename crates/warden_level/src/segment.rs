//! Segment geometry: eight-vertex convex cells with six quad sides

use crate::ids::{SegId, SideId};
use crate::ray::{closest_point_on_line, ray_triangle, Ray};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vertex indices of each side, in `SideId::index` order
///
/// Vertex layout for a box: bit 0 = x, bit 1 = y (via 0,1,2,3 ring), back
/// ring 0..4 at min z, front ring 4..8 at max z.
pub const SIDE_VERTS: [[usize; 4]; 6] = [
    [0, 4, 7, 3], // Left
    [3, 7, 6, 2], // Top
    [1, 2, 6, 5], // Right
    [0, 1, 5, 4], // Bottom
    [0, 3, 2, 1], // Back
    [4, 5, 6, 7], // Front
];

/// One side of a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Side {
    /// Segment on the other side, if this side is a portal
    pub connection: Option<SegId>,
    /// A closed door or grate: connected but impassable
    pub blocked: bool,
}

impl Side {
    /// Whether rays and agents are stopped by this side
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.connection.is_none() || self.blocked
    }
}

/// A quad face of a segment with an outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub points: [Vec3; 4],
    pub normal: Vec3,
}

impl Face {
    /// Average of the four corners
    pub fn center(&self) -> Vec3 {
        (self.points[0] + self.points[1] + self.points[2] + self.points[3]) * 0.25
    }

    /// Corner `index`, wrapping around
    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index % 4]
    }

    /// Midpoint of edge `edge` (corner `edge` to corner `edge + 1`)
    pub fn edge_midpoint(&self, edge: usize) -> Vec3 {
        (self.point(edge) + self.point(edge + 1)) * 0.5
    }

    /// Closest point on edge `edge` to `point`
    pub fn closest_point_on_edge(&self, edge: usize, point: Vec3) -> Vec3 {
        closest_point_on_line(self.point(edge), self.point(edge + 1), point)
    }

    /// Index of the edge nearest to `point`
    pub fn closest_edge(&self, point: Vec3) -> usize {
        (0..4)
            .min_by(|&a, &b| {
                let da = self.closest_point_on_edge(a, point).distance_squared(point);
                let db = self.closest_point_on_edge(b, point).distance_squared(point);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0)
    }

    /// Distance along the ray to this quad, if hit
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let [a, b, c, d] = self.points;
        ray_triangle(ray, a, b, c).or_else(|| ray_triangle(ray, a, c, d))
    }
}

/// A convex cell of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub vertices: [Vec3; 8],
    pub sides: [Side; 6],
}

impl Segment {
    /// Create a segment with all sides solid
    pub fn new(vertices: [Vec3; 8]) -> Self {
        Self {
            vertices,
            sides: [Side::default(); 6],
        }
    }

    /// Create an axis-aligned box segment
    pub fn from_box(min: Vec3, max: Vec3) -> Self {
        Self::new([
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ])
    }

    /// Average of the eight vertices
    pub fn center(&self) -> Vec3 {
        self.vertices.iter().copied().sum::<Vec3>() / 8.0
    }

    #[inline]
    pub fn side(&self, side: SideId) -> &Side {
        &self.sides[side.index()]
    }

    #[inline]
    pub fn side_mut(&mut self, side: SideId) -> &mut Side {
        &mut self.sides[side.index()]
    }

    /// Connected segment through `side`, ignoring doors
    #[inline]
    pub fn connection(&self, side: SideId) -> Option<SegId> {
        self.side(side).connection
    }

    /// Side that leads to `other`, if adjacent
    pub fn side_towards(&self, other: SegId) -> Option<SideId> {
        SideId::ALL
            .into_iter()
            .find(|&side| self.connection(side) == Some(other))
    }

    /// Geometry of a side with its normal pointing out of the segment
    pub fn face(&self, side: SideId) -> Face {
        let indices = SIDE_VERTS[side.index()];
        let points = indices.map(|i| self.vertices[i]);
        let mut normal = (points[2] - points[0])
            .cross(points[3] - points[1])
            .normalize_or_zero();

        let face_center = (points[0] + points[1] + points[2] + points[3]) * 0.25;
        if (face_center - self.center()).dot(normal) < 0.0 {
            normal = -normal;
        }

        Face { points, normal }
    }

    /// Whether a point lies inside the cell (on or behind every side plane)
    pub fn contains(&self, point: Vec3) -> bool {
        const TOLERANCE: f32 = 0.001;
        SideId::ALL.into_iter().all(|side| {
            let face = self.face(side);
            (point - face.center()).dot(face.normal) <= TOLERANCE
        })
    }

    /// Side sharing edge `edge` of `side` (the 'adjacent' side across that edge)
    pub fn adjacent_side(side: SideId, edge: usize) -> SideId {
        let verts = SIDE_VERTS[side.index()];
        let a = verts[edge % 4];
        let b = verts[(edge + 1) % 4];

        SideId::ALL
            .into_iter()
            .find(|&other| {
                other != side && {
                    let other_verts = SIDE_VERTS[other.index()];
                    other_verts.contains(&a) && other_verts.contains(&b)
                }
            })
            .unwrap_or(side)
    }
}
