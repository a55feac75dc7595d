//! Rays and the intersection routines used by level queries
//!
//! Every routine returns `None` for degenerate input (parallel ray and
//! plane, non-finite distances) so callers can skip the candidate.

use glam::Vec3;

const PARALLEL_EPSILON: f32 = 0.0001;

/// 3D ray for visibility and obstruction tests
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from `start` towards `end`, returning the distance between them
    pub fn between(start: Vec3, end: Vec3) -> (Self, f32) {
        let delta = end - start;
        (Self::new(start, delta), delta.length())
    }

    /// Get a point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along the ray to a plane, if the ray hits it in front of the origin
pub fn ray_plane(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = plane_normal.dot(ray.direction);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;

    if t.is_finite() && t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Point where the ray crosses a plane
pub fn project_ray_onto_plane(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    ray_plane(ray, plane_point, plane_normal).map(|t| ray.at(t))
}

/// Möller–Trumbore ray/triangle test, returning the hit distance
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 0.0000001;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Closest point to `point` on the line segment `a`-`b`
pub fn closest_point_on_line(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_plane_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let t = ray_plane(&ray, Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z).unwrap();
        assert_relative_eq!(t, 10.0);
    }

    #[test]
    fn test_ray_plane_parallel_is_skipped() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray_plane(&ray, Vec3::new(0.0, 0.0, 10.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_ray_plane_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(ray_plane(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_ray_triangle() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, -5.0), Vec3::Z);
        let t = ray_triangle(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert_relative_eq!(t, 5.0);

        let miss = Ray::new(Vec3::new(2.0, 2.0, -5.0), Vec3::Z);
        assert!(ray_triangle(&miss, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_closest_point_on_line_clamps() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(closest_point_on_line(a, b, Vec3::new(5.0, 3.0, 0.0)), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(closest_point_on_line(a, b, Vec3::new(-5.0, 3.0, 0.0)), a);
        assert_eq!(closest_point_on_line(a, b, Vec3::new(15.0, 3.0, 0.0)), b);
    }

    #[test]
    fn test_ray_between() {
        let (ray, dist) = Ray::between(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(dist, 5.0);
        assert_relative_eq!(ray.direction.length(), 1.0);
    }
}
