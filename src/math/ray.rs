//! Ray type and operations

use crate::core::types::{Vec2, Vec3};

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the horizontal plane y = `height`.
    /// Returns the parameter t if the ray hits the plane in front of the origin.
    pub fn intersects_plane_y(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-8 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }

    /// Raycast against an axis-aligned rectangle lying in the plane y = `height`,
    /// centered at `center` with half extents `half`. Returns the normalized UV
    /// of the hit point within the rectangle, or None on a miss.
    pub fn hit_rect_uv(&self, height: f32, center: Vec2, half: Vec2) -> Option<Vec2> {
        let t = self.intersects_plane_y(height)?;
        let p = self.at(t);
        let local = Vec2::new(p.x - center.x, p.z - center.y);
        if local.x.abs() > half.x || local.y.abs() > half.y {
            return None;
        }
        // Map to [0,1]^2, v flipped so uv.y grows toward -z like the mesh UVs
        Some(Vec2::new(
            local.x / (2.0 * half.x) + 0.5,
            0.5 - local.y / (2.0 * half.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let t = ray.intersects_plane_y(0.0);
        assert_eq!(t, Some(5.0));
    }

    #[test]
    fn test_plane_miss_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert!(ray.intersects_plane_y(0.0).is_none());
    }

    #[test]
    fn test_plane_miss_behind() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(ray.intersects_plane_y(0.0).is_none());
    }

    #[test]
    fn test_rect_uv_center() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let uv = ray.hit_rect_uv(0.0, Vec2::ZERO, Vec2::splat(0.5));
        let uv = uv.expect("ray through center should hit");
        assert!((uv - Vec2::splat(0.5)).length() < 1e-6, "uv {uv:?}");
    }

    #[test]
    fn test_rect_uv_outside() {
        let ray = Ray::new(Vec3::new(2.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ray.hit_rect_uv(0.0, Vec2::ZERO, Vec2::splat(0.5)).is_none());
    }
}
