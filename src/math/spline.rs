//! Closed Catmull-Rom splines for looping paths

use crate::core::types::Vec3;

/// A closed, uniform Catmull-Rom spline through a loop of control points.
///
/// The original fish paths use three.js's CatmullRomCurve3 with its default
/// centripetal parameterization; the uniform variant is used here, which is
/// visually indistinguishable for the smooth radial loops the fish swim.
#[derive(Clone, Debug)]
pub struct ClosedSpline {
    points: Vec<Vec3>,
}

impl ClosedSpline {
    /// Create from a loop of control points. Needs at least 4 points.
    pub fn new(points: Vec<Vec3>) -> Self {
        assert!(points.len() >= 4, "closed spline needs at least 4 points");
        Self { points }
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the spline at `t` in [0, 1), wrapping around the loop.
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let t = t.rem_euclid(1.0) * n as f32;
        let i = t.floor() as usize % n;
        let local = t - t.floor();

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        catmull_rom(p0, p1, p2, p3, local)
    }

    /// Normalized tangent at `t`, from a central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let eps = 1e-3;
        let delta = self.point(t + eps) - self.point(t - eps);
        delta.normalize_or_zero()
    }
}

/// Uniform Catmull-Rom basis for one segment, local parameter u in [0, 1].
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, u: f32) -> Vec3 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * u
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * u3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ClosedSpline {
        ClosedSpline::new(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ])
    }

    #[test]
    fn test_interpolates_control_points() {
        let spline = square();
        let p = spline.point(0.0);
        assert!(
            (p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5,
            "t=0 should hit first control point, got {p:?}"
        );
        let p = spline.point(0.25);
        assert!((p - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_wraps_around() {
        let spline = square();
        let a = spline.point(0.1);
        let b = spline.point(1.1);
        assert!((a - b).length() < 1e-4, "t and t+1 should coincide");
    }

    #[test]
    fn test_tangent_is_unit() {
        let spline = square();
        for i in 0..16 {
            let t = i as f32 / 16.0;
            let tangent = spline.tangent(t);
            assert!(
                (tangent.length() - 1.0).abs() < 1e-3,
                "tangent at {t} not normalized: {tangent:?}"
            );
        }
    }

    #[test]
    fn test_stays_on_plane() {
        let spline = square();
        for i in 0..32 {
            let p = spline.point(i as f32 / 32.0);
            assert!(p.y.abs() < 1e-6, "planar loop left the plane: {p:?}");
        }
    }
}
