//! Koi that loop the pond on random closed spline paths.

use crate::core::types::{Mat4, Quat, Vec3, Vec4};
use crate::math::ClosedSpline;
use crate::render::mesh::InstanceRaw;
use crate::scene::rand::{hash_1d, hash_range};

/// Swim direction around the pond; each direction gets its own radius band
/// so the two fish never share a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwimDirection {
    Clockwise,
    CounterClockwise,
}

impl SwimDirection {
    fn radius_band(self) -> (f32, f32) {
        match self {
            SwimDirection::Clockwise => (0.75, 1.8),
            SwimDirection::CounterClockwise => (1.8, 2.75),
        }
    }

    fn angular_sign(self) -> f32 {
        match self {
            SwimDirection::Clockwise => -1.0,
            SwimDirection::CounterClockwise => 1.0,
        }
    }
}

pub struct Fish {
    path: ClosedSpline,
    direction: SwimDirection,
    color: Vec3,
    progress: f32,
    speed: f32,
    /// Set while the pointer is dragging this fish upward
    pub dragged: bool,
    lift: f32,
}

impl Fish {
    /// Build a fish on a random loop of 6-12 radial control points inside
    /// the direction's radius band.
    pub fn new(direction: SwimDirection, color: Vec3, seed: u32) -> Self {
        let count = 6 + (hash_1d(0, seed) * 7.0) as u32; // 6..=12
        let (r_min, r_max) = direction.radius_band();
        let sign = direction.angular_sign();
        let points: Vec<Vec3> = (0..count)
            .map(|i| {
                let angle = sign * std::f32::consts::TAU * i as f32 / count as f32;
                let radius = hash_range(i + 1, seed, r_min, r_max);
                let depth = hash_range(i + 100, seed, -0.25, -0.08);
                Vec3::new(angle.cos() * radius, depth, angle.sin() * radius)
            })
            .collect();
        Self {
            path: ClosedSpline::new(points),
            direction,
            color,
            progress: hash_1d(999, seed),
            speed: hash_range(1000, seed, 0.02, 0.04),
            dragged: false,
            lift: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.progress = (self.progress + self.speed * dt).rem_euclid(1.0);
        // Dragging hoists the fish out of the water; release lets it sink.
        let target = if self.dragged { 0.6 } else { 0.0 };
        self.lift += (target - self.lift) * (dt * 4.0).min(1.0);
    }

    pub fn position(&self) -> Vec3 {
        self.path.point(self.progress) + Vec3::new(0.0, self.lift, 0.0)
    }

    /// Height above the water plane; the continuous mood driver for the
    /// pond's drag tint.
    pub fn height_above_water(&self) -> f32 {
        self.position().y.max(0.0)
    }

    pub fn direction(&self) -> SwimDirection {
        self.direction
    }

    /// Instance transform: body stretched along the travel tangent.
    pub fn instance(&self) -> InstanceRaw {
        let tangent = self.path.tangent(self.progress);
        let rotation = if tangent.length_squared() > 1e-12 {
            Quat::from_rotation_arc(Vec3::X, tangent.normalize())
        } else {
            Quat::IDENTITY
        };
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(0.22, 0.06, 0.08),
            rotation,
            self.position(),
        );
        InstanceRaw::new(model, Vec4::new(self.color.x, self.color.y, self.color.z, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stays_in_radius_band() {
        for (direction, seed) in [
            (SwimDirection::Clockwise, 11u32),
            (SwimDirection::CounterClockwise, 12),
        ] {
            let fish = Fish::new(direction, Vec3::ONE, seed);
            let (r_min, r_max) = direction.radius_band();
            for i in 0..200 {
                let p = fish.path.point(i as f32 / 200.0);
                let r = (p.x * p.x + p.z * p.z).sqrt();
                // Catmull-Rom can overshoot its control points slightly.
                assert!(
                    r > r_min * 0.8 && r < r_max * 1.2,
                    "{direction:?} point radius {r} far outside band [{r_min}, {r_max}]"
                );
            }
        }
    }

    #[test]
    fn test_progress_wraps() {
        let mut fish = Fish::new(SwimDirection::Clockwise, Vec3::ONE, 5);
        for _ in 0..2000 {
            fish.update(0.1);
        }
        assert!((0.0..1.0).contains(&fish.progress));
    }

    #[test]
    fn test_drag_lifts_above_water() {
        let mut fish = Fish::new(SwimDirection::Clockwise, Vec3::ONE, 5);
        fish.update(0.016);
        let rest = fish.height_above_water();
        fish.dragged = true;
        for _ in 0..120 {
            fish.update(0.016);
        }
        assert!(
            fish.height_above_water() > rest + 0.2,
            "dragging should hoist the fish out of the pond"
        );
        fish.dragged = false;
        for _ in 0..600 {
            fish.update(0.016);
        }
        assert!(fish.height_above_water() < 0.05, "released fish settles back");
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = Fish::new(SwimDirection::Clockwise, Vec3::ONE, 42);
        let b = Fish::new(SwimDirection::Clockwise, Vec3::ONE, 42);
        assert_eq!(a.path.point(0.3), b.path.point(0.3));
    }
}
