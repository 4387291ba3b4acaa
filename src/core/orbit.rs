//! Orbit camera controller

use crate::core::camera::Camera;
use crate::core::input::InputState;
use crate::core::types::Vec3;
use winit::event::MouseButton;

/// Orbit-style camera controller: drag to rotate around a fixed target,
/// scroll to zoom. Distance and polar angle are clamped so the diorama is
/// always viewed from above the waterline.
pub struct OrbitController {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Mouse sensitivity
    pub sensitivity: f32,
    /// Distance from target
    distance: f32,
    /// Azimuth around the Y axis in radians
    yaw: f32,
    /// Polar angle from the Y axis in radians
    polar: f32,
    min_distance: f32,
    max_distance: f32,
    max_polar: f32,
}

impl OrbitController {
    /// Create new controller looking from the given start position
    pub fn new(target: Vec3, start: Vec3) -> Self {
        let offset = start - target;
        let distance = offset.length().max(1e-4);
        let yaw = offset.x.atan2(offset.z);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();

        Self {
            target,
            sensitivity: 1.0,
            distance,
            yaw,
            polar,
            min_distance: 2.0,
            max_distance: 10.0,
            max_polar: std::f32::consts::PI / 3.0,
        }
    }

    /// Update camera from input
    pub fn update(&mut self, camera: &mut Camera, input: &InputState) {
        if input.is_mouse_pressed(MouseButton::Left) {
            let (dx, dy) = input.mouse_delta();
            self.yaw -= dx * self.sensitivity * 0.005;
            self.polar -= dy * self.sensitivity * 0.005;
        }

        self.polar = self.polar.clamp(0.05, self.max_polar);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        let offset = Vec3::new(
            self.polar.sin() * self.yaw.sin(),
            self.polar.cos(),
            self.polar.sin() * self.yaw.cos(),
        ) * self.distance;

        let aspect = camera.aspect;
        *camera = Camera::look_at(self.target + offset, self.target, Vec3::Y);
        camera.aspect = aspect;
    }

    /// Zoom by the given scroll amount (positive = closer)
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(self.min_distance, self.max_distance);
    }

    /// Current orbit distance
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamped() {
        let mut orbit = OrbitController::new(Vec3::ZERO, Vec3::new(3.0, 3.0, 6.0));
        orbit.zoom(100.0);
        assert_eq!(orbit.distance(), 2.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance(), 10.0);
    }

    #[test]
    fn test_update_keeps_camera_above_water() {
        let mut orbit = OrbitController::new(Vec3::ZERO, Vec3::new(3.0, 3.0, 6.0));
        let mut camera = Camera::look_at(Vec3::new(3.0, 3.0, 6.0), Vec3::ZERO, Vec3::Y);
        let input = InputState::new();
        orbit.update(&mut camera, &input);
        // Polar clamp of pi/3 keeps the eye at least distance/2 above target
        assert!(
            camera.position.y > 0.0,
            "camera y {} should stay above the target plane",
            camera.position.y
        );
    }
}
