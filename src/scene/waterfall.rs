//! Waterfall particles: falling rain sheets and the splash mist at the base.

use crate::core::types::{Mat4, Quat, Vec3, Vec4};
use crate::render::mesh::InstanceRaw;
use crate::scene::rand::{hash_1d, hash_range};

const SHEET_SPAWN_X: (f32, f32) = (-5.0, 3.0);
const SHEET_SPAWN_Z: (f32, f32) = (-10.0, -8.0);
const SHEET_SPAWN_Y: (f32, f32) = (0.0, 8.0);
const SHEET_FALL_SPEED: f32 = 0.3;
const SPLASH_CENTER: Vec3 = Vec3::new(0.0, -7.1, -9.0);
const SPLASH_RADIUS: f32 = 5.0;
const SPLASH_CEILING: f32 = 4.0;

struct Sheet {
    position: Vec3,
    speed: f32,
    drift: f32,
}

struct Splash {
    position: Vec3,
    rise: f32,
}

/// The whole waterfall particle state; stepped on the CPU each frame and
/// re-uploaded as mesh instances.
pub struct Waterfall {
    sheets: Vec<Sheet>,
    splashes: Vec<Splash>,
}

impl Waterfall {
    pub fn new(sheet_count: u32, splash_count: u32, seed: u32) -> Self {
        let sheets = (0..sheet_count)
            .map(|i| Sheet {
                position: Vec3::new(
                    hash_range(i * 3, seed, SHEET_SPAWN_X.0, SHEET_SPAWN_X.1),
                    hash_range(i * 3 + 1, seed, SHEET_SPAWN_Y.0, SHEET_SPAWN_Y.1),
                    hash_range(i * 3 + 2, seed, SHEET_SPAWN_Z.0, SHEET_SPAWN_Z.1),
                ),
                speed: SHEET_FALL_SPEED * hash_range(i * 3 + 7, seed.wrapping_add(1), 0.7, 1.3),
                drift: hash_range(i * 3 + 11, seed.wrapping_add(2), -0.02, 0.02),
            })
            .collect();
        let splashes = (0..splash_count)
            .map(|i| {
                let angle = hash_1d(i * 2, seed.wrapping_add(3)) * std::f32::consts::TAU;
                let radius = hash_1d(i * 2 + 1, seed.wrapping_add(3)).sqrt() * SPLASH_RADIUS;
                Splash {
                    position: SPLASH_CENTER
                        + Vec3::new(
                            angle.cos() * radius,
                            hash_range(i, seed.wrapping_add(4), 0.0, SPLASH_CEILING - SPLASH_CENTER.y),
                            angle.sin() * radius,
                        ),
                    rise: hash_range(i, seed.wrapping_add(5), 0.05, 0.15),
                }
            })
            .collect();
        Self { sheets, splashes }
    }

    /// Advance one frame: sheets fall and respawn at the top, mist rises
    /// and wraps above the ceiling.
    pub fn update(&mut self) {
        for sheet in &mut self.sheets {
            sheet.position.y -= sheet.speed;
            sheet.position.x += sheet.drift;
            if sheet.position.y < 0.0 {
                sheet.position.y += SHEET_SPAWN_Y.1;
            }
        }
        for splash in &mut self.splashes {
            splash.position.y += splash.rise;
            if splash.position.y > SPLASH_CEILING {
                splash.position.y = SPLASH_CENTER.y;
            }
        }
    }

    /// Snapshot the falling sheets as mesh instances.
    pub fn sheet_instances(&self) -> Vec<InstanceRaw> {
        let color = Vec4::new(0.75, 0.85, 0.98, 0.55);
        self.sheets
            .iter()
            .map(|sheet| InstanceRaw::new(Mat4::from_translation(sheet.position), color))
            .collect()
    }

    /// Snapshot the rising mist motes as mesh instances.
    pub fn splash_instances(&self) -> Vec<InstanceRaw> {
        let color = Vec4::new(0.9, 0.95, 1.0, 0.35);
        self.splashes
            .iter()
            .map(|splash| {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::splat(0.04),
                    Quat::IDENTITY,
                    splash.position,
                );
                InstanceRaw::new(model, color)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheets_spawn_inside_box() {
        let waterfall = Waterfall::new(2500, 300, 7);
        for sheet in &waterfall.sheets {
            let p = sheet.position;
            assert!((SHEET_SPAWN_X.0..=SHEET_SPAWN_X.1).contains(&p.x), "x {p:?}");
            assert!((SHEET_SPAWN_Y.0..=SHEET_SPAWN_Y.1).contains(&p.y), "y {p:?}");
            assert!((SHEET_SPAWN_Z.0..=SHEET_SPAWN_Z.1).contains(&p.z), "z {p:?}");
        }
    }

    #[test]
    fn test_sheets_recycle_forever() {
        let mut waterfall = Waterfall::new(64, 16, 7);
        for _ in 0..10_000 {
            waterfall.update();
        }
        for sheet in &waterfall.sheets {
            assert!(
                sheet.position.y >= -0.5 && sheet.position.y <= SHEET_SPAWN_Y.1,
                "sheet escaped the fall column: {:?}",
                sheet.position
            );
        }
    }

    #[test]
    fn test_splash_stays_in_disc_and_wraps() {
        let mut waterfall = Waterfall::new(8, 300, 7);
        for _ in 0..5_000 {
            waterfall.update();
        }
        for splash in &waterfall.splashes {
            let dx = splash.position.x - SPLASH_CENTER.x;
            let dz = splash.position.z - SPLASH_CENTER.z;
            assert!((dx * dx + dz * dz).sqrt() <= SPLASH_RADIUS + 1e-4);
            assert!(splash.position.y <= SPLASH_CEILING + 0.15 + 1e-4);
        }
    }

    #[test]
    fn test_instance_snapshot_counts() {
        let waterfall = Waterfall::new(10, 5, 7);
        assert_eq!(waterfall.sheet_instances().len(), 10);
        assert_eq!(waterfall.splash_instances().len(), 5);
    }
}
