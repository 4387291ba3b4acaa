//! Grass scatter around the pond.

use crate::core::types::Vec2;
use crate::render::mesh::GrassInstance;
use crate::scene::rand::hash_1d;

const FIELD_X: (f32, f32) = (-2.3, 1.9);
const FIELD_Z: (f32, f32) = (-3.3, 3.7);
const POND_RADIUS: f32 = 1.7;

/// Rejection-sample blade roots inside the field rectangle but outside the
/// pond disc. Deterministic for a given seed.
pub fn scatter_blades(count: u32, seed: u32) -> Vec<GrassInstance> {
    let mut blades = Vec::with_capacity(count as usize);
    let mut i = 0u32;
    while blades.len() < count as usize {
        let x = FIELD_X.0 + hash_1d(i, seed) * (FIELD_X.1 - FIELD_X.0);
        let z = FIELD_Z.0 + hash_1d(i, seed.wrapping_add(1)) * (FIELD_Z.1 - FIELD_Z.0);
        i += 1;
        if Vec2::new(x, z).length() < POND_RADIUS {
            continue;
        }
        blades.push(GrassInstance {
            root: [x, 0.0, z],
            phase: hash_1d(i, seed.wrapping_add(2)) * std::f32::consts::TAU,
            scale: [
                0.015 + hash_1d(i, seed.wrapping_add(3)) * 0.01,
                0.18 + hash_1d(i, seed.wrapping_add(4)) * 0.22,
            ],
            angle: hash_1d(i, seed.wrapping_add(5)) * std::f32::consts::TAU,
            _pad: 0.0,
        });
    }
    blades
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blades_avoid_pond_disc() {
        let blades = scatter_blades(1000, 7);
        assert_eq!(blades.len(), 1000);
        for blade in &blades {
            let r = Vec2::new(blade.root[0], blade.root[2]).length();
            assert!(r >= POND_RADIUS, "blade at radius {r} inside the pond");
            assert!((FIELD_X.0..=FIELD_X.1).contains(&blade.root[0]));
            assert!((FIELD_Z.0..=FIELD_Z.1).contains(&blade.root[2]));
        }
    }

    #[test]
    fn test_scatter_deterministic() {
        let a = scatter_blades(64, 3);
        let b = scatter_blades(64, 3);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.root, y.root);
        }
    }
}
