//! God-ray cone placement.

use crate::core::types::{Mat4, Quat, Vec3, Vec4};
use crate::render::mesh::InstanceRaw;
use crate::scene::rand::hash_range;

/// Deterministic scatter of inverted light cones hanging over the pond.
pub fn scatter_cones(count: u32, seed: u32) -> Vec<InstanceRaw> {
    (0..count)
        .map(|i| {
            let x = hash_range(i * 4, seed, -2.5, 2.5);
            let z = hash_range(i * 4 + 1, seed, -2.5, 2.5);
            let radius = hash_range(i * 4 + 2, seed, 0.15, 0.5);
            let height = hash_range(i * 4 + 3, seed, 2.5, 4.5);
            // Apex up at the light, base spreading down onto the water.
            let model = Mat4::from_scale_rotation_translation(
                Vec3::new(radius, -height, radius),
                Quat::IDENTITY,
                Vec3::new(x, height, z),
            );
            InstanceRaw::new(model, Vec4::ONE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_field_deterministic() {
        let a = scatter_cones(20, 7);
        let b = scatter_cones(20, 7);
        assert_eq!(a.len(), 20);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.model, y.model);
        }
    }
}
