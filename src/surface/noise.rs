//! Cellular (Worley) noise shared by every water surface.
//!
//! One implementation, parameterized by [`NoiseRecipe`]; pond, ocean, and
//! waterfall differ only in the recipe constants and UV remap they supply.
//! The CPU functions here mirror `shaders/surface.wgsl` texel for texel so
//! the noise semantics are testable without a GPU.

use crate::core::types::Vec2;
use serde::{Deserialize, Serialize};

/// One octave of the fractal compositor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    /// Spatial frequency multiplier (may be negative to mirror the field)
    pub frequency: f32,
    /// Time multiplier for drift animation
    pub time_scale: f32,
    /// Constant coordinate offset
    pub offset: f32,
}

/// Tunable constants for the cellular noise family.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseRecipe {
    /// Output scale of the sharpening curve
    pub amplitude: f32,
    /// Exponential falloff steepness
    pub sharpness: f32,
    /// Distance contrast inside the falloff
    pub contrast: f32,
    /// Distance bias inside the falloff
    pub bias: f32,
    /// Up to three octaves, composed through nested square roots
    pub octaves: [Octave; 3],
    /// How many of `octaves` are active (1..=3)
    pub octave_count: u32,
}

impl Default for NoiseRecipe {
    /// The ocean's recipe; the other surfaces tweak from here.
    fn default() -> Self {
        Self {
            amplitude: 3.0,
            sharpness: 4.0,
            contrast: 2.5,
            bias: 1.0,
            octaves: [
                Octave { frequency: 5.0, time_scale: 0.05, offset: 0.0 },
                Octave { frequency: 50.0, time_scale: -0.1, offset: 0.12 },
                Octave { frequency: -10.0, time_scale: 0.03, offset: 0.0 },
            ],
            octave_count: 3,
        }
    }
}

/// How a surface's geometry maps into noise space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvRemap {
    /// Use the mesh UVs as-is (planar geometry)
    #[default]
    Standard,
    /// Planar projection for extruded shapes. Shape faces project on the
    /// local xy plane; side faces, whose x barely varies, substitute a
    /// z-based projection so the default degenerate UVs are never sampled.
    ExtrudedPlanar,
}

impl UvRemap {
    /// Project a local-space position (and its face normal) to noise UV.
    pub fn remap(&self, position: glam::Vec3, normal: glam::Vec3) -> Vec2 {
        match self {
            UvRemap::Standard => Vec2::new(position.x, position.y),
            UvRemap::ExtrudedPlanar => {
                // A side face of the extrusion is near-perpendicular to the
                // shape plane; x is degenerate there, so project from z.
                if normal.z.abs() < 0.5 {
                    Vec2::new(position.z, position.y)
                } else {
                    Vec2::new(position.x, position.y)
                }
            }
        }
    }

    /// Mode flag for the shader.
    pub fn mode(&self) -> u32 {
        match self {
            UvRemap::Standard => 0,
            UvRemap::ExtrudedPlanar => 1,
        }
    }
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Per-cell pseudo-random scatter offset.
fn cell_hash(cell: Vec2) -> f32 {
    fract((fract(cell.x.sin() * 43.13311) + cell.y).sin() * 31.0011)
}

/// Minimum squared distance from `p` to the scattered point of any cell in
/// the 3x3 neighborhood, pushed through the recipe's sharpening curve.
/// Pure: identical inputs give bit-identical output.
pub fn cellular(p: Vec2, recipe: &NoiseRecipe) -> f32 {
    let mut dist = 1.0e30_f32;
    for dx in -1..=1 {
        for dy in -1..=1 {
            let cell = Vec2::new(p.x.floor() + dx as f32, p.y.floor() + dy as f32);
            let scatter = cell_hash(cell);
            let to_point = p - cell - Vec2::splat(scatter);
            dist = dist.min(to_point.length_squared());
        }
    }
    recipe.amplitude * (-recipe.sharpness * (recipe.contrast * dist - recipe.bias).abs()).exp()
}

/// Animated fractal variant: octaves at the recipe's frequencies and time
/// offsets, composed through nested square roots for soft mottling.
pub fn fractal(p: Vec2, time: f32, recipe: &NoiseRecipe) -> f32 {
    let count = recipe.octave_count.clamp(1, 3) as usize;
    let mut acc = 1.0_f32;
    let mut exponent = 1.0_f32;
    for octave in recipe.octaves.iter().take(count) {
        let sample = cellular(
            p * octave.frequency + Vec2::splat(octave.offset + octave.time_scale * time),
            recipe,
        );
        acc *= sample.max(0.0).powf(exponent);
        exponent *= 0.5;
    }
    // Three outer square roots flatten the product toward 1.0
    acc.max(0.0).powf(0.125)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cellular_deterministic() {
        let recipe = NoiseRecipe::default();
        let p = Vec2::new(3.7, -1.2);
        let a = cellular(p, &recipe);
        let b = cellular(p, &recipe);
        assert_eq!(a.to_bits(), b.to_bits(), "pure function must be bit-identical");
    }

    #[test]
    fn test_cellular_in_range() {
        let recipe = NoiseRecipe::default();
        for i in 0..64 {
            for j in 0..64 {
                let p = Vec2::new(i as f32 * 0.37, j as f32 * 0.29);
                let v = cellular(p, &recipe);
                assert!(
                    v >= 0.0 && v <= recipe.amplitude,
                    "cellular({p:?}) = {v} outside [0, amplitude]"
                );
            }
        }
    }

    #[test]
    fn test_fractal_animates() {
        let recipe = NoiseRecipe::default();
        let p = Vec2::new(0.4, 0.6);
        let a = fractal(p, 0.0, &recipe);
        let b = fractal(p, 10.0, &recipe);
        assert_ne!(a, b, "fractal noise must drift with time");
    }

    #[test]
    fn test_fractal_deterministic_at_fixed_time() {
        let recipe = NoiseRecipe::default();
        let p = Vec2::new(0.4, 0.6);
        let a = fractal(p, 2.5, &recipe);
        let b = fractal(p, 2.5, &recipe);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_fractal_respects_octave_count() {
        let mut recipe = NoiseRecipe::default();
        let p = Vec2::new(1.3, 2.1);
        recipe.octave_count = 1;
        let one = fractal(p, 0.0, &recipe);
        recipe.octave_count = 3;
        let three = fractal(p, 0.0, &recipe);
        assert_ne!(one, three, "octave count must change the composite");
    }

    #[test]
    fn test_extruded_remap_side_faces() {
        let remap = UvRemap::ExtrudedPlanar;
        let shape_face = remap.remap(glam::Vec3::new(1.0, 2.0, 3.0), glam::Vec3::Z);
        assert_eq!(shape_face, Vec2::new(1.0, 2.0));
        let side_face = remap.remap(glam::Vec3::new(1.0, 2.0, 3.0), glam::Vec3::X);
        assert_eq!(side_face, Vec2::new(3.0, 2.0), "side faces project from z");
    }
}
