//! Water surface instances and their GPU uniform snapshots.
//!
//! Each surface (pond, ocean, waterfall) owns a [`NoiseRecipe`], a
//! [`MoodState`], and a time accumulator; every frame it produces one
//! [`SurfaceUniforms`] snapshot consumed by `shaders/surface.wgsl`. The
//! surfaces share one shader and one noise implementation; only the recipe
//! constants, colors, UV remap, and style differ.

pub mod mood;
pub mod noise;

pub use mood::{MoodDrivers, MoodScalar, MoodState};
pub use noise::{NoiseRecipe, Octave, UvRemap};

use crate::core::types::Vec3;
use bytemuck::{Pod, Zeroable};

/// Fragment style: pond blends its base color with height/bloom tinting,
/// the worley style paints the fractal cellular field directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceStyle {
    Pond,
    Worley,
}

impl SurfaceStyle {
    fn flag(&self) -> u32 {
        match self {
            SurfaceStyle::Pond => 0,
            SurfaceStyle::Worley => 1,
        }
    }
}

/// GPU-ready surface uniform. All `vec3` fields are padded to 16-byte
/// alignment for WGSL compatibility; must match `SurfaceParams` in
/// `shaders/surface.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub base_color: [f32; 3],
    pub time: f32,

    pub bloom_color: [f32; 3],
    pub bloom: f32,

    pub drag_color: [f32; 3],
    pub drag_mix: f32,

    pub resolution: [f32; 2],
    pub wave_amplitude: f32,
    pub opacity: f32,

    pub amplitude: f32,
    pub sharpness: f32,
    pub contrast: f32,
    pub bias: f32,

    pub octave_frequency: [f32; 3],
    pub octave_count: u32,

    pub octave_time_scale: [f32; 3],
    pub uv_mode: u32,

    pub octave_offset: [f32; 3],
    pub style: u32,

    pub is_bloom: u32,
    pub _pad: [u32; 3],
}

/// One owned, explicitly constructed surface. Never a module-level
/// singleton; the render loop holds these by reference.
pub struct SurfaceInstance {
    pub name: &'static str,
    pub recipe: NoiseRecipe,
    pub uv_remap: UvRemap,
    pub mood: MoodState,
    pub style: SurfaceStyle,
    pub base_color: Vec3,
    pub bloom_color: Vec3,
    pub drag_color: Vec3,
    pub opacity: f32,
    time: f32,
    time_step: f32,
}

impl SurfaceInstance {
    /// The interactive pond: displaced by the ripple height field, tinted
    /// deep blue, bloom-capable.
    pub fn pond() -> Self {
        Self {
            name: "pond",
            recipe: NoiseRecipe {
                amplitude: 1.0,
                ..NoiseRecipe::default()
            },
            uv_remap: UvRemap::Standard,
            mood: MoodState::default(),
            style: SurfaceStyle::Pond,
            base_color: srgb(0x15, 0x62, 0x89),
            bloom_color: Vec3::new(0.2, 0.4, 0.8),
            drag_color: Vec3::new(0.45, 0.75, 0.95),
            opacity: 0.5,
            time: 0.0,
            time_step: 0.05,
        }
    }

    /// The star-shaped ocean ring around the island.
    pub fn ocean() -> Self {
        Self {
            name: "ocean",
            recipe: NoiseRecipe::default(),
            uv_remap: UvRemap::ExtrudedPlanar,
            mood: MoodState::default(),
            style: SurfaceStyle::Worley,
            base_color: Vec3::new(0.1, 0.55, 0.75),
            bloom_color: Vec3::new(0.2, 0.4, 0.8),
            drag_color: Vec3::new(0.5, 0.85, 0.9),
            opacity: 1.0,
            time: 0.0,
            time_step: 0.05,
        }
    }

    /// The waterfall backdrop sheet; same cellular field, stretched and
    /// sped up so the cells streak downward.
    pub fn waterfall() -> Self {
        Self {
            name: "waterfall",
            recipe: NoiseRecipe {
                sharpness: 3.0,
                octaves: [
                    Octave { frequency: 4.0, time_scale: 0.4, offset: 0.0 },
                    Octave { frequency: 24.0, time_scale: -0.8, offset: 0.12 },
                    Octave { frequency: -8.0, time_scale: 0.25, offset: 0.0 },
                ],
                ..NoiseRecipe::default()
            },
            uv_remap: UvRemap::Standard,
            mood: MoodState::default(),
            style: SurfaceStyle::Worley,
            base_color: Vec3::new(0.36, 0.45, 0.9),
            bloom_color: Vec3::new(0.3, 0.45, 0.85),
            drag_color: Vec3::new(0.6, 0.8, 1.0),
            opacity: 0.85,
            time: 0.0,
            time_step: 0.05,
        }
    }

    /// Advance the time accumulator and tick the mood ramps.
    pub fn update(&mut self, drivers: &MoodDrivers) {
        self.time += self.time_step;
        self.mood.tick(drivers);
    }

    /// Current accumulated shader time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Snapshot the current frame's uniform values.
    pub fn uniforms(&self, width: u32, height: u32) -> SurfaceUniforms {
        SurfaceUniforms {
            base_color: self.base_color.to_array(),
            time: self.time,
            bloom_color: self.bloom_color.to_array(),
            bloom: self.mood.bloom.value(),
            drag_color: self.drag_color.to_array(),
            drag_mix: self.mood.drag_mix.value(),
            resolution: [width as f32, height as f32],
            wave_amplitude: self.mood.wave_amplitude.value(),
            opacity: self.opacity,
            amplitude: self.recipe.amplitude,
            sharpness: self.recipe.sharpness,
            contrast: self.recipe.contrast,
            bias: self.recipe.bias,
            octave_frequency: [
                self.recipe.octaves[0].frequency,
                self.recipe.octaves[1].frequency,
                self.recipe.octaves[2].frequency,
            ],
            octave_count: self.recipe.octave_count,
            octave_time_scale: [
                self.recipe.octaves[0].time_scale,
                self.recipe.octaves[1].time_scale,
                self.recipe.octaves[2].time_scale,
            ],
            uv_mode: self.uv_remap.mode(),
            octave_offset: [
                self.recipe.octaves[0].offset,
                self.recipe.octaves[1].offset,
                self.recipe.octaves[2].offset,
            ],
            style: self.style.flag(),
            is_bloom: u32::from(self.mood.bloom_active()),
            _pad: [0; 3],
        }
    }
}

fn srgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_alignment() {
        // Must be a multiple of 16 bytes for GPU buffer alignment
        let size = std::mem::size_of::<SurfaceUniforms>();
        assert_eq!(
            size % 16,
            0,
            "SurfaceUniforms size {size} is not 16-byte aligned"
        );
    }

    #[test]
    fn test_uniform_matches_shader_struct_size() {
        // SurfaceParams in shaders/surface.wgsl ends with scalar u32 pads,
        // not a vec3<u32>; a vec3 tail would force 16-byte alignment and
        // push the WGSL struct to 160 bytes, failing minimum-binding-size
        // validation against this buffer.
        assert_eq!(
            std::mem::size_of::<SurfaceUniforms>(),
            144,
            "SurfaceUniforms must stay binary-compatible with SurfaceParams"
        );
        let shader = include_str!("../../shaders/surface.wgsl");
        assert!(
            !shader.contains("vec3<u32>"),
            "SurfaceParams padding must use scalar u32 fields"
        );
    }

    #[test]
    fn test_pond_swell_is_unconditional() {
        // The ambient swell runs at full amplitude even at rest; only the
        // surge ramps with the wave-amplitude mood, and it is the sum of
        // two independent waves, not their product.
        let shader = include_str!("../../shaders/surface.wgsl");
        assert!(
            shader.contains("cos(in.uv.y * 40.0 + t) * 0.06;"),
            "ambient swell must not be scaled by a mood ramp"
        );
        assert!(
            shader.contains("+ sin(in.position.z * 4.0 + t))"),
            "bloom surge adds two waves"
        );
    }

    #[test]
    fn test_bytemuck_cast() {
        let pond = SurfaceInstance::pond();
        let u = pond.uniforms(1280, 720);
        let bytes = bytemuck::bytes_of(&u);
        assert_eq!(bytes.len(), std::mem::size_of::<SurfaceUniforms>());
    }

    #[test]
    fn test_independent_mood_per_surface() {
        let mut pond = SurfaceInstance::pond();
        let ocean = SurfaceInstance::ocean();
        pond.update(&MoodDrivers {
            bloom_on: true,
            ..Default::default()
        });
        assert!(pond.mood.bloom.value() > ocean.mood.bloom.value());
    }

    #[test]
    fn test_time_accumulates_per_frame() {
        let mut pond = SurfaceInstance::pond();
        let drivers = MoodDrivers::default();
        pond.update(&drivers);
        pond.update(&drivers);
        assert!((pond.time() - 0.1).abs() < 1e-6, "0.05 per frame");
    }

    #[test]
    fn test_uniform_reflects_mood() {
        let mut pond = SurfaceInstance::pond();
        for _ in 0..50 {
            pond.update(&MoodDrivers {
                bloom_on: true,
                ..Default::default()
            });
        }
        let u = pond.uniforms(640, 360);
        assert!(u.bloom > 0.05);
        assert_eq!(u.is_bloom, 1);
        assert_eq!(u.resolution, [640.0, 360.0]);
    }

    #[test]
    fn test_surfaces_share_one_noise_implementation() {
        // Same recipe, same field; different recipes, different field.
        let ocean = SurfaceInstance::ocean();
        let waterfall = SurfaceInstance::waterfall();
        let p = glam::Vec2::new(0.3, 0.8);
        let a = noise::fractal(p, 1.0, &ocean.recipe);
        let b = noise::fractal(p, 1.0, &waterfall.recipe);
        assert_ne!(a, b);
        let again = noise::fractal(p, 1.0, &ocean.recipe);
        assert_eq!(a.to_bits(), again.to_bits());
    }
}
