//! Ripple height-field simulation for the pond surface.
//!
//! Double-buffered grid of height + velocity texels. Pointer hits on the
//! pond surface become [`Impulse`]s; each [`step`](HeightFieldSim::step)
//! applies the most recent impulse as a radial traveling wave, propagates
//! heights toward the neighbor average, damps velocity, and clamps heights.
//! The readable buffer swaps after every step and is uploaded to an
//! `R32Float` texture that the pond surface shader displaces with.

use crate::core::types::Vec2;

/// Grid resolution per side. Fixed for the session; matches the texture.
pub const SIM_RESOLUTION: u32 = 256;

/// Hard bounds on ripple heights, applied every step.
pub const HEIGHT_MIN: f32 = 0.0;
pub const HEIGHT_MAX: f32 = 0.45;

/// Per-step velocity attenuation so waves do not last forever.
pub const DAMPING: f32 = 0.995;

/// Drop kernel constants: wave number, angular speed, height scale.
const WAVE_K: f32 = 30.0;
const WAVE_OMEGA: f32 = 3.0;
const WAVE_SCALE: f32 = 0.2;

/// Simulated time advance per step (the original assumes ~60fps).
const TIME_STEP: f32 = 0.016;

/// An instantaneous disturbance request in normalized pond UV space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impulse {
    /// Center in [0, 1]^2
    pub center: Vec2,
    /// Falloff radius in UV units
    pub radius: f32,
    /// Peak contribution scale
    pub strength: f32,
}

impl Default for Impulse {
    fn default() -> Self {
        Self {
            center: Vec2::splat(0.5),
            radius: 0.1,
            strength: 1.0,
        }
    }
}

/// One simulation buffer: heights and vertical velocities.
#[derive(Clone)]
struct Field {
    height: Vec<f32>,
    velocity: Vec<f32>,
}

impl Field {
    fn zeroed(texels: usize) -> Self {
        Self {
            height: vec![0.0; texels],
            velocity: vec![0.0; texels],
        }
    }
}

/// Double-buffered ripple simulator.
///
/// Exactly one buffer is readable at any time (written last step) and one is
/// the write target for the current step; roles swap after each step. The
/// single render thread guarantees write-then-read ordering.
pub struct HeightFieldSim {
    resolution: u32,
    buffers: [Field; 2],
    /// Index of the readable buffer
    current: usize,
    generation: u64,
    pending: Option<Impulse>,
    time: f32,
}

impl HeightFieldSim {
    /// Allocate both buffers zero-initialized at the given resolution.
    pub fn new(resolution: u32) -> Self {
        let texels = (resolution * resolution) as usize;
        Self {
            resolution,
            buffers: [Field::zeroed(texels), Field::zeroed(texels)],
            current: 0,
            generation: 0,
            pending: None,
            time: 0.0,
        }
    }

    /// Record an impulse for the next step. At most one impulse is applied
    /// per step; the most recent pointer hit wins.
    pub fn inject(&mut self, impulse: Impulse) {
        self.pending = Some(impulse);
    }

    /// Advance the simulation one step and swap buffers. Returns the new
    /// generation count (increments by exactly one per call). Runs whether
    /// or not an impulse is pending; a quiet step just propagates and decays.
    pub fn step(&mut self) -> u64 {
        self.time += TIME_STEP;
        let impulse = self.pending.take();

        let n = self.resolution as usize;
        let read = self.current;
        let write = 1 - read;
        debug_assert_ne!(read, write);

        // Split so we can read one buffer while writing the other.
        let (a, b) = self.buffers.split_at_mut(1);
        let (src, dst) = if read == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };

        for y in 0..n {
            for x in 0..n {
                let i = y * n + x;
                let h = src.height[i];
                let mut v = src.velocity[i];

                // Neighbor average pulls the column toward its surroundings;
                // edges clamp to themselves (no flow off the pond).
                let left = src.height[y * n + x.saturating_sub(1)];
                let right = src.height[y * n + (x + 1).min(n - 1)];
                let down = src.height[y.saturating_sub(1) * n + x];
                let up = src.height[(y + 1).min(n - 1) * n + x];
                let average = (left + right + down + up) * 0.25;

                v += (average - h) * 2.0;
                v *= DAMPING;
                let mut height = h + v;

                if let Some(imp) = impulse {
                    let coord = Vec2::new(
                        (x as f32 + 0.5) / n as f32,
                        (y as f32 + 0.5) / n as f32,
                    );
                    let distance = (imp.center - coord).length();
                    let ripple = smoothstep(imp.radius, 0.0, distance) * imp.strength;
                    let wave = (distance * WAVE_K - self.time * WAVE_OMEGA).sin() * ripple;
                    height += wave * WAVE_SCALE;
                }

                dst.height[i] = height.clamp(HEIGHT_MIN, HEIGHT_MAX);
                dst.velocity[i] = v;
            }
        }

        self.current = write;
        self.generation += 1;
        self.generation
    }

    /// Readable heights (written last step), row-major.
    pub fn heights(&self) -> &[f32] {
        &self.buffers[self.current].height
    }

    /// Sample the readable buffer at a normalized UV (nearest texel).
    pub fn height_at(&self, uv: Vec2) -> f32 {
        let n = self.resolution as usize;
        let x = ((uv.x * n as f32) as usize).min(n - 1);
        let y = ((uv.y * n as f32) as usize).min(n - 1);
        self.buffers[self.current].height[y * n + x]
    }

    /// Generation of the readable buffer (number of completed steps).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the readable buffer, alternates every step.
    pub fn readable_index(&self) -> usize {
        self.current
    }

    /// Grid resolution per side.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Upload the readable heights into an `R32Float` texture.
    pub fn upload(&self, queue: &wgpu::Queue, texture: &wgpu::Texture) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(self.heights()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.resolution * 4),
                rows_per_image: Some(self.resolution),
            },
            wgpu::Extent3d {
                width: self.resolution,
                height: self.resolution,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// GLSL-style smoothstep; edges may be in either order (the drop kernel uses
/// smoothstep(radius, 0.0, d) for a falloff that peaks at the center).
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variance(heights: &[f32]) -> f32 {
        let mean = heights.iter().sum::<f32>() / heights.len() as f32;
        heights.iter().map(|h| (h - mean) * (h - mean)).sum::<f32>() / heights.len() as f32
    }

    #[test]
    fn test_smoothstep_falloff() {
        assert!((smoothstep(0.1, 0.0, 0.0) - 1.0).abs() < 1e-6);
        assert!(smoothstep(0.1, 0.0, 0.1).abs() < 1e-6);
        let mid = smoothstep(0.1, 0.0, 0.05);
        assert!((mid - 0.5).abs() < 1e-6, "midpoint {mid}");
    }

    #[test]
    fn test_clamp_invariant_under_repeated_impulses() {
        let mut sim = HeightFieldSim::new(64);
        for _ in 0..200 {
            sim.inject(Impulse {
                center: Vec2::splat(0.5),
                radius: 0.1,
                strength: 1.0,
            });
            sim.step();
            let max = sim.heights().iter().cloned().fold(f32::MIN, f32::max);
            let min = sim.heights().iter().cloned().fold(f32::MAX, f32::min);
            assert!(
                max <= HEIGHT_MAX && min >= HEIGHT_MIN,
                "heights escaped clamp range: [{min}, {max}]"
            );
        }
    }

    #[test]
    fn test_swap_per_step() {
        let mut sim = HeightFieldSim::new(16);
        let before = sim.readable_index();
        let gen0 = sim.generation();
        let gen1 = sim.step();
        assert_eq!(gen1, gen0 + 1, "generation must increment by exactly 1");
        assert_ne!(sim.readable_index(), before, "buffers must swap roles");
        sim.step();
        assert_eq!(sim.readable_index(), before, "roles alternate every step");
        assert_eq!(sim.generation(), gen0 + 2);
    }

    #[test]
    fn test_idle_steps_do_not_grow_variance() {
        let mut sim = HeightFieldSim::new(64);
        sim.inject(Impulse::default());
        sim.step();
        let initial = variance(sim.heights());
        assert!(initial > 0.0);
        let mut last = initial;
        for step in 0..1000 {
            sim.step();
            let var = variance(sim.heights());
            assert!(
                var.is_finite() && var <= initial + 1e-9,
                "variance grew past the initial disturbance at step {step}: {initial} -> {var}"
            );
            last = var;
        }
        assert!(
            last < initial * 0.5,
            "damped field should flatten out: {initial} -> {last}"
        );
    }

    #[test]
    fn test_no_impulse_step_still_runs() {
        let mut sim = HeightFieldSim::new(16);
        let generation = sim.step();
        assert_eq!(generation, 1);
        assert!(sim.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_ripple_localized_near_impulse() {
        let mut sim = HeightFieldSim::new(256);
        sim.inject(Impulse {
            center: Vec2::splat(0.5),
            radius: 0.1,
            strength: 1.0,
        });
        sim.step();
        let near = sim.height_at(Vec2::new(0.5, 0.5));
        let far = sim.height_at(Vec2::new(0.8, 0.5));
        assert!(
            near > far,
            "ripple should be localized: near {near} vs far {far}"
        );
        assert_eq!(far, 0.0, "outside the falloff radius nothing changes");
    }

    #[test]
    fn test_latest_impulse_wins() {
        let mut sim = HeightFieldSim::new(128);
        sim.inject(Impulse {
            center: Vec2::new(0.2, 0.2),
            radius: 0.05,
            strength: 1.0,
        });
        sim.inject(Impulse {
            center: Vec2::new(0.8, 0.8),
            radius: 0.05,
            strength: 1.0,
        });
        sim.step();
        assert_eq!(
            sim.height_at(Vec2::new(0.23, 0.2)),
            0.0,
            "overwritten impulse must not be applied"
        );
        assert!(sim.height_at(Vec2::new(0.83, 0.8)) > 0.0);
    }

    #[test]
    fn test_impulse_consumed_once() {
        let mut sim = HeightFieldSim::new(64);
        sim.inject(Impulse::default());
        sim.step();
        let after_first = sim.height_at(Vec2::splat(0.5));
        assert!(after_first > 0.0);
        // The second step only propagates; total energy must not grow.
        let sum_first: f32 = sim.heights().iter().sum();
        sim.step();
        let sum_second: f32 = sim.heights().iter().sum();
        assert!(
            sum_second <= sum_first + 1e-3,
            "impulse re-applied: {sum_first} -> {sum_second}"
        );
    }
}
