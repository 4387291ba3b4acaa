//! Paper grain texture: loaded from disk when configured, otherwise
//! generated as layered value noise.

use std::path::Path;

use crate::core::types::Result;
use crate::scene::rand::smooth_noise;

pub const GRAIN_SIZE: u32 = 512;

/// Rgba8 pixel block ready for upload.
pub struct PaperGrain {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PaperGrain {
    /// Procedural fallback: three octaves of value noise, biased bright
    /// like cold-press paper. Red and green channels are decorrelated so
    /// the watercolor wobble offset has two independent axes.
    pub fn procedural(seed: u32) -> Self {
        let size = GRAIN_SIZE;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let fx = x as f32;
                let fy = y as f32;
                let r = grain_value(fx, fy, seed);
                let g = grain_value(fx, fy, seed.wrapping_add(91));
                let b = (r + g) * 0.5;
                pixels.push(to_byte(r));
                pixels.push(to_byte(g));
                pixels.push(to_byte(b));
                pixels.push(255);
            }
        }
        Self {
            pixels,
            width: size,
            height: size,
        }
    }

    /// Load an image file as the grain.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| crate::core::error::Error::Asset(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            pixels: img.into_raw(),
            width,
            height,
        })
    }

    /// Load from `path` when given, falling back to the procedural grain.
    pub fn load_or_procedural(path: Option<&Path>, seed: u32) -> Self {
        match path {
            Some(p) => match Self::load(p) {
                Ok(grain) => grain,
                Err(e) => {
                    log::warn!("Paper texture unusable ({e}); using procedural grain");
                    Self::procedural(seed)
                }
            },
            None => Self::procedural(seed),
        }
    }
}

fn grain_value(x: f32, y: f32, seed: u32) -> f32 {
    let coarse = smooth_noise(x, y, 37.0, seed);
    let medium = smooth_noise(x, y, 11.0, seed.wrapping_add(1));
    let fine = smooth_noise(x, y, 3.0, seed.wrapping_add(2));
    // Bright base with shallow fibers
    0.62 + 0.18 * coarse + 0.12 * medium + 0.08 * fine
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_dimensions() {
        let grain = PaperGrain::procedural(7);
        assert_eq!(grain.width, GRAIN_SIZE);
        assert_eq!(grain.height, GRAIN_SIZE);
        assert_eq!(grain.pixels.len(), (GRAIN_SIZE * GRAIN_SIZE * 4) as usize);
    }

    #[test]
    fn test_grain_is_bright_and_textured() {
        let grain = PaperGrain::procedural(7);
        let values: Vec<u8> = grain.pixels.chunks_exact(4).map(|p| p[0]).collect();
        let min = *values.iter().min().unwrap();
        let max = *values.iter().max().unwrap();
        assert!(min > 100, "paper should never go dark, min {min}");
        assert!(max > min + 10, "grain needs visible variation");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let grain = PaperGrain::load_or_procedural(Some(Path::new("/nonexistent.png")), 7);
        assert_eq!(grain.width, GRAIN_SIZE);
    }
}
