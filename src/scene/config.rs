//! Diorama configuration, loadable from JSON with defaults carrying the
//! tuned constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compositor::WatercolorParams;
use crate::core::types::Result;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Inkpond".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseSettings {
    /// Normalized-UV radius of a pointer drop
    pub radius: f32,
    pub strength: f32,
}

impl Default for ImpulseSettings {
    fn default() -> Self {
        Self {
            radius: 0.06,
            strength: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WatercolorSettings {
    pub scale: f32,
    pub threshold: f32,
    pub darkening: f32,
    pub pigment: f32,
}

impl Default for WatercolorSettings {
    fn default() -> Self {
        let p = WatercolorParams::default();
        Self {
            scale: p.scale,
            threshold: p.threshold,
            darkening: p.darkening,
            pigment: p.pigment,
        }
    }
}

impl WatercolorSettings {
    pub fn to_params(self) -> WatercolorParams {
        WatercolorParams {
            scale: self.scale,
            threshold: self.threshold,
            darkening: self.darkening,
            pigment: self.pigment,
            ..WatercolorParams::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSettings {
    pub grass_blades: u32,
    pub rain_sheets: u32,
    pub splash_points: u32,
    pub godray_cones: u32,
    pub seed: u32,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            grass_blades: 1000,
            rain_sheets: 2500,
            splash_points: 300,
            godray_cones: 20,
            seed: 7,
        }
    }
}

/// Top-level configuration for the diorama.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DioramaConfig {
    pub window: WindowSettings,
    pub impulse: ImpulseSettings,
    pub watercolor: WatercolorSettings,
    pub scatter: ScatterSettings,
    /// Optional paper grain image; the procedural grain is used when absent
    /// or unreadable.
    pub paper_texture: Option<PathBuf>,
}

impl DioramaConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| crate::core::error::Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::info!("Config {} not loaded ({e}); using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_tuned_constants() {
        let config = DioramaConfig::default();
        assert_eq!(config.watercolor.threshold, 3.0);
        assert_eq!(config.watercolor.scale, 0.02);
        assert_eq!(config.scatter.grass_blades, 1000);
        assert_eq!(config.scatter.rain_sheets, 2500);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DioramaConfig =
            serde_json::from_str(r#"{"watercolor": {"threshold": 4.5}}"#).unwrap();
        assert_eq!(config.watercolor.threshold, 4.5);
        assert_eq!(config.watercolor.pigment, 1.3, "unset fields keep defaults");
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_roundtrip() {
        let config = DioramaConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: DioramaConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.scatter.seed, config.scatter.seed);
    }
}
