//! Mood scalars: linear per-frame ramps that drive shader uniforms.
//!
//! Every continuous visual intensity in the diorama (bloom, wave size, drag
//! color mix) follows the same state machine: a boolean flag ramps the value
//! linearly toward its high or low threshold, one fixed step per tick, with
//! no easing and no hysteresis. Implemented once, instantiated per surface.

use serde::{Deserialize, Serialize};

/// A single clamped linear ramp.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MoodScalar {
    value: f32,
    low: f32,
    high: f32,
    step: f32,
}

impl MoodScalar {
    /// Create a scalar resting at its low threshold.
    pub fn new(low: f32, high: f32, step: f32) -> Self {
        debug_assert!(low <= high && step > 0.0);
        Self {
            value: low,
            low,
            high,
            step,
        }
    }

    /// Advance one tick toward the flag's target threshold. Flipping the
    /// flag immediately reverses ramp direction.
    pub fn tick(&mut self, on: bool) {
        if on {
            self.value = (self.value + self.step).min(self.high);
        } else {
            self.value = (self.value - self.step).max(self.low);
        }
    }

    /// Drive the value directly from a continuous source (e.g. fish height),
    /// clamped to the thresholds.
    pub fn drive(&mut self, target: f32) {
        self.value = target.clamp(self.low, self.high);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn at_low(&self) -> bool {
        self.value <= self.low
    }

    pub fn at_high(&self) -> bool {
        self.value >= self.high
    }

    /// Normalized position inside [low, high].
    pub fn fraction(&self) -> f32 {
        if self.high > self.low {
            (self.value - self.low) / (self.high - self.low)
        } else {
            0.0
        }
    }
}

/// The bundle of mood scalars one surface owns. Passed as a single
/// parameter so call sites cannot drift on loose boolean arguments.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MoodState {
    /// Bloom intensity, 0.05..1.3 in steps of 0.01
    pub bloom: MoodScalar,
    /// Extra wave amplitude while bloom is active
    pub wave_amplitude: MoodScalar,
    /// Color mix while a fish is dragged (or driven by fish height)
    pub drag_mix: MoodScalar,
}

/// Per-frame boolean/continuous drivers for a [`MoodState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MoodDrivers {
    /// Bloom toggle (keyboard)
    pub bloom_on: bool,
    /// A fish belonging to this surface is being dragged
    pub dragging: bool,
    /// Normalized fish height above the water, if a fish is held
    pub fish_height: Option<f32>,
}

impl MoodState {
    pub fn tick(&mut self, drivers: &MoodDrivers) {
        self.bloom.tick(drivers.bloom_on);
        self.wave_amplitude.tick(drivers.bloom_on);
        match drivers.fish_height {
            Some(height) => self.drag_mix.drive(height),
            None => self.drag_mix.tick(drivers.dragging),
        }
    }

    /// Whether bloom contributions should be applied at all.
    pub fn bloom_active(&self) -> bool {
        !self.bloom.at_low()
    }
}

impl Default for MoodState {
    fn default() -> Self {
        Self {
            bloom: MoodScalar::new(0.05, 1.3, 0.01),
            wave_amplitude: MoodScalar::new(0.05, 1.3, 0.01),
            drag_mix: MoodScalar::new(0.0, 1.0, 0.02),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_up_monotonic_then_holds() {
        let mut scalar = MoodScalar::new(0.05, 1.3, 0.01);
        let mut prev = scalar.value();
        for _ in 0..200 {
            scalar.tick(true);
            assert!(
                scalar.value() >= prev,
                "ramp must be non-decreasing while on: {prev} -> {}",
                scalar.value()
            );
            assert!(scalar.value() <= 1.3, "must never exceed high threshold");
            prev = scalar.value();
        }
        assert_eq!(scalar.value(), 1.3, "must hold exactly at the threshold");
        assert!(scalar.at_high());
    }

    #[test]
    fn test_ramp_down_symmetric() {
        let mut scalar = MoodScalar::new(0.05, 1.3, 0.01);
        for _ in 0..200 {
            scalar.tick(true);
        }
        let mut prev = scalar.value();
        for _ in 0..200 {
            scalar.tick(false);
            assert!(scalar.value() <= prev);
            assert!(scalar.value() >= 0.05);
            prev = scalar.value();
        }
        assert_eq!(scalar.value(), 0.05);
        assert!(scalar.at_low());
    }

    #[test]
    fn test_flag_flip_reverses_immediately() {
        let mut scalar = MoodScalar::new(0.0, 1.0, 0.1);
        scalar.tick(true);
        scalar.tick(true);
        let peak = scalar.value();
        scalar.tick(false);
        assert!(scalar.value() < peak, "no hysteresis band");
    }

    #[test]
    fn test_drive_clamps() {
        let mut scalar = MoodScalar::new(0.0, 1.0, 0.1);
        scalar.drive(2.5);
        assert_eq!(scalar.value(), 1.0);
        scalar.drive(-1.0);
        assert_eq!(scalar.value(), 0.0);
    }

    #[test]
    fn test_state_bundle_ticks_both_bloom_scalars() {
        let mut mood = MoodState::default();
        mood.tick(&MoodDrivers {
            bloom_on: true,
            ..Default::default()
        });
        assert!(mood.bloom.value() > 0.05);
        assert!(mood.wave_amplitude.value() > 0.05);
        assert!(mood.bloom_active());
    }

    #[test]
    fn test_continuous_driver_overrides_drag_flag() {
        let mut mood = MoodState::default();
        mood.tick(&MoodDrivers {
            dragging: true,
            fish_height: Some(0.7),
            ..Default::default()
        });
        assert_eq!(mood.drag_mix.value(), 0.7);
    }

    #[test]
    fn test_bloom_inactive_at_rest() {
        let mood = MoodState::default();
        assert!(!mood.bloom_active());
    }
}
