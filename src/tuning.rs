//! Drift balance tuning
//!
//! Two presets exist: `classic` matches the first city build (gentler scoring,
//! short combos) and `arcade` is the current default.

use serde::{Deserialize, Serialize};

use crate::settings::SLIDER_MAX;

/// Numeric knobs for the drive simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftTuning {
    /// Speed divisor for base drift points (`floor(|speed| / k)`)
    pub points_divisor: f32,
    /// Extra multiplier per combo step
    pub combo_bonus: f32,
    /// Combo counter ceiling
    pub combo_cap: u32,
    /// Quiet time after the last drift tick before the score is settled
    pub settle_delay_ms: u32,
    /// Fraction of top speed that must be exceeded while turning to drift
    pub drift_speed_ratio: f32,
    /// Per-tick multiplicative speed decay while the handbrake is held
    pub handbrake_decay: f32,
    /// Reverse target as a fraction of top speed
    pub reverse_ratio: f32,
    /// Acceleration stat divisor giving the per-tick speed step
    pub accel_divisor: f32,
    /// Turn rate in degrees/tick at handling 50 and full speed
    pub base_turn_deg: f32,
    /// Road scroll per unit of speed per tick (cosmetic)
    pub road_scroll: f32,
}

impl DriftTuning {
    /// First city build: k=10, c=0.1, combo cap 10
    pub fn classic() -> Self {
        Self {
            points_divisor: 10.0,
            combo_bonus: 0.1,
            combo_cap: 10,
            ..Self::arcade()
        }
    }

    /// Current build: k=5, c=0.15, combo cap 20
    pub fn arcade() -> Self {
        Self {
            points_divisor: 5.0,
            combo_bonus: 0.15,
            combo_cap: 20,
            settle_delay_ms: 1500,
            drift_speed_ratio: 0.3,
            handbrake_decay: 0.95,
            reverse_ratio: 0.5,
            accel_divisor: 10.0,
            base_turn_deg: 4.0,
            road_scroll: 0.5,
        }
    }

    /// Scale the turn rate by the steering sensitivity slider (0 - 100).
    ///
    /// 50 leaves the preset unchanged; the range is 0.5x to 1.5x.
    pub fn with_sensitivity(mut self, sensitivity: u8) -> Self {
        let factor = 0.5 + f32::from(sensitivity.min(SLIDER_MAX)) / f32::from(SLIDER_MAX);
        self.base_turn_deg *= factor;
        self
    }

    /// Flat credit reward for a settled drift score
    pub fn reward_for(score: u64) -> u64 {
        match score {
            s if s >= 3000 => 3000,
            s if s >= 2000 => 1000,
            s if s >= 1000 => 500,
            _ => 0,
        }
    }
}

impl Default for DriftTuning {
    fn default() -> Self {
        Self::arcade()
    }
}
