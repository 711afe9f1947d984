//! Drive state and core simulation types
//!
//! Everything the per-tick update reads or writes lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::garage::Vehicle;

/// Drift status (hysteretic: only settles after the quiet period)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriftStatus {
    #[default]
    Idle,
    Drifting,
}

/// Something the host should react to (sound, toast, HUD pop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveEvent {
    /// Rising edge into a drift
    DriftStarted,
    /// A drift cycle ended and its score was converted to credits
    DriftSettled { score: u64, reward: u64 },
}

/// Stat block the simulation drives with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarStats {
    pub top_speed: f32,
    pub handling: f32,
    pub acceleration: f32,
}

impl CarStats {
    pub fn new(top_speed: f32, handling: f32, acceleration: f32) -> Self {
        Self {
            top_speed,
            handling,
            acceleration,
        }
    }

    /// Zero, negative or non-finite top speed means the car cannot move
    pub fn is_stalled(&self) -> bool {
        !(self.top_speed.is_finite() && self.top_speed > 0.0)
    }
}

impl From<&Vehicle> for CarStats {
    fn from(vehicle: &Vehicle) -> Self {
        Self::new(
            vehicle.speed as f32,
            vehicle.handling as f32,
            vehicle.acceleration as f32,
        )
    }
}

/// Per-player runtime state on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    /// Signed speed (negative = reversing)
    pub speed: f32,
    /// Heading in degrees, [0, 360)
    pub rotation: f32,
    /// World position
    pub pos: Vec2,
    /// Road texture scroll (cosmetic)
    pub road_offset: f32,
    /// Distance covered since the car entered the track
    pub distance: f32,
    /// Points accumulated in the current drift cycle
    pub drift_score: u64,
    /// Combo counter
    pub combo: u32,
    pub status: DriftStatus,
    /// Countdown to settlement; `None` when nothing is pending
    pub settle_in_ms: Option<u32>,
    /// Incremented on every rising edge into a drift
    pub drift_cycle: u64,
    /// Last cycle that has been paid out
    pub settled_cycle: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<DriveEvent>,
}

impl Default for DriveState {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveState {
    pub fn new() -> Self {
        Self {
            speed: 0.0,
            rotation: 0.0,
            pos: Vec2::ZERO,
            road_offset: 0.0,
            distance: 0.0,
            drift_score: 0,
            combo: 0,
            status: DriftStatus::Idle,
            settle_in_ms: None,
            drift_cycle: 0,
            settled_cycle: 0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn is_drifting(&self) -> bool {
        self.status == DriftStatus::Drifting
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<DriveEvent> {
        std::mem::take(&mut self.events)
    }
}
