//! Player preferences
//!
//! Stored inside the profile save. Every value is a 0-100 slider.
//! `sensitivity` scales the steering rate and `sfx` the effect volume.
//! There is no music track yet; `music` is only kept so saves round-trip
//! and the settings screen shows what the player picked.

use serde::{Deserialize, Serialize};

/// Upper bound of every slider
pub const SLIDER_MAX: u8 = 100;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music volume (0 - 100), persisted only
    pub music: u8,
    /// Sound effects volume (0 - 100)
    pub sfx: u8,
    /// Steering sensitivity (0 - 100)
    pub sensitivity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: 70,
            sfx: 80,
            sensitivity: 50,
        }
    }
}

impl Settings {
    pub fn set_music(&mut self, value: u8) {
        self.music = value.min(SLIDER_MAX);
    }

    pub fn set_sfx(&mut self, value: u8) {
        self.sfx = value.min(SLIDER_MAX);
    }

    pub fn set_sensitivity(&mut self, value: u8) {
        self.sensitivity = value.min(SLIDER_MAX);
    }

    /// Clamp values that came from an old or edited save
    pub fn sanitize(&mut self) {
        self.set_music(self.music);
        self.set_sfx(self.sfx);
        self.set_sensitivity(self.sensitivity);
    }

    /// SFX volume as 0.0 - 1.0
    pub fn sfx_volume(&self) -> f32 {
        f32::from(self.sfx) / f32::from(SLIDER_MAX)
    }
}
