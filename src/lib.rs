//! Drift City - a neon drift-driving arcade game
//!
//! Core modules:
//! - `sim`: Deterministic drive simulation (kinematics, drift scoring, settlement)
//! - `session`: Owns the player profile and applies simulation side effects
//! - `garage` / `profile`: Vehicles, skins and the credit economy
//! - `persistence`: Save/load against a key-value store
//! - `mirror`: Shared-storage room mailbox for peer presence
//! - `tuning`: Data-driven drift balance

pub mod achievements;
pub mod admin;
pub mod audio;
pub mod garage;
pub mod input;
pub mod leaderboard;
pub mod mirror;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod promo;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tasks;
pub mod tuning;
pub mod ui;

pub use leaderboard::Leaderboard;
pub use profile::{EconomyError, Profile};
pub use session::Session;
pub use settings::Settings;
pub use tuning::DriftTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Drive simulation tick (milliseconds)
    pub const TICK_MS: u32 = 50;
    /// Room mirror poll interval (milliseconds)
    pub const MIRROR_POLL_MS: u32 = 100;

    /// Credits a fresh profile starts with
    pub const STARTING_CREDITS: u64 = 5000;
    /// Vehicle selected on a fresh profile
    pub const STARTING_VEHICLE: &str = "lada";

    /// Stat points gained per upgrade purchase
    pub const UPGRADE_STEP: u32 = 10;
    /// Upgrade cost for standard vehicles
    pub const UPGRADE_COST_STANDARD: u64 = 500;
    /// Upgrade cost for premium vehicles
    pub const UPGRADE_COST_PREMIUM: u64 = 1000;

    /// Single-drift score that unlocks "Drift King"
    pub const DRIFT_KING_SCORE: u64 = 10_000;
    /// Speed that unlocks "Speed Demon"
    pub const SPEED_DEMON_SPEED: f32 = 100.0;
    /// Lifetime earnings that unlock "Millionaire"
    pub const MILLIONAIRE_EARNINGS: u64 = 1_000_000;
}

/// Normalize a heading to [0, 360) degrees
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees (0 = up the road, clockwise positive)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn test_heading_vector() {
        let up = heading_vector(0.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-5);
        let right = heading_vector(90.0);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }
}
