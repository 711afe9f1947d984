//! Deterministic drive simulation
//!
//! All per-tick driving logic lives here. This module must stay pure:
//! - Fixed tick only (the host owns the timers)
//! - No storage, audio or DOM access
//! - Rewards are reported as events and applied by the session

pub mod state;
pub mod tick;

pub use state::{CarStats, DriftStatus, DriveEvent, DriveState};
pub use tick::{TickInput, settle, tick};
