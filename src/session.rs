//! Game session: profile + drive state + injected storage
//!
//! The session is the only owner of mutable game state. It runs the pure
//! drive tick, applies its side effects (credits, counters, tasks,
//! achievements) to the profile and writes the save whenever the profile
//! changed.

use crate::achievements::AchievementId;
use crate::consts::{DRIFT_KING_SCORE, SPEED_DEMON_SPEED};
use crate::garage::StatKind;
use crate::leaderboard::Leaderboard;
use crate::persistence::{self, KeyValueStore};
use crate::profile::{EconomyError, Profile};
use crate::settings::Settings;
use crate::sim::{self, DriveEvent, DriveState, TickInput};
use crate::tasks::TaskKind;
use crate::tuning::DriftTuning;

/// Things the host reacts to (sounds, toasts, HUD)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    DriftStarted,
    DriftSettled { score: u64, reward: u64 },
    AchievementUnlocked(AchievementId),
    TaskCompleted { id: String, reward: u64 },
    /// A garage/economy operation went through
    Purchase,
}

pub struct Session<S: KeyValueStore> {
    store: S,
    profile: Profile,
    drive: DriveState,
    tuning: DriftTuning,
    events: Vec<GameEvent>,
    dirty: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the profile from `store` (fresh on a missing or bad save)
    pub fn new(store: S) -> Self {
        Self::with_tuning(store, DriftTuning::default())
    }

    pub fn with_tuning(store: S, tuning: DriftTuning) -> Self {
        let profile = persistence::load_profile(&store);
        Self {
            store,
            profile,
            drive: DriveState::new(),
            tuning,
            events: Vec::new(),
            dirty: false,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn drive(&self) -> &DriveState {
        &self.drive
    }

    pub fn tuning(&self) -> &DriftTuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take events produced by garage operations since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Leaderboard including the player's best drift
    pub fn leaderboard(&self) -> Leaderboard {
        let vehicle = self
            .profile
            .selected()
            .map(|v| v.name.as_str())
            .unwrap_or_default();
        Leaderboard::with_player(
            &self.profile.player_name,
            self.profile.stats.best_drift_score,
            vehicle,
        )
    }

    /// Roll daily tasks if the day changed
    pub fn start_day(&mut self, day: u32) {
        if self.profile.refresh_daily_tasks(day) {
            self.dirty = true;
        }
        self.flush();
    }

    // === Driving ===

    /// Advance one drive tick and apply its consequences
    pub fn tick(&mut self, input: &TickInput, dt_ms: u32) -> Vec<GameEvent> {
        let car = self.profile.selected_stats();
        let tuning = self.tuning.with_sensitivity(self.profile.settings.sensitivity);
        let distance_before = self.drive.distance;
        sim::tick(&mut self.drive, &car, input, &tuning, dt_ms);

        self.apply_distance(self.drive.distance - distance_before);
        if self.drive.speed.abs() >= SPEED_DEMON_SPEED {
            self.profile.unlock(AchievementId::SpeedDemon);
        }
        self.apply_drive_events();

        self.flush();
        self.drain_events()
    }

    /// Stop driving. A pending drift is settled right away.
    pub fn leave_track(&mut self) -> Vec<GameEvent> {
        if self.drive.is_drifting() {
            sim::settle(&mut self.drive);
            self.apply_drive_events();
        }
        self.drive = DriveState::new();
        self.flush();
        self.drain_events()
    }

    fn apply_distance(&mut self, travelled: f32) {
        if travelled <= 0.0 {
            return;
        }
        let before = self.profile.stats.total_distance;
        let after = before + f64::from(travelled);
        self.profile.stats.total_distance = after;
        let whole_units = (after.floor() - before.floor()) as u64;
        self.profile.record_task(TaskKind::Distance, whole_units);
        self.dirty = true;
    }

    fn apply_drive_events(&mut self) {
        for event in self.drive.drain_events() {
            match event {
                DriveEvent::DriftStarted => {
                    self.profile.stats.total_drifts += 1;
                    self.profile.unlock(AchievementId::FirstDrift);
                    self.profile.record_task(TaskKind::Drifts, 1);
                    self.events.push(GameEvent::DriftStarted);
                }
                DriveEvent::DriftSettled { score, reward } => {
                    log::info!("Drift settled: {score} points, {reward} credits");
                    let stats = &mut self.profile.stats;
                    stats.best_drift_score = stats.best_drift_score.max(score);
                    if score >= DRIFT_KING_SCORE {
                        self.profile.unlock(AchievementId::DriftKing);
                    }
                    self.profile.earn(reward);
                    self.profile.record_task(TaskKind::Earnings, reward);
                    self.profile.record_task(TaskKind::BigDrift, score);
                    if self.leaderboard().player_rank() == Some(1) {
                        self.profile.unlock(AchievementId::Legend);
                    }
                    self.events.push(GameEvent::DriftSettled { score, reward });
                }
            }
            self.dirty = true;
        }
    }

    /// Turn profile bookkeeping into events and save if anything changed
    fn flush(&mut self) {
        for (id, reward) in self.profile.drain_completed_tasks() {
            self.events.push(GameEvent::TaskCompleted { id, reward });
        }
        for id in self.profile.drain_unlocks() {
            self.events.push(GameEvent::AchievementUnlocked(id));
            self.dirty = true;
        }
        if self.dirty {
            if let Err(e) = persistence::save_profile(&mut self.store, &self.profile) {
                log::warn!("Failed to save profile: {e}");
            }
            self.dirty = false;
        }
    }

    /// Wipe the save and start over
    pub fn reset_progress(&mut self) {
        if let Err(e) = persistence::clear_profile(&mut self.store) {
            log::warn!("Failed to clear save: {e}");
        }
        self.profile = Profile::new();
        self.drive = DriveState::new();
        self.events.clear();
        self.dirty = false;
        log::info!("Progress reset");
    }

    // === Garage & economy ===

    fn mutate<T>(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut Profile) -> Result<T, EconomyError>,
    ) -> Result<T, EconomyError> {
        let result = op(&mut self.profile);
        match &result {
            Ok(_) => {
                self.events.push(GameEvent::Purchase);
                self.dirty = true;
            }
            Err(e) => log::info!("{what} rejected: {e}"),
        }
        self.flush();
        result
    }

    pub fn upgrade_stat(&mut self, vehicle_id: &str, stat: StatKind) -> Result<u32, EconomyError> {
        self.mutate("Upgrade", |p| p.upgrade_stat(vehicle_id, stat))
    }

    pub fn unlock_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        self.mutate("Vehicle purchase", |p| p.unlock_vehicle(vehicle_id))
    }

    pub fn select_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        let result = self.profile.select_vehicle(vehicle_id);
        if result.is_ok() {
            self.dirty = true;
        }
        self.flush();
        result
    }

    pub fn unlock_skin(&mut self, vehicle_id: &str, skin_id: &str) -> Result<(), EconomyError> {
        self.mutate("Skin purchase", |p| p.unlock_skin(vehicle_id, skin_id))
    }

    pub fn select_skin(&mut self, vehicle_id: &str, skin_id: &str) -> Result<(), EconomyError> {
        let result = self.profile.select_skin(vehicle_id, skin_id);
        if result.is_ok() {
            self.dirty = true;
        }
        self.flush();
        result
    }

    pub fn activate_promo_code(&mut self, code: &str) -> Result<u64, EconomyError> {
        self.mutate("Promo code", |p| p.activate_promo_code(code))
    }

    pub fn enable_admin(&mut self, code: &str) -> Result<(), EconomyError> {
        let result = self.profile.enable_admin(code);
        if result.is_ok() {
            self.dirty = true;
        }
        self.flush();
        result
    }

    pub fn disable_admin(&mut self) {
        if self.profile.admin_mode {
            self.profile.disable_admin();
            self.dirty = true;
        }
        self.flush();
    }

    pub fn grant_admin_money(&mut self, now_ms: f64) -> Result<u64, EconomyError> {
        self.mutate("Admin grant", |p| p.grant_admin_money(now_ms))
    }

    pub fn grant_admin_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        self.mutate("Admin vehicle", |p| p.grant_admin_vehicle(vehicle_id))
    }

    pub fn unlock_everything(&mut self) -> Result<(), EconomyError> {
        self.mutate("Unlock everything", |p| p.unlock_everything())
    }

    // === Preferences ===

    pub fn update_settings(&mut self, settings: Settings) {
        let mut settings = settings;
        settings.sanitize();
        if settings != self.profile.settings {
            self.profile.settings = settings;
            self.dirty = true;
        }
        self.flush();
    }

    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && name != self.profile.player_name {
            self.profile.player_name = name.to_string();
            self.dirty = true;
        }
        self.flush();
    }
}
