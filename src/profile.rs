//! Player profile and the credit economy
//!
//! The profile is the whole persisted save. Every economy operation checks
//! its preconditions first and only then mutates; a rejected operation
//! returns an error and leaves the profile untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::{self, Achievement, AchievementId};
use crate::consts::{MILLIONAIRE_EARNINGS, STARTING_CREDITS, STARTING_VEHICLE};
use crate::garage::{self, Category, StatKind, Vehicle};
use crate::promo;
use crate::settings::Settings;
use crate::sim::CarStats;
use crate::tasks::{self, DailyTask, TaskKind};

/// Why an economy operation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("unknown vehicle `{0}`")]
    UnknownVehicle(String),
    #[error("unknown skin `{skin}` for vehicle `{vehicle}`")]
    UnknownSkin { vehicle: String, skin: String },
    #[error("vehicle `{0}` is locked")]
    VehicleLocked(String),
    #[error("skin `{0}` is locked")]
    SkinLocked(String),
    #[error("`{0}` is already owned")]
    AlreadyOwned(String),
    #[error("{0:?} is already at max")]
    StatMaxed(StatKind),
    #[error("not enough credits: need {cost}, have {balance}")]
    InsufficientFunds { cost: u64, balance: u64 },
    #[error("unknown promo code")]
    UnknownPromoCode,
    #[error("promo code `{0}` was already used")]
    PromoCodeUsed(String),
    #[error("admin mode is not enabled")]
    NotAdmin,
    #[error("wrong admin code")]
    WrongAdminCode,
    #[error("admin grant available again in {remaining_ms} ms")]
    Cooldown { remaining_ms: u64 },
}

/// Lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    /// Credits earned from play (drifts, tasks, promo codes)
    pub total_earned: u64,
    pub total_distance: f64,
    pub total_drifts: u64,
    pub best_drift_score: u64,
}

/// Complete persisted save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub player_name: String,
    pub vehicles: Vec<Vehicle>,
    pub credits: u64,
    pub selected_vehicle: String,
    pub settings: Settings,
    pub achievements: Vec<Achievement>,
    pub admin_mode: bool,
    /// Timestamp (ms) of the last admin money grant
    pub last_admin_grant_ms: Option<f64>,
    pub used_promo_codes: Vec<String>,
    pub daily_tasks: Vec<DailyTask>,
    /// Day index the current daily tasks were rolled for
    pub task_day: Option<u32>,
    pub stats: LifetimeStats,
    /// Achievements unlocked since the last drain (not persisted)
    #[serde(skip)]
    recent_unlocks: Vec<AchievementId>,
    /// Daily tasks completed since the last drain (not persisted)
    #[serde(skip)]
    recent_tasks: Vec<(String, u64)>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            vehicles: garage::default_vehicles(),
            credits: STARTING_CREDITS,
            selected_vehicle: STARTING_VEHICLE.to_string(),
            settings: Settings::default(),
            achievements: achievements::default_achievements(),
            admin_mode: false,
            last_admin_grant_ms: None,
            used_promo_codes: Vec::new(),
            daily_tasks: Vec::new(),
            task_day: None,
            stats: LifetimeStats::default(),
            recent_unlocks: Vec::new(),
            recent_tasks: Vec::new(),
        }
    }
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore invariants after loading a save of any age
    pub fn sanitize(&mut self) {
        self.vehicles = garage::merge_with_catalog(std::mem::take(&mut self.vehicles));
        self.achievements = achievements::merge_with_catalog(&self.achievements);
        self.settings.sanitize();

        let selected_ok = self
            .vehicle(&self.selected_vehicle)
            .is_some_and(|v| v.unlocked);
        if !selected_ok && let Some(first) = self.vehicles.iter().find(|v| v.unlocked) {
            log::warn!(
                "Selected vehicle `{}` unavailable, falling back to `{}`",
                self.selected_vehicle,
                first.id
            );
            self.selected_vehicle = first.id.clone();
        }

        for code in &mut self.used_promo_codes {
            *code = promo::normalize(code);
        }
        if !self.stats.total_distance.is_finite() || self.stats.total_distance < 0.0 {
            self.stats.total_distance = 0.0;
        }
    }

    // === Lookups ===

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    fn vehicle_mut(&mut self, id: &str) -> Result<&mut Vehicle, EconomyError> {
        self.vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| EconomyError::UnknownVehicle(id.to_string()))
    }

    pub fn selected(&self) -> Option<&Vehicle> {
        self.vehicle(&self.selected_vehicle)
    }

    /// Stats the simulation drives with (a missing vehicle drives as stalled)
    pub fn selected_stats(&self) -> CarStats {
        self.selected()
            .map(CarStats::from)
            .unwrap_or(CarStats::new(0.0, 0.0, 0.0))
    }

    pub fn unlocked_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.unlocked).count()
    }

    pub fn completed_achievements(&self) -> usize {
        self.achievements.iter().filter(|a| a.completed).count()
    }

    // === Achievements ===

    /// Complete an achievement; returns true on the first completion
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        let newly = achievements::complete(&mut self.achievements, id);
        if newly {
            self.recent_unlocks.push(id);
        }
        newly
    }

    pub fn has(&self, id: AchievementId) -> bool {
        achievements::is_complete(&self.achievements, id)
    }

    /// Take achievements unlocked since the last call
    pub fn drain_unlocks(&mut self) -> Vec<AchievementId> {
        std::mem::take(&mut self.recent_unlocks)
    }

    /// Take (id, reward) of daily tasks completed since the last call
    pub fn drain_completed_tasks(&mut self) -> Vec<(String, u64)> {
        std::mem::take(&mut self.recent_tasks)
    }

    /// Re-evaluate garage-based achievements
    pub fn check_collection(&mut self) {
        if self.vehicles.iter().all(|v| v.unlocked) {
            self.unlock(AchievementId::Collector);
        }
        if self
            .vehicles
            .iter()
            .any(|v| v.unlocked && v.category == Category::Premium)
        {
            self.unlock(AchievementId::PremiumOwner);
        }
        if self.vehicles.iter().any(|v| v.unlocked && v.is_maxed()) {
            self.unlock(AchievementId::Tuner);
        }
        if self.vehicles.iter().any(|v| v.unlocked && v.owns_all_skins()) {
            self.unlock(AchievementId::Stylist);
        }
    }

    // === Credits ===

    /// Credit income that counts toward lifetime earnings
    pub fn earn(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.credits = self.credits.saturating_add(amount);
        self.stats.total_earned = self.stats.total_earned.saturating_add(amount);
        if self.stats.total_earned >= MILLIONAIRE_EARNINGS {
            self.unlock(AchievementId::Millionaire);
        }
    }

    fn ensure_funds(&self, cost: u64) -> Result<(), EconomyError> {
        if self.credits < cost {
            return Err(EconomyError::InsufficientFunds {
                cost,
                balance: self.credits,
            });
        }
        Ok(())
    }

    // === Garage ===

    /// Buy one upgrade step. Returns the new stat value.
    pub fn upgrade_stat(&mut self, vehicle_id: &str, stat: StatKind) -> Result<u32, EconomyError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| EconomyError::UnknownVehicle(vehicle_id.to_string()))?;
        if !vehicle.unlocked {
            return Err(EconomyError::VehicleLocked(vehicle_id.to_string()));
        }
        if !vehicle.can_upgrade(stat) {
            return Err(EconomyError::StatMaxed(stat));
        }
        let cost = vehicle.upgrade_cost();
        self.ensure_funds(cost)?;

        self.credits -= cost;
        let value = self.vehicle_mut(vehicle_id)?.apply_upgrade(stat);
        log::info!("Upgraded {vehicle_id} {} to {value} for {cost}", stat.label());

        self.check_collection();
        self.record_task(TaskKind::Upgrades, 1);
        Ok(value)
    }

    pub fn unlock_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| EconomyError::UnknownVehicle(vehicle_id.to_string()))?;
        if vehicle.unlocked {
            return Err(EconomyError::AlreadyOwned(vehicle_id.to_string()));
        }
        let price = vehicle.price;
        self.ensure_funds(price)?;

        self.credits -= price;
        self.vehicle_mut(vehicle_id)?.unlocked = true;
        log::info!("Bought vehicle {vehicle_id} for {price}");

        self.check_collection();
        Ok(())
    }

    pub fn select_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| EconomyError::UnknownVehicle(vehicle_id.to_string()))?;
        if !vehicle.unlocked {
            return Err(EconomyError::VehicleLocked(vehicle_id.to_string()));
        }
        self.selected_vehicle = vehicle_id.to_string();
        Ok(())
    }

    pub fn unlock_skin(&mut self, vehicle_id: &str, skin_id: &str) -> Result<(), EconomyError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| EconomyError::UnknownVehicle(vehicle_id.to_string()))?;
        if !vehicle.unlocked {
            return Err(EconomyError::VehicleLocked(vehicle_id.to_string()));
        }
        let skin = vehicle
            .skin(skin_id)
            .ok_or_else(|| EconomyError::UnknownSkin {
                vehicle: vehicle_id.to_string(),
                skin: skin_id.to_string(),
            })?;
        if skin.unlocked {
            return Err(EconomyError::AlreadyOwned(skin_id.to_string()));
        }
        let price = skin.price;
        self.ensure_funds(price)?;

        self.credits -= price;
        if let Some(skin) = self.vehicle_mut(vehicle_id)?.skin_mut(skin_id) {
            skin.unlocked = true;
        }
        log::info!("Bought skin {skin_id} for {vehicle_id} ({price})");

        self.check_collection();
        Ok(())
    }

    pub fn select_skin(&mut self, vehicle_id: &str, skin_id: &str) -> Result<(), EconomyError> {
        let vehicle = self.vehicle_mut(vehicle_id)?;
        let owned = vehicle
            .skin(skin_id)
            .map(|s| s.unlocked)
            .ok_or_else(|| EconomyError::UnknownSkin {
                vehicle: vehicle_id.to_string(),
                skin: skin_id.to_string(),
            })?;
        if !owned {
            return Err(EconomyError::SkinLocked(skin_id.to_string()));
        }
        vehicle.selected_skin = skin_id.to_string();
        Ok(())
    }

    // === Promo codes ===

    /// Redeem a one-time promo code. Returns the credited amount.
    pub fn activate_promo_code(&mut self, code: &str) -> Result<u64, EconomyError> {
        let code = promo::normalize(code);
        let reward = promo::reward_for(&code).ok_or(EconomyError::UnknownPromoCode)?;
        if self.used_promo_codes.contains(&code) {
            return Err(EconomyError::PromoCodeUsed(code));
        }
        log::info!("Promo code {code} redeemed for {reward}");
        self.used_promo_codes.push(code);
        self.earn(reward);
        Ok(reward)
    }

    // === Daily tasks ===

    /// Roll a fresh task set when the day changed. Returns true if rolled.
    pub fn refresh_daily_tasks(&mut self, day: u32) -> bool {
        if self.task_day == Some(day) && !self.daily_tasks.is_empty() {
            return false;
        }
        self.daily_tasks = tasks::roll_tasks(day);
        self.task_day = Some(day);
        log::info!("Rolled daily tasks for day {day}");
        true
    }

    /// Advance matching tasks and pay out the ones that completed
    pub fn record_task(&mut self, kind: TaskKind, amount: u64) -> Vec<(String, u64)> {
        let done = tasks::record(&mut self.daily_tasks, kind, amount);
        for (id, reward) in &done {
            log::info!("Daily task {id} complete, paid {reward}");
            self.earn(*reward);
        }
        self.recent_tasks.extend(done.iter().cloned());
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garage::DEFAULT_SKIN;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_profile() {
        let p = Profile::new();
        assert_eq!(p.credits, 5000);
        assert_eq!(p.selected_vehicle, "lada");
        assert_eq!(p.unlocked_count(), 2);
        assert_eq!(p.completed_achievements(), 0);
        assert_eq!(p.selected_stats(), CarStats::new(55.0, 50.0, 60.0));
    }

    #[test]
    fn test_upgrade_rejected_without_funds() {
        let mut p = Profile::new();
        p.credits = 400;
        let err = p.upgrade_stat("lada", StatKind::Speed).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientFunds {
                cost: 500,
                balance: 400
            }
        );
        assert_eq!(p.credits, 400);
        assert_eq!(p.vehicle("lada").unwrap().speed, 55);
    }

    #[test]
    fn test_upgrade_deducts_exact_cost() {
        let mut p = Profile::new();
        assert_eq!(p.upgrade_stat("lada", StatKind::Handling), Ok(60));
        assert_eq!(p.credits, 4500);
    }

    #[test]
    fn test_upgrade_rejected_at_max_and_when_locked() {
        let mut p = Profile::new();
        p.credits = 1_000_000;
        for _ in 0..5 {
            p.upgrade_stat("lada", StatKind::Speed).unwrap();
        }
        let balance = p.credits;
        assert_eq!(
            p.upgrade_stat("lada", StatKind::Speed),
            Err(EconomyError::StatMaxed(StatKind::Speed))
        );
        assert_eq!(p.credits, balance);
        assert_eq!(
            p.upgrade_stat("vaz", StatKind::Speed),
            Err(EconomyError::VehicleLocked("vaz".to_string()))
        );
        assert!(matches!(
            p.upgrade_stat("tesla", StatKind::Speed),
            Err(EconomyError::UnknownVehicle(_))
        ));
    }

    #[test]
    fn test_tuner_when_all_stats_maxed() {
        let mut p = Profile::new();
        p.credits = 1_000_000;
        for stat in StatKind::ALL {
            while p.vehicle("lada").unwrap().can_upgrade(stat) {
                p.upgrade_stat("lada", stat).unwrap();
            }
        }
        assert!(p.vehicle("lada").unwrap().is_maxed());
        assert!(p.has(AchievementId::Tuner));
        assert!(p.drain_unlocks().contains(&AchievementId::Tuner));
        assert!(p.drain_unlocks().is_empty());
    }

    #[test]
    fn test_unlock_vehicle() {
        let mut p = Profile::new();
        assert_eq!(p.unlock_vehicle("zhiguli"), Ok(()));
        assert_eq!(p.credits, 1500);
        assert_eq!(
            p.unlock_vehicle("zhiguli"),
            Err(EconomyError::AlreadyOwned("zhiguli".to_string()))
        );
        assert!(matches!(
            p.unlock_vehicle("niva"),
            Err(EconomyError::InsufficientFunds { .. })
        ));
        assert_eq!(p.credits, 1500);
        assert!(!p.has(AchievementId::Collector));
    }

    #[test]
    fn test_collector_and_premium() {
        let mut p = Profile::new();
        p.credits = 1_000_000;
        p.unlock_vehicle("volga").unwrap();
        assert!(p.has(AchievementId::PremiumOwner));
        for id in ["zhiguli", "niva", "vaz", "chaika"] {
            p.unlock_vehicle(id).unwrap();
        }
        assert!(p.has(AchievementId::Collector));
    }

    #[test]
    fn test_select_vehicle_requires_unlock() {
        let mut p = Profile::new();
        assert_eq!(
            p.select_vehicle("vaz"),
            Err(EconomyError::VehicleLocked("vaz".to_string()))
        );
        assert_eq!(p.select_vehicle("uaz"), Ok(()));
        assert_eq!(p.selected_vehicle, "uaz");
    }

    #[test]
    fn test_skins() {
        let mut p = Profile::new();
        p.credits = 20_000;
        assert_eq!(
            p.select_skin("lada", "chrome"),
            Err(EconomyError::SkinLocked("chrome".to_string()))
        );
        p.unlock_skin("lada", "chrome").unwrap();
        assert_eq!(p.credits, 16_000);
        p.select_skin("lada", "chrome").unwrap();
        assert_eq!(p.selected().unwrap().selected_skin, "chrome");
        assert_eq!(
            p.unlock_skin("lada", DEFAULT_SKIN),
            Err(EconomyError::AlreadyOwned(DEFAULT_SKIN.to_string()))
        );
        assert!(matches!(
            p.unlock_skin("vaz", "chrome"),
            Err(EconomyError::VehicleLocked(_))
        ));

        for skin in ["neon_cyan", "neon_magenta", "sunset"] {
            p.unlock_skin("lada", skin).unwrap();
        }
        assert!(p.has(AchievementId::Stylist));
    }

    #[test]
    fn test_promo_code_once() {
        let mut p = Profile::new();
        assert_eq!(p.activate_promo_code(" welcome "), Ok(1000));
        assert_eq!(p.credits, 6000);
        assert_eq!(
            p.activate_promo_code("WELCOME"),
            Err(EconomyError::PromoCodeUsed("WELCOME".to_string()))
        );
        assert_eq!(
            p.activate_promo_code("FREE_MONEY"),
            Err(EconomyError::UnknownPromoCode)
        );
        assert_eq!(p.credits, 6000);
        assert_eq!(p.stats.total_earned, 1000);
    }

    #[test]
    fn test_millionaire() {
        let mut p = Profile::new();
        p.earn(999_999);
        assert!(!p.has(AchievementId::Millionaire));
        p.earn(1);
        assert!(p.has(AchievementId::Millionaire));
    }

    #[test]
    fn test_daily_tasks_refresh_and_pay() {
        let mut p = Profile::new();
        assert!(p.refresh_daily_tasks(100));
        assert!(!p.refresh_daily_tasks(100));
        let task = p.daily_tasks[0].clone();
        let amount = task.target;
        let before = p.credits;
        let paid = p.record_task(task.kind, amount);
        assert!(paid.iter().any(|(id, _)| *id == task.id));
        assert!(p.credits >= before + task.reward);
        assert!(p.record_task(task.kind, amount).iter().all(|(id, _)| *id != task.id));

        assert!(p.refresh_daily_tasks(101));
        assert!(p.daily_tasks.iter().all(|t| !t.completed && t.progress == 0));
    }

    #[test]
    fn test_sanitize_repairs_selection() {
        let mut p = Profile::new();
        p.selected_vehicle = "vaz".to_string();
        p.settings.music = 200;
        p.sanitize();
        assert_eq!(p.selected_vehicle, "uaz");
        assert_eq!(p.settings.music, 100);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Upgrade(usize, usize),
        Unlock(usize),
        Earn(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..7, 0usize..3).prop_map(|(v, s)| Op::Upgrade(v, s)),
            (0usize..7).prop_map(Op::Unlock),
            (0u64..5000).prop_map(Op::Earn),
        ]
    }

    proptest! {
        #[test]
        fn prop_stats_stay_in_range_and_balance_is_exact(
            ops in prop::collection::vec(op(), 1..200)
        ) {
            let mut p = Profile::new();
            let ids: Vec<String> = p.vehicles.iter().map(|v| v.id.clone()).collect();
            for op in ops {
                let before = p.credits;
                match op {
                    Op::Upgrade(v, s) => {
                        let cost = p.vehicle(&ids[v]).unwrap().upgrade_cost();
                        match p.upgrade_stat(&ids[v], StatKind::ALL[s]) {
                            Ok(_) => prop_assert_eq!(p.credits, before - cost),
                            Err(_) => prop_assert_eq!(p.credits, before),
                        }
                    }
                    Op::Unlock(v) => {
                        let price = p.vehicle(&ids[v]).unwrap().price;
                        match p.unlock_vehicle(&ids[v]) {
                            Ok(()) => prop_assert_eq!(p.credits, before - price),
                            Err(_) => prop_assert_eq!(p.credits, before),
                        }
                    }
                    Op::Earn(amount) => p.earn(amount),
                }
                for v in &p.vehicles {
                    for kind in StatKind::ALL {
                        prop_assert!(v.stat(kind) <= v.max_stat(kind));
                    }
                }
            }
        }
    }
}
