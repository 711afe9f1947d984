//! Admin panel operations
//!
//! Privileged variants of the garage mutations. All of them require admin
//! mode; the money grant is additionally rate limited.

use crate::profile::{EconomyError, Profile};

/// Code that switches admin mode on
pub const ADMIN_CODE: &str = "NEON-ADMIN-77";
/// Credits per admin grant
pub const ADMIN_GRANT: u64 = 100_000;
/// Minimum time between admin grants (ms)
pub const ADMIN_COOLDOWN_MS: f64 = 60_000.0;

impl Profile {
    pub fn enable_admin(&mut self, code: &str) -> Result<(), EconomyError> {
        if code.trim() != ADMIN_CODE {
            log::warn!("Rejected admin code");
            return Err(EconomyError::WrongAdminCode);
        }
        self.admin_mode = true;
        log::info!("Admin mode enabled");
        Ok(())
    }

    pub fn disable_admin(&mut self) {
        self.admin_mode = false;
    }

    fn ensure_admin(&self) -> Result<(), EconomyError> {
        if self.admin_mode {
            Ok(())
        } else {
            Err(EconomyError::NotAdmin)
        }
    }

    /// Remaining cooldown (ms) before the next grant, 0 when ready
    pub fn admin_cooldown_remaining(&self, now_ms: f64) -> u64 {
        match self.last_admin_grant_ms {
            Some(last) => (last + ADMIN_COOLDOWN_MS - now_ms).max(0.0).ceil() as u64,
            None => 0,
        }
    }

    /// Grant admin money. Does not count toward lifetime earnings.
    pub fn grant_admin_money(&mut self, now_ms: f64) -> Result<u64, EconomyError> {
        self.ensure_admin()?;
        let remaining_ms = self.admin_cooldown_remaining(now_ms);
        if remaining_ms > 0 {
            return Err(EconomyError::Cooldown { remaining_ms });
        }
        self.credits = self.credits.saturating_add(ADMIN_GRANT);
        self.last_admin_grant_ms = Some(now_ms);
        log::info!("Admin granted {ADMIN_GRANT} credits");
        Ok(ADMIN_GRANT)
    }

    /// Unlock a vehicle for free
    pub fn grant_admin_vehicle(&mut self, vehicle_id: &str) -> Result<(), EconomyError> {
        self.ensure_admin()?;
        let vehicle = self
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .ok_or_else(|| EconomyError::UnknownVehicle(vehicle_id.to_string()))?;
        if vehicle.unlocked {
            return Err(EconomyError::AlreadyOwned(vehicle_id.to_string()));
        }
        vehicle.unlocked = true;
        log::info!("Admin unlocked vehicle {vehicle_id}");
        self.check_collection();
        Ok(())
    }

    /// Unlock every vehicle and every skin
    pub fn unlock_everything(&mut self) -> Result<(), EconomyError> {
        self.ensure_admin()?;
        for vehicle in &mut self.vehicles {
            vehicle.unlocked = true;
            for skin in &mut vehicle.skins {
                skin.unlocked = true;
            }
        }
        log::info!("Admin unlocked everything");
        self.check_collection();
        Ok(())
    }
}
