//! Vehicles, upgrade stats and cosmetic skins
//!
//! Static catalog data plus the per-vehicle helpers the economy builds on.
//! Current stats never exceed their max; the stock skin is always owned.

use serde::{Deserialize, Serialize};

use crate::consts::{UPGRADE_COST_PREMIUM, UPGRADE_COST_STANDARD, UPGRADE_STEP};

/// Skin every vehicle owns from the start
pub const DEFAULT_SKIN: &str = "stock";

/// Upgradable vehicle stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Speed,
    Handling,
    Acceleration,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Speed, StatKind::Handling, StatKind::Acceleration];

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Speed => "Speed",
            StatKind::Handling => "Handling",
            StatKind::Acceleration => "Acceleration",
        }
    }
}

/// Vehicle tier (drives upgrade and skin pricing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Standard,
    Premium,
}

/// Paint descriptor for a skin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Solid(String),
    Gradient { from: String, to: String },
}

impl Paint {
    fn solid(color: &str) -> Self {
        Paint::Solid(color.to_string())
    }

    fn gradient(from: &str, to: &str) -> Self {
        Paint::Gradient {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// CSS background value for the host
    pub fn css(&self) -> String {
        match self {
            Paint::Solid(color) => color.clone(),
            Paint::Gradient { from, to } => format!("linear-gradient(135deg, {from}, {to})"),
        }
    }
}

/// A cosmetic skin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skin {
    pub id: String,
    pub name: String,
    pub paint: Paint,
    pub price: u64,
    pub unlocked: bool,
}

/// A drivable vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub speed: u32,
    pub handling: u32,
    pub acceleration: u32,
    pub max_speed: u32,
    pub max_handling: u32,
    pub max_acceleration: u32,
    pub price: u64,
    pub unlocked: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub skins: Vec<Skin>,
    #[serde(default)]
    pub selected_skin: String,
}

impl Vehicle {
    pub fn stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Speed => self.speed,
            StatKind::Handling => self.handling,
            StatKind::Acceleration => self.acceleration,
        }
    }

    pub fn max_stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Speed => self.max_speed,
            StatKind::Handling => self.max_handling,
            StatKind::Acceleration => self.max_acceleration,
        }
    }

    fn stat_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Speed => &mut self.speed,
            StatKind::Handling => &mut self.handling,
            StatKind::Acceleration => &mut self.acceleration,
        }
    }

    pub fn can_upgrade(&self, kind: StatKind) -> bool {
        self.stat(kind) < self.max_stat(kind)
    }

    /// All three stats at their max
    pub fn is_maxed(&self) -> bool {
        StatKind::ALL.iter().all(|&kind| !self.can_upgrade(kind))
    }

    pub fn upgrade_cost(&self) -> u64 {
        match self.category {
            Category::Standard => UPGRADE_COST_STANDARD,
            Category::Premium => UPGRADE_COST_PREMIUM,
        }
    }

    /// Raise a stat by one step, clamped to its max. Returns the new value.
    pub fn apply_upgrade(&mut self, kind: StatKind) -> u32 {
        let max = self.max_stat(kind);
        let stat = self.stat_mut(kind);
        *stat = (*stat + UPGRADE_STEP).min(max);
        *stat
    }

    pub fn skin(&self, skin_id: &str) -> Option<&Skin> {
        self.skins.iter().find(|s| s.id == skin_id)
    }

    pub fn skin_mut(&mut self, skin_id: &str) -> Option<&mut Skin> {
        self.skins.iter_mut().find(|s| s.id == skin_id)
    }

    pub fn owns_all_skins(&self) -> bool {
        !self.skins.is_empty() && self.skins.iter().all(|s| s.unlocked)
    }

    /// Currently selected skin (falls back to stock)
    pub fn current_skin(&self) -> Option<&Skin> {
        self.skin(&self.selected_skin)
            .or_else(|| self.skin(DEFAULT_SKIN))
    }

    /// Restore invariants on data that came from outside (old or hand-edited saves)
    pub fn repair(&mut self) {
        for kind in StatKind::ALL {
            let max = self.max_stat(kind);
            let stat = self.stat_mut(kind);
            *stat = (*stat).min(max);
        }

        let catalog_skins = skin_set(self.category);
        for skin in catalog_skins {
            if self.skin(&skin.id).is_none() {
                self.skins.push(skin);
            }
        }
        if let Some(stock) = self.skin_mut(DEFAULT_SKIN) {
            stock.unlocked = true;
        }

        let selected_owned = self
            .skin(&self.selected_skin)
            .is_some_and(|s| s.unlocked);
        if !selected_owned {
            self.selected_skin = DEFAULT_SKIN.to_string();
        }
    }
}

/// Skins offered for every vehicle; premium vehicles pay double
fn skin_set(category: Category) -> Vec<Skin> {
    let factor = match category {
        Category::Standard => 1,
        Category::Premium => 2,
    };
    let skin = |id: &str, name: &str, paint: Paint, price: u64| Skin {
        id: id.to_string(),
        name: name.to_string(),
        paint,
        price: price * factor,
        unlocked: id == DEFAULT_SKIN,
    };
    vec![
        skin(DEFAULT_SKIN, "Stock", Paint::solid("#9ca3af"), 0),
        skin("neon_cyan", "Neon Cyan", Paint::solid("#00f0ff"), 1000),
        skin("neon_magenta", "Neon Magenta", Paint::solid("#ff00e5"), 1500),
        skin("sunset", "Sunset", Paint::gradient("#ff6b00", "#ff0080"), 2500),
        skin("chrome", "Chrome", Paint::gradient("#e5e7eb", "#6b7280"), 4000),
    ]
}

fn vehicle(
    id: &str,
    name: &str,
    stats: (u32, u32, u32),
    max: u32,
    price: u64,
    unlocked: bool,
    category: Category,
) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: name.to_string(),
        speed: stats.0,
        handling: stats.1,
        acceleration: stats.2,
        max_speed: max,
        max_handling: max,
        max_acceleration: max,
        price,
        unlocked,
        category,
        skins: skin_set(category),
        selected_skin: DEFAULT_SKIN.to_string(),
    }
}

/// The full vehicle catalog for a fresh profile
pub fn default_vehicles() -> Vec<Vehicle> {
    use Category::*;
    vec![
        vehicle("uaz", "UAZ Hunter", (45, 30, 40), 100, 0, true, Standard),
        vehicle("lada", "Lada 2107", (55, 50, 60), 100, 2000, true, Standard),
        vehicle("zhiguli", "Zhiguli 2106", (60, 55, 65), 100, 3500, false, Standard),
        vehicle("niva", "Lada Niva", (50, 70, 55), 100, 4500, false, Standard),
        vehicle("vaz", "VAZ 2114", (75, 65, 80), 100, 6000, false, Standard),
        vehicle("volga", "Volga GT", (100, 80, 90), 150, 15000, false, Premium),
        vehicle("chaika", "Chaika Neon", (120, 90, 100), 160, 25000, false, Premium),
    ]
}

/// Merge saved vehicles over the catalog by id.
///
/// Catalog order wins; vehicles the save does not know about are added fresh,
/// vehicles the catalog no longer lists are kept at the end.
pub fn merge_with_catalog(saved: Vec<Vehicle>) -> Vec<Vehicle> {
    let mut saved = saved;
    let mut merged: Vec<Vehicle> = default_vehicles()
        .into_iter()
        .map(|fresh| match saved.iter().position(|v| v.id == fresh.id) {
            Some(i) => saved.remove(i),
            None => fresh,
        })
        .collect();
    merged.extend(saved);
    for vehicle in &mut merged {
        vehicle.repair();
    }
    merged
}
