//! Achievement catalog and bookkeeping
//!
//! Completion only ever goes false -> true. A full profile reset is the
//! one way back.

use serde::{Deserialize, Serialize};

use crate::ui::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstDrift,
    Collector,
    DriftKing,
    Tuner,
    Legend,
    SpeedDemon,
    Millionaire,
    PremiumOwner,
    Stylist,
}

impl AchievementId {
    pub const ALL: [AchievementId; 9] = [
        AchievementId::FirstDrift,
        AchievementId::Collector,
        AchievementId::DriftKing,
        AchievementId::Tuner,
        AchievementId::Legend,
        AchievementId::SpeedDemon,
        AchievementId::Millionaire,
        AchievementId::PremiumOwner,
        AchievementId::Stylist,
    ];

    fn info(&self) -> (&'static str, &'static str, Icon) {
        match self {
            AchievementId::FirstDrift => ("First Drift", "Pull off your first drift", Icon::Zap),
            AchievementId::Collector => ("Collector", "Unlock every vehicle", Icon::Trophy),
            AchievementId::DriftKing => (
                "Drift King",
                "Score 10000 points in a single drift",
                Icon::Crown,
            ),
            AchievementId::Tuner => ("Tuner", "Max out every stat of a vehicle", Icon::Wrench),
            AchievementId::Legend => ("Legend", "Take first place on the leaderboard", Icon::Star),
            AchievementId::SpeedDemon => ("Speed Demon", "Hit a speed of 100", Icon::Gauge),
            AchievementId::Millionaire => (
                "Millionaire",
                "Earn 1,000,000 credits in total",
                Icon::Coins,
            ),
            AchievementId::PremiumOwner => ("High Roller", "Own a premium vehicle", Icon::Gem),
            AchievementId::Stylist => ("Stylist", "Own every skin for one vehicle", Icon::Palette),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub icon: Icon,
}

impl Achievement {
    pub fn new(id: AchievementId) -> Self {
        let (title, description, icon) = id.info();
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            icon,
        }
    }
}

/// Fresh (all incomplete) achievement list in display order
pub fn default_achievements() -> Vec<Achievement> {
    AchievementId::ALL.iter().map(|&id| Achievement::new(id)).collect()
}

/// Carry saved completion flags onto the current catalog
pub fn merge_with_catalog(saved: &[Achievement]) -> Vec<Achievement> {
    let mut merged = default_achievements();
    for achievement in &mut merged {
        achievement.completed = saved
            .iter()
            .any(|s| s.id == achievement.id && s.completed);
    }
    merged
}

/// Mark an achievement complete. Returns true only on the false -> true edge.
pub fn complete(list: &mut [Achievement], id: AchievementId) -> bool {
    match list.iter_mut().find(|a| a.id == id) {
        Some(a) if !a.completed => {
            a.completed = true;
            log::info!("Achievement unlocked: {}", a.title);
            true
        }
        _ => false,
    }
}

pub fn is_complete(list: &[Achievement], id: AchievementId) -> bool {
    list.iter().any(|a| a.id == id && a.completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_is_one_way() {
        let mut list = default_achievements();
        assert!(complete(&mut list, AchievementId::FirstDrift));
        assert!(!complete(&mut list, AchievementId::FirstDrift));
        assert!(is_complete(&list, AchievementId::FirstDrift));
        assert!(!is_complete(&list, AchievementId::Legend));
    }

    #[test]
    fn test_merge_keeps_completion() {
        let mut saved = default_achievements();
        complete(&mut saved, AchievementId::Tuner);
        saved.retain(|a| a.id != AchievementId::Stylist);
        let merged = merge_with_catalog(&saved);
        assert_eq!(merged.len(), AchievementId::ALL.len());
        assert!(is_complete(&merged, AchievementId::Tuner));
        assert!(!is_complete(&merged, AchievementId::Stylist));
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&AchievementId::DriftKing).unwrap();
        assert_eq!(json, "\"drift_king\"");
    }
}
