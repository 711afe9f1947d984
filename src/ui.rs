//! Screen and icon tags
//!
//! The host renders whatever these resolve to; every screen must provide an
//! icon and a label, which the exhaustive matches enforce.

use serde::{Deserialize, Serialize};

/// Icon tag (Lucide icon names on the web host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Car,
    Building,
    Trophy,
    Award,
    Settings,
    Zap,
    Crown,
    Wrench,
    Star,
    Gauge,
    Coins,
    Gem,
    Palette,
    ListChecks,
    Shield,
}

impl Icon {
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Car => "Car",
            Icon::Building => "Building",
            Icon::Trophy => "Trophy",
            Icon::Award => "Award",
            Icon::Settings => "Settings",
            Icon::Zap => "Zap",
            Icon::Crown => "Crown",
            Icon::Wrench => "Wrench",
            Icon::Star => "Star",
            Icon::Gauge => "Gauge",
            Icon::Coins => "Coins",
            Icon::Gem => "Gem",
            Icon::Palette => "Palette",
            Icon::ListChecks => "ListChecks",
            Icon::Shield => "Shield",
        }
    }
}

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Garage,
    City,
    Leaderboard,
    Achievements,
    Tasks,
    Settings,
    Admin,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Home,
        Screen::Garage,
        Screen::City,
        Screen::Leaderboard,
        Screen::Achievements,
        Screen::Tasks,
        Screen::Settings,
        Screen::Admin,
    ];

    pub fn icon(&self) -> Icon {
        match self {
            Screen::Home => Icon::Car,
            Screen::Garage => Icon::Car,
            Screen::City => Icon::Building,
            Screen::Leaderboard => Icon::Trophy,
            Screen::Achievements => Icon::Award,
            Screen::Tasks => Icon::ListChecks,
            Screen::Settings => Icon::Settings,
            Screen::Admin => Icon::Shield,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Garage => "Garage",
            Screen::City => "City",
            Screen::Leaderboard => "Leaderboard",
            Screen::Achievements => "Achievements",
            Screen::Tasks => "Daily Tasks",
            Screen::Settings => "Settings",
            Screen::Admin => "Admin",
        }
    }

    /// DOM id of the section element on the web host
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Home => "screen-home",
            Screen::Garage => "screen-garage",
            Screen::City => "screen-city",
            Screen::Leaderboard => "screen-leaderboard",
            Screen::Achievements => "screen-achievements",
            Screen::Tasks => "screen-tasks",
            Screen::Settings => "screen-settings",
            Screen::Admin => "screen-admin",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Screen> {
        Screen::ALL.into_iter().find(|s| s.element_id() == id)
    }

    /// Whether the drive timers run on this screen
    pub fn is_driving(&self) -> bool {
        matches!(self, Screen::City)
    }

    /// Buttons on the home menu; admin only when unlocked
    pub fn menu(admin_mode: bool) -> Vec<Screen> {
        let mut screens = vec![
            Screen::Garage,
            Screen::City,
            Screen::Leaderboard,
            Screen::Achievements,
            Screen::Tasks,
            Screen::Settings,
        ];
        if admin_mode {
            screens.push(Screen::Admin);
        }
        screens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_element_id(screen.element_id()), Some(screen));
        }
        assert_eq!(Screen::from_element_id("screen-pit"), None);
    }

    #[test]
    fn test_menu_hides_admin() {
        assert!(!Screen::menu(false).contains(&Screen::Admin));
        assert_eq!(Screen::menu(true).last(), Some(&Screen::Admin));
        assert!(!Screen::menu(true).contains(&Screen::Home));
    }

    #[test]
    fn test_only_city_drives() {
        assert!(Screen::City.is_driving());
        assert!(!Screen::Garage.is_driving());
    }

    #[test]
    fn test_labels_and_icons() {
        assert_eq!(Screen::City.label(), "City");
        assert_eq!(Screen::Leaderboard.icon().name(), "Trophy");
        assert_eq!(Screen::Tasks.element_id(), "screen-tasks");
    }
}
