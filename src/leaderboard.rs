//! Drift leaderboard
//!
//! A fixed field of rivals plus the player's best single drift.

use serde::{Deserialize, Serialize};

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Vehicle display name
    pub vehicle: String,
    /// True for the local player's entry
    #[serde(default)]
    pub is_player: bool,
}

/// Leaderboard sorted by score, descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// The rival field shipped with the game
    pub fn rivals() -> Self {
        let rival = |name: &str, score: u64, vehicle: &str| LeaderboardEntry {
            name: name.to_string(),
            score,
            vehicle: vehicle.to_string(),
            is_player: false,
        };
        Self {
            entries: vec![
                rival("DRIFT_KING_77", 25680, "VAZ 2114"),
                rival("NeonRacer", 23450, "Zhiguli 2106"),
                rival("CyberDriver", 21230, "Lada Niva"),
                rival("RussianDrift", 19880, "Lada 2107"),
                rival("MoscowNights", 18560, "VAZ 2114"),
            ],
        }
    }

    /// Rivals plus the player's best drift. A player without a drift is left off.
    pub fn with_player(name: &str, best_score: u64, vehicle: &str) -> Self {
        let mut board = Self::rivals();
        if best_score > 0 {
            board.insert(LeaderboardEntry {
                name: name.to_string(),
                score: best_score,
                vehicle: vehicle.to_string(),
                is_player: true,
            });
        }
        board
    }

    /// Ties rank below existing entries
    fn insert(&mut self, entry: LeaderboardEntry) {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
    }

    /// Rank of the player's entry (1-indexed)
    pub fn player_rank(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_player).map(|i| i + 1)
    }
}
