use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Lifetime aggregate of finished rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStatistics {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Number of guesses a win took -> how many wins took that many.
    pub guess_distribution: BTreeMap<u32, u32>,
}

impl GameStatistics {
    pub fn record_outcome(&mut self, won: bool, guess_count: u32) {
        self.games_played += 1;

        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
            *self.guess_distribution.entry(guess_count).or_insert(0) += 1;
        } else {
            self.current_streak = 0;
        }
    }

    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.games_won) / f64::from(self.games_played) * 100.0
    }

    pub fn wins_with(&self, guess_count: u32) -> u32 {
        self.guess_distribution
            .get(&guess_count)
            .copied()
            .unwrap_or(0)
    }
}
