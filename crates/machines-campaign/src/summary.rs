//! Session counters and the end-of-session summary handed to the save system.

use serde::{Deserialize, Serialize};

/// Raw counters accumulated during a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub enemies_killed: u32,
    pub enemies_escaped: u32,
    pub stars_collected: u32,
    pub stars_missed: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    /// Star value picked up this session.
    pub currency: u32,
    pub score: u64,
}

impl SessionStats {
    /// Hits per shot, as a percentage.
    pub fn accuracy(&self) -> f64 {
        percent(self.shots_hit, self.shots_fired)
    }

    /// Kills per enemy that left play, as a percentage.
    pub fn kill_rate(&self) -> f64 {
        percent(
            self.enemies_killed,
            self.enemies_killed + self.enemies_escaped,
        )
    }

    /// Stars picked up per star dropped, as a percentage.
    pub fn collection_rate(&self) -> f64 {
        percent(
            self.stars_collected,
            self.stars_collected + self.stars_missed,
        )
    }

    /// Level score multiplier: 1 + weighted performance / 100.
    pub fn bonus_multiplier(&self) -> f64 {
        1.0 + (self.kill_rate() * 0.5 + self.collection_rate() * 0.3 + self.accuracy() * 0.2)
            / 100.0
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// End-of-session result for the save collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub level: u32,
    pub completed: bool,
    pub currency_earned: u32,
    pub score: u64,
    pub level_score: u64,
    pub bonus_multiplier: f64,
    pub accuracy: f64,
    pub kill_rate: f64,
    pub collection_rate: f64,
    pub stats: SessionStats,
}

impl SessionSummary {
    pub fn from_stats(level: u32, completed: bool, stats: &SessionStats) -> Self {
        let bonus_multiplier = stats.bonus_multiplier();
        Self {
            level,
            completed,
            currency_earned: stats.currency,
            score: stats.score,
            level_score: (stats.score as f64 * bonus_multiplier).floor() as u64,
            bonus_multiplier,
            accuracy: stats.accuracy(),
            kill_rate: stats.kill_rate(),
            collection_rate: stats.collection_rate(),
            stats: stats.clone(),
        }
    }
}
