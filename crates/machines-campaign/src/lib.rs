//! Campaign data for Machines of God.
//!
//! Upgrade levels and costs, the stat resolver that turns upgrades and
//! difficulty into concrete numbers, the save document fields the combat
//! core consumes, and the end-of-session summary it produces.

pub mod error;
pub mod save;
pub mod stats;
pub mod summary;
pub mod upgrades;

pub use error::SaveError;
pub use stats::{resolve_enemy_stats, resolve_player_stats, EnemyStats, PlayerStats};
pub use summary::{SessionStats, SessionSummary};
pub use upgrades::UpgradeState;

#[cfg(test)]
mod tests;
