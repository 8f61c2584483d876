use thiserror::Error;

use machines_core::enums::UpgradeCategory;

/// Failures reading or changing persisted campaign data.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown upgrade category `{0}`")]
    UnknownCategory(String),
    #[error("{category:?} level {level} exceeds maximum {max}")]
    LevelOutOfRange {
        category: UpgradeCategory,
        level: u32,
        max: u32,
    },
    #[error("{0:?} is already at its maximum level")]
    AtMaxLevel(UpgradeCategory),
    #[error("insufficient stars: have {have}, need {need}")]
    InsufficientStars { have: u32, need: u32 },
}
