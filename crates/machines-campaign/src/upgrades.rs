use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use machines_core::enums::UpgradeCategory;

use crate::error::SaveError;

/// Cost of the next level: floor(base * multiplier^current_level).
/// Returns None if already at max level.
pub fn upgrade_cost(category: UpgradeCategory, current_level: u32) -> Option<u32> {
    if current_level >= category.max_level() {
        return None;
    }
    let (base, mult) = match category {
        UpgradeCategory::Hull => (50.0, 1.5),
        UpgradeCategory::Engine | UpgradeCategory::Thruster => (30.0, 1.6),
        UpgradeCategory::Primary => (60.0, 1.8),
        UpgradeCategory::Shield => (100.0, 2.0),
        UpgradeCategory::Secondary => (150.0, 2.0),
        UpgradeCategory::Magnet => (80.0, 1.8),
    };
    let cost: f64 = base * f64::powi(mult, current_level as i32);
    Some(cost.floor() as u32)
}

/// Upgrade levels per category. Read-only to a running combat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    levels: BTreeMap<UpgradeCategory, u32>,
}

impl UpgradeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style level setter for tests and tooling.
    pub fn with_level(mut self, category: UpgradeCategory, level: u32) -> Result<Self, SaveError> {
        self.set_level(category, level)?;
        Ok(self)
    }

    pub fn level(&self, category: UpgradeCategory) -> u32 {
        self.levels.get(&category).copied().unwrap_or(0)
    }

    pub fn set_level(&mut self, category: UpgradeCategory, level: u32) -> Result<(), SaveError> {
        let max = category.max_level();
        if level > max {
            return Err(SaveError::LevelOutOfRange {
                category,
                level,
                max,
            });
        }
        self.levels.insert(category, level);
        Ok(())
    }

    /// Buy one level of `category`. Returns the stars spent.
    pub fn purchase(&mut self, category: UpgradeCategory, stars: u32) -> Result<u32, SaveError> {
        let current = self.level(category);
        let cost = upgrade_cost(category, current).ok_or(SaveError::AtMaxLevel(category))?;
        if stars < cost {
            return Err(SaveError::InsufficientStars {
                have: stars,
                need: cost,
            });
        }
        self.levels.insert(category, current + 1);
        Ok(cost)
    }

    /// All categories with their level, including those never upgraded.
    pub fn iter(&self) -> impl Iterator<Item = (UpgradeCategory, u32)> + '_ {
        UpgradeCategory::ALL.into_iter().map(|c| (c, self.level(c)))
    }
}
