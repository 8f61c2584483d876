//! The slice of the save document the combat core reads and writes.
//!
//! Layout: `{"stars": N, "upgrades": {"hull": {"level": n, ...}, ...}}`.
//! Extra fields written by the shop (costs, descriptions) are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use machines_core::enums::UpgradeCategory;

use crate::error::SaveError;
use crate::summary::SessionSummary;
use crate::upgrades::UpgradeState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub upgrades: BTreeMap<String, SavedUpgrade>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedUpgrade {
    #[serde(default)]
    pub level: u32,
}

pub fn parse_save(json: &str) -> Result<SaveDocument, SaveError> {
    Ok(serde_json::from_str(json)?)
}

pub fn to_json(doc: &SaveDocument) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

impl SaveDocument {
    /// Extract upgrade levels. Unknown categories are skipped and
    /// out-of-range levels clamped, each with a warning.
    pub fn upgrade_state(&self) -> UpgradeState {
        let mut state = UpgradeState::new();
        for (name, saved) in &self.upgrades {
            let Some(category) = UpgradeCategory::parse(name) else {
                log::warn!("ignoring unknown upgrade category `{}` in save", name);
                continue;
            };
            let max = category.max_level();
            let level = if saved.level > max {
                log::warn!(
                    "{} level {} above maximum {}, clamping",
                    name,
                    saved.level,
                    max
                );
                max
            } else {
                saved.level
            };
            // Level is within range after the clamp above.
            let _ = state.set_level(category, level);
        }
        state
    }

    /// Extract upgrade levels, failing on the first unknown category or
    /// out-of-range level.
    pub fn checked_upgrade_state(&self) -> Result<UpgradeState, SaveError> {
        let mut state = UpgradeState::new();
        for (name, saved) in &self.upgrades {
            let category = UpgradeCategory::parse(name)
                .ok_or_else(|| SaveError::UnknownCategory(name.clone()))?;
            state.set_level(category, saved.level)?;
        }
        Ok(state)
    }

    /// Write levels back, keyed by canonical category names.
    pub fn store_upgrades(&mut self, state: &UpgradeState) {
        for (category, level) in state.iter() {
            self.upgrades
                .entry(category.as_str().to_string())
                .or_default()
                .level = level;
        }
    }

    /// Credit the stars earned in a session.
    pub fn apply_summary(&mut self, summary: &SessionSummary) {
        self.stars = self.stars.saturating_add(summary.currency_earned);
    }
}
