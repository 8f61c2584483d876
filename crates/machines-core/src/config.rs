//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration for starting a new combat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
    pub screen_width: f64,
    pub screen_height: f64,
    /// Spawns beyond this many live entities are refused.
    pub max_entities: usize,
    pub offscreen_margin: f64,
    /// Level number (1-based), feeds the difficulty curve.
    pub level: u32,
    pub lives: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            max_entities: DEFAULT_MAX_ENTITIES,
            offscreen_margin: OFFSCREEN_MARGIN,
            level: 1,
            lives: PLAYER_LIVES,
        }
    }
}
