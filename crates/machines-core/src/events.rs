//! Discrete gameplay events emitted by the simulation each frame.
//!
//! Scoring, UI and audio collaborators consume these from the frame snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// An enemy's health reached zero.
    EnemyKilled {
        id: EntityId,
        kind: EnemyKind,
        points: u32,
        by_missile: bool,
    },
    /// The player took damage. `amount` is the incoming damage before the
    /// shield absorbed `absorbed` of it.
    PlayerDamaged { amount: i32, absorbed: i32 },
    /// The player lost a life and respawned.
    PlayerLifeLost { lives_left: u32 },
    /// The player lost the last life.
    PlayerDied,
    CollectiblePicked { kind: CollectibleKind, value: u32 },
    /// A wave finished: every directive fired and every spawn is gone.
    LevelWaveComplete { wave_index: usize, waves_total: usize },
    /// Spawn requests refused this frame because the entity cap was reached.
    SpawnThrottled { dropped: u32 },
}
