//! Frame snapshot: everything the render and HUD collaborators see each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EntityId, SimTime};

/// Complete visible state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub entities: Vec<RenderEntity>,
    pub events: Vec<GameEvent>,
    pub player: Option<PlayerView>,
    pub wave: WaveView,
}

/// One drawable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    /// Radians, 0 = up, clockwise positive.
    pub rotation: f64,
    pub variant: VisualVariant,
}

/// Sprite selector for the render collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "of")]
pub enum VisualVariant {
    Ship,
    Enemy(EnemyKind),
    PlayerShot,
    EnemyShot,
    Missile,
    Pickup(CollectibleKind),
    Rock,
    Spark,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub health: i32,
    pub max_health: i32,
    pub shield: f64,
    pub max_shield: f64,
    pub lives: u32,
    pub score: u64,
    pub currency: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// Index of the wave being played (equals `total` once the level is done).
    pub index: usize,
    pub total: usize,
    /// Wave-local clock (s).
    pub clock: f64,
    pub live_spawns: usize,
}
