//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, FormationId};

/// Hit points. Absent on entities that cannot be damaged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Damage carried by a projectile or missile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: i32,
    /// Piercing shots survive hits and may strike several targets.
    pub piercing: bool,
}

/// Targets already struck by a piercing projectile. Each is hit once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiercedTargets {
    pub hits: Vec<EntityId>,
}

/// Player ship state that is not covered by Health.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Facing angle (rad, 0 = up, clockwise positive).
    pub angle: f64,
    pub lives: u32,
    pub shield: f64,
    /// Seconds until the primary weapon may fire again.
    pub primary_cooldown: f64,
    /// Seconds until the next missile salvo.
    pub missile_cooldown: f64,
}

/// Enemy identity and reward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Score awarded when destroyed.
    pub points: u32,
    /// Damage dealt to the player on contact.
    pub contact_damage: i32,
}

/// Timed downward gun carried by shooter enemies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyGun {
    /// Seconds between shots.
    pub interval: f64,
    /// Seconds until the next shot.
    pub cooldown: f64,
    pub damage: i32,
    pub speed: f64,
}

/// Directional shield carried by shield bearers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrontShield {
    /// Direction the shield faces (rad, 0 = up, clockwise positive).
    pub facing: f64,
    /// Full width of the protected arc (rad).
    pub arc: f64,
    /// Seconds until the facing changes.
    pub retarget_in: f64,
}

/// Pickup payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub value: u32,
}

/// Hostile scenery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub contact_damage: i32,
}

/// Remaining life of a timed entity (seconds).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f64,
}

/// Binds an enemy to a formation slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationMember {
    pub formation: FormationId,
    pub slot: usize,
}

/// Marks a projectile fired by the missile launcher (double score on kill).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Homing;
