//! Per-frame input intent and level-control commands.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::FormationId;

/// What the player wants to do this frame. Axes are clamped to [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Screen-space strafe (-1 left, +1 right).
    pub move_x: f64,
    /// Screen-space climb (-1 up, +1 down).
    pub move_y: f64,
    /// Ship rotation (-1 counter-clockwise, +1 clockwise).
    pub rotate: f64,
    pub fire: bool,
    /// Secondary weapon (missile salvo).
    pub special: bool,
}

/// Level-control actions from the external state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    Pause,
    Resume,
    /// Despawn everything the current wave spawned and mark it complete.
    ClearWave,
    /// Despawn every member of one formation.
    ClearFormation { id: FormationId },
}
