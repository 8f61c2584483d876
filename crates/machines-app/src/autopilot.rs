//! Scripted pilot that plays a session from its snapshots alone.
//!
//! Lines up under the lowest enemy on screen and keeps firing. With nothing
//! to chase it drifts back and forth around the screen centre.

use machines_core::commands::InputIntent;
use machines_core::constants::{DT, SCREEN_WIDTH};
use machines_core::enums::EntityKind;
use machines_core::state::FrameSnapshot;

/// Horizontal distance (px) at which the pilot strafes at full speed.
const CHASE_RANGE: f64 = 120.0;
/// Sway while idle (rad/s).
const IDLE_SWAY_RATE: f64 = 0.8;
const IDLE_SWAY_WIDTH: f64 = 300.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    elapsed: f64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the frame after `snapshot`.
    pub fn intent(&mut self, snapshot: &FrameSnapshot) -> InputIntent {
        self.elapsed += DT;

        let Some(ship) = snapshot
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Player)
        else {
            return InputIntent::default();
        };

        let target = snapshot
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Enemy && e.y < ship.y)
            .max_by(|a, b| a.y.total_cmp(&b.y));

        let (goal_x, engaged) = match target {
            Some(enemy) => (enemy.x, true),
            None => (
                SCREEN_WIDTH / 2.0 + IDLE_SWAY_WIDTH * (IDLE_SWAY_RATE * self.elapsed).sin(),
                false,
            ),
        };

        InputIntent {
            move_x: ((goal_x - ship.x) / CHASE_RANGE).clamp(-1.0, 1.0),
            // Keep the nose pointing up.
            rotate: (-ship.rotation).clamp(-1.0, 1.0),
            fire: true,
            special: engaged,
            ..Default::default()
        }
    }
}
