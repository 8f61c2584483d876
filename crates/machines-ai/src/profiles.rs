//! Per-kind enemy parameters.
//!
//! Consolidates base stats, hitbox size and default movement for every
//! `EnemyKind`. Difficulty and jitter are applied later by the stat resolver.

use glam::DVec2;

use machines_core::constants::*;
use machines_core::enums::EnemyKind;
use machines_core::types::Size;

use crate::patterns::{PatternKind, PursuitTarget};

/// Base profile for an enemy kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub health: i32,
    /// Base speed (px/s).
    pub speed: f64,
    pub points: u32,
    pub size: Size,
    /// Seconds between shots, None for unarmed kinds.
    pub fire_interval: Option<f64>,
    pub contact_damage: i32,
    /// Carries a directional shield.
    pub shielded: bool,
    /// Lateral sway (px) for sine-driven kinds.
    pub sway_amplitude: f64,
    /// Angular frequency of the sway (rad/s).
    pub sway_frequency: f64,
    /// Heading change limit for pursuing kinds (rad/s).
    pub turn_rate: f64,
}

/// Get the profile for a given kind.
pub fn get_profile(kind: EnemyKind) -> EnemyProfile {
    let standard = Size::new(40.0, 40.0);
    match kind {
        EnemyKind::Basic => EnemyProfile {
            health: 20,
            speed: 60.0,
            points: 10,
            size: standard,
            fire_interval: None,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: false,
            sway_amplitude: 0.0,
            sway_frequency: 0.0,
            turn_rate: 0.0,
        },
        EnemyKind::Zigzag => EnemyProfile {
            health: 20,
            speed: 60.0,
            points: 10,
            size: standard,
            fire_interval: None,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: false,
            sway_amplitude: 60.0,
            sway_frequency: 2.0,
            turn_rate: 0.0,
        },
        EnemyKind::Shooter => EnemyProfile {
            health: 20,
            speed: 60.0,
            points: 10,
            size: standard,
            fire_interval: Some(1.5),
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: false,
            sway_amplitude: 0.0,
            sway_frequency: 0.0,
            turn_rate: 0.0,
        },
        EnemyKind::Heavy => EnemyProfile {
            health: 80,
            speed: 30.0,
            points: 40,
            size: Size::new(60.0, 60.0),
            fire_interval: None,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: false,
            // Slow rocking rather than a real zigzag.
            sway_amplitude: 8.0,
            sway_frequency: 1.0,
            turn_rate: 0.0,
        },
        EnemyKind::Dart => EnemyProfile {
            health: 15,
            speed: 120.0,
            points: 5,
            size: Size::new(30.0, 45.0),
            fire_interval: None,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: false,
            sway_amplitude: 0.0,
            sway_frequency: 0.0,
            turn_rate: 1.5,
        },
        EnemyKind::ShieldBearer => EnemyProfile {
            health: 40,
            speed: 40.0,
            points: 20,
            size: Size::new(50.0, 50.0),
            fire_interval: None,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            shielded: true,
            sway_amplitude: 20.0,
            sway_frequency: 0.5,
            turn_rate: 0.0,
        },
    }
}

/// Default movement for a kind at a resolved `speed`. `phase` desynchronises
/// sine-driven enemies spawned together.
pub fn default_pattern(kind: EnemyKind, speed: f64, phase: f64) -> PatternKind {
    let profile = get_profile(kind);
    match kind {
        EnemyKind::Basic | EnemyKind::Shooter => PatternKind::Linear {
            velocity: DVec2::new(0.0, speed),
        },
        EnemyKind::Zigzag | EnemyKind::Heavy | EnemyKind::ShieldBearer => PatternKind::Zigzag {
            speed,
            amplitude: profile.sway_amplitude,
            frequency: profile.sway_frequency,
            phase,
        },
        EnemyKind::Dart => PatternKind::Pursuit {
            target: PursuitTarget::Player,
            speed,
            max_turn_rate: profile.turn_rate,
        },
    }
}
