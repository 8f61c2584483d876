//! Stat resolver: upgrade levels and difficulty into concrete numbers.
//!
//! Both resolvers are pure. Enemy jitter comes from an explicit seed so the
//! same inputs always produce the same stats.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use machines_ai::profiles::get_profile;
use machines_core::constants::*;
use machines_core::enums::{EnemyKind, UpgradeCategory, WeaponPattern};

use crate::upgrades::UpgradeState;

const HULL_HEALTH: [i32; 6] = [50, 75, 100, 125, 150, 200];
const SPEED_TABLE: [f64; 6] = [250.0, 300.0, 350.0, 400.0, 450.0, 500.0];
const PRIMARY_PATTERNS: [WeaponPattern; 6] = [
    WeaponPattern::SingleSlow,
    WeaponPattern::SingleMedium,
    WeaponPattern::Double,
    WeaponPattern::Triple,
    WeaponPattern::Quad,
    WeaponPattern::Five,
];
const SHIELD_CAPACITY: [f64; 4] = [0.0, 50.0, 75.0, 100.0];
const SHIELD_RECHARGE: [f64; 4] = [0.0, 2.0, 5.0, 10.0];
const MISSILES_PER_SALVO: [u32; 4] = [0, 1, 2, 2];
const MISSILE_COOLDOWN: [f64; 4] = [0.0, 3.0, 3.0, 2.0];
const MAGNET_RADIUS: [f64; 4] = [0.0, 50.0, 100.0, 150.0];

/// Concrete player numbers for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health: i32,
    /// Up/down speed (px/s).
    pub vertical_speed: f64,
    /// Left/right speed (px/s).
    pub lateral_speed: f64,
    pub weapon_pattern: WeaponPattern,
    pub primary_damage: i32,
    pub primary_cooldown: f64,
    pub projectile_speed: f64,
    pub max_shield: f64,
    /// Shield points regained per second.
    pub shield_recharge: f64,
    pub missiles_per_salvo: u32,
    pub missile_cooldown: f64,
    pub magnet_radius: f64,
}

/// Concrete numbers for one enemy instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub kind: EnemyKind,
    pub max_health: i32,
    pub speed: f64,
    pub points: u32,
    /// Seconds between shots for armed kinds.
    pub fire_interval: Option<f64>,
    pub contact_damage: i32,
    pub projectile_damage: i32,
}

fn lookup<T: Copy>(table: &[T], level: u32) -> T {
    let idx = (level as usize).min(table.len() - 1);
    table[idx]
}

/// Map upgrade levels onto player stats. Levels above a table's end read
/// the last entry.
pub fn resolve_player_stats(upgrades: &UpgradeState) -> PlayerStats {
    let primary = upgrades.level(UpgradeCategory::Primary);
    let shield = upgrades.level(UpgradeCategory::Shield);
    let secondary = upgrades.level(UpgradeCategory::Secondary);
    let weapon_pattern = lookup(&PRIMARY_PATTERNS, primary);

    PlayerStats {
        max_health: lookup(&HULL_HEALTH, upgrades.level(UpgradeCategory::Hull)),
        vertical_speed: lookup(&SPEED_TABLE, upgrades.level(UpgradeCategory::Engine)),
        lateral_speed: lookup(&SPEED_TABLE, upgrades.level(UpgradeCategory::Thruster)),
        weapon_pattern,
        primary_damage: PRIMARY_DAMAGE,
        primary_cooldown: PRIMARY_COOLDOWN,
        projectile_speed: match weapon_pattern {
            WeaponPattern::SingleMedium => PROJECTILE_SPEED_MEDIUM,
            _ => PROJECTILE_SPEED,
        },
        max_shield: lookup(&SHIELD_CAPACITY, shield),
        shield_recharge: lookup(&SHIELD_RECHARGE, shield),
        missiles_per_salvo: lookup(&MISSILES_PER_SALVO, secondary),
        missile_cooldown: lookup(&MISSILE_COOLDOWN, secondary),
        magnet_radius: lookup(&MAGNET_RADIUS, upgrades.level(UpgradeCategory::Magnet)),
    }
}

/// Monotonic difficulty multiplier for a level at `elapsed_secs` of level time.
pub fn difficulty_curve(level: u32, elapsed_secs: f64) -> f64 {
    let level_factor = 1.0 + DIFFICULTY_PER_LEVEL * level.saturating_sub(1) as f64;
    let time_factor = 1.0 + DIFFICULTY_PER_MINUTE * elapsed_secs.max(0.0) / 60.0;
    level_factor * time_factor
}

/// Playable length of a level (s).
pub fn level_duration(level: u32) -> f64 {
    LEVEL_BASE_DURATION + LEVEL_DURATION_PER_LEVEL * level.saturating_sub(1) as f64
}

/// Resolve one enemy's stats. `difficulty` is the already-composed
/// multiplier (directive multiplier times the difficulty curve); the
/// jitter variance is drawn from `seed` in [1 - ENEMY_STAT_JITTER, 1 + ENEMY_STAT_JITTER].
pub fn resolve_enemy_stats(kind: EnemyKind, difficulty: f64, seed: u64) -> EnemyStats {
    let profile = get_profile(kind);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let variance: f64 = rng.gen_range(1.0 - ENEMY_STAT_JITTER..=1.0 + ENEMY_STAT_JITTER);

    let difficulty = if difficulty.is_finite() && difficulty > 0.0 {
        difficulty
    } else {
        debug_assert!(false, "non-positive difficulty {difficulty}");
        1.0
    };
    let scale = difficulty * variance;

    EnemyStats {
        kind,
        max_health: ((profile.health as f64 * scale).round() as i32).max(1),
        speed: profile.speed * scale,
        points: (profile.points as f64 * scale).round() as u32,
        fire_interval: profile.fire_interval.map(|i| i / difficulty),
        contact_damage: profile.contact_damage,
        projectile_damage: ENEMY_PROJECTILE_DAMAGE,
    }
}
