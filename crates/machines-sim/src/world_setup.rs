//! Entity spawn factories.
//!
//! Each factory assembles the component bundle for one kind of entity and
//! hands it to the registry. A `None` return means the registry refused the
//! spawn because the entity cap was reached.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use machines_ai::patterns::{MovementPattern, PatternKind, PursuitTarget};
use machines_ai::profiles::{default_pattern, get_profile};
use machines_campaign::{EnemyStats, PlayerStats};
use machines_core::components::*;
use machines_core::config::SimConfig;
use machines_core::constants::*;
use machines_core::enums::*;
use machines_core::types::{EntityId, Position, Size, Velocity};

use crate::registry::{EntityRegistry, SpawnAttributes};

/// Everything needed to place one enemy.
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub stats: EnemyStats,
    pub position: DVec2,
    /// Explicit movement. `None` uses the kind's default pattern.
    pub pattern: Option<PatternKind>,
    /// Formation members are positioned by the formation, not a pattern.
    pub formation: Option<FormationMember>,
}

/// Spawn the player ship near the bottom centre of the screen.
pub fn spawn_player(
    registry: &mut EntityRegistry,
    stats: &PlayerStats,
    config: &SimConfig,
) -> Option<EntityId> {
    let position = Position::new(
        config.screen_width / 2.0,
        config.screen_height - PLAYER_START_OFFSET_Y,
    );
    let attrs = SpawnAttributes::new(
        position,
        Size::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        Team::Player,
    )
    .with_health(stats.max_health);

    registry.spawn_with(
        EntityKind::Player,
        attrs,
        (PlayerShip {
            angle: 0.0,
            lives: config.lives.max(1),
            shield: stats.max_shield,
            primary_cooldown: 0.0,
            missile_cooldown: 0.0,
        },),
    )
}

/// Spawn one enemy with resolved stats.
pub fn spawn_enemy(
    registry: &mut EntityRegistry,
    rng: &mut ChaCha8Rng,
    spawn: EnemySpawn,
) -> Option<EntityId> {
    let kind = spawn.stats.kind;
    let profile = get_profile(kind);

    let pattern = match spawn.formation {
        Some(_) => None,
        None => {
            let phase = rng.gen_range(0.0..TAU);
            let kind_pattern = spawn
                .pattern
                .unwrap_or_else(|| default_pattern(kind, spawn.stats.speed, phase));
            Some(MovementPattern::new(kind_pattern))
        }
    };

    let start = pattern
        .as_ref()
        .and_then(|p| p.start_position())
        .unwrap_or(spawn.position);
    let attrs = SpawnAttributes::new(start.into(), profile.size, Team::Hostile)
        .with_velocity(Velocity::new(0.0, spawn.stats.speed))
        .with_health(spawn.stats.max_health);

    let id = registry.spawn_with(
        EntityKind::Enemy,
        attrs,
        (Enemy {
            kind,
            points: spawn.stats.points,
            contact_damage: spawn.stats.contact_damage,
        },),
    )?;

    if let Some(pattern) = pattern {
        registry.insert(id, pattern);
    }
    if let Some(member) = spawn.formation {
        registry.insert(id, member);
    }
    if let Some(interval) = spawn.stats.fire_interval {
        registry.insert(
            id,
            EnemyGun {
                interval,
                // Staggered so a group does not fire in lockstep.
                cooldown: rng.gen_range(0.0..interval),
                damage: spawn.stats.projectile_damage,
                speed: ENEMY_PROJECTILE_SPEED,
            },
        );
    }
    if profile.shielded {
        registry.insert(
            id,
            FrontShield {
                // Faces the player on arrival.
                facing: std::f64::consts::PI,
                arc: SHIELD_ARC,
                retarget_in: rng.gen_range(SHIELD_RETARGET_MIN..SHIELD_RETARGET_MAX),
            },
        );
    }
    Some(id)
}

/// Spawn one player shot. Shots move by plain velocity integration.
pub fn spawn_player_shot(
    registry: &mut EntityRegistry,
    position: DVec2,
    velocity: DVec2,
    damage: i32,
) -> Option<EntityId> {
    let attrs = SpawnAttributes::new(
        position.into(),
        Size::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        Team::Player,
    )
    .with_velocity(velocity.into());
    registry.spawn_with(
        EntityKind::Projectile,
        attrs,
        (Projectile {
            damage,
            piercing: false,
        },),
    )
}

pub fn spawn_enemy_shot(
    registry: &mut EntityRegistry,
    position: DVec2,
    velocity: DVec2,
    damage: i32,
) -> Option<EntityId> {
    let attrs = SpawnAttributes::new(
        position.into(),
        Size::new(ENEMY_PROJECTILE_WIDTH, ENEMY_PROJECTILE_HEIGHT),
        Team::Hostile,
    )
    .with_velocity(velocity.into());
    registry.spawn_with(
        EntityKind::Projectile,
        attrs,
        (Projectile {
            damage,
            piercing: false,
        },),
    )
}

/// Spawn a homing missile locked on `target`.
pub fn spawn_missile(
    registry: &mut EntityRegistry,
    position: DVec2,
    direction: DVec2,
    target: EntityId,
) -> Option<EntityId> {
    let attrs = SpawnAttributes::new(
        position.into(),
        Size::new(MISSILE_WIDTH, MISSILE_HEIGHT),
        Team::Player,
    )
    .with_velocity((direction * MISSILE_SPEED).into());
    registry.spawn_with(
        EntityKind::Missile,
        attrs,
        (
            Projectile {
                damage: MISSILE_DAMAGE,
                piercing: false,
            },
            Homing,
            MovementPattern::new(PatternKind::Pursuit {
                target: PursuitTarget::Entity(target),
                speed: MISSILE_SPEED,
                max_turn_rate: MISSILE_TURN_RATE,
            }),
        ),
    )
}

/// Spawn a falling pickup with a gentle sideways wobble.
pub fn spawn_collectible(
    registry: &mut EntityRegistry,
    rng: &mut ChaCha8Rng,
    kind: CollectibleKind,
    position: DVec2,
) -> Option<EntityId> {
    let (value, fall_speed) = match kind {
        CollectibleKind::Star => (
            rng.gen_range(STAR_VALUE_MIN..=STAR_VALUE_MAX),
            STAR_FALL_SPEED,
        ),
        CollectibleKind::HealthPack => (HEALTH_PACK_VALUE, PACK_FALL_SPEED),
        CollectibleKind::ShieldPack => (SHIELD_PACK_VALUE, PACK_FALL_SPEED),
    };
    let wobble = PatternKind::Zigzag {
        speed: fall_speed,
        amplitude: rng.gen_range(WOBBLE_AMOUNT_MIN..WOBBLE_AMOUNT_MAX),
        frequency: rng.gen_range(WOBBLE_SPEED_MIN..WOBBLE_SPEED_MAX),
        phase: rng.gen_range(0.0..TAU),
    };
    let attrs = SpawnAttributes::new(
        position.into(),
        Size::new(COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
        Team::Neutral,
    )
    .with_velocity(Velocity::new(0.0, fall_speed));
    registry.spawn_with(
        EntityKind::Collectible,
        attrs,
        (Collectible { kind, value }, MovementPattern::new(wobble)),
    )
}

/// Spawn a drifting obstacle. Obstacles with health can be shot down.
pub fn spawn_obstacle(
    registry: &mut EntityRegistry,
    position: DVec2,
    size: Size,
    speed: f64,
    health: Option<i32>,
) -> Option<EntityId> {
    let mut attrs = SpawnAttributes::new(position.into(), size, Team::Hostile)
        .with_velocity(Velocity::new(0.0, speed));
    attrs.health = health;
    registry.spawn_with(
        EntityKind::Obstacle,
        attrs,
        (
            Obstacle {
                contact_damage: OBSTACLE_CONTACT_DAMAGE,
            },
            MovementPattern::linear(DVec2::new(0.0, speed)),
        ),
    )
}

/// Spawn a burst of short-lived sparks. Stops early if the cap is hit.
pub fn spawn_particles(
    registry: &mut EntityRegistry,
    rng: &mut ChaCha8Rng,
    origin: DVec2,
    count: usize,
) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX);
        let velocity = DVec2::new(angle.cos(), angle.sin()) * speed;
        let attrs = SpawnAttributes::new(
            origin.into(),
            Size::new(PARTICLE_SIZE, PARTICLE_SIZE),
            Team::Neutral,
        )
        .with_velocity(velocity.into());
        let id = registry.spawn_with(
            EntityKind::Particle,
            attrs,
            (Lifetime {
                remaining: PARTICLE_LIFETIME,
            },),
        );
        if id.is_none() {
            break;
        }
        spawned += 1;
    }
    spawned
}

/// Roll for a pickup after a kill.
pub fn roll_drop(rng: &mut ChaCha8Rng, by_missile: bool) -> Option<CollectibleKind> {
    let chance = if by_missile {
        DROP_CHANCE_MISSILE
    } else {
        DROP_CHANCE
    };
    if !rng.gen_bool(chance) {
        return None;
    }

    let total: u32 = DROP_WEIGHTS.iter().sum();
    let mut roll = rng.gen_range(0..total);
    let kinds = [
        CollectibleKind::Star,
        CollectibleKind::HealthPack,
        CollectibleKind::ShieldPack,
    ];
    for (kind, weight) in kinds.into_iter().zip(DROP_WEIGHTS) {
        if roll < weight {
            return Some(kind);
        }
        roll -= weight;
    }
    Some(CollectibleKind::Star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use machines_campaign::stats::resolve_enemy_stats;
    use rand::SeedableRng;

    #[test]
    fn test_enemy_spawn_attaches_kind_components() {
        let mut reg = EntityRegistry::new(64);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let shooter = spawn_enemy(
            &mut reg,
            &mut rng,
            EnemySpawn {
                stats: resolve_enemy_stats(EnemyKind::Shooter, 1.0, 3),
                position: DVec2::new(100.0, -50.0),
                pattern: None,
                formation: None,
            },
        )
        .unwrap();
        assert!(reg.has::<EnemyGun>(shooter));
        assert!(reg.has::<MovementPattern>(shooter));
        assert!(!reg.has::<FrontShield>(shooter));

        let bearer = spawn_enemy(
            &mut reg,
            &mut rng,
            EnemySpawn {
                stats: resolve_enemy_stats(EnemyKind::ShieldBearer, 1.0, 4),
                position: DVec2::new(200.0, -50.0),
                pattern: None,
                formation: None,
            },
        )
        .unwrap();
        assert!(reg.has::<FrontShield>(bearer));
        assert!(!reg.has::<EnemyGun>(bearer));
    }

    #[test]
    fn test_formation_member_has_no_pattern() {
        let mut reg = EntityRegistry::new(8);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = spawn_enemy(
            &mut reg,
            &mut rng,
            EnemySpawn {
                stats: resolve_enemy_stats(EnemyKind::Basic, 1.0, 9),
                position: DVec2::new(300.0, -50.0),
                pattern: None,
                formation: Some(FormationMember {
                    formation: machines_core::types::FormationId(0),
                    slot: 0,
                }),
            },
        )
        .unwrap();
        assert!(!reg.has::<MovementPattern>(id));
        assert!(reg.has::<FormationMember>(id));
    }

    #[test]
    fn test_bezier_enemy_starts_on_curve() {
        let mut reg = EntityRegistry::new(8);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let points = [
            DVec2::new(10.0, -40.0),
            DVec2::new(300.0, 100.0),
            DVec2::new(600.0, 100.0),
            DVec2::new(900.0, 300.0),
        ];
        let id = spawn_enemy(
            &mut reg,
            &mut rng,
            EnemySpawn {
                stats: resolve_enemy_stats(EnemyKind::Basic, 1.0, 9),
                position: DVec2::new(640.0, -50.0),
                pattern: Some(PatternKind::Bezier {
                    points,
                    duration: 3.0,
                }),
                formation: None,
            },
        )
        .unwrap();
        let pos = reg.get::<Position>(id).unwrap();
        assert_eq!((pos.x, pos.y), (10.0, -40.0));
    }

    #[test]
    fn test_particles_stop_at_cap() {
        let mut reg = EntityRegistry::new(5);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(spawn_particles(&mut reg, &mut rng, DVec2::ZERO, 8), 5);
        assert_eq!(reg.take_throttled(), 1);
    }

    #[test]
    fn test_drop_rates_roughly_match_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut drops = 0;
        let mut stars = 0;
        for _ in 0..10_000 {
            if let Some(kind) = roll_drop(&mut rng, false) {
                drops += 1;
                if kind == CollectibleKind::Star {
                    stars += 1;
                }
            }
        }
        let rate = drops as f64 / 10_000.0;
        assert!((rate - 0.3).abs() < 0.03, "drop rate {rate}");
        let star_share = stars as f64 / drops as f64;
        assert!((star_share - 0.7).abs() < 0.05, "star share {star_share}");
    }
}
