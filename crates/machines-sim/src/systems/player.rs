//! Player ship: steering, shield recharge, weapons and damage intake.

use glam::DVec2;

use machines_campaign::{PlayerStats, SessionStats};
use machines_core::commands::InputIntent;
use machines_core::components::{Health, PlayerShip};
use machines_core::config::SimConfig;
use machines_core::constants::*;
use machines_core::enums::EntityKind;
use machines_core::events::GameEvent;
use machines_core::types::{facing_vector, EntityId, Position, Size, Velocity};

use crate::registry::{EntityRegistry, Filter};
use crate::weapons;
use crate::world_setup;

/// Apply one frame of input to the player ship.
pub fn run(
    registry: &mut EntityRegistry,
    player: EntityId,
    stats: &PlayerStats,
    input: &InputIntent,
    config: &SimConfig,
    session: &mut SessionStats,
    dt: f64,
) {
    let (Some(mut ship), Some(pos), Some(size)) = (
        registry.get::<PlayerShip>(player),
        registry.get::<Position>(player),
        registry.get::<Size>(player),
    ) else {
        return;
    };

    let rotate = input.rotate.clamp(-1.0, 1.0);
    ship.angle = (ship.angle + rotate * PLAYER_ROTATION_SPEED * dt)
        .clamp(-PLAYER_MAX_ROTATION, PLAYER_MAX_ROTATION);

    let velocity = Velocity::new(
        input.move_x.clamp(-1.0, 1.0) * stats.lateral_speed,
        input.move_y.clamp(-1.0, 1.0) * stats.vertical_speed,
    );
    let half_w = size.w / 2.0;
    let half_h = size.h / 2.0;
    let moved = Position::new(
        (pos.x + velocity.x * dt).clamp(half_w, (config.screen_width - half_w).max(half_w)),
        (pos.y + velocity.y * dt).clamp(half_h, (config.screen_height - half_h).max(half_h)),
    );

    ship.shield = (ship.shield + stats.shield_recharge * dt).min(stats.max_shield);
    ship.primary_cooldown = (ship.primary_cooldown - dt).max(0.0);
    ship.missile_cooldown = (ship.missile_cooldown - dt).max(0.0);

    if input.fire && ship.primary_cooldown <= 0.0 {
        let shots = weapons::volley(
            stats.weapon_pattern,
            moved.to_vec(),
            ship.angle,
            stats.projectile_speed,
        );
        for shot in shots {
            let spawned = world_setup::spawn_player_shot(
                registry,
                shot.position,
                shot.velocity,
                stats.primary_damage,
            );
            if spawned.is_some() {
                session.shots_fired += 1;
            }
        }
        ship.primary_cooldown = stats.primary_cooldown;
    }

    if input.special && stats.missiles_per_salvo > 0 && ship.missile_cooldown <= 0.0 {
        if let Some(target) = nearest_enemy(registry, moved) {
            let launched = fire_salvo(registry, moved.to_vec(), ship.angle, stats, target);
            session.shots_fired += launched;
            ship.missile_cooldown = stats.missile_cooldown;
        }
    }

    registry.update::<PlayerShip, _>(player, |s| *s = ship);
    registry.update::<Position, _>(player, |p| *p = moved);
    registry.update::<Velocity, _>(player, |v| *v = velocity);
}

fn nearest_enemy(registry: &EntityRegistry, from: Position) -> Option<EntityId> {
    registry
        .iter(Filter::Kind(EntityKind::Enemy))
        .filter_map(|id| registry.get::<Position>(id).map(|p| (id, p.distance_to(&from))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn fire_salvo(
    registry: &mut EntityRegistry,
    origin: DVec2,
    angle: f64,
    stats: &PlayerStats,
    target: EntityId,
) -> u32 {
    let facing = facing_vector(angle);
    let nose = origin + facing * (PLAYER_HEIGHT / 2.0);
    let side = DVec2::new(angle.cos(), angle.sin()) * MISSILE_PAIR_OFFSET;
    let launch_points = match stats.missiles_per_salvo {
        1 => vec![nose],
        _ => vec![nose - side, nose + side],
    };

    launch_points
        .into_iter()
        .filter_map(|p| world_setup::spawn_missile(registry, p, facing, target))
        .count() as u32
}

/// Route `amount` damage to the player: the shield soaks what it can and
/// the rest comes off health. Reaching zero health costs a life; with lives
/// to spare the ship is restored in place, otherwise it is removed.
pub fn take_damage(
    registry: &mut EntityRegistry,
    player: EntityId,
    stats: &PlayerStats,
    amount: i32,
    events: &mut Vec<GameEvent>,
) {
    debug_assert!(amount >= 0, "negative damage {amount} on player");
    let amount = amount.max(0);
    let Some(mut ship) = registry.get::<PlayerShip>(player) else {
        return;
    };

    let absorbed = amount.min(ship.shield.floor().max(0.0) as i32);
    ship.shield -= absorbed as f64;
    events.push(GameEvent::PlayerDamaged { amount, absorbed });

    let through = amount - absorbed;
    let remaining = registry
        .update::<Health, _>(player, |h| {
            h.current = (h.current - through).max(0);
            h.current
        })
        .unwrap_or(0);

    if remaining == 0 {
        ship.lives = ship.lives.saturating_sub(1);
        if ship.lives > 0 {
            registry.update::<Health, _>(player, |h| h.current = h.max);
            ship.shield = stats.max_shield;
            log::info!("player lost a life, {} left", ship.lives);
            events.push(GameEvent::PlayerLifeLost {
                lives_left: ship.lives,
            });
        } else {
            log::info!("player destroyed");
            events.push(GameEvent::PlayerDied);
            registry.update::<PlayerShip, _>(player, |s| *s = ship);
            registry.despawn(player);
            return;
        }
    }
    registry.update::<PlayerShip, _>(player, |s| *s = ship);
}
