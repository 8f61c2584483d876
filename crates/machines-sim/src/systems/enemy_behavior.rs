//! Enemy gunnery and shield re-targeting.

use std::f64::consts::FRAC_PI_4;

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use machines_core::components::{EnemyGun, FrontShield};
use machines_core::constants::{SHIELD_RETARGET_MAX, SHIELD_RETARGET_MIN};
use machines_core::types::{Position, Size};

use crate::registry::{Doomed, EntityRegistry};
use crate::world_setup;

pub fn run(registry: &mut EntityRegistry, rng: &mut ChaCha8Rng, dt: f64) {
    // Collected first: the registry cannot spawn while a query is open.
    let mut shots: Vec<(DVec2, DVec2, i32)> = Vec::new();

    for (_entity, (pos, size, gun, doomed)) in registry
        .world_mut()
        .query_mut::<(&Position, &Size, &mut EnemyGun, Option<&Doomed>)>()
    {
        if doomed.is_some() {
            continue;
        }
        gun.cooldown -= dt;
        if gun.cooldown > 0.0 {
            continue;
        }
        gun.cooldown += gun.interval;
        // Holds fire until on screen.
        if pos.y < 0.0 {
            continue;
        }
        shots.push((
            DVec2::new(pos.x, pos.y + size.h / 2.0),
            DVec2::new(0.0, gun.speed),
            gun.damage,
        ));
    }

    for (position, velocity, damage) in shots {
        world_setup::spawn_enemy_shot(registry, position, velocity, damage);
    }

    for (_entity, shield) in registry.world_mut().query_mut::<&mut FrontShield>() {
        shield.retarget_in -= dt;
        if shield.retarget_in <= 0.0 {
            shield.facing = rng.gen_range(0..8) as f64 * FRAC_PI_4;
            shield.retarget_in = rng.gen_range(SHIELD_RETARGET_MIN..SHIELD_RETARGET_MAX);
        }
    }
}
