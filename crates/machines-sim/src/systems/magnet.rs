//! Pickup magnet: drags nearby collectibles toward the player.

use machines_core::components::Collectible;
use machines_core::constants::MAGNET_STRENGTH;
use machines_core::types::{EntityId, Position};

use crate::registry::{Doomed, EntityRegistry};

/// Pull strength falls off linearly from full at the ship to zero at
/// `radius`. A zero radius disables the magnet.
pub fn run(registry: &mut EntityRegistry, player: EntityId, radius: f64, dt: f64) {
    if radius <= 0.0 {
        return;
    }
    let Some(center) = registry.get::<Position>(player) else {
        return;
    };

    for (_entity, (pos, _collectible, doomed)) in registry
        .world_mut()
        .query_mut::<(&mut Position, &Collectible, Option<&Doomed>)>()
    {
        if doomed.is_some() {
            continue;
        }
        let dx = center.x - pos.x;
        let dy = center.y - pos.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= f64::EPSILON || distance > radius {
            continue;
        }
        let step = (MAGNET_STRENGTH * (1.0 - distance / radius) * dt).min(distance);
        pos.x += dx / distance * step;
        pos.y += dy / distance * step;
    }
}
