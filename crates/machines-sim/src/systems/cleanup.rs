//! Cleanup system: marks expired and off-screen entities for removal.
//!
//! Enemies, pickups and obstacles only leave through the bottom edge; shots
//! and sparks are dropped past any edge. The registry reaps the marked
//! entities at the end of the frame.

use machines_campaign::SessionStats;
use machines_core::components::{Collectible, Lifetime};
use machines_core::config::SimConfig;
use machines_core::enums::{CollectibleKind, EntityKind};
use machines_core::types::{EntityId, Position, Size};

use crate::registry::{Doomed, EntityRegistry};

pub fn run(
    registry: &mut EntityRegistry,
    config: &SimConfig,
    session: &mut SessionStats,
    despawn_buffer: &mut Vec<EntityId>,
    dt: f64,
) {
    despawn_buffer.clear();
    let margin = config.offscreen_margin;
    let (width, height) = (config.screen_width, config.screen_height);

    for (_entity, (id, kind, pos, size, lifetime, collectible, doomed)) in
        registry.world_mut().query_mut::<(
            &EntityId,
            &EntityKind,
            &Position,
            &Size,
            Option<&mut Lifetime>,
            Option<&Collectible>,
            Option<&Doomed>,
        )>()
    {
        if doomed.is_some() {
            continue;
        }

        if let Some(lifetime) = lifetime {
            lifetime.remaining -= dt;
            if lifetime.remaining <= 0.0 {
                despawn_buffer.push(*id);
                continue;
            }
        }

        let below = pos.y - size.h / 2.0 > height + margin;
        let beyond_any = below
            || pos.y + size.h / 2.0 < -margin
            || pos.x + size.w / 2.0 < -margin
            || pos.x - size.w / 2.0 > width + margin;

        let gone = match kind {
            EntityKind::Player => false,
            EntityKind::Enemy => {
                if below {
                    session.enemies_escaped += 1;
                }
                below
            }
            EntityKind::Collectible => {
                if below && collectible.is_some_and(|c| c.kind == CollectibleKind::Star) {
                    session.stars_missed += 1;
                }
                below
            }
            EntityKind::Obstacle => below,
            EntityKind::Projectile | EntityKind::Missile | EntityKind::Particle => beyond_any,
        };
        if gone {
            despawn_buffer.push(*id);
        }
    }

    for id in despawn_buffer.drain(..) {
        registry.despawn(id);
    }
}
