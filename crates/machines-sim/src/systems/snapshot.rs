//! Snapshot system: builds the `FrameSnapshot` handed to the render and HUD
//! collaborators after each tick.

use machines_campaign::{PlayerStats, SessionStats};
use machines_core::components::{Collectible, Enemy, Health, PlayerShip};
use machines_core::enums::{EntityKind, SessionPhase, Team};
use machines_core::events::GameEvent;
use machines_core::state::{FrameSnapshot, PlayerView, RenderEntity, VisualVariant, WaveView};
use machines_core::types::{EntityId, Position, SimTime, Velocity};

use crate::registry::{EntityRegistry, Filter};

pub struct SnapshotInput<'a> {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub events: Vec<GameEvent>,
    pub player: Option<EntityId>,
    pub player_stats: &'a PlayerStats,
    pub session: &'a SessionStats,
    pub wave: WaveView,
}

pub fn build_snapshot(registry: &EntityRegistry, input: SnapshotInput<'_>) -> FrameSnapshot {
    let entities = registry
        .iter(Filter::All)
        .filter_map(|id| render_entity(registry, id))
        .collect();

    let player = input.player.and_then(|id| {
        let health = registry.get::<Health>(id)?;
        let ship = registry.get::<PlayerShip>(id)?;
        Some(PlayerView {
            health: health.current,
            max_health: health.max,
            shield: ship.shield,
            max_shield: input.player_stats.max_shield,
            lives: ship.lives,
            score: input.session.score,
            currency: input.session.currency,
        })
    });

    FrameSnapshot {
        time: input.time,
        phase: input.phase,
        entities,
        events: input.events,
        player,
        wave: input.wave,
    }
}

fn render_entity(registry: &EntityRegistry, id: EntityId) -> Option<RenderEntity> {
    let kind = registry.get::<EntityKind>(id)?;
    let pos = registry.get::<Position>(id)?;
    let heading = || registry.get::<Velocity>(id).map_or(0.0, |v| v.heading());

    let (variant, rotation) = match kind {
        EntityKind::Player => (
            VisualVariant::Ship,
            registry.get::<PlayerShip>(id).map_or(0.0, |s| s.angle),
        ),
        EntityKind::Enemy => (
            VisualVariant::Enemy(registry.get::<Enemy>(id)?.kind),
            0.0,
        ),
        EntityKind::Projectile => {
            let variant = match registry.get::<Team>(id) {
                Some(Team::Player) => VisualVariant::PlayerShot,
                _ => VisualVariant::EnemyShot,
            };
            (variant, heading())
        }
        EntityKind::Missile => (VisualVariant::Missile, heading()),
        EntityKind::Collectible => (
            VisualVariant::Pickup(registry.get::<Collectible>(id)?.kind),
            0.0,
        ),
        EntityKind::Obstacle => (VisualVariant::Rock, 0.0),
        EntityKind::Particle => (VisualVariant::Spark, 0.0),
    };

    Some(RenderEntity {
        id,
        kind,
        x: pos.x,
        y: pos.y,
        rotation,
        variant,
    })
}
