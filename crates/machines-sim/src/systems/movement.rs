//! Movement system.
//!
//! Pattern-driven entities advance their `MovementPattern`; everything else
//! that is not placed by the player or a formation integrates its velocity.

use std::collections::BTreeMap;

use glam::DVec2;

use machines_ai::patterns::{
    bezier_exit_direction, MovementPattern, PatternContext, PatternKind, PursuitTarget,
};
use machines_ai::steering::Neighbor;
use machines_core::components::{FormationMember, PlayerShip};
use machines_core::types::{EntityId, Position, Velocity};

use crate::registry::{Doomed, EntityRegistry};

pub fn run(registry: &mut EntityRegistry, player: Option<EntityId>, dt: f64) {
    // Pursuit targets and flock neighbours are resolved before any entity
    // moves so every pattern sees the same start-of-frame world.
    let mut targets: BTreeMap<EntityId, Option<DVec2>> = BTreeMap::new();
    let mut neighbors: Vec<Neighbor> = Vec::new();
    let player_pos = player.and_then(|p| registry.get::<Position>(p)).map(Position::to_vec);

    for (_entity, (pattern, pos, vel, doomed)) in registry
        .world()
        .query::<(&MovementPattern, &Position, &Velocity, Option<&Doomed>)>()
        .iter()
    {
        if doomed.is_some() {
            continue;
        }
        if let Some(PursuitTarget::Entity(id)) = pattern.pursuit_target() {
            targets.insert(id, None);
        }
        if pattern.wants_neighbors() {
            neighbors.push(Neighbor {
                position: pos.to_vec(),
                velocity: vel.to_vec(),
            });
        }
    }
    for (id, slot) in targets.iter_mut() {
        *slot = registry.get::<Position>(*id).map(Position::to_vec);
    }

    for (_entity, (pattern, pos, vel, doomed)) in registry.world_mut().query_mut::<(
        &mut MovementPattern,
        &mut Position,
        &mut Velocity,
        Option<&Doomed>,
    )>() {
        if doomed.is_some() {
            continue;
        }
        let target = match pattern.pursuit_target() {
            Some(PursuitTarget::Player) => player_pos,
            Some(PursuitTarget::Entity(id)) => targets.get(&id).copied().flatten(),
            None => None,
        };
        let ctx = PatternContext {
            position: pos.to_vec(),
            velocity: vel.to_vec(),
            target,
            neighbors: &neighbors,
        };
        let step = pattern.advance(&ctx, dt);
        pos.x += step.displacement.x;
        pos.y += step.displacement.y;
        *vel = step.velocity.into();

        if step.completed {
            if let PatternKind::Bezier { points, .. } = pattern.kind() {
                let exit = bezier_exit_direction(points) * step.velocity.length().max(1.0);
                pattern.switch_to(PatternKind::Linear { velocity: exit });
                *vel = exit.into();
            }
        }
    }

    for (_entity, (pos, vel, pattern, member, ship, doomed)) in
        registry.world_mut().query_mut::<(
            &mut Position,
            &Velocity,
            Option<&MovementPattern>,
            Option<&FormationMember>,
            Option<&PlayerShip>,
            Option<&Doomed>,
        )>()
    {
        if pattern.is_some() || member.is_some() || ship.is_some() || doomed.is_some() {
            continue;
        }
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
    }
}
