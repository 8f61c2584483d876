//! Collision Engine.
//!
//! Runs once per frame after all movement. Every body is snapshotted first,
//! so the passes below test post-movement positions and removals made by an
//! earlier pass only affect liveness checks, never geometry. Broad phase is
//! a uniform grid; the exact test is the bounding-box overlap itself.

use std::collections::HashMap;

use glam::DVec2;
use rand_chacha::ChaCha8Rng;

use machines_ai::steering::signed_angle;
use machines_campaign::{PlayerStats, SessionStats};
use machines_core::components::*;
use machines_core::constants::*;
use machines_core::enums::{CollectibleKind, EntityKind, Team};
use machines_core::events::GameEvent;
use machines_core::types::{facing_vector, Aabb, EntityId, Position, Size, Velocity};

use crate::registry::{DamageOutcome, EntityRegistry, Filter};
use crate::systems::player;
use crate::world_setup;

/// Session state the collision passes report into.
pub struct CollisionContext<'a> {
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<GameEvent>,
    pub session: &'a mut SessionStats,
    pub player: Option<EntityId>,
    pub player_stats: &'a PlayerStats,
}

#[derive(Debug, Clone, Copy)]
struct Body {
    id: EntityId,
    kind: EntityKind,
    team: Team,
    aabb: Aabb,
    center: DVec2,
}

/// Uniform grid over body indices. Only used for lookups; query results are
/// sorted so iteration order never depends on hashing.
#[derive(Debug)]
struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self {
            cell_size: COLLISION_CELL_SIZE,
            cells: HashMap::new(),
        }
    }
}

impl SpatialGrid {
    fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    fn cell_range(&self, aabb: &Aabb) -> (i32, i32, i32, i32) {
        let cell = |v: f64| (v / self.cell_size).floor() as i32;
        (
            cell(aabb.min_x),
            cell(aabb.min_y),
            cell(aabb.max_x),
            cell(aabb.max_y),
        )
    }

    fn insert(&mut self, index: usize, aabb: &Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(aabb);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    fn query(&self, aabb: &Aabb) -> Vec<usize> {
        let (x0, y0, x1, y1) = self.cell_range(aabb);
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[derive(Debug, Default)]
pub struct CollisionEngine {
    grid: SpatialGrid,
    bodies: Vec<Body>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect and resolve every interaction for this frame.
    pub fn resolve(&mut self, registry: &mut EntityRegistry, ctx: &mut CollisionContext<'_>) {
        self.gather(registry);

        self.player_shots(registry, ctx);
        self.hostile_shots(registry, ctx);
        self.player_contacts(registry, ctx);
    }

    fn gather(&mut self, registry: &EntityRegistry) {
        self.bodies.clear();
        self.grid.clear();
        for id in registry.iter(Filter::All) {
            let (Some(kind), Some(team), Some(pos), Some(size)) = (
                registry.get::<EntityKind>(id),
                registry.get::<Team>(id),
                registry.get::<Position>(id),
                registry.get::<Size>(id),
            ) else {
                continue;
            };
            if kind == EntityKind::Particle {
                continue;
            }
            let aabb = Aabb::from_center(pos, size);
            self.grid.insert(self.bodies.len(), &aabb);
            self.bodies.push(Body {
                id,
                kind,
                team,
                aabb,
                center: pos.to_vec(),
            });
        }
    }

    /// Live bodies overlapping `body` that satisfy `accept`, lowest id first.
    fn overlapping(
        &self,
        registry: &EntityRegistry,
        body: &Body,
        accept: impl Fn(&Body) -> bool,
    ) -> Vec<Body> {
        self.grid
            .query(&body.aabb)
            .into_iter()
            .map(|i| self.bodies[i])
            .filter(|other| {
                other.id != body.id
                    && accept(other)
                    && other.aabb.overlaps(&body.aabb)
                    && registry.is_alive(other.id)
            })
            .collect()
    }

    /// Player projectiles and missiles against enemies and obstacles.
    fn player_shots(&self, registry: &mut EntityRegistry, ctx: &mut CollisionContext<'_>) {
        let shots: Vec<Body> = self
            .bodies
            .iter()
            .filter(|b| {
                b.team == Team::Player
                    && matches!(b.kind, EntityKind::Projectile | EntityKind::Missile)
            })
            .copied()
            .collect();

        for shot in shots {
            if !registry.is_alive(shot.id) {
                continue;
            }
            let Some(projectile) = registry.get::<Projectile>(shot.id) else {
                continue;
            };
            let targets = self.overlapping(registry, &shot, |b| {
                matches!(b.kind, EntityKind::Enemy | EntityKind::Obstacle)
            });
            if targets.is_empty() {
                continue;
            }

            let by_missile = registry.has::<Homing>(shot.id);
            let direction = registry
                .get::<Velocity>(shot.id)
                .map(|v| v.to_vec().normalize_or_zero())
                .unwrap_or(DVec2::ZERO);

            if projectile.piercing {
                let already = registry
                    .get_cloned::<PiercedTargets>(shot.id)
                    .unwrap_or_default();
                let fresh: Vec<Body> = targets
                    .into_iter()
                    .filter(|t| !already.hits.contains(&t.id))
                    .collect();
                if fresh.is_empty() {
                    continue;
                }
                if already.hits.is_empty() {
                    ctx.session.shots_hit += 1;
                }
                let mut hits = already.hits;
                for target in fresh {
                    strike(registry, ctx, &target, projectile.damage, direction, by_missile);
                    hits.push(target.id);
                }
                registry.insert(shot.id, PiercedTargets { hits });
            } else {
                ctx.session.shots_hit += 1;
                strike(registry, ctx, &targets[0], projectile.damage, direction, by_missile);
                registry.despawn(shot.id);
            }
        }
    }

    /// Hostile projectiles are soaked by obstacles, otherwise hurt the player.
    fn hostile_shots(&self, registry: &mut EntityRegistry, ctx: &mut CollisionContext<'_>) {
        let player = self.player_body(registry, ctx.player);

        for shot in self
            .bodies
            .iter()
            .filter(|b| b.team == Team::Hostile && b.kind == EntityKind::Projectile)
        {
            if !registry.is_alive(shot.id) {
                continue;
            }
            let blocked = !self
                .overlapping(registry, shot, |b| b.kind == EntityKind::Obstacle)
                .is_empty();
            if blocked {
                registry.despawn(shot.id);
                continue;
            }
            let Some(player) = player.filter(|p| registry.is_alive(p.id)) else {
                continue;
            };
            if !shot.aabb.overlaps(&player.aabb) {
                continue;
            }
            let damage = registry.get::<Projectile>(shot.id).map_or(0, |p| p.damage);
            registry.despawn(shot.id);
            player::take_damage(registry, player.id, ctx.player_stats, damage, ctx.events);
        }
    }

    /// Enemy rams, obstacle contact and pickups.
    fn player_contacts(&self, registry: &mut EntityRegistry, ctx: &mut CollisionContext<'_>) {
        let Some(player) = self.player_body(registry, ctx.player) else {
            return;
        };

        for other in self.overlapping(registry, &player, |b| {
            matches!(
                b.kind,
                EntityKind::Enemy | EntityKind::Obstacle | EntityKind::Collectible
            )
        }) {
            if !registry.is_alive(player.id) {
                return;
            }
            match other.kind {
                EntityKind::Enemy => {
                    let damage = registry
                        .get::<Enemy>(other.id)
                        .map_or(ENEMY_CONTACT_DAMAGE, |e| e.contact_damage);
                    registry.despawn(other.id);
                    player::take_damage(registry, player.id, ctx.player_stats, damage, ctx.events);
                }
                EntityKind::Obstacle => {
                    let damage = registry
                        .get::<Obstacle>(other.id)
                        .map_or(OBSTACLE_CONTACT_DAMAGE, |o| o.contact_damage);
                    registry.despawn(other.id);
                    world_setup::spawn_particles(
                        registry,
                        ctx.rng,
                        other.center,
                        PARTICLES_PER_KILL,
                    );
                    player::take_damage(registry, player.id, ctx.player_stats, damage, ctx.events);
                }
                EntityKind::Collectible => pick_up(registry, ctx, player.id, other.id),
                _ => {}
            }
        }
    }

    fn player_body(&self, registry: &EntityRegistry, player: Option<EntityId>) -> Option<Body> {
        let id = player.filter(|&id| registry.is_alive(id))?;
        self.bodies.iter().find(|b| b.id == id).copied()
    }
}

/// True if a shot travelling along `direction` hits the shielded face.
fn shield_blocks(shield: &FrontShield, direction: DVec2) -> bool {
    if direction == DVec2::ZERO {
        return false;
    }
    let facing = facing_vector(shield.facing);
    let incoming = -direction;
    signed_angle(facing, incoming).abs() <= shield.arc / 2.0
}

fn strike(
    registry: &mut EntityRegistry,
    ctx: &mut CollisionContext<'_>,
    target: &Body,
    damage: i32,
    direction: DVec2,
    by_missile: bool,
) {
    if target.kind == EntityKind::Obstacle {
        // Indestructible obstacles simply soak the shot.
        if registry.has::<Health>(target.id)
            && registry.apply_damage(target.id, damage) == DamageOutcome::Killed
        {
            world_setup::spawn_particles(registry, ctx.rng, target.center, PARTICLES_PER_KILL);
        }
        return;
    }

    let Some(enemy) = registry.get::<Enemy>(target.id) else {
        return;
    };
    let damage = match registry.get::<FrontShield>(target.id) {
        Some(shield) if shield_blocks(&shield, direction) => {
            (damage / SHIELD_DAMAGE_DIVISOR).max(1)
        }
        _ => damage,
    };

    if registry.apply_damage(target.id, damage) != DamageOutcome::Killed {
        return;
    }

    let points = if by_missile {
        enemy.points * MISSILE_KILL_SCORE_MULT
    } else {
        enemy.points
    };
    ctx.events.push(GameEvent::EnemyKilled {
        id: target.id,
        kind: enemy.kind,
        points,
        by_missile,
    });
    ctx.session.score += points as u64;
    ctx.session.enemies_killed += 1;

    if let Some(kind) = world_setup::roll_drop(ctx.rng, by_missile) {
        world_setup::spawn_collectible(registry, ctx.rng, kind, target.center);
    }
    world_setup::spawn_particles(registry, ctx.rng, target.center, PARTICLES_PER_KILL);
}

fn pick_up(
    registry: &mut EntityRegistry,
    ctx: &mut CollisionContext<'_>,
    player: EntityId,
    id: EntityId,
) {
    let Some(collectible) = registry.get::<Collectible>(id) else {
        return;
    };
    registry.despawn(id);

    match collectible.kind {
        CollectibleKind::Star => {
            ctx.session.currency += collectible.value;
            ctx.session.score += u64::from(collectible.value);
            ctx.session.stars_collected += 1;
        }
        CollectibleKind::HealthPack => {
            registry.heal(player, collectible.value as i32);
        }
        CollectibleKind::ShieldPack => {
            let cap = ctx.player_stats.max_shield;
            registry.update::<PlayerShip, _>(player, |ship| {
                ship.shield = (ship.shield + collectible.value as f64).min(cap);
            });
        }
    }
    ctx.events.push(GameEvent::CollectiblePicked {
        kind: collectible.kind,
        value: collectible.value,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_query_is_sorted_and_unique() {
        let mut grid = SpatialGrid::default();
        let big = Aabb::from_center(Position::new(64.0, 64.0), Size::new(100.0, 100.0));
        let small = Aabb::from_center(Position::new(10.0, 10.0), Size::new(4.0, 4.0));
        grid.insert(1, &big);
        grid.insert(0, &small);
        let hits = grid.query(&big);
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_shield_blocks_frontal_shots_only() {
        let shield = FrontShield {
            // Facing down the screen, toward the player.
            facing: std::f64::consts::PI,
            arc: SHIELD_ARC,
            retarget_in: 5.0,
        };
        // A shot flying up from below hits the shielded face.
        assert!(shield_blocks(&shield, DVec2::new(0.0, -1.0)));
        // A shot falling from above hits the back.
        assert!(!shield_blocks(&shield, DVec2::new(0.0, 1.0)));
        // 50 degrees off-axis is inside the 60 degree half arc.
        let a = 50f64.to_radians();
        assert!(shield_blocks(&shield, DVec2::new(a.sin(), -a.cos())));
        let b = 70f64.to_radians();
        assert!(!shield_blocks(&shield, DVec2::new(b.sin(), -b.cos())));
    }
}
