//! Entity registry: the single owner of the live-entity set.
//!
//! Wraps the hecs `World`. Every spawn and despawn goes through here;
//! systems may change component values through `world_mut` queries but never
//! add or remove entities themselves.
//!
//! Despawning is deferred. `despawn` tags the entity with `Doomed`, which
//! hides it from `iter`/`is_alive` immediately, and `reap` removes every
//! tagged entity at the end of the frame.

use std::collections::BTreeMap;

use hecs::{Component, DynamicBundle, Entity, World};

use machines_core::components::Health;
use machines_core::enums::{EntityKind, Team};
use machines_core::types::{EntityId, Position, Size, Velocity};

/// Marker for entities waiting for the end-of-frame sweep.
#[derive(Debug, Clone, Copy)]
pub struct Doomed;

/// Base attributes every entity is created with.
#[derive(Debug, Clone, Copy)]
pub struct SpawnAttributes {
    pub position: Position,
    pub velocity: Velocity,
    pub size: Size,
    pub team: Team,
    /// Starting (and maximum) health. None for entities that cannot be hurt.
    pub health: Option<i32>,
}

impl SpawnAttributes {
    pub fn new(position: Position, size: Size, team: Team) -> Self {
        Self {
            position,
            velocity: Velocity::default(),
            size,
            team,
            health: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }
}

/// Iteration filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Kind(EntityKind),
    Team(Team),
}

/// Result of `apply_damage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Unknown, already doomed, or not damageable.
    Absent,
    Damaged { remaining: i32 },
    /// Health reached zero on this call. The entity is now doomed.
    Killed,
}

pub struct EntityRegistry {
    world: World,
    /// Ordered so iteration is deterministic.
    index: BTreeMap<EntityId, Entity>,
    pending: Vec<EntityId>,
    next_id: u32,
    max_entities: usize,
    throttled: u32,
}

impl EntityRegistry {
    pub fn new(max_entities: usize) -> Self {
        Self {
            world: World::new(),
            index: BTreeMap::new(),
            pending: Vec::new(),
            next_id: 0,
            max_entities,
            throttled: 0,
        }
    }

    /// Create an entity with only the base components.
    pub fn spawn(&mut self, kind: EntityKind, attrs: SpawnAttributes) -> Option<EntityId> {
        let (id, _) = self.spawn_base(kind, attrs)?;
        Some(id)
    }

    /// Create an entity and attach `extra` components in the same call.
    pub fn spawn_with(
        &mut self,
        kind: EntityKind,
        attrs: SpawnAttributes,
        extra: impl DynamicBundle,
    ) -> Option<EntityId> {
        let (id, entity) = self.spawn_base(kind, attrs)?;
        // The entity was created just above.
        let _ = self.world.insert(entity, extra);
        Some(id)
    }

    fn spawn_base(&mut self, kind: EntityKind, attrs: SpawnAttributes) -> Option<(EntityId, Entity)> {
        if self.is_full() {
            self.throttled += 1;
            log::debug!(
                "entity cap {} reached, dropping {:?} spawn",
                self.max_entities,
                kind
            );
            return None;
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        if self.index.contains_key(&id) {
            debug_assert!(false, "duplicate entity id {id}");
            return None;
        }

        let entity = self.world.spawn((
            id,
            kind,
            attrs.team,
            attrs.position,
            attrs.velocity,
            attrs.size,
        ));
        if let Some(hp) = attrs.health {
            let max = hp.max(1);
            let _ = self.world.insert_one(entity, Health { current: max, max });
        }
        self.index.insert(id, entity);
        Some((id, entity))
    }

    /// Mark an entity for removal. Returns false if it was unknown or already
    /// marked; both cases are no-ops.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(&entity) = self.index.get(&id) else {
            return false;
        };
        if self.is_doomed(entity) {
            return false;
        }
        let _ = self.world.insert_one(entity, Doomed);
        self.pending.push(id);
        true
    }

    /// Remove every marked entity. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let mut removed = 0;
        for id in self.pending.drain(..) {
            if let Some(entity) = self.index.remove(&id) {
                let _ = self.world.despawn(entity);
                removed += 1;
            }
        }
        removed
    }

    /// True if the entity exists and is not marked for removal.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.index
            .get(&id)
            .is_some_and(|&entity| !self.is_doomed(entity))
    }

    /// Live entities matching `filter`, in ascending id order. Lazy and
    /// restartable; marked entities are skipped as soon as they are marked.
    pub fn iter(&self, filter: Filter) -> impl Iterator<Item = EntityId> + '_ {
        self.index.iter().filter_map(move |(&id, &entity)| {
            if self.is_doomed(entity) || !self.matches(entity, filter) {
                None
            } else {
                Some(id)
            }
        })
    }

    /// Snapshot of `iter` for callers that spawn or despawn while looping.
    pub fn ids(&self, filter: Filter) -> Vec<EntityId> {
        self.iter(filter).collect()
    }

    pub fn count(&self, filter: Filter) -> usize {
        self.iter(filter).count()
    }

    /// Entities held, including those marked but not yet reaped.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    /// Copy of a component on a live entity.
    pub fn get<T: Component + Copy>(&self, id: EntityId) -> Option<T> {
        let entity = self.live_entity(id)?;
        self.world.get::<&T>(entity).ok().map(|c| *c)
    }

    /// Clone of a component on a live entity.
    pub fn get_cloned<T: Component + Clone>(&self, id: EntityId) -> Option<T> {
        let entity = self.live_entity(id)?;
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.live_entity(id)
            .is_some_and(|e| self.world.get::<&T>(e).is_ok())
    }

    /// Mutate a component on a live entity.
    pub fn update<T: Component, R>(&mut self, id: EntityId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entity = self.live_entity(id)?;
        let mut component = self.world.get::<&mut T>(entity).ok()?;
        Some(f(&mut *component))
    }

    /// Attach or replace a component on a live entity.
    pub fn insert<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        match self.live_entity(id) {
            Some(entity) => self.world.insert_one(entity, component).is_ok(),
            None => false,
        }
    }

    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let entity = self.live_entity(id)?;
        self.world.remove_one::<T>(entity).ok()
    }

    /// Subtract `amount` from an entity's health. Health floors at zero and
    /// the entity is marked the moment it gets there; a marked entity cannot
    /// be damaged again, so `Killed` is reported exactly once.
    pub fn apply_damage(&mut self, id: EntityId, amount: i32) -> DamageOutcome {
        debug_assert!(amount >= 0, "negative damage {amount} on {id}");
        let amount = amount.max(0);

        let Some(remaining) = self.update::<Health, _>(id, |health| {
            health.current = (health.current - amount).max(0);
            health.current
        }) else {
            return DamageOutcome::Absent;
        };

        if remaining == 0 {
            self.despawn(id);
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged { remaining }
        }
    }

    /// Restore health, never beyond the maximum.
    pub fn heal(&mut self, id: EntityId, amount: i32) -> Option<i32> {
        let amount = amount.max(0);
        self.update::<Health, _>(id, |health| {
            health.current = (health.current + amount).min(health.max);
            health.current
        })
    }

    /// True when the next spawn would be refused.
    pub fn is_full(&self) -> bool {
        self.index.len() >= self.max_entities
    }

    /// Count spawns a caller gave up on because the registry is full.
    pub fn record_throttled(&mut self, skipped: usize) {
        self.throttled = self
            .throttled
            .saturating_add(u32::try_from(skipped).unwrap_or(u32::MAX));
        log::debug!("entity cap {} reached, {} spawns skipped", self.max_entities, skipped);
    }

    /// Spawns refused since the last call.
    pub fn take_throttled(&mut self) -> u32 {
        std::mem::take(&mut self.throttled)
    }

    /// Read-only ECS access for queries.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Component-value access for systems. Structural changes must still go
    /// through `spawn`/`despawn`.
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn live_entity(&self, id: EntityId) -> Option<Entity> {
        let entity = *self.index.get(&id)?;
        if self.is_doomed(entity) {
            None
        } else {
            Some(entity)
        }
    }

    fn is_doomed(&self, entity: Entity) -> bool {
        self.world.get::<&Doomed>(entity).is_ok()
    }

    fn matches(&self, entity: Entity, filter: Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::Kind(kind) => self
                .world
                .get::<&EntityKind>(entity)
                .is_ok_and(|k| *k == kind),
            Filter::Team(team) => self.world.get::<&Team>(entity).is_ok_and(|t| *t == team),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machines_core::components::Lifetime;

    fn attrs() -> SpawnAttributes {
        SpawnAttributes::new(Position::new(0.0, 0.0), Size::new(10.0, 10.0), Team::Hostile)
    }

    #[test]
    fn test_despawn_is_deferred_and_idempotent() {
        let mut reg = EntityRegistry::new(16);
        let a = reg.spawn(EntityKind::Enemy, attrs()).unwrap();
        let b = reg.spawn(EntityKind::Enemy, attrs()).unwrap();

        assert!(reg.despawn(a));
        assert!(!reg.despawn(a), "second despawn must be a no-op");
        assert!(!reg.is_alive(a));
        assert_eq!(reg.ids(Filter::All), vec![b]);
        // Still held until the sweep.
        assert_eq!(reg.len(), 2);

        assert_eq!(reg.reap(), 1);
        assert_eq!(reg.len(), 1);
        assert!(!reg.despawn(a));
    }

    #[test]
    fn test_iter_is_restartable_and_filtered() {
        let mut reg = EntityRegistry::new(16);
        let e = reg.spawn(EntityKind::Enemy, attrs()).unwrap();
        let p = reg
            .spawn(
                EntityKind::Projectile,
                SpawnAttributes::new(Position::default(), Size::new(4.0, 12.0), Team::Player),
            )
            .unwrap();
        let it_kind: Vec<_> = reg.iter(Filter::Kind(EntityKind::Enemy)).collect();
        assert_eq!(it_kind, vec![e]);
        let it_team: Vec<_> = reg.iter(Filter::Team(Team::Player)).collect();
        assert_eq!(it_team, vec![p]);
        assert_eq!(reg.iter(Filter::All).count(), 2);
        assert_eq!(reg.iter(Filter::All).count(), 2);
    }

    #[test]
    fn test_cap_throttles_spawns() {
        let mut reg = EntityRegistry::new(2);
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_some());
        let b = reg.spawn(EntityKind::Particle, attrs()).unwrap();
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_none());
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_none());
        assert_eq!(reg.take_throttled(), 2);
        assert_eq!(reg.take_throttled(), 0);

        // Marked entities still count until reaped.
        reg.despawn(b);
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_none());
        reg.reap();
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_some());
    }

    #[test]
    fn test_skipped_spawns_are_counted_as_throttled() {
        let mut reg = EntityRegistry::new(1);
        assert!(!reg.is_full());
        reg.spawn(EntityKind::Particle, attrs()).unwrap();
        assert!(reg.is_full());
        reg.record_throttled(3);
        assert!(reg.spawn(EntityKind::Particle, attrs()).is_none());
        assert_eq!(reg.take_throttled(), 4);
    }

    #[test]
    fn test_damage_floors_and_kills_once() {
        let mut reg = EntityRegistry::new(8);
        let id = reg.spawn(EntityKind::Enemy, attrs().with_health(30)).unwrap();
        assert_eq!(
            reg.apply_damage(id, 12),
            DamageOutcome::Damaged { remaining: 18 }
        );
        assert_eq!(reg.apply_damage(id, 100), DamageOutcome::Killed);
        assert_eq!(reg.apply_damage(id, 5), DamageOutcome::Absent);
        assert!(!reg.is_alive(id));
    }

    #[test]
    fn test_heal_respects_max() {
        let mut reg = EntityRegistry::new(8);
        let id = reg.spawn(EntityKind::Player, attrs().with_health(50)).unwrap();
        reg.apply_damage(id, 30);
        assert_eq!(reg.heal(id, 100), Some(50));
    }

    #[test]
    fn test_components_on_doomed_entities_are_hidden() {
        let mut reg = EntityRegistry::new(8);
        let id = reg
            .spawn_with(EntityKind::Particle, attrs(), (Lifetime { remaining: 1.0 },))
            .unwrap();
        assert!(reg.get::<Lifetime>(id).is_some());
        reg.despawn(id);
        assert!(reg.get::<Lifetime>(id).is_none());
        assert!(reg.update::<Lifetime, _>(id, |l| l.remaining = 0.0).is_none());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut reg = EntityRegistry::new(8);
        let a = reg.spawn(EntityKind::Enemy, attrs()).unwrap();
        reg.despawn(a);
        reg.reap();
        let b = reg.spawn(EntityKind::Enemy, attrs()).unwrap();
        assert_ne!(a, b);
    }
}
