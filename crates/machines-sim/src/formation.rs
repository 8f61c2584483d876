//! Formation Manager.
//!
//! A formation is a group of enemies placed by one shared transform: a
//! centre that drifts down the screen plus a per-member offset that the
//! behaviour reshapes over time. Members carry no movement pattern of their
//! own. Offsets come from the template and are never reflowed when members
//! die; survivors keep following the shared transform.

use glam::DVec2;
use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use machines_ai::steering::rotate;
use machines_campaign::stats::resolve_enemy_stats;
use machines_core::components::FormationMember;
use machines_core::constants::*;
use machines_core::enums::{EnemyKind, FormationBehavior, FormationShape};
use machines_core::types::{EntityId, FormationId, Position, Velocity};

use crate::registry::EntityRegistry;
use crate::world_setup::{self, EnemySpawn};

/// Relative member layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormationTemplate {
    Shape {
        shape: FormationShape,
        count: usize,
        spacing: f64,
    },
    /// Explicit offsets, used as given.
    Custom(Vec<DVec2>),
}

/// Parameters for `FormationManager::create_formation`.
#[derive(Debug, Clone)]
pub struct FormationRequest {
    pub kind: EnemyKind,
    pub template: FormationTemplate,
    pub behavior: FormationBehavior,
    pub center: DVec2,
    /// Composed difficulty multiplier handed to the stat resolver.
    pub difficulty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub entity: EntityId,
    /// Template offset from the centre.
    pub offset: DVec2,
}

#[derive(Debug, Clone)]
pub struct Formation {
    pub id: FormationId,
    pub behavior: FormationBehavior,
    pub center: DVec2,
    /// Horizontal anchor for the wave behaviour.
    origin_x: f64,
    pub elapsed: f64,
    slots: Vec<FormationSlot>,
}

#[derive(Debug, Default)]
pub struct FormationManager {
    formations: Vec<Formation>,
    next_id: u32,
}

impl FormationTemplate {
    pub fn shape(shape: FormationShape, count: usize) -> Self {
        Self::Shape {
            shape,
            count,
            spacing: FORMATION_SPACING,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Shape { count, .. } => *count,
            Self::Custom(offsets) => offsets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member offsets. Generated shapes are re-centred so they sum to zero.
    pub fn offsets(&self) -> Vec<DVec2> {
        match self {
            Self::Custom(offsets) => offsets.clone(),
            Self::Shape {
                shape,
                count,
                spacing,
            } => {
                let raw = match shape {
                    FormationShape::Line => line(*count, *spacing),
                    FormationShape::VShape => v_shape(*count, *spacing),
                    FormationShape::Circle => circle(*count, *spacing),
                    FormationShape::Arc => arc(*count, *spacing),
                    FormationShape::Diamond => diamond(*count, *spacing),
                };
                recenter(raw)
            }
        }
    }
}

fn line(count: usize, spacing: f64) -> Vec<DVec2> {
    (0..count)
        .map(|i| DVec2::new(i as f64 * spacing, 0.0))
        .collect()
}

/// Leader at the point, wings trailing up-screen on alternating sides.
fn v_shape(count: usize, spacing: f64) -> Vec<DVec2> {
    (0..count)
        .map(|i| {
            let rank = ((i + 1) / 2) as f64;
            let side = if i % 2 == 1 { -1.0 } else { 1.0 };
            DVec2::new(side * rank * spacing, -rank * spacing * 0.75)
        })
        .collect()
}

fn circle(count: usize, spacing: f64) -> Vec<DVec2> {
    if count <= 1 {
        return vec![DVec2::ZERO; count];
    }
    let radius = (count as f64 * spacing / std::f64::consts::TAU).max(spacing / 2.0);
    (0..count)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / count as f64;
            DVec2::new(angle.sin(), -angle.cos()) * radius
        })
        .collect()
}

/// 120 degree arc bowing toward the player.
fn arc(count: usize, spacing: f64) -> Vec<DVec2> {
    if count <= 1 {
        return vec![DVec2::ZERO; count];
    }
    let sweep = 120f64.to_radians();
    let radius = spacing * (count - 1) as f64 / sweep;
    (0..count)
        .map(|i| {
            let theta = -sweep / 2.0 + sweep * i as f64 / (count - 1) as f64;
            DVec2::new(theta.sin(), theta.cos()) * radius
        })
        .collect()
}

/// Concentric diamond rings: the centre first, then 4k members on ring k.
fn diamond(count: usize, spacing: f64) -> Vec<DVec2> {
    let mut out = Vec::with_capacity(count);
    if count > 0 {
        out.push(DVec2::ZERO);
    }
    let mut ring = 1i32;
    while out.len() < count {
        let corners = [
            (DVec2::new(0.0, -1.0), DVec2::new(1.0, 1.0)),
            (DVec2::new(1.0, 0.0), DVec2::new(-1.0, 1.0)),
            (DVec2::new(0.0, 1.0), DVec2::new(-1.0, -1.0)),
            (DVec2::new(-1.0, 0.0), DVec2::new(1.0, -1.0)),
        ];
        for (start, step) in corners {
            for j in 0..ring {
                if out.len() == count {
                    break;
                }
                let p = start * ring as f64 + step * j as f64;
                out.push(p * spacing);
            }
        }
        ring += 1;
    }
    out
}

fn recenter(offsets: Vec<DVec2>) -> Vec<DVec2> {
    if offsets.is_empty() {
        return offsets;
    }
    let mean = offsets.iter().copied().sum::<DVec2>() / offsets.len() as f64;
    offsets.into_iter().map(|o| o - mean).collect()
}

/// Offset of a member `elapsed` seconds into the formation's life.
pub fn effective_offset(behavior: FormationBehavior, offset: DVec2, elapsed: f64) -> DVec2 {
    match behavior {
        FormationBehavior::Static | FormationBehavior::Wave => offset,
        FormationBehavior::Rotate => rotate(offset, FORMATION_ROTATE_RATE * elapsed),
        FormationBehavior::Split => {
            let progress =
                ((elapsed - FORMATION_SPLIT_DELAY) / FORMATION_SPLIT_DURATION).clamp(0.0, 1.0);
            let scale = 1.0 + (FORMATION_SPLIT_SCALE - 1.0) * progress;
            DVec2::new(offset.x * scale, offset.y)
        }
        FormationBehavior::Converge => {
            let progress = (elapsed / FORMATION_CONVERGE_DURATION).clamp(0.0, 1.0);
            offset * (1.0 + (FORMATION_CONVERGE_SCALE - 1.0) * progress)
        }
    }
}

impl Formation {
    pub fn slots(&self) -> &[FormationSlot] {
        &self.slots
    }

    pub fn member_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().map(|s| s.entity)
    }

    fn center_at(&self, elapsed: f64) -> DVec2 {
        match self.behavior {
            FormationBehavior::Wave => DVec2::new(
                self.origin_x
                    + FORMATION_WAVE_AMPLITUDE * (FORMATION_WAVE_FREQUENCY * elapsed).sin(),
                self.center.y,
            ),
            _ => self.center,
        }
    }
}

impl FormationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one enemy per template offset and bind them into a formation.
    /// Returns `None` if no member could be spawned.
    pub fn create_formation(
        &mut self,
        registry: &mut EntityRegistry,
        rng: &mut ChaCha8Rng,
        request: FormationRequest,
    ) -> Option<FormationId> {
        let id = FormationId(self.next_id);
        let mut slots = Vec::new();

        let offsets = request.template.offsets();
        let total = offsets.len();
        for (slot, offset) in offsets.into_iter().enumerate() {
            if registry.is_full() {
                registry.record_throttled(total - slot);
                break;
            }
            let seed = rng.next_u64();
            let stats = resolve_enemy_stats(request.kind, request.difficulty, seed);
            let position = request.center + effective_offset(request.behavior, offset, 0.0);
            let spawned = world_setup::spawn_enemy(
                registry,
                rng,
                EnemySpawn {
                    stats,
                    position,
                    pattern: None,
                    formation: Some(FormationMember {
                        formation: id,
                        slot,
                    }),
                },
            );
            if let Some(entity) = spawned {
                registry.update::<Velocity, _>(entity, |v| {
                    *v = Velocity::new(0.0, FORMATION_DRIFT_SPEED)
                });
                slots.push(FormationSlot { entity, offset });
            }
        }

        if slots.is_empty() {
            return None;
        }
        self.next_id += 1;
        log::debug!(
            "formation {} ({:?}, {} x {:?}) created",
            id,
            request.behavior,
            slots.len(),
            request.kind
        );
        self.formations.push(Formation {
            id,
            behavior: request.behavior,
            center: request.center,
            origin_x: request.center.x,
            elapsed: 0.0,
            slots,
        });
        Some(id)
    }

    /// Advance every formation and write member positions.
    pub fn update(&mut self, dt: f64, registry: &mut EntityRegistry) {
        self.formations.retain_mut(|formation| {
            formation.slots.retain(|s| registry.is_alive(s.entity));
            if formation.slots.is_empty() {
                log::debug!("formation {} emptied", formation.id);
                return false;
            }
            if dt <= 0.0 {
                return true;
            }

            formation.elapsed += dt;
            formation.center.y += FORMATION_DRIFT_SPEED * dt;
            let center = formation.center_at(formation.elapsed);

            for slot in &formation.slots {
                let target =
                    center + effective_offset(formation.behavior, slot.offset, formation.elapsed);
                let previous = registry
                    .get::<Position>(slot.entity)
                    .map(Position::to_vec)
                    .unwrap_or(target);
                registry.update::<Position, _>(slot.entity, |p| *p = target.into());
                registry.update::<Velocity, _>(slot.entity, |v| {
                    *v = ((target - previous) / dt).into()
                });
            }
            true
        });
    }

    /// Despawn every member of a formation and drop it. Unknown ids are a
    /// no-op. Returns how many members were despawned.
    pub fn force_clear(&mut self, id: FormationId, registry: &mut EntityRegistry) -> usize {
        let Some(index) = self.formations.iter().position(|f| f.id == id) else {
            return 0;
        };
        let formation = self.formations.remove(index);
        formation
            .member_ids()
            .filter(|&entity| registry.despawn(entity))
            .count()
    }

    pub fn get(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    /// Live centre of a formation, including behaviour-specific sway.
    pub fn center(&self, id: FormationId) -> Option<DVec2> {
        self.get(id).map(|f| f.center_at(f.elapsed))
    }

    pub fn contains(&self, id: FormationId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.formations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Formation> {
        self.formations.iter()
    }
}
