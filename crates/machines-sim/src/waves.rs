//! Wave/Spawn Orchestrator.
//!
//! Level content arrives as loosely typed JSON (`RawWaveDefinition`) and is
//! validated once, at load time, into typed `WaveDefinition`s. Invalid
//! directives are dropped with a warning so one bad entry never aborts a
//! wave. The orchestrator then plays one wave at a time against a
//! wave-local clock, firing each directive exactly once.

use glam::DVec2;
use rand::{Rng, RngCore};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use machines_ai::patterns::{bezier_exit_direction, PatternKind};
use machines_campaign::stats::{difficulty_curve, resolve_enemy_stats};
use machines_core::constants::*;
use machines_core::enums::{EnemyKind, FormationBehavior, FormationShape};
use machines_core::error::ContentError;
use machines_core::types::{EntityId, FormationId, Size};

use crate::formation::{FormationManager, FormationRequest, FormationTemplate};
use crate::registry::EntityRegistry;
use crate::world_setup::{self, EnemySpawn};

// --- Raw content (JSON) ---

/// One level file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub waves: Vec<RawWaveDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWaveDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub directives: Vec<RawDirective>,
}

/// A directive exactly as written in content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDirective {
    /// Trigger time, seconds from wave start.
    pub at: f64,
    pub enemy: Option<String>,
    /// Formation template name, or `"custom"` together with `offsets`.
    pub formation: Option<String>,
    pub behavior: Option<String>,
    pub count: Option<usize>,
    pub spacing: Option<f64>,
    pub offsets: Option<Vec<[f64; 2]>>,
    /// Spawn column. Random when absent.
    pub x: Option<f64>,
    /// Movement override for single enemies, tagged by `"pattern"`.
    pub pattern: Option<serde_json::Value>,
    pub obstacle: Option<RawObstacle>,
    pub difficulty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObstacle {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_obstacle_speed")]
    pub speed: f64,
    #[serde(default)]
    pub health: Option<i32>,
}

fn default_level() -> u32 {
    1
}

fn default_obstacle_speed() -> f64 {
    FORMATION_DRIFT_SPEED
}

impl Default for RawDirective {
    fn default() -> Self {
        Self {
            at: 0.0,
            enemy: None,
            formation: None,
            behavior: None,
            count: None,
            spacing: None,
            offsets: None,
            x: None,
            pattern: None,
            obstacle: None,
            difficulty: 1.0,
        }
    }
}

// --- Validated content ---

/// What a directive spawns.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnDescriptor {
    Enemy {
        kind: EnemyKind,
        x: Option<f64>,
        pattern: Option<PatternKind>,
    },
    Formation {
        kind: EnemyKind,
        template: FormationTemplate,
        behavior: FormationBehavior,
        x: Option<f64>,
    },
    Obstacle {
        x: Option<f64>,
        size: Size,
        speed: f64,
        health: Option<i32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDirective {
    pub at: f64,
    pub spawn: SpawnDescriptor,
    pub difficulty: f64,
}

/// Directives sorted by trigger time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveDefinition {
    pub name: String,
    pub directives: Vec<SpawnDirective>,
}

impl LevelDefinition {
    /// Validate every wave. Waves left with no directives are still kept so
    /// wave numbering matches the content file.
    pub fn validate(&self) -> (Vec<WaveDefinition>, Vec<ContentError>) {
        let mut errors = Vec::new();
        let waves = self
            .waves
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let (wave, mut wave_errors) = WaveDefinition::validate(raw, index);
                errors.append(&mut wave_errors);
                wave
            })
            .collect();
        (waves, errors)
    }
}

impl WaveDefinition {
    pub fn new(name: impl Into<String>, mut directives: Vec<SpawnDirective>) -> Self {
        directives.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            name: name.into(),
            directives,
        }
    }

    /// Turn raw content into a typed wave, skipping bad directives.
    pub fn validate(raw: &RawWaveDefinition, wave: usize) -> (Self, Vec<ContentError>) {
        let mut directives = Vec::with_capacity(raw.directives.len());
        let mut errors = Vec::new();

        for (index, directive) in raw.directives.iter().enumerate() {
            match validate_directive(directive) {
                Ok(valid) => directives.push(valid),
                Err(source) => {
                    let err = ContentError::InDirective {
                        wave,
                        index,
                        source: Box::new(source),
                    };
                    log::warn!("skipping directive: {}", err);
                    errors.push(err);
                }
            }
        }

        (Self::new(raw.name.clone(), directives), errors)
    }
}

fn validate_directive(raw: &RawDirective) -> Result<SpawnDirective, ContentError> {
    if !raw.at.is_finite() || raw.at < 0.0 {
        return Err(ContentError::BadTriggerTime(raw.at));
    }
    if !raw.difficulty.is_finite() || raw.difficulty <= 0.0 {
        return Err(ContentError::BadDifficulty(raw.difficulty));
    }

    let spawn = if let Some(obstacle) = &raw.obstacle {
        if !is_positive(obstacle.width) || !is_positive(obstacle.height) {
            return Err(ContentError::BadObstacle("size must be positive"));
        }
        // Obstacles only leave through the bottom edge.
        if !is_positive(obstacle.speed) {
            return Err(ContentError::BadObstacle("speed must be positive"));
        }
        SpawnDescriptor::Obstacle {
            x: raw.x,
            size: Size::new(obstacle.width, obstacle.height),
            speed: obstacle.speed,
            health: obstacle.health.filter(|&hp| hp > 0),
        }
    } else if let Some(name) = &raw.formation {
        let kind = match &raw.enemy {
            Some(enemy) => EnemyKind::parse(enemy)?,
            None => EnemyKind::Basic,
        };
        let behavior = match &raw.behavior {
            Some(behavior) => FormationBehavior::parse(behavior)?,
            None => FormationBehavior::Static,
        };
        let template = if name.eq_ignore_ascii_case("custom") {
            let offsets = raw.offsets.clone().unwrap_or_default();
            FormationTemplate::Custom(offsets.into_iter().map(DVec2::from).collect())
        } else {
            let spacing = raw.spacing.unwrap_or(FORMATION_SPACING);
            if !is_positive(spacing) {
                return Err(ContentError::BadPatternParameter("formation spacing"));
            }
            FormationTemplate::Shape {
                shape: FormationShape::parse(name)?,
                count: raw.count.unwrap_or(5),
                spacing,
            }
        };
        if template.is_empty() {
            return Err(ContentError::EmptyFormation);
        }
        if template.len() > MAX_FORMATION_MEMBERS {
            return Err(ContentError::FormationTooLarge {
                count: template.len(),
                max: MAX_FORMATION_MEMBERS,
            });
        }
        SpawnDescriptor::Formation {
            kind,
            template,
            behavior,
            x: raw.x,
        }
    } else if let Some(enemy) = &raw.enemy {
        let kind = EnemyKind::parse(enemy)?;
        let pattern = raw.pattern.as_ref().map(parse_pattern).transpose()?;
        SpawnDescriptor::Enemy {
            kind,
            x: raw.x,
            pattern,
        }
    } else {
        return Err(ContentError::MissingDescriptor);
    };

    Ok(SpawnDirective {
        at: raw.at,
        spawn,
        difficulty: raw.difficulty,
    })
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn parse_pattern(value: &serde_json::Value) -> Result<PatternKind, ContentError> {
    let pattern: PatternKind = serde_json::from_value(value.clone()).map_err(|_| {
        let name = value
            .get("pattern")
            .and_then(|p| p.as_str())
            .unwrap_or("<missing>");
        ContentError::UnknownPattern(name.to_string())
    })?;

    let problem = match &pattern {
        PatternKind::Bezier { duration, .. } if !is_positive(*duration) => {
            Some("bezier duration must be positive")
        }
        PatternKind::Orbit { radius, .. } if radius.is_nan() || *radius < 0.0 => {
            Some("orbit radius must not be negative")
        }
        PatternKind::Pursuit { max_turn_rate, .. }
            if max_turn_rate.is_nan() || *max_turn_rate < 0.0 =>
        {
            Some("pursuit turn rate must not be negative")
        }
        _ => None,
    };
    if let Some(reason) = problem {
        return Err(ContentError::BadPatternParameter(reason));
    }
    match exit_problem(&pattern) {
        Some(reason) => Err(ContentError::NoDownwardExit(reason)),
        None => Ok(pattern),
    }
}

/// Enemies are only reaped past the bottom edge, so an override that never
/// heads down would hold its wave open forever.
fn exit_problem(pattern: &PatternKind) -> Option<&'static str> {
    match pattern {
        PatternKind::Linear { velocity } if !is_positive(velocity.y) => {
            Some("linear velocity must point down")
        }
        PatternKind::Zigzag { speed, .. } if !is_positive(*speed) => {
            Some("zigzag speed must be positive")
        }
        PatternKind::Pursuit { speed, .. } if !is_positive(*speed) => {
            Some("pursuit speed must be positive")
        }
        PatternKind::Orbit {
            center_velocity, ..
        } if !is_positive(center_velocity.y) => Some("orbit center must drift down"),
        PatternKind::Bezier { points, .. } if !is_positive(bezier_exit_direction(points).y) => {
            Some("bezier path must end heading down")
        }
        PatternKind::Flocking { speed, goal } if !is_positive(*speed) || !is_positive(goal.y) => {
            Some("flock goal must point down")
        }
        _ => None,
    }
}

// --- Orchestrator ---

/// Everything the orchestrator needs to fire directives this frame.
pub struct SpawnContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub formations: &'a mut FormationManager,
    pub rng: &'a mut ChaCha8Rng,
    pub level: u32,
    /// Seconds since the level started, feeds the difficulty curve.
    pub level_elapsed: f64,
    pub screen_width: f64,
}

#[derive(Debug)]
struct ActiveWave {
    definition: WaveDefinition,
    clock: f64,
    next: usize,
    /// Entities spawned by this wave that may still be alive.
    spawned: Vec<EntityId>,
    formations: Vec<FormationId>,
    spawn_calls: usize,
}

#[derive(Debug, Default)]
pub struct WaveOrchestrator {
    active: Option<ActiveWave>,
}

impl WaveOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `wave`, replacing any wave in progress.
    pub fn load_wave(&mut self, wave: WaveDefinition) {
        log::info!(
            "wave `{}` loaded ({} directives)",
            wave.name,
            wave.directives.len()
        );
        self.active = Some(ActiveWave {
            definition: wave,
            clock: 0.0,
            next: 0,
            spawned: Vec::new(),
            formations: Vec::new(),
            spawn_calls: 0,
        });
    }

    /// Advance the wave clock and fire every directive that is due.
    /// Returns how many fired this call.
    pub fn update(&mut self, dt: f64, ctx: &mut SpawnContext<'_>) -> usize {
        let Some(wave) = self.active.as_mut() else {
            return 0;
        };
        wave.spawned.retain(|&id| ctx.registry.is_alive(id));
        wave.clock += dt.max(0.0);

        let mut fired = 0;
        while let Some(directive) = wave.definition.directives.get(wave.next) {
            if directive.at > wave.clock + 1e-9 {
                break;
            }
            let directive = directive.clone();
            wave.next += 1;
            wave.spawn_calls += 1;
            fired += 1;
            fire(wave, &directive, ctx);
        }
        fired
    }

    /// All directives fired and nothing they spawned is still alive.
    /// True when no wave is loaded.
    pub fn is_complete(&self, registry: &EntityRegistry) -> bool {
        match &self.active {
            None => true,
            Some(wave) => {
                wave.next >= wave.definition.directives.len()
                    && wave.spawned.iter().all(|&id| !registry.is_alive(id))
            }
        }
    }

    /// Despawn everything the wave spawned and treat every directive as
    /// fired. A no-op when no wave is loaded.
    pub fn force_clear(
        &mut self,
        registry: &mut EntityRegistry,
        formations: &mut FormationManager,
    ) -> usize {
        let Some(wave) = self.active.as_mut() else {
            return 0;
        };
        let mut cleared = 0;
        for formation in wave.formations.drain(..) {
            cleared += formations.force_clear(formation, registry);
        }
        for id in wave.spawned.drain(..) {
            if registry.despawn(id) {
                cleared += 1;
            }
        }
        wave.next = wave.definition.directives.len();
        log::info!("wave `{}` force-cleared ({} entities)", wave.definition.name, cleared);
        cleared
    }

    pub fn has_wave(&self) -> bool {
        self.active.is_some()
    }

    /// Wave-local clock (s).
    pub fn clock(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |w| w.clock)
    }

    /// Directives fired so far by the current wave.
    pub fn spawn_calls(&self) -> usize {
        self.active.as_ref().map_or(0, |w| w.spawn_calls)
    }

    pub fn live_spawns(&self, registry: &EntityRegistry) -> usize {
        self.active.as_ref().map_or(0, |w| {
            w.spawned.iter().filter(|&&id| registry.is_alive(id)).count()
        })
    }

    pub fn wave_name(&self) -> Option<&str> {
        self.active.as_ref().map(|w| w.definition.name.as_str())
    }
}

fn fire(wave: &mut ActiveWave, directive: &SpawnDirective, ctx: &mut SpawnContext<'_>) {
    let difficulty = directive.difficulty * difficulty_curve(ctx.level, ctx.level_elapsed);
    let spawn_y = -SPAWN_Y_OFFSET;

    match &directive.spawn {
        SpawnDescriptor::Enemy { kind, x, pattern } => {
            let seed = ctx.rng.next_u64();
            let stats = resolve_enemy_stats(*kind, difficulty, seed);
            let x = x.unwrap_or_else(|| random_column(ctx.rng, ctx.screen_width, 0.0));
            let spawned = world_setup::spawn_enemy(
                ctx.registry,
                ctx.rng,
                EnemySpawn {
                    stats,
                    position: DVec2::new(x, spawn_y),
                    pattern: pattern.clone(),
                    formation: None,
                },
            );
            wave.spawned.extend(spawned);
        }
        SpawnDescriptor::Formation {
            kind,
            template,
            behavior,
            x,
        } => {
            let offsets = template.offsets();
            let half_width = offsets.iter().fold(0.0f64, |m, o| m.max(o.x.abs()));
            let lowest = offsets.iter().fold(0.0f64, |m, o| m.max(o.y));
            let x = x.unwrap_or_else(|| random_column(ctx.rng, ctx.screen_width, half_width));
            let request = FormationRequest {
                kind: *kind,
                template: template.clone(),
                behavior: *behavior,
                // Whole formation starts above the screen.
                center: DVec2::new(x, spawn_y - lowest),
                difficulty,
            };
            if let Some(id) = ctx.formations.create_formation(ctx.registry, ctx.rng, request) {
                wave.formations.push(id);
                if let Some(formation) = ctx.formations.get(id) {
                    wave.spawned.extend(formation.member_ids());
                }
            }
        }
        SpawnDescriptor::Obstacle {
            x,
            size,
            speed,
            health,
        } => {
            let x = x.unwrap_or_else(|| random_column(ctx.rng, ctx.screen_width, size.w / 2.0));
            let spawned = world_setup::spawn_obstacle(
                ctx.registry,
                DVec2::new(x, spawn_y - size.h / 2.0),
                *size,
                *speed,
                *health,
            );
            wave.spawned.extend(spawned);
        }
    }
}

/// Random spawn column keeping `half_width` clear of the screen edges.
fn random_column(rng: &mut ChaCha8Rng, screen_width: f64, half_width: f64) -> f64 {
    let lo = SPAWN_X_MARGIN + half_width;
    let hi = screen_width - SPAWN_X_MARGIN - half_width;
    if hi <= lo {
        screen_width / 2.0
    } else {
        rng.gen_range(lo..hi)
    }
}
