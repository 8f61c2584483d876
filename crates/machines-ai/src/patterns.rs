//! Movement patterns: per-entity trajectory functions.
//!
//! A `MovementPattern` is bound to one entity and advanced once per frame.
//! Its parameters are fixed at construction; the only state that changes is
//! `elapsed` (and the sticky completion flag). Patterns never touch the ECS:
//! the caller resolves anything they need from the world into a
//! `PatternContext` and applies the returned displacement.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use machines_core::constants::FLOCK_RESPONSE;
use machines_core::types::EntityId;

use crate::steering::{self, Neighbor};

/// What a pursuing entity steers toward. Re-resolved every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuitTarget {
    Player,
    Entity(EntityId),
}

/// Pattern kind plus its immutable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum PatternKind {
    /// Constant velocity.
    Linear { velocity: DVec2 },
    /// Downward drift plus a lateral sine of `amplitude` px.
    /// `frequency` is angular (rad/s).
    Zigzag {
        speed: f64,
        amplitude: f64,
        frequency: f64,
        #[serde(default)]
        phase: f64,
    },
    /// Constant-speed chase, heading change capped at `max_turn_rate` rad/s.
    Pursuit {
        target: PursuitTarget,
        speed: f64,
        max_turn_rate: f64,
    },
    /// Circle of `radius` around a center that itself moves at
    /// `center_velocity` (zero for a static center).
    Orbit {
        center: DVec2,
        #[serde(default)]
        center_velocity: DVec2,
        radius: f64,
        angular_velocity: f64,
        #[serde(default)]
        start_angle: f64,
    },
    /// Cubic Bezier through four control points over `duration` seconds.
    Bezier { points: [DVec2; 4], duration: f64 },
    /// Boids steering toward `goal` (a direction) among neighbors.
    Flocking { speed: f64, goal: DVec2 },
}

/// World information a pattern may need this frame.
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Resolved pursuit target position, if the target is still alive.
    pub target: Option<DVec2>,
    pub neighbors: &'a [Neighbor],
}

/// Result of advancing a pattern by one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternStep {
    pub displacement: DVec2,
    /// Effective velocity over the step (displacement / dt).
    pub velocity: DVec2,
    /// True once a finite pattern (Bezier) has reached its end.
    pub completed: bool,
}

/// A pattern instance bound to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPattern {
    kind: PatternKind,
    elapsed: f64,
    completed: bool,
}

impl<'a> PatternContext<'a> {
    /// Context with no target and no neighbors.
    pub fn at(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity,
            target: None,
            neighbors: &[],
        }
    }
}

impl MovementPattern {
    pub fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            elapsed: 0.0,
            completed: false,
        }
    }

    pub fn linear(velocity: DVec2) -> Self {
        Self::new(PatternKind::Linear { velocity })
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Replace the pattern. Elapsed time restarts from zero.
    pub fn switch_to(&mut self, kind: PatternKind) {
        self.kind = kind;
        self.elapsed = 0.0;
        self.completed = false;
    }

    /// The pursuit target, if this is a pursuit pattern.
    pub fn pursuit_target(&self) -> Option<PursuitTarget> {
        match self.kind {
            PatternKind::Pursuit { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn wants_neighbors(&self) -> bool {
        matches!(self.kind, PatternKind::Flocking { .. })
    }

    /// Where an entity should be placed for this pattern at elapsed zero.
    /// Only Orbit and Bezier pin their own start; other patterns start
    /// wherever the entity is.
    pub fn start_position(&self) -> Option<DVec2> {
        match &self.kind {
            PatternKind::Orbit { .. } => Some(self.orbit_position(0.0)),
            PatternKind::Bezier { points, .. } => Some(points[0]),
            _ => None,
        }
    }

    /// Advance by `dt` seconds and return this frame's displacement.
    pub fn advance(&mut self, ctx: &PatternContext<'_>, dt: f64) -> PatternStep {
        if dt <= 0.0 || self.completed {
            let velocity = if self.completed { ctx.velocity } else { DVec2::ZERO };
            return PatternStep {
                displacement: DVec2::ZERO,
                velocity,
                completed: self.completed,
            };
        }

        let t0 = self.elapsed;
        let t1 = t0 + dt;

        let displacement = match &self.kind {
            PatternKind::Linear { velocity } => *velocity * dt,
            PatternKind::Zigzag {
                speed,
                amplitude,
                frequency,
                phase,
            } => {
                let lateral =
                    amplitude * ((frequency * t1 + phase).sin() - (frequency * t0 + phase).sin());
                DVec2::new(lateral, speed * dt)
            }
            PatternKind::Pursuit {
                speed,
                max_turn_rate,
                ..
            } => {
                let velocity = match ctx.target {
                    Some(target) => steering::turn_toward(
                        ctx.velocity,
                        target - ctx.position,
                        *speed,
                        max_turn_rate * dt,
                    ),
                    // Target gone: hold course.
                    None => steering::heading_or_down(ctx.velocity) * *speed,
                };
                velocity * dt
            }
            PatternKind::Orbit { .. } => self.orbit_position(t1) - self.orbit_position(t0),
            PatternKind::Bezier { points, duration } => {
                if *duration <= 0.0 {
                    self.completed = true;
                    DVec2::ZERO
                } else {
                    let u0 = (t0 / duration).clamp(0.0, 1.0);
                    let u1 = (t1 / duration).clamp(0.0, 1.0);
                    if u1 >= 1.0 {
                        self.completed = true;
                    }
                    cubic_bezier(points, u1) - cubic_bezier(points, u0)
                }
            }
            PatternKind::Flocking { speed, goal } => {
                let desired = steering::flock_direction(ctx.position, ctx.neighbors, *goal);
                let current = steering::heading_or_down(ctx.velocity);
                let blended = current + desired * (FLOCK_RESPONSE * dt);
                steering::heading_or_down(blended) * *speed * dt
            }
        };

        self.elapsed = t1;
        PatternStep {
            displacement,
            velocity: displacement / dt,
            completed: self.completed,
        }
    }

    fn orbit_position(&self, t: f64) -> DVec2 {
        match &self.kind {
            PatternKind::Orbit {
                center,
                center_velocity,
                radius,
                angular_velocity,
                start_angle,
            } => {
                let angle = start_angle + angular_velocity * t;
                *center + *center_velocity * t + DVec2::new(angle.cos(), angle.sin()) * *radius
            }
            _ => DVec2::ZERO,
        }
    }
}

/// Point on a cubic Bezier at parameter `u` in [0, 1].
pub fn cubic_bezier(p: &[DVec2; 4], u: f64) -> DVec2 {
    let v = 1.0 - u;
    p[0] * (v * v * v) + p[1] * (3.0 * v * v * u) + p[2] * (3.0 * v * u * u) + p[3] * (u * u * u)
}

/// Final tangent of a Bezier path, used for the linear exit after completion.
pub fn bezier_exit_direction(p: &[DVec2; 4]) -> DVec2 {
    let d = p[3] - p[2];
    if d.length_squared() > 1e-12 {
        d.normalize()
    } else {
        steering::heading_or_down(p[3] - p[0])
    }
}
