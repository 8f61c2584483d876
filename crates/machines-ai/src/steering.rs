//! Steering helpers shared by the pursuit and flocking patterns.
//!
//! All functions keep speed constant and only change heading, clamped by a
//! per-frame turn limit.

use glam::DVec2;

use machines_core::constants::*;

/// Default heading for an entity that has no velocity yet: straight down.
pub const DOWN: DVec2 = DVec2::new(0.0, 1.0);

/// A nearby entity as seen by a flocking member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Rotate `v` by `angle` radians (clockwise on screen, where y points down).
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    let (s, c) = angle.sin_cos();
    DVec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Signed angle from `from` to `to` in radians, in (-PI, PI].
pub fn signed_angle(from: DVec2, to: DVec2) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.x * to.x + from.y * to.y;
    cross.atan2(dot)
}

/// Unit heading of `velocity`, or straight down when it is zero.
pub fn heading_or_down(velocity: DVec2) -> DVec2 {
    let n = velocity.normalize_or_zero();
    if n == DVec2::ZERO {
        DOWN
    } else {
        n
    }
}

/// Turn `velocity` toward `desired_dir`, at most `max_turn` radians, and
/// return the result at `speed`.
pub fn turn_toward(velocity: DVec2, desired_dir: DVec2, speed: f64, max_turn: f64) -> DVec2 {
    let current = heading_or_down(velocity);
    if desired_dir.length_squared() < 1e-12 {
        return current * speed;
    }
    let diff = signed_angle(current, desired_dir);
    let turn = diff.clamp(-max_turn.abs(), max_turn.abs());
    rotate(current, turn) * speed
}

/// Classic separation / alignment / cohesion plus a goal heading.
///
/// Returns the desired (unnormalized) direction for a member at `position`.
/// Neighbors outside `FLOCK_NEIGHBOR_RADIUS` are ignored, as is a neighbor
/// sitting exactly on `position` (the member itself).
pub fn flock_direction(position: DVec2, neighbors: &[Neighbor], goal: DVec2) -> DVec2 {
    let mut separation = DVec2::ZERO;
    let mut alignment = DVec2::ZERO;
    let mut center = DVec2::ZERO;
    let mut count = 0usize;

    for n in neighbors {
        let offset = position - n.position;
        let dist = offset.length();
        if dist <= f64::EPSILON || dist > FLOCK_NEIGHBOR_RADIUS {
            continue;
        }
        if dist < FLOCK_SEPARATION_RADIUS {
            // Stronger push the closer the neighbor.
            separation += offset / (dist * dist);
        }
        alignment += n.velocity.normalize_or_zero();
        center += n.position;
        count += 1;
    }

    let mut desired = goal.normalize_or_zero() * FLOCK_GOAL_WEIGHT;
    if count > 0 {
        let inv = 1.0 / count as f64;
        let cohesion = (center * inv - position).normalize_or_zero();
        desired += separation.normalize_or_zero() * FLOCK_SEPARATION_WEIGHT;
        desired += (alignment * inv).normalize_or_zero() * FLOCK_ALIGNMENT_WEIGHT;
        desired += cohesion * FLOCK_COHESION_WEIGHT;
    }
    desired
}
