//! Primary weapon volleys.
//!
//! Turns a firing pattern plus the ship's pose into the set of shots to
//! spawn. Every shot leaves from the ship's nose.

use std::f64::consts::PI;

use glam::DVec2;

use machines_core::constants::*;
use machines_core::enums::WeaponPattern;
use machines_core::types::facing_vector;

/// One shot of a volley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Shots fired by `pattern` from a ship centred at `origin` facing `angle`.
pub fn volley(pattern: WeaponPattern, origin: DVec2, angle: f64, speed: f64) -> Vec<Shot> {
    let facing = facing_vector(angle);
    let nose = origin + facing * (PLAYER_HEIGHT / 2.0);
    let aimed = |offset: f64| Shot {
        position: nose,
        velocity: facing_vector(angle + offset) * speed,
    };

    match pattern {
        WeaponPattern::SingleSlow | WeaponPattern::SingleMedium => vec![aimed(0.0)],
        WeaponPattern::Double => {
            // Perpendicular to the facing, pointing to the ship's right.
            let side = DVec2::new(angle.cos(), angle.sin()) * DOUBLE_SHOT_OFFSET;
            let velocity = facing * speed;
            vec![
                Shot {
                    position: nose - side,
                    velocity,
                },
                Shot {
                    position: nose + side,
                    velocity,
                },
            ]
        }
        WeaponPattern::Triple => vec![aimed(0.0), aimed(-TRIPLE_SPREAD), aimed(TRIPLE_SPREAD)],
        WeaponPattern::Quad => vec![
            aimed(0.0),
            aimed(-QUAD_SPREAD),
            aimed(QUAD_SPREAD),
            // Tail gun.
            aimed(PI),
        ],
        WeaponPattern::Five => vec![
            aimed(0.0),
            aimed(-FIVE_SPREAD_INNER),
            aimed(FIVE_SPREAD_INNER),
            aimed(-FIVE_SPREAD_OUTER),
            aimed(FIVE_SPREAD_OUTER),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_is_symmetric_about_the_nose() {
        let shots = volley(
            WeaponPattern::Double,
            DVec2::new(400.0, 700.0),
            0.0,
            PROJECTILE_SPEED,
        );
        assert_eq!(shots.len(), 2);
        assert!((shots[0].position.x - 390.0).abs() < 1e-9);
        assert!((shots[1].position.x - 410.0).abs() < 1e-9);
        for shot in &shots {
            assert!((shot.position.y - 670.0).abs() < 1e-9);
            assert!((shot.velocity - DVec2::new(0.0, -PROJECTILE_SPEED)).length() < 1e-9);
        }
    }

    #[test]
    fn test_spread_counts() {
        let origin = DVec2::new(100.0, 100.0);
        let counts: Vec<usize> = [
            WeaponPattern::SingleSlow,
            WeaponPattern::SingleMedium,
            WeaponPattern::Double,
            WeaponPattern::Triple,
            WeaponPattern::Quad,
            WeaponPattern::Five,
        ]
        .into_iter()
        .map(|p| volley(p, origin, 0.3, 500.0).len())
        .collect();
        assert_eq!(counts, vec![1, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_spread_keeps_speed_and_mirrors() {
        let shots = volley(WeaponPattern::Five, DVec2::ZERO, 0.0, 500.0);
        for shot in &shots {
            assert!((shot.velocity.length() - 500.0).abs() < 1e-9);
        }
        // Outer pair mirrored about the facing axis.
        assert!((shots[3].velocity.x + shots[4].velocity.x).abs() < 1e-9);
        assert!((shots[3].velocity.y - shots[4].velocity.y).abs() < 1e-9);
    }

    #[test]
    fn test_quad_tail_gun_fires_backwards() {
        let shots = volley(WeaponPattern::Quad, DVec2::ZERO, 0.0, 500.0);
        assert!(shots[3].velocity.y > 499.0);
    }
}
