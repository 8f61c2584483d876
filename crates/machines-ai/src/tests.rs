#[cfg(test)]
mod tests {
    use glam::DVec2;

    use machines_core::constants::DT;
    use machines_core::enums::EnemyKind;

    use crate::patterns::*;
    use crate::profiles::{default_pattern, get_profile};
    use crate::steering::{self, Neighbor};

    fn run(pattern: &mut MovementPattern, start: DVec2, frames: usize) -> DVec2 {
        let mut pos = start;
        let mut vel = DVec2::ZERO;
        for _ in 0..frames {
            let step = pattern.advance(&PatternContext::at(pos, vel), DT);
            pos += step.displacement;
            vel = step.velocity;
        }
        pos
    }

    #[test]
    fn test_linear_constant_velocity() {
        let mut p = MovementPattern::linear(DVec2::new(30.0, 60.0));
        let end = run(&mut p, DVec2::new(100.0, 0.0), 60);
        assert!((end.x - 130.0).abs() < 1e-6, "x = {}", end.x);
        assert!((end.y - 60.0).abs() < 1e-6, "y = {}", end.y);
        assert!((p.elapsed() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zigzag_lateral_follows_sine() {
        let amplitude = 50.0;
        let frequency = 2.0;
        let mut p = MovementPattern::new(PatternKind::Zigzag {
            speed: 60.0,
            amplitude,
            frequency,
            phase: 0.0,
        });
        let mut pos = DVec2::ZERO;
        for i in 1..=240 {
            let step = p.advance(&PatternContext::at(pos, DVec2::ZERO), DT);
            pos += step.displacement;
            let t = i as f64 * DT;
            let expected_x = amplitude * (frequency * t).sin();
            assert!(
                (pos.x - expected_x).abs() < 1e-6,
                "frame {}: x {} vs {}",
                i,
                pos.x,
                expected_x
            );
            assert!(pos.x.abs() <= amplitude + 1e-9);
        }
        assert!((pos.y - 240.0).abs() < 1e-6, "downward drift, got {}", pos.y);
    }

    #[test]
    fn test_pursuit_turn_rate_is_capped() {
        let max_turn_rate = 2.0;
        let mut p = MovementPattern::new(PatternKind::Pursuit {
            target: PursuitTarget::Player,
            speed: 100.0,
            max_turn_rate,
        });
        // Heading down, target directly above: needs a 180 degree turn.
        let ctx = PatternContext {
            position: DVec2::new(0.0, 0.0),
            velocity: DVec2::new(0.0, 100.0),
            target: Some(DVec2::new(0.0, -500.0)),
            neighbors: &[],
        };
        let step = p.advance(&ctx, DT);
        let turned = steering::signed_angle(DVec2::new(0.0, 1.0), step.velocity).abs();
        assert!(
            turned <= max_turn_rate * DT + 1e-9,
            "turned {} rad in one frame",
            turned
        );
        assert!((step.velocity.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pursuit_converges_on_target() {
        let mut p = MovementPattern::new(PatternKind::Pursuit {
            target: PursuitTarget::Player,
            speed: 150.0,
            max_turn_rate: 3.0,
        });
        let target = DVec2::new(400.0, 600.0);
        let mut pos = DVec2::new(100.0, 0.0);
        let mut vel = DVec2::new(0.0, 150.0);
        let start_dist = pos.distance(target);
        for _ in 0..180 {
            let ctx = PatternContext {
                position: pos,
                velocity: vel,
                target: Some(target),
                neighbors: &[],
            };
            let step = p.advance(&ctx, DT);
            pos += step.displacement;
            vel = step.velocity;
        }
        assert!(pos.distance(target) < start_dist * 0.5);
    }

    #[test]
    fn test_pursuit_without_target_holds_course() {
        let mut p = MovementPattern::new(PatternKind::Pursuit {
            target: PursuitTarget::Player,
            speed: 80.0,
            max_turn_rate: 3.0,
        });
        let ctx = PatternContext::at(DVec2::ZERO, DVec2::new(80.0, 0.0));
        let step = p.advance(&ctx, DT);
        assert!((step.velocity - DVec2::new(80.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_orbit_keeps_radius_around_static_center() {
        let center = DVec2::new(300.0, 200.0);
        let mut p = MovementPattern::new(PatternKind::Orbit {
            center,
            center_velocity: DVec2::ZERO,
            radius: 80.0,
            angular_velocity: 1.5,
            start_angle: 0.3,
        });
        let start = p.start_position().unwrap();
        assert!((start.distance(center) - 80.0).abs() < 1e-9);
        let mut pos = start;
        for _ in 0..300 {
            pos += p.advance(&PatternContext::at(pos, DVec2::ZERO), DT).displacement;
            assert!((pos.distance(center) - 80.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_orbit_center_can_move() {
        let mut p = MovementPattern::new(PatternKind::Orbit {
            center: DVec2::ZERO,
            center_velocity: DVec2::new(0.0, 50.0),
            radius: 40.0,
            angular_velocity: 2.0,
            start_angle: 0.0,
        });
        let start = p.start_position().unwrap();
        let end = run(&mut p, start, 120);
        let center_now = DVec2::new(0.0, 100.0);
        assert!((end.distance(center_now) - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_bezier_completes_at_endpoint() {
        let points = [
            DVec2::new(0.0, -50.0),
            DVec2::new(200.0, 100.0),
            DVec2::new(400.0, 100.0),
            DVec2::new(600.0, 300.0),
        ];
        let mut p = MovementPattern::new(PatternKind::Bezier {
            points,
            duration: 2.0,
        });
        let mut pos = p.start_position().unwrap();
        let mut completed_at = None;
        for i in 1..=200 {
            let step = p.advance(&PatternContext::at(pos, DVec2::ZERO), DT);
            pos += step.displacement;
            if step.completed && completed_at.is_none() {
                completed_at = Some(i);
            }
        }
        let frame = completed_at.expect("bezier never completed");
        assert!((119..=121).contains(&frame), "completed on frame {}", frame);
        assert!(pos.distance(points[3]) < 1e-6, "ended at {:?}", pos);
        assert!(p.is_completed());
    }

    #[test]
    fn test_switch_resets_elapsed() {
        let mut p = MovementPattern::linear(DVec2::new(0.0, 10.0));
        run(&mut p, DVec2::ZERO, 30);
        assert!(p.elapsed() > 0.0);
        p.switch_to(PatternKind::Zigzag {
            speed: 10.0,
            amplitude: 5.0,
            frequency: 1.0,
            phase: 0.0,
        });
        assert_eq!(p.elapsed(), 0.0);
        assert!(!p.is_completed());
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let mut p = MovementPattern::linear(DVec2::new(0.0, 10.0));
        let mut last = p.elapsed();
        for _ in 0..10 {
            p.advance(&PatternContext::at(DVec2::ZERO, DVec2::ZERO), DT);
            assert!(p.elapsed() > last);
            last = p.elapsed();
        }
        // A zero step leaves elapsed alone.
        p.advance(&PatternContext::at(DVec2::ZERO, DVec2::ZERO), 0.0);
        assert_eq!(p.elapsed(), last);
    }

    #[test]
    fn test_flocking_separates_crowded_members() {
        let mut p = MovementPattern::new(PatternKind::Flocking {
            speed: 100.0,
            goal: DVec2::new(0.0, 1.0),
        });
        let neighbors = [Neighbor {
            position: DVec2::new(10.0, 0.0),
            velocity: DVec2::new(0.0, 100.0),
        }];
        let ctx = PatternContext {
            position: DVec2::ZERO,
            velocity: DVec2::new(0.0, 100.0),
            target: None,
            neighbors: &neighbors,
        };
        let step = p.advance(&ctx, DT);
        assert!(step.velocity.x < 0.0, "should veer away, vx = {}", step.velocity.x);
        assert!((step.velocity.length() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_pattern_serde_tag() {
        let kind: PatternKind = serde_json::from_str(
            r#"{"pattern":"zigzag","speed":60.0,"amplitude":40.0,"frequency":2.0}"#,
        )
        .unwrap();
        assert!(matches!(kind, PatternKind::Zigzag { phase, .. } if phase == 0.0));
    }

    #[test]
    fn test_profiles_table() {
        let basic = get_profile(EnemyKind::Basic);
        assert_eq!(basic.health, 20);
        assert!(basic.fire_interval.is_none());
        assert!(get_profile(EnemyKind::Shooter).fire_interval.is_some());
        assert!(get_profile(EnemyKind::ShieldBearer).shielded);
        assert!(get_profile(EnemyKind::Heavy).health > basic.health);
        assert!(get_profile(EnemyKind::Dart).speed > basic.speed);
    }

    #[test]
    fn test_default_patterns_by_kind() {
        assert!(matches!(
            default_pattern(EnemyKind::Basic, 60.0, 0.0),
            PatternKind::Linear { .. }
        ));
        assert!(matches!(
            default_pattern(EnemyKind::Zigzag, 60.0, 0.0),
            PatternKind::Zigzag { .. }
        ));
        assert!(matches!(
            default_pattern(EnemyKind::Dart, 120.0, 0.0),
            PatternKind::Pursuit {
                target: PursuitTarget::Player,
                ..
            }
        ));
    }
}
