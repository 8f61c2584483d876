#[cfg(test)]
mod tests {
    use crate::commands::SessionCommand;
    use crate::config::SimConfig;
    use crate::enums::*;
    use crate::error::ContentError;
    use crate::events::GameEvent;
    use crate::state::{FrameSnapshot, VisualVariant};
    use crate::types::*;

    #[test]
    fn test_enemy_kind_content_names() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::parse(kind.as_str()), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(EnemyKind::parse("SHOOTER"), Ok(EnemyKind::Shooter));
    }

    #[test]
    fn test_unknown_identifiers_are_content_errors() {
        assert_eq!(
            EnemyKind::parse("kraken"),
            Err(ContentError::UnknownEnemy("kraken".into()))
        );
        assert!(matches!(
            FormationShape::parse("spiral"),
            Err(ContentError::UnknownFormation(_))
        ));
        assert!(matches!(
            FormationBehavior::parse("teleport"),
            Err(ContentError::UnknownBehavior(_))
        ));
        assert_eq!(UpgradeCategory::parse("warp_drive"), None);
    }

    #[test]
    fn test_upgrade_category_max_levels() {
        assert_eq!(UpgradeCategory::Hull.max_level(), 5);
        assert_eq!(UpgradeCategory::Primary.max_level(), 5);
        assert_eq!(UpgradeCategory::Shield.max_level(), 3);
        assert_eq!(UpgradeCategory::Magnet.max_level(), 3);
        for cat in UpgradeCategory::ALL {
            assert_eq!(UpgradeCategory::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Position::new(100.0, 100.0), Size::new(40.0, 40.0));
        let b = Aabb::from_center(Position::new(130.0, 100.0), Size::new(40.0, 40.0));
        let c = Aabb::from_center(Position::new(140.0, 100.0), Size::new(40.0, 40.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching edges only.
        assert!(!a.overlaps(&c));
        assert!((a.min_x - 80.0).abs() < 1e-9);
        assert!((a.max_y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_and_facing_agree() {
        let up = Velocity::new(0.0, -100.0);
        assert!(up.heading().abs() < 1e-9);
        let right = Velocity::new(100.0, 0.0);
        assert!((right.heading() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let f = facing_vector(std::f64::consts::FRAC_PI_2);
        assert!((f.x - 1.0).abs() < 1e-9 && f.y.abs() < 1e-9);
        let f0 = facing_vector(0.0);
        assert!((f0.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..60 {
            t.advance();
        }
        assert_eq!(t.tick, 60);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_fills_missing_fields() {
        let cfg: SimConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.level, 1);
        assert!((cfg.screen_width - 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_and_command_tagging() {
        let ev = GameEvent::EnemyKilled {
            id: EntityId(4),
            kind: EnemyKind::Basic,
            points: 10,
            by_missile: false,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"EnemyKilled\""));

        let cmd: SessionCommand =
            serde_json::from_str(r#"{"type":"ClearFormation","id":3}"#).unwrap();
        assert!(matches!(cmd, SessionCommand::ClearFormation { id } if id == FormationId(3)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = FrameSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, SessionPhase::Idle);

        let v = VisualVariant::Enemy(EnemyKind::Dart);
        let json = serde_json::to_string(&v).unwrap();
        let back: VisualVariant = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
