use machines_core::enums::{EnemyKind, UpgradeCategory, WeaponPattern};

use crate::error::SaveError;
use crate::save::{parse_save, to_json, SaveDocument};
use crate::stats::*;
use crate::summary::{SessionStats, SessionSummary};
use crate::upgrades::{upgrade_cost, UpgradeState};

// ---- Player stats ----

#[test]
fn test_hull_table_endpoints() {
    let base = resolve_player_stats(&UpgradeState::new());
    assert_eq!(base.max_health, 50);
    let maxed = UpgradeState::new()
        .with_level(UpgradeCategory::Hull, 5)
        .unwrap();
    assert_eq!(resolve_player_stats(&maxed).max_health, 200);
}

#[test]
fn test_player_stats_from_every_category() {
    let upgrades = UpgradeState::new()
        .with_level(UpgradeCategory::Engine, 2)
        .unwrap()
        .with_level(UpgradeCategory::Thruster, 4)
        .unwrap()
        .with_level(UpgradeCategory::Primary, 2)
        .unwrap()
        .with_level(UpgradeCategory::Shield, 3)
        .unwrap()
        .with_level(UpgradeCategory::Secondary, 2)
        .unwrap()
        .with_level(UpgradeCategory::Magnet, 1)
        .unwrap();
    let stats = resolve_player_stats(&upgrades);
    assert!((stats.vertical_speed - 350.0).abs() < 1e-9);
    assert!((stats.lateral_speed - 450.0).abs() < 1e-9);
    assert_eq!(stats.weapon_pattern, WeaponPattern::Double);
    assert!((stats.max_shield - 100.0).abs() < 1e-9);
    assert!((stats.shield_recharge - 10.0).abs() < 1e-9);
    assert_eq!(stats.missiles_per_salvo, 2);
    assert!((stats.missile_cooldown - 3.0).abs() < 1e-9);
    assert!((stats.magnet_radius - 50.0).abs() < 1e-9);
}

#[test]
fn test_single_medium_is_faster() {
    let slow = resolve_player_stats(&UpgradeState::new());
    let medium = resolve_player_stats(
        &UpgradeState::new()
            .with_level(UpgradeCategory::Primary, 1)
            .unwrap(),
    );
    assert_eq!(slow.weapon_pattern, WeaponPattern::SingleSlow);
    assert_eq!(medium.weapon_pattern, WeaponPattern::SingleMedium);
    assert!(medium.projectile_speed > slow.projectile_speed);
}

// ---- Enemy stats ----

#[test]
fn test_enemy_stats_deterministic() {
    for kind in EnemyKind::ALL {
        let a = resolve_enemy_stats(kind, 1.3, 987_654);
        let b = resolve_enemy_stats(kind, 1.3, 987_654);
        assert_eq!(a, b, "{:?} diverged for identical inputs", kind);
    }
}

#[test]
fn test_enemy_jitter_bounded() {
    for seed in 0..200 {
        let stats = resolve_enemy_stats(EnemyKind::Heavy, 1.0, seed);
        // Heavy base: 80 hp, 30 px/s.
        assert!(
            (68..=92).contains(&stats.max_health),
            "seed {} health {}",
            seed,
            stats.max_health
        );
        assert!(stats.speed >= 30.0 * 0.85 - 1e-9 && stats.speed <= 30.0 * 1.15 + 1e-9);
    }
}

#[test]
fn test_enemy_jitter_varies_with_seed() {
    let speeds: Vec<f64> = (0..20)
        .map(|s| resolve_enemy_stats(EnemyKind::Basic, 1.0, s).speed)
        .collect();
    assert!(speeds.iter().any(|&s| (s - speeds[0]).abs() > 1e-9));
}

#[test]
fn test_difficulty_scales_enemies() {
    let easy = resolve_enemy_stats(EnemyKind::Shooter, 1.0, 5);
    let hard = resolve_enemy_stats(EnemyKind::Shooter, 2.0, 5);
    assert!(hard.max_health > easy.max_health);
    assert!(hard.fire_interval.unwrap() < easy.fire_interval.unwrap());
}

#[test]
fn test_difficulty_curve_monotonic() {
    let mut last = 0.0;
    for step in 0..100 {
        let d = difficulty_curve(1, step as f64 * 3.0);
        assert!(d >= last);
        last = d;
    }
    assert!(difficulty_curve(3, 0.0) > difficulty_curve(2, 0.0));
    assert!((difficulty_curve(1, 0.0) - 1.0).abs() < 1e-12);
}

#[test]
fn test_level_duration() {
    assert!((level_duration(1) - 90.0).abs() < 1e-9);
    assert!((level_duration(3) - 120.0).abs() < 1e-9);
}

// ---- Upgrades ----

#[test]
fn test_upgrade_costs() {
    assert_eq!(upgrade_cost(UpgradeCategory::Hull, 0), Some(50));
    assert_eq!(upgrade_cost(UpgradeCategory::Hull, 2), Some(112));
    assert_eq!(upgrade_cost(UpgradeCategory::Shield, 1), Some(200));
    assert_eq!(upgrade_cost(UpgradeCategory::Shield, 3), None);
    assert_eq!(upgrade_cost(UpgradeCategory::Primary, 5), None);
}

#[test]
fn test_set_level_bounds() {
    let mut state = UpgradeState::new();
    assert!(state.set_level(UpgradeCategory::Magnet, 3).is_ok());
    let err = state.set_level(UpgradeCategory::Magnet, 4).unwrap_err();
    assert!(matches!(err, SaveError::LevelOutOfRange { max: 3, .. }));
    assert_eq!(state.level(UpgradeCategory::Magnet), 3);
}

#[test]
fn test_purchase() {
    let mut state = UpgradeState::new();
    assert_eq!(state.purchase(UpgradeCategory::Engine, 100).unwrap(), 30);
    assert_eq!(state.level(UpgradeCategory::Engine), 1);
    let err = state.purchase(UpgradeCategory::Engine, 10).unwrap_err();
    assert!(matches!(err, SaveError::InsufficientStars { need: 48, .. }));

    let mut maxed = UpgradeState::new()
        .with_level(UpgradeCategory::Secondary, 3)
        .unwrap();
    assert!(matches!(
        maxed.purchase(UpgradeCategory::Secondary, 10_000),
        Err(SaveError::AtMaxLevel(UpgradeCategory::Secondary))
    ));
}

// ---- Save document ----

#[test]
fn test_parse_save_document() {
    let json = r#"{
        "stars": 340,
        "upgrades": {
            "hull": {"level": 2, "max_level": 5, "cost": 112},
            "primary_weapon": {"level": 3},
            "shield": {"level": 9},
            "tractor_beam": {"level": 1}
        }
    }"#;
    let doc = parse_save(json).unwrap();
    assert_eq!(doc.stars, 340);
    let state = doc.upgrade_state();
    assert_eq!(state.level(UpgradeCategory::Hull), 2);
    assert_eq!(state.level(UpgradeCategory::Primary), 3);
    // Clamped to the shield maximum.
    assert_eq!(state.level(UpgradeCategory::Shield), 3);
    assert_eq!(state.level(UpgradeCategory::Magnet), 0);
}

#[test]
fn test_parse_save_rejects_garbage() {
    assert!(matches!(parse_save("{not json"), Err(SaveError::Parse(_))));
    let empty = parse_save("{}").unwrap();
    assert_eq!(empty.stars, 0);
    assert_eq!(empty.upgrade_state(), UpgradeState::new());
}

#[test]
fn test_checked_upgrade_state_rejects_bad_entries() {
    let unknown = parse_save(r#"{"upgrades": {"tractor_beam": {"level": 1}}}"#).unwrap();
    assert!(matches!(
        unknown.checked_upgrade_state(),
        Err(SaveError::UnknownCategory(name)) if name == "tractor_beam"
    ));

    let too_high = parse_save(r#"{"upgrades": {"shield": {"level": 9}}}"#).unwrap();
    assert!(matches!(
        too_high.checked_upgrade_state(),
        Err(SaveError::LevelOutOfRange { max: 3, .. })
    ));

    let good = parse_save(r#"{"upgrades": {"hull": {"level": 2}}}"#).unwrap();
    let state = good.checked_upgrade_state().unwrap();
    assert_eq!(state, good.upgrade_state());
    assert_eq!(state.level(UpgradeCategory::Hull), 2);
}

#[test]
fn test_save_document_write_back() {
    let mut doc = SaveDocument::default();
    let state = UpgradeState::new()
        .with_level(UpgradeCategory::Thruster, 2)
        .unwrap();
    doc.store_upgrades(&state);
    let json = to_json(&doc).unwrap();
    let back = parse_save(&json).unwrap();
    assert_eq!(back.upgrade_state(), state);
}

// ---- Summary ----

#[test]
fn test_summary_rates_and_bonus() {
    let stats = SessionStats {
        enemies_killed: 8,
        enemies_escaped: 2,
        stars_collected: 3,
        stars_missed: 1,
        shots_fired: 40,
        shots_hit: 10,
        currency: 27,
        score: 1000,
    };
    assert!((stats.kill_rate() - 80.0).abs() < 1e-9);
    assert!((stats.collection_rate() - 75.0).abs() < 1e-9);
    assert!((stats.accuracy() - 25.0).abs() < 1e-9);
    // 1 + (40 + 22.5 + 5) / 100
    assert!((stats.bonus_multiplier() - 1.675).abs() < 1e-9);

    let summary = SessionSummary::from_stats(2, true, &stats);
    assert_eq!(summary.currency_earned, 27);
    assert_eq!(summary.level_score, 1675);

    let mut doc = SaveDocument {
        stars: 10,
        ..Default::default()
    };
    doc.apply_summary(&summary);
    assert_eq!(doc.stars, 37);
}

#[test]
fn test_summary_empty_session() {
    let stats = SessionStats::default();
    assert_eq!(stats.accuracy(), 0.0);
    assert!((stats.bonus_multiplier() - 1.0).abs() < 1e-12);
}
