//! Tests for the headless runner, autopilot and game loop thread.

use std::sync::{mpsc, Arc, Mutex};

use machines_campaign::save;
use machines_campaign::UpgradeState;
use machines_core::config::SimConfig;
use machines_core::enums::{EntityKind, SessionPhase};
use machines_core::events::GameEvent;
use machines_core::state::{FrameSnapshot, RenderEntity, VisualVariant};
use machines_core::types::EntityId;
use machines_sim::scenario;
use machines_sim::waves::LevelDefinition;
use machines_sim::CombatSession;

use crate::autopilot::Autopilot;
use crate::error::AppError;
use crate::game_loop::{self, LoopCommand};
use crate::runner;

const SAMPLE_LEVEL: &str = include_str!("../levels/level1.json");

fn entity(id: u32, kind: EntityKind, x: f64, y: f64) -> RenderEntity {
    RenderEntity {
        id: EntityId(id),
        kind,
        x,
        y,
        rotation: 0.0,
        variant: VisualVariant::Spark,
    }
}

// ---- Autopilot ----

#[test]
fn test_autopilot_chases_lowest_enemy() {
    let snapshot = FrameSnapshot {
        entities: vec![
            entity(0, EntityKind::Player, 640.0, 620.0),
            entity(1, EntityKind::Enemy, 200.0, 100.0),
            entity(2, EntityKind::Enemy, 900.0, 300.0),
        ],
        ..Default::default()
    };
    let intent = Autopilot::new().intent(&snapshot);
    assert!(intent.fire);
    assert!(intent.special);
    assert!((intent.move_x - 1.0).abs() < 1e-9, "should strafe right");
}

#[test]
fn test_autopilot_without_ship_is_idle() {
    let snapshot = FrameSnapshot::default();
    let intent = Autopilot::new().intent(&snapshot);
    assert!(!intent.fire);
    assert_eq!(intent.move_x, 0.0);
}

#[test]
fn test_autopilot_ignores_enemies_behind() {
    let snapshot = FrameSnapshot {
        entities: vec![
            entity(0, EntityKind::Player, 640.0, 620.0),
            entity(1, EntityKind::Enemy, 100.0, 700.0),
        ],
        ..Default::default()
    };
    let intent = Autopilot::new().intent(&snapshot);
    assert!(!intent.special);
    assert!(intent.move_x.abs() <= 1.0);
}

// ---- Content ----

#[test]
fn test_sample_level_is_valid() {
    let level: LevelDefinition = serde_json::from_str(SAMPLE_LEVEL).unwrap();
    let (waves, errors) = level.validate();
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(waves.len(), 3);
    assert_eq!(waves[0].directives.len(), 5);
}

#[test]
fn test_save_upgrades_reach_the_session() {
    let doc = save::parse_save(r#"{"stars": 10, "upgrades": {"primary": {"level": 2}}}"#).unwrap();
    let session = CombatSession::new(SimConfig::default(), doc.upgrade_state());
    assert_eq!(
        session.player_stats().weapon_pattern,
        machines_core::enums::WeaponPattern::Double
    );
}

// ---- Runner ----

#[test]
fn test_headless_run_plays_default_level() {
    let mut session = CombatSession::new(SimConfig::default(), UpgradeState::new());
    session.load_waves(scenario::default_level(1));
    let report = runner::run_headless(&mut session, &mut Autopilot::new(), 60.0);

    assert!(report.ticks > 0 && report.ticks <= 3600);
    assert_ne!(report.phase, SessionPhase::Idle);
    assert!(report.summary.stats.shots_fired > 0);
    assert!(report.events.contains_key("wave_complete"));
}

#[test]
fn test_headless_run_stops_when_level_is_over() {
    let mut session = CombatSession::new(SimConfig::default(), UpgradeState::new());
    session.load_level(&LevelDefinition::default());
    let report = runner::run_headless(&mut session, &mut Autopilot::new(), 60.0);
    assert_eq!(report.ticks, 0);
    assert_eq!(report.phase, SessionPhase::LevelComplete);
    assert!(report.summary.completed);
}

#[test]
fn test_headless_run_is_reproducible() {
    let play = || {
        let level: LevelDefinition = serde_json::from_str(SAMPLE_LEVEL).unwrap();
        let mut session = CombatSession::new(SimConfig::default(), UpgradeState::new());
        session.load_level(&level);
        runner::run_headless(&mut session, &mut Autopilot::new(), 20.0)
    };
    let a = serde_json::to_string(&play()).unwrap();
    let b = serde_json::to_string(&play()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_event_names_are_distinct() {
    let names = [
        runner::event_name(&GameEvent::PlayerDied),
        runner::event_name(&GameEvent::SpawnThrottled { dropped: 1 }),
        runner::event_name(&GameEvent::PlayerLifeLost { lives_left: 1 }),
    ];
    assert_ne!(names[0], names[1]);
    assert_ne!(names[1], names[2]);
}

// ---- Game loop ----

#[test]
fn test_command_channel_round_trip() {
    let (tx, rx) = mpsc::channel::<LoopCommand>();
    tx.send(LoopCommand::Input(Default::default())).unwrap();
    tx.send(LoopCommand::Session(
        machines_core::commands::SessionCommand::Pause,
    ))
    .unwrap();
    tx.send(LoopCommand::Shutdown).unwrap();

    let commands: Vec<LoopCommand> = rx.try_iter().collect();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[2], LoopCommand::Shutdown));
}

#[test]
fn test_game_loop_publishes_and_shuts_down() {
    let mut session = CombatSession::new(SimConfig::default(), UpgradeState::new());
    session.load_waves(scenario::default_level(1));
    let latest = Arc::new(Mutex::new(None));
    let (tx, handle) = game_loop::spawn_game_loop(session, Arc::clone(&latest)).unwrap();

    std::thread::sleep(game_loop::TICK_DURATION * 10);
    tx.send(LoopCommand::Shutdown).unwrap();
    let summary = handle.join().unwrap();

    assert!(!summary.completed);
    let snapshot = latest.lock().unwrap().clone().unwrap();
    assert!(snapshot.time.tick > 0);
}

#[test]
fn test_game_loop_exits_when_level_is_over() {
    let mut session = CombatSession::new(SimConfig::default(), UpgradeState::new());
    session.load_level(&LevelDefinition::default());
    let latest = Arc::new(Mutex::new(None));
    let (_tx, handle) = game_loop::spawn_game_loop(session, latest).unwrap();
    assert!(handle.join().unwrap().completed);
}

#[test]
fn test_error_messages_name_the_file() {
    let err = AppError::Read {
        path: "missing.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert!(err.to_string().contains("missing.json"));
}
