//! Unpaced session driver: ticks as fast as possible for a fixed amount of
//! simulated time and tallies what happened.

use std::collections::BTreeMap;

use serde::Serialize;

use machines_campaign::SessionSummary;
use machines_core::constants::TICK_RATE;
use machines_core::enums::SessionPhase;
use machines_core::events::GameEvent;
use machines_sim::CombatSession;

use crate::autopilot::Autopilot;

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ticks: u64,
    pub phase: SessionPhase,
    /// Events seen over the run, by event type.
    pub events: BTreeMap<&'static str, u32>,
    pub summary: SessionSummary,
}

/// Drive `session` for up to `seconds` of simulated time, stopping early
/// once the level is won or lost.
pub fn run_headless(session: &mut CombatSession, pilot: &mut Autopilot, seconds: f64) -> RunReport {
    let max_ticks = (seconds.max(0.0) * TICK_RATE as f64).round() as u64;
    let mut events = BTreeMap::new();
    let mut ticks = 0;

    let mut snapshot = session.tick();
    while ticks < max_ticks && !snapshot.phase.is_over() {
        session.set_input(pilot.intent(&snapshot));
        snapshot = session.tick();
        ticks += 1;

        for event in &snapshot.events {
            log_event(event);
            *events.entry(event_name(event)).or_insert(0) += 1;
        }
    }

    log::info!(
        "run finished after {} ticks in phase {:?}",
        ticks,
        snapshot.phase
    );
    RunReport {
        ticks,
        phase: snapshot.phase,
        events,
        summary: session.summary(),
    }
}

pub fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::EnemyKilled { .. } => "enemy_killed",
        GameEvent::PlayerDamaged { .. } => "player_damaged",
        GameEvent::PlayerLifeLost { .. } => "player_life_lost",
        GameEvent::PlayerDied => "player_died",
        GameEvent::CollectiblePicked { .. } => "collectible_picked",
        GameEvent::LevelWaveComplete { .. } => "wave_complete",
        GameEvent::SpawnThrottled { .. } => "spawn_throttled",
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LevelWaveComplete {
            wave_index,
            waves_total,
        } => log::info!("wave {}/{} cleared", wave_index + 1, waves_total),
        GameEvent::PlayerLifeLost { lives_left } => {
            log::info!("life lost, {} remaining", lives_left)
        }
        GameEvent::PlayerDied => log::info!("player destroyed"),
        GameEvent::SpawnThrottled { dropped } => log::warn!("{} spawns throttled", dropped),
        other => log::trace!("{:?}", other),
    }
}
