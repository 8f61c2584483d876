//! Combat session: the owned per-session service that runs the frame loop.
//!
//! `CombatSession` owns the entity registry, formation manager, wave
//! orchestrator and collision engine for one play session, processes input
//! and level-control commands, runs every system in a fixed order and
//! produces `FrameSnapshot`s. Completely headless, so tests can drive it
//! tick by tick.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use machines_campaign::stats::resolve_player_stats;
use machines_campaign::{PlayerStats, SessionStats, SessionSummary, UpgradeState};
use machines_core::commands::{InputIntent, SessionCommand};
use machines_core::config::SimConfig;
use machines_core::enums::SessionPhase;
use machines_core::error::ContentError;
use machines_core::events::GameEvent;
use machines_core::state::{FrameSnapshot, WaveView};
use machines_core::types::{EntityId, SimTime};

use crate::collision::{CollisionContext, CollisionEngine};
use crate::formation::FormationManager;
use crate::registry::EntityRegistry;
use crate::systems;
use crate::systems::snapshot::SnapshotInput;
use crate::waves::{LevelDefinition, SpawnContext, WaveDefinition, WaveOrchestrator};
use crate::world_setup;

pub struct CombatSession {
    config: SimConfig,
    registry: EntityRegistry,
    formations: FormationManager,
    orchestrator: WaveOrchestrator,
    collisions: CollisionEngine,
    pending_waves: VecDeque<WaveDefinition>,
    wave_index: usize,
    waves_total: usize,
    player: Option<EntityId>,
    player_stats: PlayerStats,
    upgrades: UpgradeState,
    rng: ChaCha8Rng,
    time: SimTime,
    /// Seconds of active play since the level was loaded.
    level_elapsed: f64,
    level: u32,
    phase: SessionPhase,
    input: InputIntent,
    command_queue: VecDeque<SessionCommand>,
    despawn_buffer: Vec<EntityId>,
    events: Vec<GameEvent>,
    stats: SessionStats,
}

impl CombatSession {
    /// Create a session and place the player ship. No level is loaded yet.
    pub fn new(config: SimConfig, upgrades: UpgradeState) -> Self {
        let player_stats = resolve_player_stats(&upgrades);
        let mut registry = EntityRegistry::new(config.max_entities.max(1));
        let player = world_setup::spawn_player(&mut registry, &player_stats, &config);

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            level: config.level.max(1),
            registry,
            formations: FormationManager::new(),
            orchestrator: WaveOrchestrator::new(),
            collisions: CollisionEngine::new(),
            pending_waves: VecDeque::new(),
            wave_index: 0,
            waves_total: 0,
            player,
            player_stats,
            upgrades,
            time: SimTime::default(),
            level_elapsed: 0.0,
            phase: SessionPhase::Idle,
            input: InputIntent::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            stats: SessionStats::default(),
            config,
        }
    }

    /// Validate and start a level. Bad directives are skipped and returned;
    /// the rest of the level still plays.
    pub fn load_level(&mut self, level: &LevelDefinition) -> Vec<ContentError> {
        let (waves, errors) = level.validate();
        self.level = level.level.max(1);
        self.load_waves(waves);
        errors
    }

    /// Start a level from already-validated waves.
    pub fn load_waves(&mut self, waves: Vec<WaveDefinition>) {
        self.waves_total = waves.len();
        self.wave_index = 0;
        self.level_elapsed = 0.0;
        self.pending_waves = waves.into();
        self.orchestrator = WaveOrchestrator::new();
        log::info!("level {} loaded with {} waves", self.level, self.waves_total);

        if self.phase == SessionPhase::Defeat {
            return;
        }
        self.phase = SessionPhase::Active;
        self.start_next_wave();
    }

    /// Input for the coming frames. Sticky until replaced.
    pub fn set_input(&mut self, input: InputIntent) {
        self.input = input;
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the session by one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();

        if self.phase == SessionPhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let wave = WaveView {
            index: self.wave_index,
            total: self.waves_total,
            clock: self.orchestrator.clock(),
            live_spawns: self.orchestrator.live_spawns(&self.registry),
        };
        systems::snapshot::build_snapshot(
            &self.registry,
            SnapshotInput {
                time: self.time,
                phase: self.phase,
                events: std::mem::take(&mut self.events),
                player: self.player,
                player_stats: &self.player_stats,
                session: &self.stats,
                wave,
            },
        )
    }

    /// End-of-session result for the save collaborator.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_stats(
            self.level,
            self.phase == SessionPhase::LevelComplete,
            &self.stats,
        )
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn player_stats(&self) -> &PlayerStats {
        &self.player_stats
    }

    pub fn upgrades(&self) -> &UpgradeState {
        &self.upgrades
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player.filter(|&id| self.registry.is_alive(id))
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn formations(&self) -> &FormationManager {
        &self.formations
    }

    pub fn orchestrator(&self) -> &WaveOrchestrator {
        &self.orchestrator
    }

    /// Waves in the loaded level.
    pub fn waves_total(&self) -> usize {
        self.waves_total
    }

    /// Registry access for tests that stage encounters by hand.
    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    #[cfg(test)]
    pub(crate) fn formation_parts(
        &mut self,
    ) -> (&mut FormationManager, &mut EntityRegistry, &mut ChaCha8Rng) {
        (&mut self.formations, &mut self.registry, &mut self.rng)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Pause => {
                if self.phase == SessionPhase::Active {
                    self.phase = SessionPhase::Paused;
                }
            }
            SessionCommand::Resume => {
                if self.phase == SessionPhase::Paused {
                    self.phase = SessionPhase::Active;
                }
            }
            SessionCommand::ClearWave => {
                self.orchestrator
                    .force_clear(&mut self.registry, &mut self.formations);
            }
            SessionCommand::ClearFormation { id } => {
                self.formations.force_clear(id, &mut self.registry);
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();

        // 1. Wave spawning
        self.orchestrator.update(
            dt,
            &mut SpawnContext {
                registry: &mut self.registry,
                formations: &mut self.formations,
                rng: &mut self.rng,
                level: self.level,
                level_elapsed: self.level_elapsed,
                screen_width: self.config.screen_width,
            },
        );
        // 2. Player steering and weapons
        if let Some(player) = self.player {
            systems::player::run(
                &mut self.registry,
                player,
                &self.player_stats,
                &self.input,
                &self.config,
                &mut self.stats,
                dt,
            );
        }
        // 3. Enemy guns and shields
        systems::enemy_behavior::run(&mut self.registry, &mut self.rng, dt);
        // 4. Pattern movement and velocity integration
        systems::movement::run(&mut self.registry, self.player, dt);
        // 5. Formation transforms
        self.formations.update(dt, &mut self.registry);
        // 6. Pickup magnet
        if let Some(player) = self.player {
            systems::magnet::run(&mut self.registry, player, self.player_stats.magnet_radius, dt);
        }
        // 7. Collision
        self.collisions.resolve(
            &mut self.registry,
            &mut CollisionContext {
                rng: &mut self.rng,
                events: &mut self.events,
                session: &mut self.stats,
                player: self.player,
                player_stats: &self.player_stats,
            },
        );
        // 8. Off-screen and expired entities
        systems::cleanup::run(
            &mut self.registry,
            &self.config,
            &mut self.stats,
            &mut self.despawn_buffer,
            dt,
        );
        // 9. End-of-frame sweep
        self.registry.reap();
        let dropped = self.registry.take_throttled();
        if dropped > 0 {
            log::debug!("{} spawns throttled this frame", dropped);
            self.events.push(GameEvent::SpawnThrottled { dropped });
        }

        self.level_elapsed += dt;
        self.advance_waves();

        if self.events.iter().any(|e| matches!(e, GameEvent::PlayerDied)) {
            self.phase = SessionPhase::Defeat;
        }
    }

    /// Move on once the current wave is complete.
    fn advance_waves(&mut self) {
        if !self.orchestrator.has_wave() || !self.orchestrator.is_complete(&self.registry) {
            return;
        }
        self.events.push(GameEvent::LevelWaveComplete {
            wave_index: self.wave_index,
            waves_total: self.waves_total,
        });
        log::info!(
            "wave {}/{} complete",
            self.wave_index + 1,
            self.waves_total
        );
        self.wave_index += 1;
        self.start_next_wave();
    }

    fn start_next_wave(&mut self) {
        match self.pending_waves.pop_front() {
            Some(wave) => self.orchestrator.load_wave(wave),
            None => {
                self.orchestrator = WaveOrchestrator::new();
                self.phase = SessionPhase::LevelComplete;
                log::info!("level {} complete", self.level);
            }
        }
    }
}
