use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use clap::Parser;

use machines_app::autopilot::Autopilot;
use machines_app::error::AppError;
use machines_app::game_loop::{self, LoopCommand, TICK_DURATION};
use machines_app::logging;
use machines_app::runner;
use machines_campaign::save::{self, SaveDocument};
use machines_campaign::SessionSummary;
use machines_core::config::SimConfig;
use machines_core::state::FrameSnapshot;
use machines_sim::scenario;
use machines_sim::waves::LevelDefinition;
use machines_sim::CombatSession;

/// Run a Machines of God combat session without a renderer.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RNG seed for the session
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Simulated seconds to play before stopping
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Level number, used when no level file is given
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Save document supplying upgrade levels
    #[arg(long)]
    save: Option<PathBuf>,
    /// Level definition JSON, otherwise the built-in level is played
    #[arg(long)]
    level_file: Option<PathBuf>,
    /// Entity cap for the session
    #[arg(long)]
    max_entities: Option<usize>,
    /// Reject save documents with unknown categories or out-of-range levels
    #[arg(long, requires = "save")]
    strict_save: bool,
    /// Credit earned stars back into the save document
    #[arg(long, requires = "save")]
    commit: bool,
    /// Pace the session at 60 Hz on a game loop thread
    #[arg(long)]
    realtime: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut save_doc = match &cli.save {
        Some(path) => save::parse_save(&read(path)?)?,
        None => SaveDocument::default(),
    };

    let mut config = SimConfig {
        seed: cli.seed,
        level: cli.level,
        ..Default::default()
    };
    if let Some(max) = cli.max_entities {
        config.max_entities = max;
    }

    let upgrades = if cli.strict_save {
        save_doc.checked_upgrade_state()?
    } else {
        save_doc.upgrade_state()
    };
    let mut session = CombatSession::new(config, upgrades);
    match &cli.level_file {
        Some(path) => {
            let level: LevelDefinition =
                serde_json::from_str(&read(path)?).map_err(AppError::Level)?;
            let errors = session.load_level(&level);
            if !errors.is_empty() {
                log::warn!("{} directives skipped in {}", errors.len(), path.display());
            }
        }
        None => session.load_waves(scenario::default_level(cli.level)),
    }

    let summary = if cli.realtime {
        run_realtime(session, cli.seconds)?
    } else {
        let report = runner::run_headless(&mut session, &mut Autopilot::new(), cli.seconds);
        log::info!("events: {:?}", report.events);
        report.summary
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).map_err(AppError::Summary)?
    );

    if cli.commit {
        if let Some(path) = &cli.save {
            save_doc.apply_summary(&summary);
            fs::write(path, save::to_json(&save_doc)?).map_err(|source| AppError::Write {
                path: path.clone(),
                source,
            })?;
            log::info!("credited {} stars to {}", summary.currency_earned, path.display());
        }
    }
    Ok(())
}

/// Play on the game loop thread, feeding autopilot input from the latest
/// published snapshot.
fn run_realtime(session: CombatSession, seconds: f64) -> Result<SessionSummary, AppError> {
    let latest: Arc<Mutex<Option<FrameSnapshot>>> = Arc::new(Mutex::new(None));
    let (tx, handle) = game_loop::spawn_game_loop(session, Arc::clone(&latest))?;
    let mut pilot = Autopilot::new();
    let started = Instant::now();

    while started.elapsed().as_secs_f64() < seconds && !handle.is_finished() {
        let snapshot = latest.lock().ok().and_then(|s| s.clone());
        if let Some(snapshot) = snapshot {
            // The loop thread may already have exited; join reports it.
            let _ = tx.send(LoopCommand::Input(pilot.intent(&snapshot)));
        }
        std::thread::sleep(TICK_DURATION);
    }

    let _ = tx.send(LoopCommand::Shutdown);
    handle.join().map_err(|_| AppError::LoopPanicked)
}

fn read(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}
