//! Game loop thread: runs a combat session at 60 Hz in real time.
//!
//! The session moves into the thread. Input and commands arrive via an `mpsc`
//! channel; the latest snapshot is stored in shared state for polling. The
//! thread hands back the session summary when it exits.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use machines_campaign::SessionSummary;
use machines_core::commands::{InputIntent, SessionCommand};
use machines_core::constants::TICK_RATE;
use machines_core::state::FrameSnapshot;
use machines_sim::CombatSession;

use crate::error::AppError;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Messages from the driver to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    Input(InputIntent),
    Session(SessionCommand),
    /// Stop after the current tick.
    Shutdown,
}

pub type SharedSnapshot = Arc<Mutex<Option<FrameSnapshot>>>;

/// Spawns the game loop in a new thread.
///
/// The loop stops on `Shutdown`, when the channel disconnects or when the
/// session reaches a terminal phase.
pub fn spawn_game_loop(
    session: CombatSession,
    latest_snapshot: SharedSnapshot,
) -> Result<(mpsc::Sender<LoopCommand>, JoinHandle<SessionSummary>), AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("machines-game-loop".into())
        .spawn(move || run_game_loop(session, cmd_rx, &latest_snapshot))
        .map_err(AppError::Thread)?;

    Ok((cmd_tx, handle))
}

fn run_game_loop(
    mut session: CombatSession,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
) -> SessionSummary {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending messages
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Input(input)) => session.set_input(input),
                Ok(LoopCommand::Session(cmd)) => session.queue_command(cmd),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return session.summary();
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (the session handles pause itself)
        let snapshot = session.tick();
        let over = snapshot.phase.is_over();

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }
        if over {
            log::info!("session over in phase {:?}", session.phase());
            return session.summary();
        }

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset instead of spiralling.
            next_tick_time = now;
        }
    }
}
