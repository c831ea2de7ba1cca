//! Game loop thread: feeds real time to the loop scheduler and delivers
//! render snapshots.
//!
//! The scheduler is built on the caller's thread so configuration errors
//! surface immediately, then moved into the loop thread. Control signals
//! arrive via an `mpsc` channel and are drained at the top of every
//! iteration, so a pause or stop takes effect before the next tick.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use skirmish_core::commands::ControlSignal;
use skirmish_core::config::ConfigError;
use skirmish_core::enums::{RunState, StopReason};
use skirmish_core::state::RenderSnapshot;
use skirmish_sim::engine::{EngineConfig, SimulationEngine};
use skirmish_sim::scheduler::LoopScheduler;

use crate::settings::Settings;
use crate::sink::RenderSink;
use crate::state::{LatestSnapshot, LoopCommand};

/// Errors from starting or talking to the game loop.
#[derive(Error, Debug)]
pub enum GameLoopError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("game loop has already exited")]
    Closed,

    #[error("game loop thread panicked")]
    Panicked,
}

/// Host-side handle to a running game loop.
pub struct GameLoopHandle {
    command_tx: mpsc::Sender<LoopCommand>,
    latest: LatestSnapshot,
    thread: JoinHandle<Option<StopReason>>,
}

impl GameLoopHandle {
    /// Forward a control signal to the scheduler.
    pub fn send(&self, signal: ControlSignal) -> Result<(), GameLoopError> {
        self.command_tx
            .send(LoopCommand::Control(signal))
            .map_err(|_| GameLoopError::Closed)
    }

    /// Ask the loop thread to exit without finishing the run.
    pub fn shutdown(&self) -> Result<(), GameLoopError> {
        self.command_tx
            .send(LoopCommand::Shutdown)
            .map_err(|_| GameLoopError::Closed)
    }

    /// Most recent snapshot delivered by the loop.
    pub fn latest_snapshot(&self) -> Option<RenderSnapshot> {
        self.latest.get()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to exit. Returns why the run ended, or `None` if
    /// the loop was shut down first.
    pub fn join(self) -> Result<Option<StopReason>, GameLoopError> {
        self.thread.join().map_err(|_| GameLoopError::Panicked)
    }
}

/// Build the scheduler from `settings` and start the game loop thread.
/// The run begins in the `Ready` state; send `ControlSignal::Start` to go.
pub fn spawn_game_loop<S>(settings: &Settings, sink: S) -> Result<GameLoopHandle, GameLoopError>
where
    S: RenderSink + 'static,
{
    settings.validate()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    let engine = SimulationEngine::new(
        EngineConfig {
            seed,
            simulation: settings.simulation.clone(),
            tick_rate_hz: settings.timing.tick_rate_hz,
            ..Default::default()
        },
        settings.avatar_handles(),
    )?;
    let scheduler = LoopScheduler::new(engine, settings.timing.clone())?;

    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
    let latest = LatestSnapshot::new();
    let shared = latest.clone();

    let thread = thread::Builder::new()
        .name("skirmish-game-loop".into())
        .spawn(move || run_game_loop(scheduler, command_rx, shared, sink))?;

    info!(seed, "Game loop spawned");
    Ok(GameLoopHandle {
        command_tx,
        latest,
        thread,
    })
}

/// The game loop. Runs until the run finishes, a Shutdown command arrives,
/// or the command channel disconnects.
fn run_game_loop<S: RenderSink>(
    mut scheduler: LoopScheduler,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest: LatestSnapshot,
    mut sink: S,
) -> Option<StopReason> {
    let tick_duration = Duration::from_secs_f64(scheduler.config().tick_secs());
    let mut last = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Control(signal)) => scheduler.apply(signal),
                Ok(LoopCommand::Shutdown) => {
                    info!("Game loop shut down");
                    return None;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    warn!("Command channel disconnected, leaving game loop");
                    return None;
                }
            }
        }

        // 2. A stop signal ends the run between ticks
        if let RunState::Finished(reason) = scheduler.state() {
            let snapshot = scheduler.snapshot();
            sink.present(&snapshot);
            latest.store(snapshot);
            return Some(reason);
        }

        // 3. Feed elapsed real time to the scheduler
        let now = Instant::now();
        let real_dt = now.duration_since(last).as_secs_f64();
        last = now;
        let frame = scheduler.tick(real_dt);

        // 4. Deliver the snapshot, if the render cadence fired
        if let Some(snapshot) = frame.snapshot {
            sink.present(&snapshot);
            latest.store(snapshot);
        }
        if let Some(reason) = frame.stopped {
            return Some(reason);
        }

        // 5. Sleep until the next tick is due
        let spent = last.elapsed();
        if spent < tick_duration {
            thread::sleep(tick_duration - spent);
        }
    }
}
