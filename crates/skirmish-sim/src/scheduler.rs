//! Fixed-timestep loop scheduler.
//!
//! Real elapsed time is fed in through `tick(real_dt_secs)` and drained into
//! whole simulation ticks through an accumulator, so the simulation advances
//! at its configured rate no matter how irregularly the host calls in.
//! Render snapshots are produced on a separate, capped cadence. The scheduler
//! never reads a clock itself; the host adapter supplies real time.

use tracing::{debug, info, warn};

use skirmish_core::commands::ControlSignal;
use skirmish_core::config::{ConfigError, LoopConfig};
use skirmish_core::enums::{RunState, StopReason};
use skirmish_core::state::RenderSnapshot;

use crate::engine::SimulationEngine;

/// Slack when comparing accumulated time against one tick, so that feeding
/// exactly N ticks' worth of time yields N ticks despite rounding.
const TICK_EPSILON: f64 = 1e-9;

/// Result of one scheduler iteration.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Simulation ticks run during this iteration.
    pub ticks: u32,
    /// Present when the render cadence fired, or the run just ended.
    pub snapshot: Option<RenderSnapshot>,
    /// Set on the iteration in which the run ended.
    pub stopped: Option<StopReason>,
}

/// Drives a `SimulationEngine` from real time.
pub struct LoopScheduler {
    engine: SimulationEngine,
    config: LoopConfig,
    state: RunState,
    /// Unconsumed simulation time (seconds).
    accumulator: f64,
    /// Real time since the last render snapshot (seconds).
    render_elapsed: f64,
    /// Real time spent running, excluding pauses (seconds).
    run_elapsed: f64,
}

impl LoopScheduler {
    /// Both sides must agree on the tick length: the engine advances by its
    /// own `dt` while the accumulator drains by `config.tick_secs()`.
    pub fn new(engine: SimulationEngine, config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if (engine.dt() - config.tick_secs()).abs() > TICK_EPSILON {
            return Err(ConfigError::TickRateMismatch {
                engine_hz: 1.0 / engine.dt(),
                loop_hz: config.tick_rate_hz,
            });
        }
        Ok(Self {
            engine,
            config,
            state: RunState::Ready,
            accumulator: 0.0,
            render_elapsed: 0.0,
            run_elapsed: 0.0,
        })
    }

    /// Apply a control signal.
    pub fn apply(&mut self, signal: ControlSignal) {
        debug!(?signal, state = ?self.state, "Control signal");
        match signal {
            ControlSignal::Start => {
                if matches!(self.state, RunState::Ready | RunState::Paused) {
                    if self.state == RunState::Ready {
                        // First frame of a run renders immediately.
                        self.render_elapsed = self.config.render_secs();
                        info!(fighters = self.engine.store().len(), "Run started");
                    }
                    self.state = RunState::Running;
                }
            }
            ControlSignal::Pause => {
                if self.state == RunState::Running {
                    self.state = RunState::Paused;
                }
            }
            ControlSignal::Reset => {
                self.engine.reset();
                self.accumulator = 0.0;
                self.render_elapsed = 0.0;
                self.run_elapsed = 0.0;
                self.state = RunState::Ready;
            }
            ControlSignal::Stop => {
                if !matches!(self.state, RunState::Finished(_)) {
                    self.finish(StopReason::Stopped);
                }
            }
        }
    }

    /// Feed `real_dt_secs` of wall-clock time and run as many fixed ticks as
    /// it pays for. Does nothing unless the run state is `Running`.
    pub fn tick(&mut self, real_dt_secs: f64) -> Frame {
        if self.state != RunState::Running {
            return Frame::default();
        }

        let real_dt = if real_dt_secs.is_finite() {
            real_dt_secs.max(0.0)
        } else {
            0.0
        };
        let slice = if real_dt > self.config.max_frame_secs {
            warn!(
                real_dt,
                max = self.config.max_frame_secs,
                "Frame took too long, dropping excess time"
            );
            self.config.max_frame_secs
        } else {
            real_dt
        };

        self.run_elapsed += real_dt;
        self.accumulator += slice;
        self.render_elapsed += slice;

        let tick_secs = self.config.tick_secs();
        let mut frame = Frame::default();
        while self.accumulator + TICK_EPSILON >= tick_secs {
            self.engine.tick();
            self.accumulator = (self.accumulator - tick_secs).max(0.0);
            frame.ticks += 1;
            if self.engine.is_settled() {
                break;
            }
        }

        if self.engine.is_settled() {
            frame.stopped = Some(StopReason::Settled);
        } else if self.run_elapsed >= self.config.max_run_secs {
            frame.stopped = Some(StopReason::TimeLimit);
        }

        let render_secs = self.config.render_secs();
        if let Some(reason) = frame.stopped {
            self.finish(reason);
            frame.snapshot = Some(self.engine.snapshot());
        } else if self.render_elapsed + TICK_EPSILON >= render_secs {
            self.render_elapsed -= render_secs;
            if self.render_elapsed >= render_secs {
                // Fell behind by more than a frame: skip the missed ones.
                self.render_elapsed = 0.0;
            }
            frame.snapshot = Some(self.engine.snapshot());
        }

        frame
    }

    fn finish(&mut self, reason: StopReason) {
        self.state = RunState::Finished(reason);
        self.accumulator = 0.0;
        info!(
            ?reason,
            ticks = self.engine.time().tick,
            sim_secs = self.engine.time().elapsed_secs,
            run_secs = self.run_elapsed,
            survivor = ?self.engine.survivor(),
            "Run finished"
        );
    }

    /// Build a snapshot outside the render cadence (e.g. after a stop).
    pub fn snapshot(&mut self) -> RenderSnapshot {
        self.engine.snapshot()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunState::Finished(_))
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Unconsumed simulation time left in the accumulator (seconds).
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Real time spent running so far, pauses excluded (seconds).
    pub fn run_elapsed(&self) -> f64 {
        self.run_elapsed
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }
}
