//! Render sinks: where the game loop delivers snapshots.

use tracing::{debug, info};

use skirmish_core::events::CombatEvent;
use skirmish_core::state::RenderSnapshot;

/// Receives a read-only snapshot once per render frame. What it does with it
/// (draw, encode, forward) is up to the host.
pub trait RenderSink: Send {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

impl<F> RenderSink for F
where
    F: FnMut(&RenderSnapshot) + Send,
{
    fn present(&mut self, snapshot: &RenderSnapshot) {
        self(snapshot)
    }
}

/// Logs the battle instead of drawing it: knockouts as they happen and a
/// one-line summary every `every` frames.
#[derive(Debug)]
pub struct LogSink {
    every: u64,
    frames: u64,
}

impl LogSink {
    pub fn new(every: u32) -> Self {
        Self {
            every: u64::from(every.max(1)),
            frames: 0,
        }
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        for event in &snapshot.events {
            match event {
                CombatEvent::Knockout { fighter, by } => {
                    info!(fighter, by, "Knockout");
                }
                CombatEvent::Victory { survivor } => {
                    info!(survivor = ?survivor, "Victory");
                }
                other => debug!(?other, "Combat event"),
            }
        }

        if self.frames % self.every == 0 {
            info!(
                tick = snapshot.time.tick,
                sim_secs = snapshot.time.elapsed_secs,
                alive = snapshot.alive_count,
                fighters = snapshot.fighters.len(),
                impacts = snapshot.impacts.len(),
                "Battle status"
            );
        }
        self.frames += 1;
    }
}
