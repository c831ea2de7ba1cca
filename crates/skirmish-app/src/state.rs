//! State shared between the host and the game loop thread.

use std::sync::{Arc, Mutex};

use skirmish_core::commands::ControlSignal;
use skirmish_core::state::RenderSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A control signal to forward to the scheduler.
    Control(ControlSignal),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest render snapshot, for hosts that poll instead of implementing a sink.
///
/// The slot holds a deep copy, so readers never see a half-updated tick.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    inner: Arc<Mutex<Option<RenderSnapshot>>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, snapshot: RenderSnapshot) {
        if let Ok(mut lock) = self.inner.lock() {
            *lock = Some(snapshot);
        }
    }

    pub fn get(&self) -> Option<RenderSnapshot> {
        self.inner.lock().ok().and_then(|lock| lock.clone())
    }
}
