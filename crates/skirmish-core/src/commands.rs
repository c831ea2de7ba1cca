//! Control signals sent from the host to the loop scheduler.

use serde::{Deserialize, Serialize};

/// Run control. Each signal is a plain state transition on the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlSignal {
    /// Start a ready run or resume a paused one.
    Start,
    /// Freeze the run. Real time passing while paused is discarded.
    Pause,
    /// Respawn the roster from the current configuration and return to `Ready`.
    Reset,
    /// End the run.
    Stop,
}
