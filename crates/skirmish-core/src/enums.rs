//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Per-fighter lifecycle state. `Retired` is derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifePhase {
    /// Fighting: moves, attacks and can be targeted.
    #[default]
    Alive,
    /// Knocked out and fading. Still rendered, ignored by movement and combat.
    Dying,
    /// Fully faded. Kept in the store until the next reset.
    Retired,
}

/// What happens to an attack attempt whose nearest target is out of range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Discard the attempt. The attacker's cooldown is left untouched and it
    /// may try again next tick.
    #[default]
    Drop,
    /// Spend the post-attack cooldown even though nothing was hit.
    ConsumeCooldown,
}

/// Scheduler run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Roster spawned, waiting for `Start`.
    #[default]
    Ready,
    Running,
    Paused,
    Finished(StopReason),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// At most one fighter is left standing and every knocked-out fighter
    /// has faded.
    Settled,
    /// The wall-clock run cap was reached.
    TimeLimit,
    /// Stopped by a control signal.
    Stopped,
}
