//! Events emitted by the simulation for render and audio feedback.

use serde::{Deserialize, Serialize};

/// Something that happened during a tick. Fighters are referred to by
/// roster index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// An attack landed.
    Hit {
        attacker: u32,
        target: u32,
        damage: f64,
        target_health: f64,
    },
    /// A fighter's health reached zero.
    Knockout { fighter: u32, by: u32 },
    /// A knocked-out fighter finished fading.
    Retired { fighter: u32 },
    /// The match is decided. `None` when nobody is left standing.
    Victory { survivor: Option<u32> },
}
