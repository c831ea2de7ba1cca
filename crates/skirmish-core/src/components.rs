//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::types::AvatarHandle;

/// Identity of a fighter: its stable roster index and its visual asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub index: u32,
    pub avatar: AvatarHandle,
}

/// Hit points, always within `0.0..=MAX_HEALTH`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
}

/// Alive flag and render opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitality {
    /// Flips to false exactly once, on a lethal hit.
    pub alive: bool,
    /// 1.0 while alive, decays toward 0.0 after death.
    pub opacity: f64,
}

/// Time until the next attack is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackCooldown {
    pub remaining_secs: f64,
}
