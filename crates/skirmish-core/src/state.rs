//! Render snapshot: a deep, point-in-time copy of everything a renderer needs.
//!
//! Nothing here borrows from the simulation, so a snapshot can be moved to
//! another thread while the next tick runs.

use serde::{Deserialize, Serialize};

use crate::enums::LifePhase;
use crate::events::CombatEvent;
use crate::types::{ArenaBounds, AvatarHandle, Position, SimTime, Velocity};

/// Complete render state, produced at the render cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub time: SimTime,
    pub arena: ArenaBounds,
    /// All fighters, including dying and retired ones, sorted by index.
    pub fighters: Vec<FighterView>,
    pub impacts: Vec<ImpactView>,
    pub alive_count: u32,
    /// Index of the last fighter standing, once only one remains.
    pub survivor: Option<u32>,
    /// True once the match is over and every knocked-out fighter has faded.
    pub settled: bool,
    /// Events since the previous snapshot.
    pub events: Vec<CombatEvent>,
}

/// One fighter as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub index: u32,
    pub position: Position,
    pub velocity: Velocity,
    pub health: f64,
    pub alive: bool,
    pub opacity: f64,
    pub attack_cooldown: f64,
    pub avatar: AvatarHandle,
    pub phase: LifePhase,
}

/// A combat flash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactView {
    pub position: Position,
    pub age_secs: f64,
    /// 1.0 when fresh, 0.0 at the end of the marker's lifetime.
    pub intensity: f64,
}

impl RenderSnapshot {
    /// Look up a fighter by roster index.
    pub fn fighter(&self, index: u32) -> Option<&FighterView> {
        self.fighters.iter().find(|f| f.index == index)
    }
}
