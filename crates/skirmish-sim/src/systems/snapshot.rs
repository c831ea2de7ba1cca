//! Snapshot system: copies the store into a `RenderSnapshot`.
//!
//! This system is read-only; it never modifies the store.

use skirmish_core::events::CombatEvent;
use skirmish_core::state::{ImpactView, RenderSnapshot};
use skirmish_core::types::SimTime;

use crate::store::EntityStore;
use crate::systems::effects;

/// Build a complete render snapshot from the current store state.
pub fn build_snapshot(
    store: &EntityStore,
    time: &SimTime,
    survivor: Option<u32>,
    settled: bool,
    events: Vec<CombatEvent>,
) -> RenderSnapshot {
    let fighters = store.fighters();
    let alive_count = fighters.iter().filter(|f| f.alive).count() as u32;

    RenderSnapshot {
        time: *time,
        arena: *store.arena(),
        fighters,
        impacts: build_impacts(store),
        alive_count,
        survivor,
        settled,
        events,
    }
}

fn build_impacts(store: &EntityStore) -> Vec<ImpactView> {
    store
        .impacts()
        .iter()
        .map(|marker| ImpactView {
            position: marker.position,
            age_secs: marker.age_secs,
            intensity: effects::intensity(marker),
        })
        .collect()
}
