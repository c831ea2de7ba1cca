//! Simulation engine for SKIRMISH.
//!
//! Owns the fighter roster, runs the tick pipeline at a fixed rate,
//! and produces `RenderSnapshot`s for whatever draws the arena.

pub mod engine;
pub mod scheduler;
pub mod store;
pub mod systems;

pub use engine::{EngineConfig, SimulationEngine};
pub use scheduler::{Frame, LoopScheduler};
pub use skirmish_core as core;
pub use store::{EntityStore, ImpactMarker};

#[cfg(test)]
mod tests;
