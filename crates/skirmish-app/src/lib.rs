//! SKIRMISH host adapter.
//!
//! Wires the headless simulation to real time: a game-loop thread that feeds
//! wall-clock time to the loop scheduler, a render sink abstraction, and
//! settings loaded from TOML.

pub mod game_loop;
pub mod settings;
pub mod sink;
pub mod state;

pub use skirmish_core as core;
