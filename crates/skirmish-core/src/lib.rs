//! Core types and definitions for the SKIRMISH arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, control signals, render snapshots, events, configuration
//! and constants. It has no dependency on a runtime, clock or renderer.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
