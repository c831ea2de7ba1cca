//! Run configuration supplied by the host, and its validation.
//!
//! The core never mutates a config once accepted. Out-of-range roster sizes
//! are clamped; every other contract violation is rejected up front by
//! `validate()` so no tick ever sees an inconsistent config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_FRAME_SECS, MAX_RUN_SECS, RENDER_RATE, TICK_RATE};
use crate::enums::OutOfRangePolicy;

/// Errors raised when a configuration is accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("damage_min ({min}) exceeds damage_max ({max})")]
    DamageRange { min: f64, max: f64 },

    #[error("hit_chance_percent must be within 0..=100, got {0}")]
    HitChance(f64),

    #[error("arena interior is empty ({width} x {height}); margins exceed the canvas")]
    EmptyArena { width: f64, height: f64 },

    #[error("engine ticks at {engine_hz} Hz but the loop drains at {loop_hz} Hz")]
    TickRateMismatch { engine_hz: f64, loop_hz: f64 },
}

/// Battle parameters. Mirrors the host's control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Requested roster size. Clamped to the number of available avatars.
    pub fighter_count: u32,
    /// Average wandering speed (units/s). Floored at `FLOOR_SPEED`.
    pub speed: f64,
    /// Chance an off-cooldown fighter attacks on a given tick, in percent.
    pub hit_chance_percent: f64,
    pub damage_min: f64,
    pub damage_max: f64,
    pub out_of_range: OutOfRangePolicy,
}

/// Timing of the loop scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub tick_rate_hz: f64,
    pub render_rate_hz: f64,
    /// Clamp on the real time fed to the accumulator per iteration.
    pub max_frame_secs: f64,
    /// Wall-clock cap on a run.
    pub max_run_secs: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fighter_count: 8,
            speed: 60.0,
            hit_chance_percent: 20.0,
            damage_min: 5.0,
            damage_max: 15.0,
            out_of_range: OutOfRangePolicy::default(),
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE,
            render_rate_hz: RENDER_RATE,
            max_frame_secs: MAX_FRAME_SECS,
            max_run_secs: MAX_RUN_SECS,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("speed", self.speed)?;
        finite("hit_chance_percent", self.hit_chance_percent)?;
        finite("damage_min", self.damage_min)?;
        finite("damage_max", self.damage_max)?;
        non_negative("speed", self.speed)?;
        non_negative("damage_min", self.damage_min)?;
        if !(0.0..=100.0).contains(&self.hit_chance_percent) {
            return Err(ConfigError::HitChance(self.hit_chance_percent));
        }
        if self.damage_min > self.damage_max {
            return Err(ConfigError::DamageRange {
                min: self.damage_min,
                max: self.damage_max,
            });
        }
        Ok(())
    }

    /// Per-tick attack probability in `0.0..=1.0`.
    pub fn hit_probability(&self) -> f64 {
        (self.hit_chance_percent / 100.0).clamp(0.0, 1.0)
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_rate_hz", self.tick_rate_hz)?;
        positive("render_rate_hz", self.render_rate_hz)?;
        positive("max_frame_secs", self.max_frame_secs)?;
        positive("max_run_secs", self.max_run_secs)?;
        Ok(())
    }

    /// Seconds per simulation tick.
    pub fn tick_secs(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    /// Seconds between render snapshots.
    pub fn render_secs(&self) -> f64 {
        1.0 / self.render_rate_hz
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 {
        Err(ConfigError::Negative { field, value })
    } else {
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
