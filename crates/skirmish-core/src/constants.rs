//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: f64 = 60.0;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE;

/// Default render cadence (Hz). Independent of the tick rate.
pub const RENDER_RATE: f64 = 30.0;

/// Largest slice of real time fed to the accumulator per outer iteration.
/// Longer hiccups are dropped rather than replayed as a burst of ticks.
pub const MAX_FRAME_SECS: f64 = 0.25;

/// Wall-clock cap on a single run (seconds).
pub const MAX_RUN_SECS: f64 = 120.0;

// --- Arena ---

/// Canvas width in arena units.
pub const CANVAS_WIDTH: f64 = 500.0;

/// Canvas height in arena units.
pub const CANVAS_HEIGHT: f64 = 500.0;

pub const MARGIN_LEFT: f64 = 20.0;
pub const MARGIN_RIGHT: f64 = 20.0;

/// Top inset, reserved for the title band.
pub const MARGIN_TOP: f64 = 60.0;

/// Bottom inset, reserved for the caption band.
pub const MARGIN_BOTTOM: f64 = 40.0;

// --- Kinematics ---

/// Per-axis velocity jitter amplitude (units/s, scaled by dt each tick).
pub const JITTER: f64 = 25.0;

/// Minimum speed cap so fighters never stall completely (units/s).
pub const FLOOR_SPEED: f64 = 30.0;

/// Fraction of the speed cap a fighter may start with, as (min, max).
pub const SPAWN_SPEED_FRACTION: (f64, f64) = (0.5, 1.0);

// --- Combat ---

/// Maximum (and starting) health.
pub const MAX_HEALTH: f64 = 100.0;

/// Attacks only land on targets closer than this (units).
pub const ATTACK_RANGE: f64 = 220.0;

/// Squared attack range, compared against squared distances.
pub const ATTACK_RANGE_SQ: f64 = ATTACK_RANGE * ATTACK_RANGE;

/// Cooldown applied to an attacker after an attack (seconds).
pub const ATTACK_COOLDOWN: f64 = 0.35;

/// Distance a hit target is pushed away from its attacker (units).
pub const KNOCKBACK_DISTANCE: f64 = 8.0;

/// Denominator floor when normalizing a zero-length separation vector.
pub const KNOCKBACK_EPSILON: f64 = 1e-6;

// --- Effects and lifecycle ---

/// Lifetime of an impact marker (seconds).
pub const IMPACT_LIFETIME: f64 = 0.25;

/// Opacity lost per second after death. A knocked-out fighter fades over
/// half a second (15 frames at 30 FPS).
pub const FADE_RATE: f64 = 2.0;

/// Opacity at or below which a dead fighter counts as fully faded.
pub const FADE_EPSILON: f64 = 1e-3;
