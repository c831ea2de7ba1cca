//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
};

/// 2D position in arena space. Origin is the top-left corner of the canvas,
/// x grows right and y grows down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in arena units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Opaque reference to a fighter's visual asset. Owned by the asset loader;
/// the simulation only carries it through to render snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvatarHandle(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

/// The canvas plus the inset margins that separate the playable interior
/// from the title and caption bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another position.
    pub fn distance_sq_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.distance_sq_to(other).sqrt()
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl From<Position> for DVec2 {
    fn from(p: Position) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Velocity> for DVec2 {
    fn from(v: Velocity) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a position into the rectangle, axis by axis.
    pub fn clamp(&self, p: Position) -> Position {
        Position {
            x: p.x.clamp(self.min.x, self.max.x),
            y: p.y.clamp(self.min.y, self.max.y),
        }
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            margin_left: MARGIN_LEFT,
            margin_right: MARGIN_RIGHT,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
        }
    }
}

impl ArenaBounds {
    /// Reject non-finite dimensions and margins that leave no playable area.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("arena.width", self.width),
            ("arena.height", self.height),
            ("arena.margin_left", self.margin_left),
            ("arena.margin_right", self.margin_right),
            ("arena.margin_top", self.margin_top),
            ("arena.margin_bottom", self.margin_bottom),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        let interior = self.interior();
        if interior.width() <= 0.0 || interior.height() <= 0.0 {
            return Err(ConfigError::EmptyArena {
                width: interior.width(),
                height: interior.height(),
            });
        }
        Ok(())
    }

    /// The playable interior. Fighters are confined to this rectangle.
    pub fn interior(&self) -> Rect {
        Rect {
            min: Position::new(self.margin_left, self.margin_top),
            max: Position::new(
                self.width - self.margin_right,
                self.height - self.margin_bottom,
            ),
        }
    }
}
