//! Host settings, loaded from a TOML file.
//!
//! Every section is optional; missing values fall back to the defaults.
//!
//! ```toml
//! seed = 7
//! avatars = 12
//!
//! [simulation]
//! fighter_count = 6
//! hit_chance_percent = 35.0
//!
//! [timing]
//! max_run_secs = 60.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skirmish_core::config::{ConfigError, LoopConfig, SimulationConfig};
use skirmish_core::types::AvatarHandle;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed. A random one is drawn when unset.
    pub seed: Option<u64>,
    /// Number of avatar assets the host can provide. Caps the roster size.
    pub avatars: u32,
    /// Log a battle summary every this many render frames.
    pub log_every_frames: u32,
    pub simulation: SimulationConfig,
    pub timing: LoopConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            avatars: 16,
            log_every_frames: 30,
            simulation: SimulationConfig::default(),
            timing: LoopConfig::default(),
        }
    }
}

impl Settings {
    /// Read and validate settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.timing.validate()
    }

    /// One opaque handle per avatar the host can provide.
    pub fn avatar_handles(&self) -> Vec<AvatarHandle> {
        (0..self.avatars).map(AvatarHandle).collect()
    }
}
