//! Tuning configuration and file IO

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::spatial::QuadTreeConfig;

/// Serializable configuration stored as TOML or RON, chosen by file extension
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;
        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("ron") => Ok(Format::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Collision tuning constants
///
/// The defaults give the stock behaviour: a 5-level quadtree splitting nodes
/// of 5 or more shapes, a one-unit broad-phase margin and a one-unit
/// tunneling tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Quadtree construction parameters
    pub quad_tree: QuadTreeConfig,

    /// Units added on every side of a body's bounds before the broad phase
    pub broad_phase_margin: f32,

    /// How far a contact may point back into the previous position before
    /// it is treated as "already inside" and ignored
    pub entry_tolerance: f32,

    /// Cap segment count used for capsule bodies
    pub capsule_segments: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            quad_tree: QuadTreeConfig::default(),
            broad_phase_margin: 1.0,
            entry_tolerance: 1.0,
            capsule_segments: 8,
        }
    }
}

impl Config for PhysicsConfig {}
