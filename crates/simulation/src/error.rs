use std::io;
use std::path::PathBuf;

use checkpoint::CheckpointError;
use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("spawn bounds on {axis} are inverted: [{min}, {max}]")]
    InvertedBounds { axis: char, min: f64, max: f64 },

    #[error("velocity_magnitude must not be negative, got {0}")]
    NegativeVelocity(f64),

    #[error("simulation_name must be a single non-empty path component, got {0:?}")]
    InvalidName(String),

    #[error("flush_threshold must be at least 1")]
    ZeroFlushThreshold,

    #[error("particle id {0} is used more than once")]
    DuplicateParticleId(u32),
}

/// Failures while building or stepping a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
