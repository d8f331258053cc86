//! Run configuration loaded from YAML
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```yaml
//! simulation_name: "cluster"
//! saves_folder: "saves"
//! delta_time: 0.01        # fixed step
//! max_time: 10.0
//! particle_count: 250
//! spawn_bounds:
//!   x: [-10.0, 10.0]
//!   y: [-10.0, 10.0]
//! random_velocity: true
//! velocity_magnitude: 10.0
//! seed: 7
//! flush_threshold: 500000 # buffered particle records per chunk
//! ```
//!
//! The configuration is validated once and then handed to
//! [`crate::Simulation`]; nothing reads it again after construction.

use std::fs;
use std::path::{Path, PathBuf};

use checkpoint::CheckpointConfig;
use checkpoint::manager::DEFAULT_FLUSH_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spawn::{SpawnBounds, Spawner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Directory name of this run inside `saves_folder`
    pub simulation_name: String,
    pub saves_folder: PathBuf,
    /// Fixed step size
    pub delta_time: f64,
    /// The run ends at the first step with `time >= max_time`
    pub max_time: f64,
    pub particle_count: usize,
    pub spawn_bounds: SpawnBounds,
    /// Zero initial velocities when false
    pub random_velocity: bool,
    /// Largest initial velocity component
    pub velocity_magnitude: f64,
    /// Seed of the spawn RNG; the step loop itself draws no randomness
    pub seed: u64,
    /// Buffered particle records that trigger a chunk write
    pub flush_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation_name: "sim".to_string(),
            saves_folder: PathBuf::from("saves"),
            delta_time: 0.01,
            max_time: 10.0,
            particle_count: 10,
            spawn_bounds: SpawnBounds::default(),
            random_velocity: true,
            velocity_magnitude: 10.0,
            seed: 0,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks every value the engine relies on
    ///
    /// # Errors
    ///
    /// The first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.simulation_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidName(self.simulation_name.clone()));
        }

        positive("delta_time", self.delta_time)?;
        positive("max_time", self.max_time)?;

        for (axis, [min, max]) in [('x', self.spawn_bounds.x), ('y', self.spawn_bounds.y)] {
            finite("spawn_bounds", min)?;
            finite("spawn_bounds", max)?;
            if min > max {
                return Err(ConfigError::InvertedBounds { axis, min, max });
            }
        }

        finite("velocity_magnitude", self.velocity_magnitude)?;
        if self.velocity_magnitude < 0.0 {
            return Err(ConfigError::NegativeVelocity(self.velocity_magnitude));
        }

        if self.flush_threshold == 0 {
            return Err(ConfigError::ZeroFlushThreshold);
        }
        Ok(())
    }

    /// Directory holding this run's chunk files
    pub fn run_dir(&self) -> PathBuf {
        self.checkpoint_config().run_dir()
    }

    pub fn checkpoint_config(&self) -> CheckpointConfig {
        CheckpointConfig {
            saves_folder: self.saves_folder.clone(),
            simulation_name: self.simulation_name.clone(),
            flush_threshold: self.flush_threshold,
        }
    }

    pub fn spawner(&self) -> Spawner {
        Spawner {
            count: self.particle_count,
            bounds: self.spawn_bounds,
            velocity_magnitude: self.random_velocity.then_some(self.velocity_magnitude),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}
