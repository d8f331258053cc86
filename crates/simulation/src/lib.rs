//! Fixed-step N-body runs with collision merging and chunked checkpoints
//!
//! # Example
//!
//! ```no_run
//! use simulation::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     simulation_name: "cluster".to_string(),
//!     particle_count: 250,
//!     ..SimulationConfig::default()
//! };
//!
//! let mut sim = Simulation::new(config)?;
//! let summary = sim.run()?;
//! println!("{} particles left after {} steps", summary.particle_count, summary.final_timestep);
//! # Ok::<(), simulation::SimulationError>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod spawn;

pub use config::SimulationConfig;
pub use driver::{RunSummary, Simulation, StepOutcome};
pub use error::{ConfigError, SimulationError};
pub use spawn::{SpawnBounds, Spawner};
