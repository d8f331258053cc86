//! Main simulation driver.
//!
//! Owns the particle state and runs each step through the same stages:
//! 1. Advance the clock by one fixed step
//! 2. Gravity: one acceleration per particle from the start-of-step positions
//! 3. Kick-drift integration
//! 4. Collision detection and mergers
//! 5. Snapshot of the merged state, handed to the checkpoint writer
//!
//! A step is never interrupted part-way; stop requests are honoured at step
//! boundaries only.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use checkpoint::{CheckpointManager, Snapshot};
use nbody::collisions::CollisionResolver;
use nbody::forces::{DirectGravity, ForceModel};
use nbody::integrator::{Integrator, KickDrift};
use nbody::{Particle, ParticleStore, SimulationState};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::config::SimulationConfig;
use crate::error::{ConfigError, Result};

/// What a call to [`Simulation::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A step ran and the run continues
    Advanced,
    /// A step ran and it was the last one
    Finished,
    /// The run had already ended; nothing ran
    AlreadyDone,
}

/// State of a run when its loop returned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub final_timestep: u64,
    pub final_time: f64,
    pub particle_count: usize,
    /// Chunk files on disk for the run
    pub chunks_written: usize,
    /// Whether the run reached `max_time` rather than being stopped
    pub completed: bool,
}

/// A single fixed-step run and its checkpoint writer
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    gravity: DirectGravity,
    integrator: KickDrift,
    resolver: CollisionResolver,
    checkpoints: CheckpointManager,
    /// The final step ran but its snapshots are not on disk yet
    pending_tail: bool,
}

impl Simulation {
    /// Spawns the configured particles from the configured seed
    ///
    /// # Errors
    ///
    /// An invalid configuration, or a failure creating the run directory or
    /// writing its manifest.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaChaRng::seed_from_u64(config.seed);
        let store = config.spawner().spawn(&mut rng);
        Self::from_store(config, store)
    }

    /// Starts from explicit initial conditions instead of spawning
    ///
    /// The spawn fields of `config` are ignored.
    ///
    /// # Errors
    ///
    /// As for [`Simulation::new`], and `ConfigError::DuplicateParticleId`
    /// when two particles share an id.
    pub fn with_particles(config: SimulationConfig, particles: Vec<Particle>) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(particles.len());
        if let Some(duplicate) = particles.iter().find(|p| !seen.insert(p.id)) {
            return Err(ConfigError::DuplicateParticleId(duplicate.id.0).into());
        }
        Self::from_store(config, ParticleStore::from_particles(particles))
    }

    fn from_store(config: SimulationConfig, store: ParticleStore) -> Result<Self> {
        let mut checkpoints = CheckpointManager::new(&config.checkpoint_config())?;
        let state = SimulationState::new(config.delta_time, config.max_time, store);

        log::info!(
            "starting '{}' with {} particles, {} steps of {}",
            config.simulation_name,
            state.particle_count(),
            state.total_steps(),
            config.delta_time
        );

        // Timestep 0 is the initial state
        checkpoints.record(Snapshot::capture(&state), false)?;

        Ok(Self {
            config,
            state,
            gravity: DirectGravity::new(),
            integrator: KickDrift,
            resolver: CollisionResolver::new(),
            checkpoints,
            pending_tail: false,
        })
    }

    /// Runs one step and records its snapshot
    ///
    /// Calling this after the run has ended runs nothing. If the final
    /// write had failed it is retried and [`StepOutcome::Finished`] is
    /// returned once it succeeds; otherwise the result is
    /// [`StepOutcome::AlreadyDone`].
    ///
    /// # Errors
    ///
    /// A checkpoint write failure. The snapshot stays buffered in the
    /// checkpoint writer. A failure on the final step still ends the run,
    /// and the next call retries the write.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.state.done {
            return if self.flush_pending()? {
                Ok(StepOutcome::Finished)
            } else {
                Ok(StepOutcome::AlreadyDone)
            };
        }

        let timestep = self.state.advance_clock();

        self.integrator.step(
            self.state.particles.particles_mut(),
            self.state.delta_time,
            &self.gravity,
        );

        let groups = self.resolver.resolve(&mut self.state.particles);
        if !groups.is_empty() {
            log::debug!(
                "timestep {timestep}: {} merger(s), {} particles left",
                groups.len(),
                self.state.particle_count()
            );
        }

        if log::log_enabled!(log::Level::Trace) {
            let particles = self.state.particles.particles();
            log::trace!(
                "timestep {timestep}: kinetic {:.6e}, potential {:.6e}",
                self.state.particles.kinetic_energy(),
                self.gravity.potential_energy(particles)
            );
        }

        let finished = self.state.is_finished();
        if finished {
            self.state.done = true;
            self.pending_tail = true;
        }

        if let Some(report) = self
            .checkpoints
            .record(Snapshot::capture(&self.state), finished)?
        {
            log::debug!("flushed {:?}", report.kind);
        }

        if finished {
            self.pending_tail = false;
            log::info!(
                "'{}' finished at timestep {timestep} (t = {}) with {} particles",
                self.config.simulation_name,
                self.state.time,
                self.state.particle_count()
            );
            Ok(StepOutcome::Finished)
        } else {
            Ok(StepOutcome::Advanced)
        }
    }

    /// Writes the snapshots of a run whose final write failed
    ///
    /// Returns whether there was anything to write. The clock does not move.
    pub fn flush_pending(&mut self) -> Result<bool> {
        if !self.pending_tail {
            return Ok(false);
        }

        log::info!(
            "retrying final write of '{}' at timestep {}",
            self.config.simulation_name,
            self.state.timestep
        );
        self.checkpoints.finish()?;
        self.pending_tail = false;
        Ok(true)
    }

    /// Steps until the run ends
    pub fn run(&mut self) -> Result<RunSummary> {
        while self.step()? == StepOutcome::Advanced {}
        Ok(self.summary())
    }

    /// Steps until the run ends or `stop` is set
    ///
    /// The flag is checked between steps. When it stops the run early,
    /// everything buffered so far is written out, and stepping may resume
    /// later with [`Simulation::step`] or another `run_until`.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<RunSummary> {
        loop {
            if self.state.done {
                self.flush_pending()?;
                break;
            }
            if stop.load(Ordering::Relaxed) {
                log::warn!(
                    "stop requested at timestep {}, writing buffered snapshots",
                    self.state.timestep
                );
                self.checkpoints.finish()?;
                break;
            }
            self.step()?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            final_timestep: self.state.timestep,
            final_time: self.state.time,
            particle_count: self.state.particle_count(),
            chunks_written: self.checkpoints.manifest().chunks.len(),
            completed: self.state.done,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn particles(&self) -> &[Particle] {
        self.state.particles.particles()
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }
}
