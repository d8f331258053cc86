//! Two-dimensional point-mass gravity with collision merging
//!
//! One step of the engine is:
//! 1. [`forces::DirectGravity`] computes an acceleration per particle from
//!    the positions at the start of the step
//! 2. [`integrator::KickDrift`] applies the accelerations to velocities and
//!    then moves every particle
//! 3. [`collisions::CollisionResolver`] merges each connected group of
//!    overlapping particles into one
//!
//! Clock bookkeeping lives in [`state::SimulationState`].

pub mod collisions;
pub mod forces;
pub mod integrator;
pub mod particle;
pub mod state;
pub mod store;

pub use particle::{Particle, ParticleId};
pub use state::SimulationState;
pub use store::ParticleStore;

#[cfg(test)]
mod integrator_test;
