//! Force models for the particle simulation
//!
//! This module provides the `ForceModel` trait and the direct pairwise
//! gravity used by the stepper.

use crate::particle::Particle;
use nalgebra::Vector2;

pub mod gravity;

#[cfg(test)]
mod gravity_test;

pub use gravity::DirectGravity;

/// Gravitational constant in simulation units
pub const G: f64 = 10.0;

/// A source of acceleration on particles
///
/// # Examples
///
/// ```
/// use nbody::forces::{DirectGravity, ForceModel};
/// use nbody::particle::{Particle, ParticleId};
/// use nalgebra::{Point2, Vector2};
///
/// let particles = vec![
///     Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 1.0),
///     Particle::new(ParticleId(1), Point2::new(4.0, 0.0), Vector2::zeros(), 1.0),
/// ];
///
/// let gravity = DirectGravity::new();
/// let accel = gravity.acceleration(0, &particles);
/// assert!(accel.x > 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Compute acceleration on the particle at index `idx`
    ///
    /// # Arguments
    ///
    /// * `idx` - Index of the particle in `particles`
    /// * `particles` - Positions and masses at the start of the step
    fn acceleration(&self, idx: usize, particles: &[Particle]) -> Vector2<f64>;

    /// Compute one acceleration per particle, all from the same positions
    fn accelerations(&self, particles: &[Particle]) -> Vec<Vector2<f64>> {
        (0..particles.len())
            .map(|i| self.acceleration(i, particles))
            .collect()
    }

    /// Potential energy of the configuration
    ///
    /// Default implementation returns 0.0.
    fn potential_energy(&self, _particles: &[Particle]) -> f64 {
        0.0
    }
}
