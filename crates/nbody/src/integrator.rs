//! Time integration for the particle simulation
//!
//! A fixed-step integrator advances velocities and then positions. All
//! accelerations of a step are evaluated from the positions at the start of
//! that step before anything is moved.

use crate::forces::ForceModel;
use crate::particle::Particle;
use nalgebra::Vector2;

/// A fixed-step time integrator
pub trait Integrator: Send + Sync {
    /// Advance the particles by one step
    ///
    /// # Arguments
    ///
    /// * `particles` - Particles of the current step (modified in place)
    /// * `dt` - Step size
    /// * `force` - Force model to compute accelerations
    fn step(&self, particles: &mut [Particle], dt: f64, force: &dyn ForceModel);
}

/// Kick-then-drift integrator with an unscaled kick
///
/// 1. Kick: `v += a` (the acceleration is **not** multiplied by `dt`)
/// 2. Drift: `x += v * dt`
///
/// Because the kick ignores the step size, the effect of gravity on velocity
/// depends on the number of steps taken rather than on elapsed time. Halving
/// `dt` doubles the gravitational impulse per unit of simulated time. Stored
/// runs depend on this, so it is kept as is.
///
/// # Examples
///
/// ```
/// use nbody::forces::DirectGravity;
/// use nbody::integrator::{Integrator, KickDrift};
/// use nbody::particle::{Particle, ParticleId};
/// use nalgebra::{Point2, Vector2};
///
/// let mut particles = vec![
///     Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0), 1.0),
/// ];
///
/// KickDrift.step(&mut particles, 0.5, &DirectGravity::new());
/// assert_eq!(particles[0].position, Point2::new(0.5, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KickDrift;

impl Integrator for KickDrift {
    fn step(&self, particles: &mut [Particle], dt: f64, force: &dyn ForceModel) {
        // Accelerations from the positions at the start of the step
        let accelerations: Vec<Vector2<f64>> = force.accelerations(particles);

        particles
            .iter_mut()
            .zip(accelerations.iter())
            .for_each(|(particle, accel)| {
                particle.velocity += *accel;
            });

        particles.iter_mut().for_each(|particle| {
            particle.position += particle.velocity * dt;
        });
    }
}
