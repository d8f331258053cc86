use crate::particle::{Particle, ParticleId};
use nalgebra::{Point2, Vector2};

/// Owning container for the particles of the current step
///
/// Particles live in a flat arena and are addressed by index during a pass.
/// The store also owns the id generator for genuinely new particles; merge
/// survivors keep an inherited id and never consume a fresh one.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    /// Next id handed out by [`ParticleStore::add`]
    next_id: u32,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from existing particles
    ///
    /// The id generator resumes after the largest id present, so particles
    /// added later never collide with the supplied ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::particle::{Particle, ParticleId};
    /// use nbody::store::ParticleStore;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let seed = vec![Particle::new(ParticleId(7), Point2::origin(), Vector2::zeros(), 1.0)];
    /// let mut store = ParticleStore::from_particles(seed);
    ///
    /// let id = store.add(Point2::new(5.0, 0.0), Vector2::zeros(), 1.0);
    /// assert_eq!(id, ParticleId(8));
    /// ```
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let next_id = particles.iter().map(|p| p.id.0.saturating_add(1)).max().unwrap_or(0);
        Self { particles, next_id }
    }

    /// Adds a particle with a fresh id and returns that id
    ///
    /// The generator stops at `u32::MAX` instead of wrapping.
    pub fn add(&mut self, position: Point2<f64>, velocity: Vector2<f64>, radius: f64) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.particles.push(Particle::new(id, position, velocity, radius));
        id
    }

    /// Replaces the whole particle set, as collision resolution does each step
    ///
    /// The id generator is never rewound.
    pub fn replace(&mut self, particles: Vec<Particle>) {
        if let Some(max) = particles.iter().map(|p| p.id.0.saturating_add(1)).max() {
            self.next_id = self.next_id.max(max);
        }
        self.particles = particles;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn next_id(&self) -> ParticleId {
        ParticleId(self.next_id)
    }

    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    /// Total linear momentum; unchanged by merges
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.particles
            .iter()
            .map(|p| p.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }
}
