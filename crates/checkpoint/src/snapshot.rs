//! Immutable per-step records and their on-disk form

use nalgebra::{Point2, Vector2};
use nbody::{Particle, ParticleId, SimulationState};
use serde::{Deserialize, Serialize};

/// One particle as stored in a chunk file
///
/// Serialized positionally as `[id, [x, y], [vx, vy], mass, radius]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord(pub u32, pub [f64; 2], pub [f64; 2], pub f64, pub f64);

impl From<&Particle> for ParticleRecord {
    fn from(p: &Particle) -> Self {
        ParticleRecord(
            p.id.0,
            [p.position.x, p.position.y],
            [p.velocity.x, p.velocity.y],
            p.mass,
            p.radius,
        )
    }
}

impl From<ParticleRecord> for Particle {
    fn from(record: ParticleRecord) -> Self {
        let ParticleRecord(id, [x, y], [vx, vy], mass, radius) = record;
        Particle {
            id: ParticleId(id),
            position: Point2::new(x, y),
            velocity: Vector2::new(vx, vy),
            mass,
            radius,
        }
    }
}

/// Recorded state of all particles at one timestep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_time: f64,
    pub max_time: f64,
    pub timestep: u64,
    pub number_of_particles: u32,
    pub particles: Vec<ParticleRecord>,
}

impl Snapshot {
    /// Captures the current state
    ///
    /// # Examples
    ///
    /// ```
    /// use checkpoint::Snapshot;
    /// use nbody::{ParticleStore, SimulationState};
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let mut store = ParticleStore::new();
    /// store.add(Point2::new(1.0, 2.0), Vector2::zeros(), 1.0);
    /// let state = SimulationState::new(0.1, 1.0, store);
    ///
    /// let snapshot = Snapshot::capture(&state);
    /// assert_eq!(snapshot.timestep, 0);
    /// assert_eq!(snapshot.number_of_particles, 1);
    /// ```
    pub fn capture(state: &SimulationState) -> Self {
        let particles: Vec<ParticleRecord> = state
            .particles
            .particles()
            .iter()
            .map(ParticleRecord::from)
            .collect();

        Snapshot {
            current_time: state.time,
            max_time: state.max_time,
            timestep: state.timestep,
            number_of_particles: particles.len() as u32,
            particles,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.number_of_particles as usize
    }

    /// Rebuilds the particles in recorded order
    pub fn to_particles(&self) -> Vec<Particle> {
        self.particles.iter().copied().map(Particle::from).collect()
    }
}
