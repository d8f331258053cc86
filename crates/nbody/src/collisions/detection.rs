//! Pairwise overlap detection

use crate::particle::{Particle, ParticleId};

/// A detected overlap between two particles
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// Lower id of the pair
    pub body_a: ParticleId,
    /// Higher id of the pair
    pub body_b: ParticleId,
    /// Current centre-to-centre distance
    pub separation: f64,
    /// Sum of the two radii
    pub collision_radius: f64,
}

/// Collision detector trait
pub trait CollisionDetector: Send + Sync {
    /// Detect all overlapping pairs
    fn detect(&self, particles: &[Particle]) -> Vec<CollisionEvent>;
}

/// Direct O(N²) collision detector
///
/// Walks the particles in ascending id order and tests each unordered pair
/// once (`id_a < id_b`), so events come out in a stable order whatever the
/// order of the input slice.
///
/// # Examples
///
/// ```
/// use nbody::collisions::{CollisionDetector, DirectDetector};
/// use nbody::particle::{Particle, ParticleId};
/// use nalgebra::{Point2, Vector2};
///
/// let particles = vec![
///     Particle::new(ParticleId(1), Point2::new(1.5, 0.0), Vector2::zeros(), 1.0),
///     Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 1.0),
/// ];
///
/// let events = DirectDetector.detect(&particles);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].body_a, ParticleId(0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDetector;

impl CollisionDetector for DirectDetector {
    fn detect(&self, particles: &[Particle]) -> Vec<CollisionEvent> {
        let mut sorted: Vec<&Particle> = particles.iter().collect();
        sorted.sort_by_key(|p| p.id);

        let sorted = &sorted;
        let n = sorted.len();

        (0..n)
            .flat_map(move |i| ((i + 1)..n).filter_map(move |j| check_pair(sorted[i], sorted[j])))
            .collect()
    }
}

fn check_pair(a: &Particle, b: &Particle) -> Option<CollisionEvent> {
    if !a.overlaps(b) {
        return None;
    }

    Some(CollisionEvent {
        body_a: a.id,
        body_b: b.id,
        separation: a.distance_to(b),
        collision_radius: a.radius + b.radius,
    })
}
