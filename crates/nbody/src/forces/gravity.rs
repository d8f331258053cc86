//! Direct N-body gravity (O(N²) implementation)

use crate::forces::{ForceModel, G};
use crate::particle::Particle;
use nalgebra::Vector2;

/// Squared separation below which a pair is treated as co-located
pub const DEFAULT_MIN_DISTANCE_SQ: f64 = 1e-12;

/// Direct O(N²) gravitational acceleration
///
/// Every ordered pair `(i, j)` is evaluated on its own:
/// `a_i += G * m_j / r² * (p_j - p_i) / r`. Both orderings are computed
/// rather than mirrored so that results do not depend on pair order.
///
/// Pairs closer than `sqrt(min_distance_sq)` contribute nothing; such
/// particles overlap and are merged by collision resolution later in the
/// same step.
///
/// # Examples
///
/// ```
/// use nbody::forces::{DirectGravity, ForceModel, G};
/// use nbody::particle::{Particle, ParticleId};
/// use nalgebra::{Point2, Vector2};
///
/// let particles = vec![
///     Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 1.0),
///     Particle::new(ParticleId(1), Point2::new(2.0, 0.0), Vector2::zeros(), 1.0),
/// ];
///
/// let accel = DirectGravity::new().acceleration(0, &particles);
/// assert!((accel.x - G / 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DirectGravity {
    /// Gravitational constant
    pub g: f64,
    /// Pairs with `r²` below this are skipped
    pub min_distance_sq: f64,
}

impl DirectGravity {
    /// Creates a direct gravity model with `G = 10` and the default guard
    pub fn new() -> Self {
        Self {
            g: G,
            min_distance_sq: DEFAULT_MIN_DISTANCE_SQ,
        }
    }

    /// Creates a direct gravity model with a custom co-location guard
    pub fn with_min_distance(min_distance: f64) -> Self {
        Self {
            g: G,
            min_distance_sq: min_distance * min_distance,
        }
    }
}

impl Default for DirectGravity {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceModel for DirectGravity {
    fn acceleration(&self, idx: usize, particles: &[Particle]) -> Vector2<f64> {
        let particle = &particles[idx];

        particles
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .filter_map(|(_, other)| {
                let dr = other.position - particle.position;
                let r2 = dr.magnitude_squared();
                if r2 < self.min_distance_sq {
                    return None;
                }
                let r = r2.sqrt();
                let unit = dr / r;
                Some(unit * (self.g * other.mass / r2))
            })
            .fold(Vector2::zeros(), |acc, a| acc + a)
    }

    fn potential_energy(&self, particles: &[Particle]) -> f64 {
        // Each pair counted once
        particles
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                particles[i + 1..].iter().filter_map(move |b| {
                    let r2 = (a.position - b.position).magnitude_squared();
                    if r2 < self.min_distance_sq {
                        None
                    } else {
                        Some(-self.g * a.mass * b.mass / r2.sqrt())
                    }
                })
            })
            .sum()
    }
}
