use nalgebra::{Point2, Vector2};

/// Identifier of a particle.
///
/// Ids are dense (`0..n`) at spawn time. A merged particle inherits the
/// smallest id of its group, so an id is unique within one step's particle
/// set but may outlive the particle it was first issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u32);

/// A point mass with a circular extent.
///
/// Particles have unit density over their area, so `mass == radius²` always
/// holds. Use [`Particle::new`] or [`Particle::from_mass`] rather than building
/// the struct by hand to keep that true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub mass: f64,
    pub radius: f64,
}

impl Particle {
    /// Creates a particle whose mass is derived from its radius
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::particle::{Particle, ParticleId};
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let p = Particle::new(ParticleId(3), Point2::new(1.0, 2.0), Vector2::zeros(), 2.0);
    /// assert_eq!(p.mass, 4.0);
    /// ```
    pub fn new(id: ParticleId, position: Point2<f64>, velocity: Vector2<f64>, radius: f64) -> Self {
        Particle {
            id,
            position,
            velocity,
            mass: radius * radius,
            radius,
        }
    }

    /// Creates a particle whose radius is derived from its mass
    ///
    /// This is the constructor used for merge products: the mass is the exact
    /// sum of the parts and the radius follows as `sqrt(mass)`.
    pub fn from_mass(id: ParticleId, position: Point2<f64>, velocity: Vector2<f64>, mass: f64) -> Self {
        Particle {
            id,
            position,
            velocity,
            mass,
            radius: mass.sqrt(),
        }
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// Whether the circular extents of two particles touch or overlap
    ///
    /// Cheap axis-aligned rejection first, then the exact squared-distance
    /// test `dx² + dy² <= (r_a + r_b)²`.
    pub fn overlaps(&self, other: &Particle) -> bool {
        let reach = self.radius + other.radius;

        let dx = self.position.x - other.position.x;
        if dx.abs() > reach {
            return false;
        }
        let dy = self.position.y - other.position.y;
        if dy.abs() > reach {
            return false;
        }

        dx * dx + dy * dy <= reach * reach
    }
}
