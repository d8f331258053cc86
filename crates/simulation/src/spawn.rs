//! Initial particle placement

use nalgebra::{Point2, Vector2};
use nbody::ParticleStore;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spawned positions are multiples of 1/100
const POSITION_STEPS_PER_UNIT: f64 = 100.0;
/// Random velocity components are multiples of 1/1000 of the magnitude
const VELOCITY_STEPS: i64 = 1000;
/// Spawned particles have unit radius and therefore unit mass
pub const SPAWN_RADIUS: f64 = 1.0;

/// Axis-aligned spawn region, `[min, max]` per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            x: [-10.0, 10.0],
            y: [-10.0, 10.0],
        }
    }
}

impl SpawnBounds {
    pub fn contains(&self, position: &Point2<f64>) -> bool {
        (self.x[0]..=self.x[1]).contains(&position.x) && (self.y[0]..=self.y[1]).contains(&position.y)
    }
}

/// Places `count` unit particles with ids `0..count`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    pub count: usize,
    pub bounds: SpawnBounds,
    /// Random velocities up to this magnitude per component; zero when `None`
    pub velocity_magnitude: Option<f64>,
}

impl Spawner {
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> ParticleStore {
        let mut store = ParticleStore::new();
        for _ in 0..self.count {
            let position = Point2::new(
                quantized_in(rng, self.bounds.x),
                quantized_in(rng, self.bounds.y),
            );
            let velocity = match self.velocity_magnitude {
                Some(magnitude) => Vector2::new(
                    velocity_component(rng, magnitude),
                    velocity_component(rng, magnitude),
                ),
                None => Vector2::zeros(),
            };
            store.add(position, velocity, SPAWN_RADIUS);
        }
        store
    }
}

/// Uniform draw from the 0.01 grid points inside `[min, max]`
fn quantized_in<R: Rng + ?Sized>(rng: &mut R, [min, max]: [f64; 2]) -> f64 {
    let lo = (min * POSITION_STEPS_PER_UNIT).ceil() as i64;
    let hi = (max * POSITION_STEPS_PER_UNIT).floor() as i64;
    if lo > hi {
        // No grid point in range
        return min;
    }
    rng.random_range(lo..=hi) as f64 / POSITION_STEPS_PER_UNIT
}

fn velocity_component<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> f64 {
    rng.random_range(-VELOCITY_STEPS..=VELOCITY_STEPS) as f64 / VELOCITY_STEPS as f64 * magnitude
}
