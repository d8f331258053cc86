use nalgebra::{Point2, Vector2};

use crate::collisions::detection::*;
use crate::particle::{Particle, ParticleId};

fn at(id: u32, x: f64, y: f64) -> Particle {
    Particle::new(ParticleId(id), Point2::new(x, y), Vector2::zeros(), 1.0)
}

#[test]
fn test_no_particles() {
    assert!(DirectDetector.detect(&[]).is_empty());
}

#[test]
fn test_well_separated_particles() {
    let particles = vec![at(0, 0.0, 0.0), at(1, 10.0, 0.0), at(2, 0.0, 10.0)];

    assert!(DirectDetector.detect(&particles).is_empty());
}

#[test]
fn test_single_overlap() {
    let particles = vec![at(0, 0.0, 0.0), at(1, 1.5, 0.0), at(2, 20.0, 0.0)];

    let events = DirectDetector.detect(&particles);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].body_a, ParticleId(0));
    assert_eq!(events[0].body_b, ParticleId(1));
    assert!((events[0].separation - 1.5).abs() < 1e-12);
    assert_eq!(events[0].collision_radius, 2.0);
}

#[test]
fn test_touching_counts() {
    let particles = vec![at(0, 0.0, 0.0), at(1, 0.0, 2.0)];

    assert_eq!(DirectDetector.detect(&particles).len(), 1);
}

#[test]
fn test_pairs_reported_once_in_id_order() {
    // Input deliberately out of id order
    let particles = vec![at(2, 1.0, 0.0), at(0, 0.0, 0.0), at(1, 0.5, 0.5)];

    let events = DirectDetector.detect(&particles);
    let pairs: Vec<(u32, u32)> = events.iter().map(|e| (e.body_a.0, e.body_b.0)).collect();

    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
}

#[test]
fn test_different_radii() {
    let small = at(0, 0.0, 0.0);
    let big = Particle::new(ParticleId(1), Point2::new(3.5, 0.0), Vector2::zeros(), 3.0);

    let events = DirectDetector.detect(&[small, big]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].collision_radius, 4.0);
}
