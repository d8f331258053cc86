use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::forces::gravity::DirectGravity;
use crate::forces::{ForceModel, G};
use crate::particle::{Particle, ParticleId};

fn at(id: u32, x: f64, y: f64, radius: f64) -> Particle {
    Particle::new(ParticleId(id), Point2::new(x, y), Vector2::zeros(), radius)
}

#[test]
fn test_single_particle_feels_nothing() {
    let particles = vec![at(0, 3.0, -2.0, 1.0)];

    let accel = DirectGravity::new().acceleration(0, &particles);

    assert_eq!(accel, Vector2::zeros());
}

#[test]
fn test_acceleration_magnitude() {
    // m_j = 2² = 4 at distance 4: a = 10 * 4 / 16
    let particles = vec![at(0, 0.0, 0.0, 1.0), at(1, 0.0, 4.0, 2.0)];

    let accel = DirectGravity::new().acceleration(0, &particles);

    assert_relative_eq!(accel.y, G * 4.0 / 16.0, epsilon = 1e-12);
    assert!(accel.x.abs() < 1e-15);
}

#[test]
fn test_pair_accelerations_are_opposite() {
    let particles = vec![at(0, 0.0, 0.0, 1.0), at(1, 1.5, 0.0, 1.0)];

    let accels = DirectGravity::new().accelerations(&particles);

    assert_eq!(accels.len(), 2);
    assert_eq!(accels[0], -accels[1]);
    assert_relative_eq!(accels[0].x, G / 2.25, epsilon = 1e-12);
}

#[test]
fn test_heavier_particle_accelerates_less() {
    let particles = vec![at(0, 0.0, 0.0, 1.0), at(1, 10.0, 0.0, 3.0)];

    let accels = DirectGravity::new().accelerations(&particles);

    // Force is equal and opposite, so a_0 / a_1 = m_1 / m_0 = 9
    assert_relative_eq!(accels[0].x / -accels[1].x, 9.0, epsilon = 1e-12);
}

#[test]
fn test_superposition() {
    // Symmetric neighbours cancel
    let particles = vec![
        at(0, 0.0, 0.0, 1.0),
        at(1, -3.0, 0.0, 1.0),
        at(2, 3.0, 0.0, 1.0),
    ];

    let accel = DirectGravity::new().acceleration(0, &particles);

    assert!(accel.magnitude() < 1e-15);
}

#[test]
fn test_co_located_pair_is_skipped() {
    let particles = vec![at(0, 1.0, 1.0, 1.0), at(1, 1.0, 1.0, 1.0), at(2, 1.0, 3.0, 1.0)];

    let accels = DirectGravity::new().accelerations(&particles);

    for a in &accels {
        assert!(a.x.is_finite() && a.y.is_finite());
    }
    // Only particle 2 pulls on particle 0
    assert_relative_eq!(accels[0].y, G / 4.0, epsilon = 1e-12);
}

#[test]
fn test_custom_guard_distance() {
    let particles = vec![at(0, 0.0, 0.0, 1.0), at(1, 0.5, 0.0, 1.0)];

    let accel = DirectGravity::with_min_distance(1.0).acceleration(0, &particles);

    assert_eq!(accel, Vector2::zeros());
}

#[test]
fn test_potential_energy_pair() {
    let particles = vec![at(0, 0.0, 0.0, 1.0), at(1, 2.0, 0.0, 1.0)];

    let pe = DirectGravity::new().potential_energy(&particles);

    assert_relative_eq!(pe, -G / 2.0, epsilon = 1e-12);
}

#[test]
fn test_potential_energy_counts_pairs_once() {
    let particles = vec![
        at(0, 0.0, 0.0, 1.0),
        at(1, 1.0, 0.0, 1.0),
        at(2, 0.0, 1.0, 1.0),
    ];

    let pe = DirectGravity::new().potential_energy(&particles);

    let expected = -G * (1.0 + 1.0 + 1.0 / 2.0_f64.sqrt());
    assert_relative_eq!(pe, expected, epsilon = 1e-12);
}
