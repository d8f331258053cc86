use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::forces::{DirectGravity, ForceModel, G};
use crate::integrator::{Integrator, KickDrift};
use crate::particle::{Particle, ParticleId};

fn make_pair() -> Vec<Particle> {
    vec![
        Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::new(0.0, 1.0), 1.0),
        Particle::new(ParticleId(1), Point2::new(10.0, 0.0), Vector2::new(0.0, -1.0), 1.0),
    ]
}

#[test]
fn test_free_particle_drifts() {
    let mut particles = vec![Particle::new(
        ParticleId(0),
        Point2::new(1.0, 1.0),
        Vector2::new(2.0, -4.0),
        1.0,
    )];

    KickDrift.step(&mut particles, 0.25, &DirectGravity::new());

    assert_eq!(particles[0].position, Point2::new(1.5, 0.0));
    assert_eq!(particles[0].velocity, Vector2::new(2.0, -4.0));
}

#[test]
fn test_kick_is_not_scaled_by_dt() {
    // The velocity change after one step is the raw acceleration, whatever
    // the step size. Two runs with different dt get the same kick.
    let gravity = DirectGravity::new();
    let expected_kick = G / 100.0;

    for dt in [1.0, 0.01] {
        let mut particles = make_pair();
        KickDrift.step(&mut particles, dt, &gravity);

        assert_relative_eq!(particles[0].velocity.x, expected_kick, epsilon = 1e-15);
        assert_relative_eq!(particles[1].velocity.x, -expected_kick, epsilon = 1e-15);
    }
}

#[test]
fn test_drift_uses_updated_velocity() {
    let mut particles = make_pair();
    let dt = 0.5;

    KickDrift.step(&mut particles, dt, &DirectGravity::new());

    let kick = G / 100.0;
    assert_relative_eq!(particles[0].position.x, kick * dt, epsilon = 1e-15);
    assert_relative_eq!(particles[0].position.y, 1.0 * dt, epsilon = 1e-15);
    assert_relative_eq!(particles[1].position.x, 10.0 - kick * dt, epsilon = 1e-12);
}

#[test]
fn test_accelerations_use_start_of_step_positions() {
    let gravity = DirectGravity::new();
    let mut particles = vec![
        Particle::new(ParticleId(0), Point2::new(0.0, 0.0), Vector2::new(5.0, 0.0), 1.0),
        Particle::new(ParticleId(1), Point2::new(3.0, 0.0), Vector2::zeros(), 1.0),
        Particle::new(ParticleId(2), Point2::new(0.0, 6.0), Vector2::zeros(), 1.0),
    ];
    let before = particles.clone();
    let expected = gravity.accelerations(&before);

    KickDrift.step(&mut particles, 0.1, &gravity);

    for ((after, start), accel) in particles.iter().zip(before.iter()).zip(expected.iter()) {
        assert_eq!(after.velocity, start.velocity + *accel);
    }
}

#[test]
fn test_momentum_conserved_by_step() {
    let mut particles = make_pair();
    particles[1] = Particle::new(ParticleId(1), Point2::new(7.0, 2.0), Vector2::new(0.3, -1.0), 2.0);

    let total = |ps: &[Particle]| -> Vector2<f64> {
        ps.iter()
            .map(|p| p.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    };

    let p_before = total(&particles);
    KickDrift.step(&mut particles, 0.01, &DirectGravity::new());
    let p_after = total(&particles);

    assert!((p_after - p_before).magnitude() < 1e-12);
}
