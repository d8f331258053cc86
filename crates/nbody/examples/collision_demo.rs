//! Gravitational collapse of a ring of discs
//!
//! Twelve unit discs start at rest on a circle and fall inwards. Each step
//! prints the mergers found, so the chained collisions near the centre are
//! visible as they happen.
//!
//! Run with: cargo run --package nbody --example collision_demo

use nalgebra::{Point2, Vector2};
use nbody::collisions::{CollisionDetector, CollisionResolver, DirectDetector};
use nbody::forces::DirectGravity;
use nbody::integrator::{Integrator, KickDrift};
use nbody::{ParticleStore, SimulationState};

fn main() {
    println!("Ring collapse: 12 unit discs on a circle of radius 8\n");

    let mut store = ParticleStore::new();
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        store.add(
            Point2::new(8.0 * angle.cos(), 8.0 * angle.sin()),
            Vector2::zeros(),
            1.0,
        );
    }

    let mut state = SimulationState::new(0.01, 1.0, store);
    let force = DirectGravity::new();
    let resolver = CollisionResolver::new();
    let initial_mass = state.particles.total_mass();

    while !state.is_finished() {
        let timestep = state.advance_clock();
        KickDrift.step(state.particles.particles_mut(), state.delta_time, &force);

        let events = DirectDetector.detect(state.particles.particles());
        for event in &events {
            println!(
                "step {timestep:3}: {:?} touches {:?} (separation {:.3}, limit {:.3})",
                event.body_a, event.body_b, event.separation, event.collision_radius
            );
        }

        for group in resolver.resolve(&mut state.particles) {
            let merged = state.particles.get(group.survivor).copied();
            if let Some(merged) = merged {
                println!(
                    "          {} discs -> {:?}, mass {:.1}, radius {:.3}",
                    group.members.len(),
                    merged.id,
                    merged.mass,
                    merged.radius
                );
            }
        }
    }

    println!("\nAfter {} steps (t = {:.2}):", state.timestep, state.time);
    println!("  particles left: {}", state.particle_count());
    println!(
        "  mass: {:.1} (started with {:.1})",
        state.particles.total_mass(),
        initial_mass
    );
    println!(
        "  momentum: ({:.2e}, {:.2e})",
        state.particles.total_momentum().x,
        state.particles.total_momentum().y
    );
}
