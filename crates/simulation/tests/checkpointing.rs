//! Chunk layout produced by complete runs.

use std::collections::BTreeSet;

use checkpoint::{ChunkReader, Manifest, Snapshot};
use simulation::{Simulation, SimulationConfig, SpawnBounds, StepOutcome};
use tempfile::TempDir;

fn chunky_config(dir: &TempDir, name: &str) -> SimulationConfig {
    SimulationConfig {
        simulation_name: name.to_string(),
        saves_folder: dir.path().to_path_buf(),
        delta_time: 0.01,
        max_time: 1.0,
        particle_count: 30,
        spawn_bounds: SpawnBounds {
            x: [-40.0, 40.0],
            y: [-40.0, 40.0],
        },
        velocity_magnitude: 1.0,
        seed: 5,
        // A handful of steps per chunk
        flush_threshold: 200,
        ..SimulationConfig::default()
    }
}

#[test]
fn chunks_cover_every_timestep_once() {
    let dir = TempDir::new().unwrap();
    let mut sim = Simulation::new(chunky_config(&dir, "disjoint")).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.final_timestep, 100);

    let reader = ChunkReader::new(sim.config().run_dir());
    let indices = reader.list_chunks().unwrap();
    assert!(indices.len() > 5, "expected many chunks, got {indices:?}");
    assert_eq!(summary.chunks_written, indices.len());

    let mut seen = BTreeSet::new();
    let mut previous_last = None;
    for index in &indices {
        let chunk = reader.load_chunk(*index).unwrap();
        let first = *chunk.keys().next().unwrap();
        let last = *chunk.keys().next_back().unwrap();

        // Contiguous inside the chunk and continuing where the last one ended
        assert_eq!(chunk.len() as u64, last - first + 1);
        assert_eq!(first, previous_last.map_or(0, |l: u64| l + 1));
        previous_last = Some(last);

        for timestep in chunk.keys() {
            assert!(seen.insert(*timestep), "timestep {timestep} stored twice");
        }
    }
    assert_eq!(seen, (0..=100).collect::<BTreeSet<u64>>());
}

#[test]
fn manifest_resolves_every_timestep() {
    let dir = TempDir::new().unwrap();
    let mut sim = Simulation::new(chunky_config(&dir, "lookup")).unwrap();
    sim.run().unwrap();

    let reader = ChunkReader::new(sim.config().run_dir());
    for timestep in 0..=100 {
        let location = reader.locate(timestep).unwrap().unwrap();
        let chunk = reader.load_chunk(location.index).unwrap();

        assert!(chunk.contains_key(&timestep));
        assert_eq!(location.is_first, chunk.keys().next() == Some(&timestep));
        assert_eq!(Some(&location.max_timestep), chunk.keys().next_back());
    }
    assert!(reader.locate(101).unwrap().is_none());

    let manifest = Manifest::load(reader.dir()).unwrap().unwrap();
    assert_eq!(manifest.last_timestep(), Some(100));
}

#[test]
fn stored_snapshots_match_live_state() {
    let dir = TempDir::new().unwrap();
    let mut sim = Simulation::new(chunky_config(&dir, "replay")).unwrap();

    let mut live = vec![Snapshot::capture(sim.state())];
    while sim.step().unwrap() != StepOutcome::AlreadyDone {
        live.push(Snapshot::capture(sim.state()));
        if sim.is_done() {
            break;
        }
    }

    let stored = ChunkReader::new(sim.config().run_dir()).load_all().unwrap();
    assert_eq!(stored.len(), live.len());
    for snapshot in &live {
        // Bit-for-bit, floats included
        assert_eq!(&stored[&snapshot.timestep], snapshot);
    }

    let last = &live[live.len() - 1];
    assert_eq!(last.to_particles(), sim.particles());
}

#[test]
fn same_seed_same_run() {
    let dir = TempDir::new().unwrap();
    let mut first = Simulation::new(chunky_config(&dir, "first")).unwrap();
    let mut second = Simulation::new(chunky_config(&dir, "second")).unwrap();
    first.run().unwrap();
    second.run().unwrap();

    let a = ChunkReader::new(first.config().run_dir()).load_all().unwrap();
    let b = ChunkReader::new(second.config().run_dir()).load_all().unwrap();
    assert_eq!(a, b);

    let reseeded = SimulationConfig {
        seed: 6,
        ..chunky_config(&dir, "third")
    };
    let mut third = Simulation::new(reseeded).unwrap();
    third.run().unwrap();
    let c = ChunkReader::new(third.config().run_dir()).load_all().unwrap();
    assert_ne!(a[&0], c[&0]);
}

#[test]
fn rerun_replaces_previous_chunks() {
    let dir = TempDir::new().unwrap();
    let mut long = Simulation::new(chunky_config(&dir, "rerun")).unwrap();
    long.run().unwrap();

    let short = SimulationConfig {
        max_time: 0.05,
        ..chunky_config(&dir, "rerun")
    };
    let mut sim = Simulation::new(short).unwrap();
    sim.run().unwrap();

    let all = ChunkReader::new(sim.config().run_dir()).load_all().unwrap();
    assert_eq!(all.keys().copied().collect::<Vec<u64>>(), (0..=5).collect::<Vec<u64>>());
}

#[test]
fn short_run_writes_single_tail_chunk() {
    let dir = TempDir::new().unwrap();
    let config = SimulationConfig {
        flush_threshold: 1_000_000,
        ..chunky_config(&dir, "single")
    };
    let mut sim = Simulation::new(config).unwrap();
    let summary = sim.run().unwrap();

    let reader = ChunkReader::new(sim.config().run_dir());
    assert_eq!(reader.list_chunks().unwrap(), vec![0]);
    assert_eq!(summary.chunks_written, 1);
    assert_eq!(reader.load_chunk(0).unwrap().len(), 101);
}
