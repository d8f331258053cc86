use std::fs;

use tempfile::TempDir;

use crate::chunk::*;
use crate::error::CheckpointError;
use crate::snapshot::{ParticleRecord, Snapshot};

fn snapshot(timestep: u64, particles: u32) -> Snapshot {
    Snapshot {
        current_time: timestep as f64 * 0.5,
        max_time: 100.0,
        timestep,
        number_of_particles: particles,
        particles: (0..particles)
            .map(|id| ParticleRecord(id, [id as f64, 0.0], [0.0, 1.0], 1.0, 1.0))
            .collect(),
    }
}

fn chunk_of(timesteps: std::ops::RangeInclusive<u64>) -> Chunk {
    timesteps.map(|t| (t, snapshot(t, 2))).collect()
}

#[test]
fn test_file_names() {
    assert_eq!(chunk_file_name(0), "chunk_0.json");
    assert_eq!(parse_chunk_index("chunk_0.json"), Some(0));
    assert_eq!(parse_chunk_index("chunk_41.json"), Some(41));
    assert_eq!(parse_chunk_index("chunk_41.json.tmp"), None);
    assert_eq!(parse_chunk_index("chunk_.json"), None);
    assert_eq!(parse_chunk_index("chunk_x.json"), None);
}

#[test]
fn test_particle_total() {
    let mut chunk = Chunk::new();
    chunk.insert(0, snapshot(0, 5));
    chunk.insert(1, snapshot(1, 3));

    assert_eq!(particle_total(&chunk), 8);
}

#[test]
fn test_merge_disjoint() {
    let merged = merge_disjoint(chunk_of(0..=4), chunk_of(5..=7)).unwrap();

    let keys: Vec<u64> = merged.keys().copied().collect();
    assert_eq!(keys, (0..=7).collect::<Vec<u64>>());
}

#[test]
fn test_merge_rejects_overlap() {
    let err = merge_disjoint(chunk_of(0..=4), chunk_of(4..=6)).unwrap_err();

    assert!(matches!(err, CheckpointError::OverlappingTimestep(4)));
}

#[test]
fn test_write_then_read() {
    let dir = TempDir::new().unwrap();
    let chunk = chunk_of(10..=12);

    write_chunk(dir.path(), 3, &chunk).unwrap();
    let loaded = read_chunk(dir.path(), 3).unwrap();

    assert_eq!(loaded, chunk);
    // No temporary file left behind
    assert!(!dir.path().join("chunk_3.json.tmp").exists());
}

#[test]
fn test_chunk_is_timestep_keyed_object() {
    let dir = TempDir::new().unwrap();
    write_chunk(dir.path(), 0, &chunk_of(0..=1)).unwrap();

    let text = fs::read_to_string(chunk_path(dir.path(), 0)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["1"]["timestep"], 1);
    assert_eq!(value["0"]["number_of_particles"], 2);
}

#[test]
fn test_missing_chunk() {
    let dir = TempDir::new().unwrap();

    let err = read_chunk(dir.path(), 7).unwrap_err();
    assert!(matches!(err, CheckpointError::MissingChunk { index: 7, .. }));
    assert_eq!(err.chunk_index(), Some(7));

    assert!(try_read_chunk(dir.path(), 7).unwrap().is_none());
}

#[test]
fn test_malformed_chunk() {
    let dir = TempDir::new().unwrap();
    fs::write(chunk_path(dir.path(), 2), "{\"0\": [1, 2").unwrap();

    let err = read_chunk(dir.path(), 2).unwrap_err();
    assert!(matches!(err, CheckpointError::MalformedChunk { index: 2, .. }));

    // A malformed file is not treated as absent
    assert!(try_read_chunk(dir.path(), 2).is_err());
}

#[test]
fn test_list_chunk_indices() {
    let dir = TempDir::new().unwrap();
    for index in [10, 2, 0] {
        write_chunk(dir.path(), index, &chunk_of(0..=0)).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(list_chunk_indices(dir.path()).unwrap(), vec![0, 2, 10]);
}

#[test]
fn test_list_temp_files() {
    let dir = TempDir::new().unwrap();
    write_chunk(dir.path(), 0, &chunk_of(0..=0)).unwrap();
    for name in ["chunk_4.json.tmp", "index.json.tmp", "notes.tmp", "chunk_x.json.tmp"] {
        fs::write(dir.path().join(name), "partial").unwrap();
    }

    let leftovers = list_temp_files(dir.path()).unwrap();

    assert_eq!(
        leftovers,
        vec![dir.path().join("chunk_4.json.tmp"), dir.path().join("index.json.tmp")]
    );
}
