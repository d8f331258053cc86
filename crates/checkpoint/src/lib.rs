//! Chunked on-disk persistence for simulation runs
//!
//! Each run owns a directory `<saves_folder>/<simulation_name>/` holding
//! `chunk_<n>.json` files and an `index.json` manifest. Every chunk is a
//! JSON object mapping timestep to [`Snapshot`]; chunks cover disjoint,
//! contiguous timestep ranges.

pub mod chunk;
pub mod error;
pub mod manager;
pub mod manifest;
pub mod reader;
pub mod snapshot;

pub use chunk::{Chunk, merge_disjoint};
pub use error::CheckpointError;
pub use manager::{CheckpointConfig, CheckpointManager, FlushKind, FlushReport};
pub use manifest::{ChunkLocation, ChunkRange, Manifest};
pub use reader::ChunkReader;
pub use snapshot::{ParticleRecord, Snapshot};

#[cfg(test)]
mod chunk_test;
