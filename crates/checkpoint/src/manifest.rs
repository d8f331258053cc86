//! Per-run index of chunk timestep ranges
//!
//! The manifest lets a reader map a timestep to its chunk without opening
//! any chunk file. It is rewritten after every chunk write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ReadFailure, read_json, write_json_atomic};
use crate::error::{CheckpointError, Result};

pub(crate) const MANIFEST_FILE: &str = "index.json";

/// Timestep range covered by one chunk file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRange {
    pub index: u32,
    pub first_timestep: u64,
    pub last_timestep: u64,
}

impl ChunkRange {
    /// Range of a chunk, or `None` for an empty chunk
    pub fn of(index: u32, chunk: &Chunk) -> Option<Self> {
        let (&first_timestep, _) = chunk.first_key_value()?;
        let (&last_timestep, _) = chunk.last_key_value()?;
        Some(ChunkRange {
            index,
            first_timestep,
            last_timestep,
        })
    }

    pub fn contains(&self, timestep: u64) -> bool {
        (self.first_timestep..=self.last_timestep).contains(&timestep)
    }
}

/// Where a timestep lives, for random-access playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLocation {
    /// Chunk holding the timestep
    pub index: u32,
    /// Whether the timestep is the first one in that chunk
    pub is_first: bool,
    /// Largest timestep stored in that chunk
    pub max_timestep: u64,
}

/// Ordered list of chunk ranges for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub chunks: Vec<ChunkRange>,
}

impl Manifest {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Loads the manifest of a run directory, if one was written
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(dir);
        match read_json(&path) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(ReadFailure::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(ReadFailure::Io(e)) => Err(CheckpointError::io(path, e)),
            Err(ReadFailure::Decode(source)) => {
                Err(CheckpointError::MalformedManifest { path, source })
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        write_json_atomic(&Self::path(dir), self)
    }

    /// Adds or replaces the range for `range.index`, keeping index order
    pub fn insert(&mut self, range: ChunkRange) {
        self.remove(range.index);
        let at = self.chunks.partition_point(|c| c.index < range.index);
        self.chunks.insert(at, range);
    }

    pub fn remove(&mut self, index: u32) {
        self.chunks.retain(|c| c.index != index);
    }

    /// Resolves a timestep to its chunk
    ///
    /// # Examples
    ///
    /// ```
    /// use checkpoint::manifest::{ChunkRange, Manifest};
    ///
    /// let mut manifest = Manifest::default();
    /// manifest.insert(ChunkRange { index: 0, first_timestep: 0, last_timestep: 9 });
    /// manifest.insert(ChunkRange { index: 1, first_timestep: 10, last_timestep: 14 });
    ///
    /// let location = manifest.locate(10).unwrap();
    /// assert_eq!(location.index, 1);
    /// assert!(location.is_first);
    /// assert_eq!(location.max_timestep, 14);
    /// assert!(manifest.locate(15).is_none());
    /// ```
    pub fn locate(&self, timestep: u64) -> Option<ChunkLocation> {
        self.chunks
            .iter()
            .find(|c| c.contains(timestep))
            .map(|c| ChunkLocation {
                index: c.index,
                is_first: c.first_timestep == timestep,
                max_timestep: c.last_timestep,
            })
    }

    /// Largest timestep stored in any chunk
    pub fn last_timestep(&self) -> Option<u64> {
        self.chunks.iter().map(|c| c.last_timestep).max()
    }
}
