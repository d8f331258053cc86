//! Read side of a run directory, for playback and analysis

use std::path::{Path, PathBuf};

use crate::chunk::{Chunk, list_chunk_indices, merge_disjoint, read_chunk};
use crate::error::{CheckpointError, Result};
use crate::manifest::{ChunkLocation, ChunkRange, Manifest};
use crate::snapshot::Snapshot;

/// Reads the chunks of one simulation run
///
/// # Examples
///
/// ```no_run
/// use checkpoint::ChunkReader;
///
/// let reader = ChunkReader::for_simulation("saves", "sim");
/// if let Some(location) = reader.locate(250)? {
///     let chunk = reader.load_chunk(location.index)?;
///     println!("{} snapshots up to timestep {}", chunk.len(), location.max_timestep);
/// }
/// # Ok::<(), checkpoint::CheckpointError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChunkReader {
    dir: PathBuf,
}

impl ChunkReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn for_simulation(saves_folder: impl AsRef<Path>, simulation_name: &str) -> Self {
        Self::new(saves_folder.as_ref().join(simulation_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Chunk indices present on disk, ascending
    pub fn list_chunks(&self) -> Result<Vec<u32>> {
        list_chunk_indices(&self.dir)
    }

    /// Loads one chunk in timestep order
    ///
    /// # Errors
    ///
    /// `MissingChunk`, `ChunkRead` or `MalformedChunk`, each naming the
    /// chunk index.
    pub fn load_chunk(&self, index: u32) -> Result<Chunk> {
        read_chunk(&self.dir, index)
    }

    /// Timestep ranges of all chunks
    ///
    /// Taken from the manifest when present; otherwise every chunk is
    /// loaded to rebuild them.
    pub fn ranges(&self) -> Result<Vec<ChunkRange>> {
        if let Some(manifest) = Manifest::load(&self.dir)? {
            return Ok(manifest.chunks);
        }

        log::debug!("no manifest in {}, scanning chunks", self.dir.display());
        let mut ranges = Vec::new();
        for index in self.list_chunks()? {
            let chunk = self.load_chunk(index)?;
            ranges.extend(ChunkRange::of(index, &chunk));
        }
        Ok(ranges)
    }

    /// Resolves a timestep to the chunk that stores it
    pub fn locate(&self, timestep: u64) -> Result<Option<ChunkLocation>> {
        let manifest = Manifest {
            chunks: self.ranges()?,
        };
        Ok(manifest.locate(timestep))
    }

    /// Largest timestep stored in the run, `None` before any chunk exists
    pub fn last_timestep(&self) -> Result<Option<u64>> {
        let manifest = Manifest {
            chunks: self.ranges()?,
        };
        Ok(manifest.last_timestep())
    }

    /// Loads the snapshot of a single timestep
    pub fn load_snapshot(&self, timestep: u64) -> Result<Snapshot> {
        let location = self
            .locate(timestep)?
            .ok_or(CheckpointError::TimestepNotFound(timestep))?;

        self.load_chunk(location.index)?
            .remove(&timestep)
            .ok_or(CheckpointError::TimestepNotFound(timestep))
    }

    /// Loads every chunk into one map
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable chunk, or if two chunks share a
    /// timestep.
    pub fn load_all(&self) -> Result<Chunk> {
        let mut all = Chunk::new();
        for index in self.list_chunks()? {
            all = merge_disjoint(all, self.load_chunk(index)?)?;
        }
        Ok(all)
    }
}
