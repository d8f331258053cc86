//! Buffered, size-triggered checkpoint writer
//!
//! Snapshots accumulate in memory until the total number of buffered
//! particle records exceeds a threshold, then the whole buffer becomes the
//! next chunk file. Particle counts shrink as bodies merge, so late chunks
//! span more timesteps than early ones.
//!
//! When the run ends before the buffer fills, the remainder is folded onto
//! the previous chunk: both are written together under a new index and the
//! superseded file is removed, keeping chunk ranges disjoint.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunk::{
    Chunk, chunk_path, list_chunk_indices, list_temp_files, merge_disjoint, try_read_chunk,
    write_chunk,
};
use crate::error::{CheckpointError, Result};
use crate::manifest::{ChunkRange, Manifest};
use crate::snapshot::Snapshot;

/// Buffered particle records that trigger a flush once exceeded
pub const DEFAULT_FLUSH_THRESHOLD: usize = 500_000;

/// Where and how often a run is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Parent directory of all runs
    pub saves_folder: PathBuf,
    /// Name of this run's directory inside `saves_folder`
    pub simulation_name: String,
    /// Flush once more than this many particle records are buffered
    pub flush_threshold: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            saves_folder: PathBuf::from("saves"),
            simulation_name: "sim".to_string(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl CheckpointConfig {
    pub fn run_dir(&self) -> PathBuf {
        self.saves_folder.join(&self.simulation_name)
    }
}

/// Why a chunk was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushKind {
    /// The buffer crossed the size threshold
    Threshold,
    /// End-of-run flush; `merged_with` is the chunk folded into this one
    Tail { merged_with: Option<u32> },
}

/// Summary of one chunk write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub range: ChunkRange,
    pub snapshots: usize,
    pub kind: FlushKind,
}

/// Accumulates snapshots and writes them out as chunk files
#[derive(Debug)]
pub struct CheckpointManager {
    dir: PathBuf,
    flush_threshold: usize,
    buffer: Chunk,
    buffered_particles: usize,
    /// Index the next chunk will be written under
    saved_counter: u32,
    manifest: Manifest,
}

impl CheckpointManager {
    /// Opens the run directory, creating it if needed
    ///
    /// Chunk files left by an earlier run of the same name are removed so
    /// that the directory only ever describes one run, together with any
    /// temporary files from writes that were interrupted.
    pub fn new(config: &CheckpointConfig) -> Result<Self> {
        Self::open(config.run_dir(), config.flush_threshold)
    }

    pub fn open(dir: impl Into<PathBuf>, flush_threshold: usize) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CheckpointError::io(&dir, e))?;

        let stale = list_chunk_indices(&dir)?;
        if !stale.is_empty() {
            log::warn!(
                "removing {} chunk(s) from a previous run in {}",
                stale.len(),
                dir.display()
            );
        }
        let stale_paths = stale.into_iter().map(|index| chunk_path(&dir, index));
        for path in stale_paths.chain(list_temp_files(&dir)?) {
            fs::remove_file(&path).map_err(|e| CheckpointError::io(&path, e))?;
        }

        let manifest = Manifest::default();
        manifest.save(&dir)?;

        Ok(Self {
            dir,
            flush_threshold,
            buffer: Chunk::new(),
            buffered_particles: 0,
            saved_counter: 0,
            manifest,
        })
    }

    /// Buffers a snapshot and writes a chunk when one is due
    ///
    /// A chunk is due when the buffered particle records exceed the
    /// threshold, or when `terminal` is set (the run has just reached its
    /// end), in which case the tail flush applies.
    ///
    /// # Errors
    ///
    /// Any write failure. The buffer, including `snapshot`, is kept so a
    /// later flush can still persist it.
    pub fn record(&mut self, snapshot: Snapshot, terminal: bool) -> Result<Option<FlushReport>> {
        let timestep = snapshot.timestep;
        if self.buffer.contains_key(&timestep) {
            return Err(CheckpointError::OverlappingTimestep(timestep));
        }

        self.buffered_particles += snapshot.particle_count();
        self.buffer.insert(timestep, snapshot);

        if self.buffered_particles > self.flush_threshold {
            self.flush()
        } else if terminal {
            self.finish()
        } else {
            Ok(None)
        }
    }

    /// Writes the whole buffer as the next chunk
    pub fn flush(&mut self) -> Result<Option<FlushReport>> {
        let Some(range) = ChunkRange::of(self.saved_counter, &self.buffer) else {
            return Ok(None);
        };

        write_chunk(&self.dir, range.index, &self.buffer)?;
        self.manifest.insert(range);
        self.manifest.save(&self.dir)?;

        let report = FlushReport {
            range,
            snapshots: self.buffer.len(),
            kind: FlushKind::Threshold,
        };
        log::info!(
            "wrote chunk {} (timesteps {}..={}, {} particle records)",
            range.index,
            range.first_timestep,
            range.last_timestep,
            self.buffered_particles
        );

        self.clear_buffer();
        Ok(Some(report))
    }

    /// Flushes whatever is buffered at the end of a run
    ///
    /// The previous chunk, if there is one, is loaded and unioned with the
    /// buffer; the result is written under a new index and the previous
    /// file is then deleted. Without a previous chunk the buffer is written
    /// alone.
    pub fn finish(&mut self) -> Result<Option<FlushReport>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let previous = match self.saved_counter.checked_sub(1) {
            Some(index) => try_read_chunk(&self.dir, index)?.map(|chunk| (index, chunk)),
            None => None,
        };

        let (combined, merged_with) = match previous {
            Some((index, chunk)) => (merge_disjoint(chunk, self.buffer.clone())?, Some(index)),
            None => (self.buffer.clone(), None),
        };

        let Some(range) = ChunkRange::of(self.saved_counter, &combined) else {
            return Ok(None);
        };
        write_chunk(&self.dir, range.index, &combined)?;

        if let Some(index) = merged_with {
            self.manifest.remove(index);
        }
        self.manifest.insert(range);
        self.manifest.save(&self.dir)?;

        if let Some(index) = merged_with {
            let path = chunk_path(&self.dir, index);
            fs::remove_file(&path).map_err(|e| CheckpointError::io(&path, e))?;
        }

        log::info!(
            "wrote final chunk {} (timesteps {}..={}, folded from {:?})",
            range.index,
            range.first_timestep,
            range.last_timestep,
            merged_with
        );

        let report = FlushReport {
            range,
            snapshots: combined.len(),
            kind: FlushKind::Tail { merged_with },
        };
        self.clear_buffer();
        Ok(Some(report))
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.buffered_particles = 0;
        self.saved_counter += 1;
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    /// Snapshots waiting to be written
    pub fn buffered_snapshots(&self) -> usize {
        self.buffer.len()
    }

    /// Sum of particle counts over the buffered snapshots
    pub fn buffered_particles(&self) -> usize {
        self.buffered_particles
    }

    /// Index the next chunk will be written under
    pub fn saved_counter(&self) -> u32 {
        self.saved_counter
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
