use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while writing or reading checkpoint chunks
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("chunk {index} does not exist ({})", path.display())]
    MissingChunk { index: u32, path: PathBuf },

    #[error("chunk {index} could not be read ({}): {source}", path.display())]
    ChunkRead {
        index: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("chunk {index} is malformed ({}): {source}", path.display())]
    MalformedChunk {
        index: u32,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {} is malformed: {source}", path.display())]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("timestep {0} appears in both chunks being merged")]
    OverlappingTimestep(u64),

    #[error("timestep {0} is not stored in any chunk")]
    TimestepNotFound(u64),
}

impl CheckpointError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CheckpointError::Io {
            path: path.into(),
            source,
        }
    }

    /// Chunk index the error refers to, when there is one
    pub fn chunk_index(&self) -> Option<u32> {
        match self {
            CheckpointError::MissingChunk { index, .. }
            | CheckpointError::ChunkRead { index, .. }
            | CheckpointError::MalformedChunk { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckpointError>;
