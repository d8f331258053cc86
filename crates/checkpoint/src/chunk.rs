//! Chunk files: timestep-keyed snapshot maps stored as JSON

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CheckpointError, Result};
use crate::manifest::MANIFEST_FILE;
use crate::snapshot::Snapshot;

/// Snapshots keyed by timestep, iterated in timestep order
pub type Chunk = BTreeMap<u64, Snapshot>;

const CHUNK_PREFIX: &str = "chunk_";
const CHUNK_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// File name of the chunk with the given index
///
/// # Examples
///
/// ```
/// use checkpoint::chunk::{chunk_file_name, parse_chunk_index};
///
/// assert_eq!(chunk_file_name(12), "chunk_12.json");
/// assert_eq!(parse_chunk_index("chunk_12.json"), Some(12));
/// assert_eq!(parse_chunk_index("index.json"), None);
/// ```
pub fn chunk_file_name(index: u32) -> String {
    format!("{CHUNK_PREFIX}{index}.{CHUNK_EXTENSION}")
}

/// Index encoded in a chunk file name
pub fn parse_chunk_index(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(CHUNK_PREFIX)?
        .strip_suffix(CHUNK_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

pub fn chunk_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(chunk_file_name(index))
}

/// Sum of `number_of_particles` over every snapshot
pub fn particle_total(chunk: &Chunk) -> usize {
    chunk.values().map(Snapshot::particle_count).sum()
}

/// Union of two chunks whose timesteps must not overlap
///
/// Chunks partition the run into disjoint step ranges, so a shared key
/// means the chunking went wrong; that is reported rather than resolved.
///
/// # Errors
///
/// `CheckpointError::OverlappingTimestep` with the first shared timestep.
pub fn merge_disjoint(earlier: Chunk, later: Chunk) -> Result<Chunk> {
    let mut merged = earlier;
    for (timestep, snapshot) in later {
        if merged.contains_key(&timestep) {
            return Err(CheckpointError::OverlappingTimestep(timestep));
        }
        merged.insert(timestep, snapshot);
    }
    Ok(merged)
}

/// Serializes `value` to `path` through a temporary file and a rename
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = temp_path(path);

    let file = fs::File::create(&tmp).map_err(|e| CheckpointError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| CheckpointError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| CheckpointError::io(&tmp, e))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| CheckpointError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, ReadFailure> {
    let file = fs::File::open(path).map_err(ReadFailure::Io)?;
    serde_json::from_reader(BufReader::new(file)).map_err(ReadFailure::Decode)
}

pub(crate) enum ReadFailure {
    Io(std::io::Error),
    Decode(serde_json::Error),
}

/// Writes a chunk file
pub fn write_chunk(dir: &Path, index: u32, chunk: &Chunk) -> Result<()> {
    write_json_atomic(&chunk_path(dir, index), chunk)
}

/// Reads a chunk file, naming the chunk index in any failure
pub fn read_chunk(dir: &Path, index: u32) -> Result<Chunk> {
    let path = chunk_path(dir, index);
    read_json(&path).map_err(|failure| match failure {
        ReadFailure::Io(e) if e.kind() == ErrorKind::NotFound => {
            CheckpointError::MissingChunk { index, path }
        }
        ReadFailure::Io(source) => CheckpointError::ChunkRead {
            index,
            path,
            source,
        },
        ReadFailure::Decode(source) => CheckpointError::MalformedChunk {
            index,
            path,
            source,
        },
    })
}

/// Reads a chunk file if it exists
pub fn try_read_chunk(dir: &Path, index: u32) -> Result<Option<Chunk>> {
    match read_chunk(dir, index) {
        Ok(chunk) => Ok(Some(chunk)),
        Err(CheckpointError::MissingChunk { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Indices of every chunk file in `dir`, ascending
pub fn list_chunk_indices(dir: &Path) -> Result<Vec<u32>> {
    let entries = fs::read_dir(dir).map_err(|e| CheckpointError::io(dir, e))?;

    let mut indices = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CheckpointError::io(dir, e))?;
        if let Some(index) = entry.file_name().to_str().and_then(parse_chunk_index) {
            indices.push(index);
        }
    }
    indices.sort_unstable();
    Ok(indices)
}

/// Temporary files left by chunk or manifest writes that never completed
pub fn list_temp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CheckpointError::io(dir, e))?;

    let mut leftovers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CheckpointError::io(dir, e))?;
        let name = entry.file_name();
        let Some(target) = name.to_str().and_then(|n| n.strip_suffix(TEMP_SUFFIX)) else {
            continue;
        };
        if parse_chunk_index(target).is_some() || target == MANIFEST_FILE {
            leftovers.push(entry.path());
        }
    }
    leftovers.sort();
    Ok(leftovers)
}
