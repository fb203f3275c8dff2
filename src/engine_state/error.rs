//! Error types surfaced by the chunk pipeline.

use std::fmt;

use crate::engine_state::voxels::chunk::ChunkPosition;

/// Failure to read or write a chunk's save record.
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    /// A stored change names a block identifier outside the declared range.
    InvalidBlock(u8),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "save record i/o failed: {err}"),
            Self::Serialization(err) => write!(f, "save record is malformed: {err}"),
            Self::InvalidBlock(id) => write!(f, "save record contains unknown block id {id}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidBlock(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

/// Failure of an operation on a chunk.
///
/// None of these leave the chunk in a modified state.
#[derive(Debug)]
pub enum ChunkError {
    /// Detail resolution was requested before the chunk's terrain finished.
    TerrainNotReady { position: ChunkPosition },
    /// Detail resolution was requested a second time.
    DetailsAlreadyStarted { position: ChunkPosition },
    /// An operation that needs a finalized chunk ran before `chunk_ready`.
    NotReady { position: ChunkPosition },
    /// A mesh build needs all nine chunks of the neighborhood to be ready.
    NeighborNotReady { position: ChunkPosition },
    /// A local coordinate outside 16×256×16.
    OutOfBounds { x: i32, y: i32, z: i32 },
    Persistence(PersistenceError),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerrainNotReady { position } => {
                write!(f, "chunk ({}, {}) has no terrain yet", position.x, position.y)
            }
            Self::DetailsAlreadyStarted { position } => write!(
                f,
                "chunk ({}, {}) already started loading details",
                position.x, position.y
            ),
            Self::NotReady { position } => {
                write!(f, "chunk ({}, {}) has not finished loading", position.x, position.y)
            }
            Self::NeighborNotReady { position } => write!(
                f,
                "neighbor chunk ({}, {}) is not ready",
                position.x, position.y
            ),
            Self::OutOfBounds { x, y, z } => {
                write!(f, "local position ({x}, {y}, {z}) is outside the chunk")
            }
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersistenceError> for ChunkError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}
