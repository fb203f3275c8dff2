//! # Persistence Module
//!
//! Save records hold the edits made to a chunk after it was generated. Terrain is never
//! stored; a chunk is regenerated from the seed and its record replayed on top.
//!
//! Two stores are provided:
//! - [`FileSaveStore`]: one JSON file per chunk with an LRU cache of recent records
//! - [`MemorySaveStore`]: keeps records in a map, for tests and throwaway worlds

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    num::NonZeroUsize,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use cgmath::Point2;
use log::debug;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::engine_state::error::PersistenceError;

use super::{block::block_type::BlockType, chunk::ChunkPosition};

/// One persisted edit: local position and the identifier of the placed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockChange {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub b: u8,
}

impl BlockChange {
    pub fn new(x: u8, y: u8, z: u8, block_type: BlockType) -> Self {
        BlockChange {
            x,
            y,
            z,
            b: block_type.id(),
        }
    }

    /// The placed block, or `None` for an identifier outside the declared range.
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_id(self.b)
    }
}

/// The ordered edits of one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub position: [i32; 2],
    pub changes: Vec<BlockChange>,
}

impl SaveRecord {
    pub fn new(position: ChunkPosition) -> Self {
        SaveRecord {
            position: [position.x, position.y],
            changes: Vec::new(),
        }
    }

    pub fn chunk_position(&self) -> ChunkPosition {
        Point2::new(self.position[0], self.position[1])
    }

    /// Rejects records naming unknown block identifiers.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        match self.changes.iter().find(|c| c.block_type().is_none()) {
            Some(change) => Err(PersistenceError::InvalidBlock(change.b)),
            None => Ok(()),
        }
    }
}

/// Load/save contract for chunk edits.
///
/// `load` returns an empty record for a chunk that was never saved.
pub trait SaveStore: Send + Sync {
    fn load(&self, position: ChunkPosition) -> Result<SaveRecord, PersistenceError>;
    fn save(&self, record: &SaveRecord) -> Result<(), PersistenceError>;
}

/// Number of records kept in memory by a [`FileSaveStore`].
pub const SAVE_CACHE_CAPACITY: usize = 64;

/// Stores each chunk's record as `<x>_<z>.json` inside a world directory.
pub struct FileSaveStore {
    directory: PathBuf,
    cache: Mutex<LruCache<ChunkPosition, SaveRecord>>,
}

impl FileSaveStore {
    /// Opens (creating if needed) the save directory of a world.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        let capacity = NonZeroUsize::new(SAVE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Ok(FileSaveStore {
            directory,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn path_for(&self, position: ChunkPosition) -> PathBuf {
        self.directory
            .join(format!("{}_{}.json", position.x, position.y))
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self, position: ChunkPosition) -> Result<SaveRecord, PersistenceError> {
        if let Some(record) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&position)
        {
            return Ok(record.clone());
        }

        let record = match fs::read_to_string(self.path_for(position)) {
            Ok(text) => {
                let record: SaveRecord = serde_json::from_str(&text)?;
                record.validate()?;
                record
            }
            Err(err) if err.kind() == ErrorKind::NotFound => SaveRecord::new(position),
            Err(err) => return Err(err.into()),
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(position, record.clone());
        Ok(record)
    }

    fn save(&self, record: &SaveRecord) -> Result<(), PersistenceError> {
        let position = record.chunk_position();
        fs::write(self.path_for(position), serde_json::to_string(record)?)?;
        debug!(
            "Saved {} changes for chunk ({}, {})",
            record.changes.len(),
            position.x,
            position.y
        );
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(position, record.clone());
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Default)]
pub struct MemorySaveStore {
    records: Mutex<HashMap<ChunkPosition, SaveRecord>>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks with a stored record.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SaveStore for MemorySaveStore {
    fn load(&self, position: ChunkPosition) -> Result<SaveRecord, PersistenceError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&position)
            .cloned()
            .unwrap_or_else(|| SaveRecord::new(position)))
    }

    fn save(&self, record: &SaveRecord) -> Result<(), PersistenceError> {
        record.validate()?;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.chunk_position(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("voxel-world-{}-{}", name, std::process::id()))
    }

    #[test]
    fn file_store_round_trips_and_defaults_to_empty() {
        let dir = temp_dir("file-store");
        let store = FileSaveStore::new(&dir).unwrap();
        let position = Point2::new(-2, 5);

        assert!(store.load(position).unwrap().changes.is_empty());

        let mut record = SaveRecord::new(position);
        record.changes.push(BlockChange::new(1, 70, 3, BlockType::Glowstone));
        store.save(&record).unwrap();

        let reopened = FileSaveStore::new(&dir).unwrap();
        assert_eq!(reopened.load(position).unwrap(), record);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_block_ids_are_rejected() {
        let dir = temp_dir("bad-record");
        let store = FileSaveStore::new(&dir).unwrap();
        fs::write(
            dir.join("0_0.json"),
            r#"{"position":[0,0],"changes":[{"x":0,"y":0,"z":0,"b":200}]}"#,
        )
        .unwrap();
        let result = store.load(Point2::new(0, 0));
        assert!(matches!(result, Err(PersistenceError::InvalidBlock(200))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = temp_dir("malformed");
        let store = FileSaveStore::new(&dir).unwrap();
        fs::write(dir.join("1_1.json"), "not json").unwrap();
        assert!(matches!(
            store.load(Point2::new(1, 1)),
            Err(PersistenceError::Serialization(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
