//! # Chunk Module
//!
//! This module provides [`ChunkData`], the owner of one 16×256×16 column of the world, and
//! the lifecycle it goes through before anything else may read it.
//!
//! ## Lifecycle
//!
//! A chunk passes three one-way latches:
//! 1. `terrain_ready`: the raw grid and structure list were generated
//! 2. `details_started`: detail resolution was handed to a worker
//! 3. `chunk_ready`: structures and saved edits were applied and the height index built
//!
//! Each latch is flipped with release ordering only after the data it guards has been
//! written, and polled with acquire ordering, so a caller that observes a latch also
//! observes the finished data. Reads through [`ChunkData::read`] are refused until
//! `chunk_ready`.
//!
//! ## Storage
//!
//! The grid is dense (one byte per voxel, see [`BlockGrid`]). A chunk is 64 KiB of
//! blocks plus a 256 byte height index, small enough that a 3×3 neighborhood is cheap to
//! keep in memory while meshing.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLockReadGuard,
    },
};

use cgmath::{Point2, Point3};
use log::debug;

use crate::{
    core::{Latch, MtResource},
    engine_state::{
        error::{ChunkError, PersistenceError},
        voxels::{
            block::{block_type::BlockType, BlockRegistry},
            generation::structures::StructureRequest,
            persistence::{BlockChange, SaveRecord, SaveStore},
            tasks::{
                detail_resolution_task::DetailResolutionTask,
                terrain_generation_task::TerrainGenerationTask,
            },
        },
        WorldContext,
    },
};

use block_grid::BlockGrid;
use height_index::HeightIndex;

pub mod block_grid;
pub mod height_index;

/// Width and depth of a chunk in blocks.
pub const CHUNK_WIDTH: usize = 16;
/// Height of a chunk (and of the world) in blocks.
pub const CHUNK_HEIGHT: usize = 256;

/// Position of a chunk in the world grid, `x` east and `y` south (world Z).
pub type ChunkPosition = Point2<i32>;

/// Result of reading a block that may live in a chunk that is not loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLookup {
    Loaded(BlockType),
    /// The chunk is missing, still generating, or the position is above/below the world.
    Unavailable,
}

impl BlockLookup {
    pub fn loaded(self) -> Option<BlockType> {
        match self {
            BlockLookup::Loaded(block_type) => Some(block_type),
            BlockLookup::Unavailable => None,
        }
    }
}

/// The data of a chunk guarded by its lock.
///
/// Only the worker running the current phase writes it before `chunk_ready`; afterwards
/// writes go through [`ChunkData::modify`].
#[derive(Debug, Default)]
pub struct ChunkContents {
    pub(crate) blocks: BlockGrid,
    pub(crate) structures: Vec<StructureRequest>,
    pub(crate) light_sources: HashMap<Point3<i32>, u8>,
    pub(crate) height_index: HeightIndex,
    pub(crate) save_record: SaveRecord,
}

impl ChunkContents {
    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    /// Structures recorded by terrain generation, still pending until details resolve.
    pub fn structures(&self) -> &[StructureRequest] {
        &self.structures
    }

    /// Emitting blocks by local position.
    pub fn light_sources(&self) -> &HashMap<Point3<i32>, u8> {
        &self.light_sources
    }

    pub fn height_index(&self) -> &HeightIndex {
        &self.height_index
    }

    pub fn save_record(&self) -> &SaveRecord {
        &self.save_record
    }

    /// Registers `block_type` at a local position as a light source, or removes a
    /// previous registration when it does not emit.
    pub(crate) fn update_light_source(&mut self, position: Point3<i32>, block_type: BlockType, registry: &BlockRegistry) {
        match registry.emitted_light(block_type) {
            0 => {
                self.light_sources.remove(&position);
            }
            level => {
                self.light_sources.insert(position, level);
            }
        }
    }
}

/// One chunk of the world and its loading state.
///
/// Shared between the scheduler and its workers as `Arc<ChunkData>`.
///
/// # Examples
///
/// ```
/// use cgmath::Point2;
/// use voxel_world::engine_state::voxels::{
///     block::{block_type::BlockType, BlockRegistry},
///     chunk::{block_grid::BlockGrid, ChunkData},
/// };
///
/// let mut grid = BlockGrid::new();
/// grid.set(0, 0, 0, BlockType::Bedrock);
/// let chunk = ChunkData::from_blocks(Point2::new(0, 0), grid, &BlockRegistry::new());
///
/// chunk.modify(0, 1, 0, BlockType::Stone, &BlockRegistry::new()).unwrap();
/// assert!(chunk.is_dirty());
/// assert_eq!(chunk.read().unwrap().height_index().get(0, 0), 1);
/// ```
#[derive(Debug)]
pub struct ChunkData {
    position: ChunkPosition,
    terrain_ready: Latch,
    details_started: Latch,
    chunk_ready: Latch,
    dirty: AtomicBool,
    contents: MtResource<ChunkContents>,
}

impl ChunkData {
    /// An empty chunk waiting for terrain generation.
    pub fn new(position: ChunkPosition) -> Self {
        ChunkData {
            position,
            terrain_ready: Latch::new(),
            details_started: Latch::new(),
            chunk_ready: Latch::new(),
            dirty: AtomicBool::new(false),
            contents: MtResource::new(ChunkContents {
                save_record: SaveRecord::new(position),
                ..ChunkContents::default()
            }),
        }
    }

    /// A chunk built directly from a finished grid, skipping generation.
    ///
    /// All latches are set, emitting blocks are registered as light sources and the height
    /// index is built, exactly as if detail resolution had produced `blocks`.
    pub fn from_blocks(position: ChunkPosition, blocks: BlockGrid, registry: &BlockRegistry) -> Self {
        let chunk = ChunkData::new(position);
        {
            let mut contents = chunk.contents.get_mut();
            for y in 0..CHUNK_HEIGHT {
                for z in 0..CHUNK_WIDTH {
                    for x in 0..CHUNK_WIDTH {
                        let block_type = blocks.get(x, y, z);
                        if registry.emitted_light(block_type) > 0 {
                            let local = Point3::new(x as i32, y as i32, z as i32);
                            contents.update_light_source(local, block_type, registry);
                        }
                    }
                }
            }
            contents.height_index = HeightIndex::from_grid(&blocks);
            contents.blocks = blocks;
        }
        chunk.terrain_ready.set();
        chunk.details_started.set();
        chunk.chunk_ready.set();
        chunk
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    pub fn is_terrain_ready(&self) -> bool {
        self.terrain_ready.is_set()
    }

    pub fn has_started_details(&self) -> bool {
        self.details_started.is_set()
    }

    pub fn is_chunk_ready(&self) -> bool {
        self.chunk_ready.is_set()
    }

    /// Whether the chunk was modified since it was loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// The task generating this chunk's raw terrain.
    ///
    /// `terrain_ready` flips when the task has run.
    pub fn start_terrain_generation(self: &Arc<Self>, context: &Arc<WorldContext>) -> TerrainGenerationTask {
        TerrainGenerationTask::new(self.clone(), context.clone())
    }

    /// The task applying structures and saved edits, flipping `chunk_ready` when done.
    ///
    /// The save record is loaded here, on the caller's thread, so a storage failure is
    /// reported before the detail phase is claimed and the call can be retried.
    pub fn start_detail_resolution(
        self: &Arc<Self>,
        context: &Arc<WorldContext>,
        neighbors: ChunkNeighbors,
        store: &dyn SaveStore,
    ) -> Result<DetailResolutionTask, ChunkError> {
        if !self.is_terrain_ready() {
            return Err(ChunkError::TerrainNotReady {
                position: self.position,
            });
        }
        if self.has_started_details() {
            return Err(ChunkError::DetailsAlreadyStarted {
                position: self.position,
            });
        }
        let record = store.load(self.position)?;
        if !self.claim_details() {
            return Err(ChunkError::DetailsAlreadyStarted {
                position: self.position,
            });
        }
        Ok(DetailResolutionTask::new(
            self.clone(),
            context.clone(),
            neighbors,
            record,
        ))
    }

    /// Read access to a finished chunk.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, ChunkContents>, ChunkError> {
        if !self.is_chunk_ready() {
            return Err(ChunkError::NotReady {
                position: self.position,
            });
        }
        Ok(self.contents.get())
    }

    /// The block at a local position, `Unavailable` until the chunk is ready.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockLookup {
        match self.read() {
            Ok(contents) => contents
                .blocks
                .get_checked(x, y, z)
                .map_or(BlockLookup::Unavailable, BlockLookup::Loaded),
            Err(_) => BlockLookup::Unavailable,
        }
    }

    /// Places `block_type` at a local position of a ready chunk.
    ///
    /// Updates the grid, the save record, the height index and the light sources, and
    /// marks the chunk dirty. Callers serialize modifications of one chunk.
    pub fn modify(
        &self,
        x: i32,
        y: i32,
        z: i32,
        block_type: BlockType,
        registry: &BlockRegistry,
    ) -> Result<(), ChunkError> {
        if !self.is_chunk_ready() {
            return Err(ChunkError::NotReady {
                position: self.position,
            });
        }
        if !BlockGrid::in_bounds(x, y, z) {
            return Err(ChunkError::OutOfBounds { x, y, z });
        }
        let (ux, uy, uz) = (x as usize, y as usize, z as usize);

        let mut guard = self.contents.get_mut();
        let contents = &mut *guard;
        contents
            .save_record
            .changes
            .push(BlockChange::new(ux as u8, uy as u8, uz as u8, block_type));
        contents.blocks.set(ux, uy, uz, block_type);
        contents
            .height_index
            .block_changed(&contents.blocks, ux, uy, uz, block_type);
        contents.update_light_source(Point3::new(x, y, z), block_type, registry);
        self.dirty.store(true, Ordering::Release);

        debug!(
            "Chunk ({}, {}) set ({x}, {y}, {z}) to {block_type:?}, column top now {}",
            self.position.x,
            self.position.y,
            contents.height_index.get(ux, uz)
        );
        Ok(())
    }

    /// Saves the chunk's edits if it was modified. Returns whether a save happened.
    pub fn unload(&self, store: &dyn SaveStore) -> Result<bool, PersistenceError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        let record = self.contents.get().save_record.clone();
        store.save(&record)?;
        self.dirty.store(false, Ordering::Release);
        Ok(true)
    }

    pub(crate) fn contents(&self) -> &MtResource<ChunkContents> {
        &self.contents
    }

    pub(crate) fn mark_terrain_ready(&self) {
        if self.terrain_ready.set() {
            debug!("Chunk ({}, {}) terrain ready", self.position.x, self.position.y);
        }
    }

    /// Claims the detail phase; false if it was already claimed.
    pub(crate) fn claim_details(&self) -> bool {
        self.details_started.set()
    }

    pub(crate) fn mark_chunk_ready(&self) {
        if self.chunk_ready.set() {
            debug!("Chunk ({}, {}) ready", self.position.x, self.position.y);
        }
    }
}

/// The four cardinal neighbors handed to detail resolution.
///
/// Held only by the running task and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct ChunkNeighbors {
    /// +Z
    pub front: Option<Arc<ChunkData>>,
    /// -Z
    pub back: Option<Arc<ChunkData>>,
    /// -X
    pub left: Option<Arc<ChunkData>>,
    /// +X
    pub right: Option<Arc<ChunkData>>,
}

impl ChunkNeighbors {
    pub fn none() -> Self {
        Self::default()
    }

    /// Number of neighbors supplied.
    pub fn count(&self) -> usize {
        [&self.front, &self.back, &self.left, &self.right]
            .iter()
            .filter(|neighbor| neighbor.is_some())
            .count()
    }
}
