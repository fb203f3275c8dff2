//! # World Module
//!
//! This module provides the `World` struct which owns the loaded chunks and answers
//! questions that cross chunk borders.
//!
//! ## Architecture
//!
//! Chunks are kept in a sparse map keyed by chunk position, each shared as
//! `Arc<ChunkData>` with the workers generating it. Reads in world coordinates never
//! fail: a block in a chunk that is missing or still loading is reported as
//! [`BlockLookup::Unavailable`] and the caller decides what that means.

use std::{collections::HashMap, sync::Arc};

use crate::engine_state::{
    error::ChunkError,
    voxels::{
        block::block_type::BlockType,
        chunk::{BlockLookup, ChunkData, ChunkNeighbors, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH},
    },
    WorldContext,
};

/// The loaded part of a voxel world.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cgmath::Point2;
/// use voxel_world::engine_state::{
///     voxels::{
///         block::{block_type::BlockType, BlockRegistry},
///         chunk::{block_grid::BlockGrid, BlockLookup, ChunkData},
///         world::World,
///         world_info::{WorldInfo, WorldType},
///     },
///     WorldContext,
/// };
///
/// let context = Arc::new(WorldContext::new(WorldInfo::new("doc", 1, WorldType::Flat)));
/// let mut world = World::new(context);
/// let grid = BlockGrid::filled(BlockType::Stone);
/// world.insert(Arc::new(ChunkData::from_blocks(Point2::new(-1, 0), grid, &BlockRegistry::new())));
///
/// assert_eq!(world.block_at(-1, 10, 5), BlockLookup::Loaded(BlockType::Stone));
/// assert_eq!(world.block_at(0, 10, 5), BlockLookup::Unavailable);
/// ```
pub struct World {
    context: Arc<WorldContext>,
    chunks: HashMap<ChunkPosition, Arc<ChunkData>>,
}

/// Splits a world X or Z coordinate into the chunk coordinate and the local offset.
pub fn split_world_coordinate(world: i32) -> (i32, i32) {
    let width = CHUNK_WIDTH as i32;
    (world.div_euclid(width), world.rem_euclid(width))
}

impl World {
    /// Creates a new, empty world.
    pub fn new(context: Arc<WorldContext>) -> Self {
        World {
            context,
            chunks: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Arc<WorldContext> {
        &self.context
    }

    /// Adds a chunk, returning the one it replaced.
    pub fn insert(&mut self, chunk: Arc<ChunkData>) -> Option<Arc<ChunkData>> {
        self.chunks.insert(chunk.position(), chunk)
    }

    pub fn remove(&mut self, position: ChunkPosition) -> Option<Arc<ChunkData>> {
        self.chunks.remove(&position)
    }

    pub fn chunk(&self, position: ChunkPosition) -> Option<&Arc<ChunkData>> {
        self.chunks.get(&position)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Arc<ChunkData>> {
        self.chunks.values()
    }

    /// Removes every chunk.
    pub fn drain(&mut self) -> impl Iterator<Item = Arc<ChunkData>> + '_ {
        self.chunks.drain().map(|(_, chunk)| chunk)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The four loaded chunks bordering `position`.
    pub fn cardinal_neighbors(&self, position: ChunkPosition) -> ChunkNeighbors {
        let at = |dx: i32, dz: i32| {
            self.chunk(ChunkPosition::new(position.x + dx, position.y + dz))
                .cloned()
        };
        ChunkNeighbors {
            front: at(0, 1),
            back: at(0, -1),
            left: at(-1, 0),
            right: at(1, 0),
        }
    }

    /// The block at world coordinates.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockLookup {
        if !(0..CHUNK_HEIGHT as i32).contains(&y) {
            return BlockLookup::Unavailable;
        }
        let (chunk_x, local_x) = split_world_coordinate(x);
        let (chunk_z, local_z) = split_world_coordinate(z);
        match self.chunk(ChunkPosition::new(chunk_x, chunk_z)) {
            Some(chunk) => chunk.block_at(local_x, y, local_z),
            None => BlockLookup::Unavailable,
        }
    }

    /// Places a block at world coordinates.
    ///
    /// Fails with `NotReady` when the chunk is missing or still loading.
    pub fn modify(&self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), ChunkError> {
        let (chunk_x, local_x) = split_world_coordinate(x);
        let (chunk_z, local_z) = split_world_coordinate(z);
        let position = ChunkPosition::new(chunk_x, chunk_z);
        let chunk = self
            .chunk(position)
            .ok_or(ChunkError::NotReady { position })?;
        chunk.modify(local_x, y, local_z, block_type, &self.context.blocks)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::{
        chunk::block_grid::BlockGrid,
        world_info::{WorldInfo, WorldType},
    };

    fn world() -> World {
        World::new(Arc::new(WorldContext::new(WorldInfo::new("world", 2, WorldType::Flat))))
    }

    #[test]
    fn negative_coordinates_map_to_the_right_chunk() {
        assert_eq!(split_world_coordinate(-1), (-1, 15));
        assert_eq!(split_world_coordinate(-16), (-1, 0));
        assert_eq!(split_world_coordinate(-17), (-2, 15));
        assert_eq!(split_world_coordinate(31), (1, 15));
    }

    #[test]
    fn lookups_in_loading_chunks_are_unavailable() {
        let mut world = world();
        world.insert(Arc::new(ChunkData::new(Point2::new(0, 0))));
        assert_eq!(world.block_at(3, 3, 3), BlockLookup::Unavailable);
        assert_eq!(world.block_at(3, -1, 3), BlockLookup::Unavailable);
        assert!(matches!(
            world.modify(3, 3, 3, BlockType::Stone),
            Err(ChunkError::NotReady { .. })
        ));
        assert!(matches!(
            world.modify(40, 3, 3, BlockType::Stone),
            Err(ChunkError::NotReady { position }) if position == Point2::new(2, 0)
        ));
    }

    #[test]
    fn modify_in_world_coordinates_reaches_the_owning_chunk() {
        let mut world = world();
        let registry = world.context().blocks.clone();
        world.insert(Arc::new(ChunkData::from_blocks(Point2::new(-1, -1), BlockGrid::new(), &registry)));
        world.modify(-1, 64, -16, BlockType::Glowstone).unwrap();

        let chunk = world.chunk(Point2::new(-1, -1)).unwrap();
        assert!(chunk.is_dirty());
        assert_eq!(chunk.block_at(15, 64, 0), BlockLookup::Loaded(BlockType::Glowstone));
        assert_eq!(world.block_at(-1, 64, -16), BlockLookup::Loaded(BlockType::Glowstone));
        assert_eq!(world.cardinal_neighbors(Point2::new(-1, 0)).count(), 1);
    }
}
