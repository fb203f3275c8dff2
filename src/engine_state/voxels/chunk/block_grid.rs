//! # Block Grid Module
//!
//! Dense storage of the 16×256×16 block identifiers of one chunk.

use std::fmt;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{CHUNK_HEIGHT, CHUNK_WIDTH};

const LAYER_SIZE: usize = CHUNK_WIDTH * CHUNK_WIDTH;
const GRID_SIZE: usize = LAYER_SIZE * CHUNK_HEIGHT;

/// A dense 16×256×16 array of block types.
///
/// Blocks are laid out x-fastest, then z, then y, so one horizontal layer is contiguous.
/// Indices are `0..16` on X/Z and `0..256` on Y; the `usize` accessors panic outside that
/// range, the `i32` ones return `None`.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockGrid {
    blocks: Vec<BlockType>,
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGrid {
    /// Creates a grid filled with air.
    pub fn new() -> Self {
        Self::filled(BlockType::Air)
    }

    /// Creates a grid where every voxel is `block_type`.
    pub fn filled(block_type: BlockType) -> Self {
        BlockGrid {
            blocks: vec![block_type; GRID_SIZE],
        }
    }

    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_WIDTH && y < CHUNK_HEIGHT && z < CHUNK_WIDTH);
        x + z * CHUNK_WIDTH + y * LAYER_SIZE
    }

    /// Whether a signed local coordinate lies inside a chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH as i32).contains(&x)
            && (0..CHUNK_HEIGHT as i32).contains(&y)
            && (0..CHUNK_WIDTH as i32).contains(&z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[Self::index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, block_type: BlockType) {
        self.blocks[Self::index(x, y, z)] = block_type;
    }

    /// Bounds-checked read with signed coordinates.
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if Self::in_bounds(x, y, z) {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Fills the vertical span `ys` of one column.
    pub fn fill_column(&mut self, x: usize, z: usize, ys: std::ops::Range<usize>, block_type: BlockType) {
        for y in ys {
            self.set(x, y, z, block_type);
        }
    }

    /// Scans a column downwards from `from_y` (inclusive) for the first non-air block.
    pub fn topmost_non_air_from(&self, x: usize, z: usize, from_y: usize) -> Option<usize> {
        (0..=from_y.min(CHUNK_HEIGHT - 1))
            .rev()
            .find(|&y| !self.get(x, y, z).is_air())
    }

    /// The Y of the highest non-air block of a column.
    pub fn topmost_non_air(&self, x: usize, z: usize) -> Option<usize> {
        self.topmost_non_air_from(x, z, CHUNK_HEIGHT - 1)
    }

    /// Number of voxels that are not air.
    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    /// Number of voxels of the given type.
    pub fn count(&self, block_type: BlockType) -> usize {
        self.blocks.iter().filter(|&&b| b == block_type).count()
    }
}

impl fmt::Debug for BlockGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockGrid")
            .field("non_air", &self.count_non_air())
            .finish()
    }
}
