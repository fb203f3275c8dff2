use crate::engine_state::voxels::block::block_type::BlockType;

use super::{block_grid::BlockGrid, CHUNK_WIDTH};

/// Per-column Y of the highest non-air block of a chunk.
///
/// A column that is entirely air reports 0, as does a column whose only block sits at
/// Y=0. The light engine uses the index to skip the open sky above each column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeightIndex {
    heights: [[u8; CHUNK_WIDTH]; CHUNK_WIDTH],
}

impl HeightIndex {
    /// Builds the index with one full top-down scan per column.
    pub fn from_grid(grid: &BlockGrid) -> Self {
        let mut index = HeightIndex::default();
        index.rebuild(grid);
        index
    }

    pub fn rebuild(&mut self, grid: &BlockGrid) {
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                self.heights[x][z] = grid.topmost_non_air(x, z).unwrap_or(0) as u8;
            }
        }
    }

    /// Height of column `(x, z)`.
    pub fn get(&self, x: usize, z: usize) -> u8 {
        self.heights[x][z]
    }

    /// Keeps the index in sync after `grid` had `(x, y, z)` set to `block_type`.
    ///
    /// Removing the current top searches downward for the new top; placing a block only
    /// ever raises the column.
    pub fn block_changed(&mut self, grid: &BlockGrid, x: usize, y: usize, z: usize, block_type: BlockType) {
        let height = &mut self.heights[x][z];
        if block_type.is_air() {
            if *height as usize == y {
                *height = grid.topmost_non_air_from(x, z, y).unwrap_or(0) as u8;
            }
        } else {
            *height = (*height).max(y as u8);
        }
    }
}
