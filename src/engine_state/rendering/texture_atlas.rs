//! Texture atlas cells of every block face.
//!
//! The atlas is a grid of square cells. A face samples one cell; its four corners are
//! the cell's top-left corner and the three corners one step right and down from it.

use phf::phf_map;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// Atlas cell (column, row) per block identifier, one per face in [`BlockSide`] order:
/// front, back, top, bottom, left, right.
static FACE_CELLS: phf::Map<u8, [[u8; 2]; 6]> = phf_map! {
    1u8 => [[0, 1], [0, 1], [0, 0], [0, 2], [0, 1], [0, 1]],
    2u8 => [[0, 2]; 6],
    3u8 => [[1, 0]; 6],
    4u8 => [[2, 0]; 6],
    5u8 => [[1, 1]; 6],
    6u8 => [[1, 2]; 6],
    7u8 => [[1, 3]; 6],
    8u8 => [[1, 4]; 6],
    9u8 => [[3, 3], [3, 3], [3, 2], [3, 2], [3, 3], [3, 3]],
    10u8 => [[3, 1]; 6],
    11u8 => [[3, 4]; 6],
    12u8 => [[3, 0]; 6],
    13u8 => [[2, 3]; 6],
    14u8 => [[2, 1]; 6],
    15u8 => [[2, 2]; 6],
    16u8 => [[2, 4]; 6],
    17u8 => [[5, 2]; 6],
};

/// The four UV corners of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceUv {
    pub bl: [u8; 2],
    pub tl: [u8; 2],
    pub tr: [u8; 2],
    pub br: [u8; 2],
}

impl FaceUv {
    /// Corners of the cell whose top-left corner is `cell`.
    pub fn from_cell(cell: [u8; 2]) -> Self {
        let [u, v] = cell;
        FaceUv {
            tl: [u, v],
            tr: [u + 1, v],
            bl: [u, v + 1],
            br: [u + 1, v + 1],
        }
    }
}

/// Looks up face textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureAtlas;

impl TextureAtlas {
    pub fn new() -> Self {
        TextureAtlas
    }

    /// The atlas cell of a block face, `None` for blocks that are never drawn as cubes.
    pub fn cell(&self, block_type: BlockType, side: BlockSide) -> Option<[u8; 2]> {
        FACE_CELLS
            .get(&block_type.id())
            .map(|cells| cells[side as usize])
    }

    pub fn face_uv(&self, block_type: BlockType, side: BlockSide) -> Option<FaceUv> {
        self.cell(block_type, side).map(FaceUv::from_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BLOCK_TYPE_COUNT;

    #[test]
    fn every_visible_block_has_cells() {
        let atlas = TextureAtlas::new();
        assert!(atlas.cell(BlockType::Air, BlockSide::Top).is_none());
        for id in 1..BLOCK_TYPE_COUNT as u8 {
            let block_type = BlockType::from_id(id).unwrap();
            for side in BlockSide::all() {
                assert!(atlas.cell(block_type, side).is_some(), "{block_type:?} {side:?}");
            }
        }
    }

    #[test]
    fn grass_and_logs_have_distinct_caps() {
        let atlas = TextureAtlas::new();
        assert_eq!(atlas.cell(BlockType::Grass, BlockSide::Top), Some([0, 0]));
        assert_eq!(atlas.cell(BlockType::Grass, BlockSide::Bottom), Some([0, 2]));
        assert_eq!(atlas.cell(BlockType::Grass, BlockSide::Left), Some([0, 1]));
        assert_eq!(atlas.cell(BlockType::OakLog, BlockSide::Top), Some([3, 2]));
        assert_eq!(atlas.cell(BlockType::OakLog, BlockSide::Front), Some([3, 3]));
    }

    #[test]
    fn corners_step_right_and_down() {
        let uv = FaceUv::from_cell([3, 1]);
        assert_eq!(uv.tl, [3, 1]);
        assert_eq!(uv.tr, [4, 1]);
        assert_eq!(uv.bl, [3, 2]);
        assert_eq!(uv.br, [4, 2]);
    }
}
