//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and their
//! compact on-disk/in-grid identifiers.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant is the block's identifier inside a
/// [`BlockGrid`](crate::engine_state::voxels::chunk::block_grid::BlockGrid) and inside
/// persisted save records. The `FromPrimitive` derive provides the checked conversion back
/// from an identifier.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Non-solid, transparent and the only block light travels through.
    #[default]
    Air = 0,
    /// Dirt with a grass top, spreads onto nearby dirt.
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    /// Indestructible floor of the world. Structures never replace it.
    Bedrock = 4,
    CoalOre = 5,
    IronOre = 6,
    /// Only generated below Y=32.
    GoldOre = 7,
    /// Only generated below Y=16.
    DiamondOre = 8,
    OakLog = 9,
    OakPlanks = 10,
    /// Lowest-density solid; placed by trees and never allowed to overwrite terrain.
    OakLeaves = 11,
    /// Emits light level 14.
    Glowstone = 12,
    Andesite = 13,
    Diorite = 14,
    Granite = 15,
    Cobblestone = 16,
    /// Decorative tuft drawn with crossed custom quads instead of a cube.
    GrassPatch = 17,
}

/// Number of declared block types. Identifiers at or above this are invalid.
pub const BLOCK_TYPE_COUNT: usize = 18;

impl BlockType {
    /// Converts a stored identifier back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the identifier is outside the declared block-type range.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The compact identifier of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Shorthand for `self == BlockType::Air`.
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_and_reject_unknown_ids() {
        for id in 0..BLOCK_TYPE_COUNT as u8 {
            let block_type = BlockType::from_id(id).expect("declared id");
            assert_eq!(block_type.id(), id);
        }
        assert_eq!(BlockType::from_id(BLOCK_TYPE_COUNT as u8), None);
        assert_eq!(BlockType::from_id(255), None);
    }
}
