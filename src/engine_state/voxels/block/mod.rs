//! # Block Module
//!
//! This module provides the block type definitions, block faces and the block property
//! table consulted by generation, lighting, meshing and the block update automaton.
//!
//! The property table is a plain value ([`BlockRegistry`]) built once when a world is
//! loaded and passed to every subsystem through the
//! [`WorldContext`](crate::engine_state::WorldContext).

use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Opacity at or above which a block smothers grass beneath it.
pub const GRASS_SMOTHER_OPACITY: u8 = 128;

/// A single fixed quad of a block drawn with custom geometry.
///
/// Corners are in block-local space (0.0..=1.0 on each axis) and are listed in the
/// same bottom-left, top-left, top-right, bottom-right order cube faces use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomFace {
    pub bl: [f32; 3],
    pub tl: [f32; 3],
    pub tr: [f32; 3],
    pub br: [f32; 3],
    /// Texture atlas cell (column, row) sampled by the quad.
    pub cell: [u8; 2],
}

/// Static properties of one block type.
#[derive(Debug, Clone, Copy)]
pub struct BlockProperties {
    /// Human readable name, used in logs.
    pub name: &'static str,
    /// Whether the block fully hides the faces of its neighbors.
    pub opaque: bool,
    /// How much the block blocks light, 0 (none) to 255 (full).
    pub opacity: u8,
    /// Ordering deciding whether a structure may overwrite this block.
    pub density: u8,
    /// Light level emitted by the block, 0 for non-emitters.
    pub light: u8,
    /// Geometry drawn instead of a cube, if any.
    pub custom_faces: Option<&'static [CustomFace]>,
}

impl BlockProperties {
    const fn cube(name: &'static str, density: u8) -> Self {
        BlockProperties {
            name,
            opaque: true,
            opacity: 255,
            density,
            light: 0,
            custom_faces: None,
        }
    }
}

const PATCH_CELL: [u8; 2] = [5, 2];

/// Two crossed diagonal quads, each drawn from both sides.
static GRASS_PATCH_FACES: [CustomFace; 4] = [
    CustomFace {
        bl: [0.0, 0.0, 0.0],
        tl: [0.0, 1.0, 0.0],
        tr: [1.0, 1.0, 1.0],
        br: [1.0, 0.0, 1.0],
        cell: PATCH_CELL,
    },
    CustomFace {
        bl: [1.0, 0.0, 1.0],
        tl: [1.0, 1.0, 1.0],
        tr: [0.0, 1.0, 0.0],
        br: [0.0, 0.0, 0.0],
        cell: PATCH_CELL,
    },
    CustomFace {
        bl: [0.0, 0.0, 1.0],
        tl: [0.0, 1.0, 1.0],
        tr: [1.0, 1.0, 0.0],
        br: [1.0, 0.0, 0.0],
        cell: PATCH_CELL,
    },
    CustomFace {
        bl: [1.0, 0.0, 0.0],
        tl: [1.0, 1.0, 0.0],
        tr: [0.0, 1.0, 1.0],
        br: [0.0, 0.0, 1.0],
        cell: PATCH_CELL,
    },
];

/// The block property table.
///
/// Indexed by [`BlockType`] discriminant. Cheap to clone; a world keeps one instance in
/// its context and hands out references.
///
/// # Examples
///
/// ```
/// use voxel_world::engine_state::voxels::block::{block_type::BlockType, BlockRegistry};
///
/// let registry = BlockRegistry::new();
/// assert!(registry.is_opaque(BlockType::Stone));
/// assert!(registry.density_rank(BlockType::OakLeaves) < registry.density_rank(BlockType::Dirt));
/// assert_eq!(registry.emitted_light(BlockType::Glowstone), 14);
/// ```
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    properties: [BlockProperties; BLOCK_TYPE_COUNT],
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Builds the table of every declared block type.
    pub fn new() -> Self {
        BlockRegistry {
            properties: [
                BlockProperties {
                    name: "air",
                    opaque: false,
                    opacity: 0,
                    density: 0,
                    light: 0,
                    custom_faces: None,
                },
                BlockProperties::cube("grass", 2),
                BlockProperties::cube("dirt", 2),
                BlockProperties::cube("stone", 4),
                BlockProperties::cube("bedrock", 5),
                BlockProperties::cube("coal_ore", 4),
                BlockProperties::cube("iron_ore", 4),
                BlockProperties::cube("gold_ore", 4),
                BlockProperties::cube("diamond_ore", 4),
                BlockProperties::cube("oak_log", 3),
                BlockProperties::cube("oak_planks", 3),
                BlockProperties {
                    name: "oak_leaves",
                    opaque: false,
                    opacity: 64,
                    density: 1,
                    light: 0,
                    custom_faces: None,
                },
                BlockProperties {
                    light: 14,
                    ..BlockProperties::cube("glowstone", 4)
                },
                BlockProperties::cube("andesite", 4),
                BlockProperties::cube("diorite", 4),
                BlockProperties::cube("granite", 4),
                BlockProperties::cube("cobblestone", 4),
                BlockProperties {
                    name: "grass_patch",
                    opaque: false,
                    opacity: 0,
                    density: 1,
                    light: 0,
                    custom_faces: Some(&GRASS_PATCH_FACES),
                },
            ],
        }
    }

    /// All static properties of a block type.
    pub fn properties(&self, block_type: BlockType) -> &BlockProperties {
        &self.properties[block_type as usize]
    }

    pub fn is_opaque(&self, block_type: BlockType) -> bool {
        self.properties(block_type).opaque
    }

    pub fn opacity(&self, block_type: BlockType) -> u8 {
        self.properties(block_type).opacity
    }

    pub fn density_rank(&self, block_type: BlockType) -> u8 {
        self.properties(block_type).density
    }

    /// Light level emitted by the block, in `0..=15`.
    pub fn emitted_light(&self, block_type: BlockType) -> u8 {
        self.properties(block_type).light
    }

    /// The fixed face list of a block drawn with custom geometry.
    pub fn custom_faces(&self, block_type: BlockType) -> Option<&'static [CustomFace]> {
        self.properties(block_type).custom_faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_block_is_registered_in_identifier_order() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.properties(BlockType::Air).name, "air");
        assert_eq!(registry.properties(BlockType::GrassPatch).name, "grass_patch");
        assert_eq!(registry.properties(BlockType::Cobblestone).name, "cobblestone");
    }

    #[test]
    fn only_custom_geometry_and_see_through_blocks_are_not_opaque() {
        let registry = BlockRegistry::new();
        for id in 0..BLOCK_TYPE_COUNT as u8 {
            let block_type = BlockType::from_id(id).unwrap();
            let see_through = matches!(
                block_type,
                BlockType::Air | BlockType::OakLeaves | BlockType::GrassPatch
            );
            assert_eq!(registry.is_opaque(block_type), !see_through, "{block_type:?}");
        }
        assert!(registry.custom_faces(BlockType::GrassPatch).is_some());
        assert!(registry.custom_faces(BlockType::Stone).is_none());
    }

    #[test]
    fn leaves_do_not_smother_grass() {
        let registry = BlockRegistry::new();
        assert!(registry.opacity(BlockType::OakLeaves) < GRASS_SMOTHER_OPACITY);
        assert!(registry.opacity(BlockType::Dirt) >= GRASS_SMOTHER_OPACITY);
    }
}
