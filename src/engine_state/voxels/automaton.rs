//! # Block Update Automaton
//!
//! Random block ticks: every tick, one voxel in each 16-block band of a chunk is picked
//! at random and its rule applied.
//!
//! Rules:
//! - dirt with air above turns to grass if any of the twelve blocks beside it, one layer
//!   up or one layer down is grass
//! - grass turns to dirt when the block above it blocks most light
//!
//! Samples that need a block from a chunk that is not loaded are skipped.

use cgmath::Point3;
use fastrand::Rng;
use log::trace;

use crate::engine_state::voxels::{
    block::{block_type::BlockType, GRASS_SMOTHER_OPACITY},
    chunk::{BlockLookup, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH},
    world::World,
};

/// Height of the band each sample is drawn from.
pub const TICK_BAND_HEIGHT: usize = 16;
/// Number of voxels in one band.
pub const TICK_BAND_SIZE: u32 = (CHUNK_WIDTH * CHUNK_WIDTH * TICK_BAND_HEIGHT) as u32;

/// What a single sample did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Unchanged,
    GrewGrass,
    Smothered,
    /// A block the rule needed was unavailable.
    Skipped,
}

/// Totals of one chunk tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub grown: usize,
    pub smothered: usize,
    pub skipped: usize,
}

/// Applies the random block rules to ready chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockUpdateAutomaton;

impl BlockUpdateAutomaton {
    pub fn new() -> Self {
        BlockUpdateAutomaton
    }

    /// Maps a sample index in `0..4096` to a position inside a band.
    ///
    /// X varies fastest, then Z, then Y.
    pub fn sample_position(index: u32) -> Point3<i32> {
        let index = index as i32;
        let x = index % 16;
        let y = index / 256;
        let z = (index % 256) / 16;
        Point3::new(x, y, z)
    }

    /// Draws one sample per band of the chunk at `position` and applies its rule.
    pub fn tick(&self, world: &World, position: ChunkPosition, rng: &mut Rng) -> TickReport {
        let mut report = TickReport::default();
        for band in (0..CHUNK_HEIGHT).step_by(TICK_BAND_HEIGHT) {
            let local = Self::sample_position(rng.u32(0..TICK_BAND_SIZE));
            let x = position.x * CHUNK_WIDTH as i32 + local.x;
            let y = band as i32 + local.y;
            let z = position.y * CHUNK_WIDTH as i32 + local.z;
            match self.update_block(world, x, y, z) {
                SampleOutcome::GrewGrass => report.grown += 1,
                SampleOutcome::Smothered => report.smothered += 1,
                SampleOutcome::Skipped => report.skipped += 1,
                SampleOutcome::Unchanged => {}
            }
        }
        report
    }

    /// Applies the rule of the block at world coordinates.
    pub fn update_block(&self, world: &World, x: i32, y: i32, z: i32) -> SampleOutcome {
        let outcome = match world.block_at(x, y, z) {
            BlockLookup::Loaded(BlockType::Dirt) => self.spread_grass(world, x, y, z),
            BlockLookup::Loaded(BlockType::Grass) => self.smother_grass(world, x, y, z),
            BlockLookup::Loaded(_) => SampleOutcome::Unchanged,
            BlockLookup::Unavailable => SampleOutcome::Skipped,
        };
        if outcome == SampleOutcome::Skipped {
            trace!("Skipped block update at ({x}, {y}, {z})");
        }
        outcome
    }

    fn spread_grass(&self, world: &World, x: i32, y: i32, z: i32) -> SampleOutcome {
        match world.block_at(x, y + 1, z) {
            BlockLookup::Loaded(BlockType::Air) => {}
            BlockLookup::Loaded(_) => return SampleOutcome::Unchanged,
            BlockLookup::Unavailable => return SampleOutcome::Skipped,
        }

        let mut found_grass = false;
        for dy in [0, 1, -1] {
            for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                match world.block_at(x + dx, y + dy, z + dz) {
                    BlockLookup::Loaded(block_type) => found_grass |= block_type == BlockType::Grass,
                    BlockLookup::Unavailable => return SampleOutcome::Skipped,
                }
            }
        }
        if !found_grass {
            return SampleOutcome::Unchanged;
        }
        match world.modify(x, y, z, BlockType::Grass) {
            Ok(()) => SampleOutcome::GrewGrass,
            Err(_) => SampleOutcome::Skipped,
        }
    }

    fn smother_grass(&self, world: &World, x: i32, y: i32, z: i32) -> SampleOutcome {
        let above = match world.block_at(x, y + 1, z) {
            BlockLookup::Loaded(block_type) => block_type,
            BlockLookup::Unavailable => return SampleOutcome::Skipped,
        };
        if world.context().blocks.opacity(above) < GRASS_SMOTHER_OPACITY {
            return SampleOutcome::Unchanged;
        }
        match world.modify(x, y, z, BlockType::Dirt) {
            Ok(()) => SampleOutcome::Smothered,
            Err(_) => SampleOutcome::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Point2;

    use super::*;
    use crate::engine_state::{
        voxels::{
            block::BlockRegistry,
            chunk::{block_grid::BlockGrid, ChunkData},
            world_info::{WorldInfo, WorldType},
        },
        WorldContext,
    };

    fn dirt_world(positions: &[(i32, i32)]) -> World {
        let context = Arc::new(WorldContext::new(WorldInfo::new("tick", 5, WorldType::Flat)));
        let mut world = World::new(context);
        for &(x, z) in positions {
            let mut grid = BlockGrid::new();
            for lz in 0..16 {
                for lx in 0..16 {
                    grid.fill_column(lx, lz, 0..4, BlockType::Dirt);
                }
            }
            world.insert(Arc::new(ChunkData::from_blocks(
                Point2::new(x, z),
                grid,
                &BlockRegistry::new(),
            )));
        }
        world
    }

    #[test]
    fn sample_indices_cover_one_band() {
        assert_eq!(BlockUpdateAutomaton::sample_position(0), Point3::new(0, 0, 0));
        assert_eq!(BlockUpdateAutomaton::sample_position(17), Point3::new(1, 0, 1));
        assert_eq!(BlockUpdateAutomaton::sample_position(4095), Point3::new(15, 15, 15));
        assert_eq!(BlockUpdateAutomaton::sample_position(256 + 32 + 3), Point3::new(3, 1, 2));
    }

    #[test]
    fn grass_spreads_to_exposed_dirt_next_to_it() {
        let world = dirt_world(&[(0, 0)]);
        world.modify(5, 3, 5, BlockType::Grass).unwrap();
        let automaton = BlockUpdateAutomaton::new();

        assert_eq!(automaton.update_block(&world, 6, 3, 5), SampleOutcome::GrewGrass);
        assert_eq!(world.block_at(6, 3, 5), BlockLookup::Loaded(BlockType::Grass));
        // Buried dirt stays dirt.
        assert_eq!(automaton.update_block(&world, 5, 2, 5), SampleOutcome::Unchanged);
        // Nothing grassy nearby.
        assert_eq!(automaton.update_block(&world, 12, 3, 12), SampleOutcome::Unchanged);
    }

    #[test]
    fn opaque_blocks_smother_grass_but_leaves_do_not() {
        let world = dirt_world(&[(0, 0)]);
        let automaton = BlockUpdateAutomaton::new();
        world.modify(2, 3, 2, BlockType::Grass).unwrap();
        world.modify(2, 4, 2, BlockType::OakLeaves).unwrap();
        assert_eq!(automaton.update_block(&world, 2, 3, 2), SampleOutcome::Unchanged);

        world.modify(2, 4, 2, BlockType::Stone).unwrap();
        assert_eq!(automaton.update_block(&world, 2, 3, 2), SampleOutcome::Smothered);
        assert_eq!(world.block_at(2, 3, 2), BlockLookup::Loaded(BlockType::Dirt));
    }

    #[test]
    fn samples_touching_unloaded_chunks_are_skipped() {
        let world = dirt_world(&[(0, 0)]);
        let automaton = BlockUpdateAutomaton::new();
        world.modify(14, 3, 3, BlockType::Grass).unwrap();
        assert_eq!(automaton.update_block(&world, 15, 3, 3), SampleOutcome::Skipped);
        assert_eq!(world.block_at(15, 3, 3), BlockLookup::Loaded(BlockType::Dirt));
        assert_eq!(automaton.update_block(&world, 16, 3, 3), SampleOutcome::Skipped);
    }

    #[test]
    fn a_tick_draws_one_sample_per_band() {
        let world = dirt_world(&[(0, 0)]);
        let mut rng = Rng::with_seed(1);
        let report = BlockUpdateAutomaton::new().tick(&world, Point2::new(0, 0), &mut rng);
        assert_eq!(report.grown + report.smothered, 0);
        assert!(report.skipped <= 1);
    }
}
