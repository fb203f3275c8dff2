//! Builders shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use cgmath::Point2;
use voxel_world::engine_state::{
    task_management::TaskManager,
    voxels::{
        block::{block_type::BlockType, BlockRegistry},
        chunk::{block_grid::BlockGrid, ChunkData},
        persistence::MemorySaveStore,
        world::World,
        world_info::{WorldInfo, WorldType},
    },
    EngineState, WorldContext,
};

pub fn context(world_type: WorldType) -> Arc<WorldContext> {
    Arc::new(WorldContext::new(WorldInfo::new("test", 42, world_type)))
}

/// A 3×3 world around the origin where every chunk is built by `fill`.
pub fn world_of(fill: impl Fn(&mut BlockGrid)) -> World {
    let mut world = World::new(context(WorldType::Flat));
    let registry = BlockRegistry::new();
    for z in -1..=1 {
        for x in -1..=1 {
            let mut grid = BlockGrid::new();
            fill(&mut grid);
            world.insert(Arc::new(ChunkData::from_blocks(Point2::new(x, z), grid, &registry)));
        }
    }
    world
}

/// Stone up to and including `top` in every column.
pub fn stone_floor(top: usize) -> impl Fn(&mut BlockGrid) {
    move |grid: &mut BlockGrid| {
        for z in 0..16 {
            for x in 0..16 {
                grid.fill_column(x, z, 0..top + 1, BlockType::Stone);
            }
        }
    }
}

/// A fully loaded world of the given type, radius chunks around the origin.
pub fn loaded_engine(world_type: WorldType, radius: i32) -> EngineState {
    let mut engine_state = EngineState::new(
        WorldInfo::new("loaded", 42, world_type),
        TaskManager::new(2),
        Arc::new(MemorySaveStore::new()),
    );
    engine_state.request_area(Point2::new(0, 0), radius);
    engine_state.finish_loading().unwrap();
    engine_state
}
