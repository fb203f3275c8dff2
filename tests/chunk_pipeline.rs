mod common;

use std::sync::Arc;

use cgmath::Point2;
use voxel_world::engine_state::{
    task_management::TaskManager,
    voxels::{
        block::block_type::BlockType,
        chunk::{height_index::HeightIndex, BlockLookup, ChunkData, ChunkNeighbors},
        generation::{structures::StructureKind, TerrainGenerator},
        persistence::{FileSaveStore, MemorySaveStore, SaveStore},
        world_info::{WorldInfo, WorldType},
    },
    error::{ChunkError, PersistenceError},
    EngineState, WorldContext,
};

#[test]
fn generation_is_reproducible_for_a_seed() {
    for world_type in [WorldType::Flat, WorldType::Default, WorldType::FloatingIslands] {
        let first = WorldContext::new(WorldInfo::new("a", 99, world_type));
        let second = WorldContext::new(WorldInfo::new("b", 99, world_type));
        for position in [Point2::new(0, 0), Point2::new(-3, 7)] {
            assert_eq!(
                TerrainGenerator::new(&first).generate(position),
                TerrainGenerator::new(&second).generate(position)
            );
        }
    }

    let other_seed = WorldContext::new(WorldInfo::new("c", 100, WorldType::Default));
    let context = WorldContext::new(WorldInfo::new("a", 99, WorldType::Default));
    assert_ne!(
        TerrainGenerator::new(&context).generate(Point2::new(0, 0)).blocks,
        TerrainGenerator::new(&other_seed).generate(Point2::new(0, 0)).blocks
    );
}

#[test]
fn ready_chunks_have_a_consistent_height_index() {
    let engine_state = common::loaded_engine(WorldType::Default, 1);
    for chunk in engine_state.world.chunks() {
        let contents = chunk.read().unwrap();
        assert_eq!(*contents.height_index(), HeightIndex::from_grid(contents.blocks()));
    }
}

#[test]
fn height_index_follows_edits() {
    let engine_state = common::loaded_engine(WorldType::Flat, 0);
    let world = &engine_state.world;
    let chunk = world.chunk(Point2::new(0, 0)).unwrap();
    let height = |x, z| chunk.read().unwrap().height_index().get(x, z);
    assert_eq!(height(2, 2), 3);

    world.modify(2, 200, 2, BlockType::Stone).unwrap();
    assert_eq!(height(2, 2), 200);
    world.modify(2, 200, 2, BlockType::Air).unwrap();
    assert_eq!(height(2, 2), 3);
    world.modify(2, 3, 2, BlockType::Air).unwrap();
    assert_eq!(height(2, 2), 2);

    let contents = chunk.read().unwrap();
    assert_eq!(*contents.height_index(), HeightIndex::from_grid(contents.blocks()));
}

#[test]
fn leaves_never_replace_denser_terrain() {
    let context = Arc::new(WorldContext::new(WorldInfo::new("trees", 5, WorldType::Default)));
    let generator = TerrainGenerator::new(&context);
    let store = MemorySaveStore::new();

    let mut checked = 0;
    for i in 0..40 {
        let position = Point2::new(i, -i);
        let terrain = generator.generate(position);
        if !terrain.structures.iter().any(|s| s.kind == StructureKind::OakTree) {
            continue;
        }

        let chunk = Arc::new(ChunkData::new(position));
        chunk.start_terrain_generation(&context).run();
        chunk
            .start_detail_resolution(&context, ChunkNeighbors::none(), &store)
            .unwrap()
            .run();
        let contents = chunk.read().unwrap();

        for y in 0..256 {
            for z in 0..16 {
                for x in 0..16 {
                    let before = terrain.blocks.get(x, y, z);
                    let after = contents.blocks().get(x, y, z);
                    if matches!(before, BlockType::Dirt | BlockType::Grass | BlockType::Stone) {
                        assert_ne!(after, BlockType::OakLeaves, "at ({x}, {y}, {z}) in {position:?}");
                    }
                }
            }
        }
        assert!(contents.blocks().count(BlockType::OakLeaves) > 0);
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn edits_survive_unloading() {
    let store = Arc::new(MemorySaveStore::new());
    let info = WorldInfo::new("persist", 8, WorldType::Default);

    let mut engine_state = EngineState::new(info.clone(), TaskManager::new(2), store.clone());
    engine_state.request_area(Point2::new(0, 0), 1);
    engine_state.finish_loading().unwrap();
    engine_state.world.modify(-5, 250, 3, BlockType::Glowstone).unwrap();
    engine_state.world.modify(5, 1, 5, BlockType::Air).unwrap();
    assert_eq!(engine_state.unload_all().unwrap(), 2);
    assert_eq!(store.load(Point2::new(-1, 0)).unwrap().changes.len(), 1);

    let mut engine_state = EngineState::new(info, TaskManager::new(2), store);
    engine_state.request_area(Point2::new(0, 0), 1);
    engine_state.finish_loading().unwrap();
    let world = &engine_state.world;
    assert_eq!(world.block_at(-5, 250, 3), BlockLookup::Loaded(BlockType::Glowstone));
    assert_eq!(world.block_at(5, 1, 5), BlockLookup::Loaded(BlockType::Air));

    let chunk = world.chunk(Point2::new(-1, 0)).unwrap();
    assert!(!chunk.is_dirty());
    assert_eq!(chunk.read().unwrap().light_sources().len(), 1);
}

#[test]
fn a_corrupt_save_record_stops_loading_instead_of_retrying() {
    let dir = std::env::temp_dir().join(format!("voxel-world-corrupt-{}", std::process::id()));
    let store = Arc::new(FileSaveStore::new(&dir).unwrap());
    std::fs::write(dir.join("0_0.json"), "not json").unwrap();

    let mut engine_state = EngineState::new(
        WorldInfo::new("corrupt", 3, WorldType::Flat),
        TaskManager::new(1),
        store,
    );
    engine_state.request_area(Point2::new(0, 0), 1);
    let result = engine_state.finish_loading();
    assert!(matches!(
        result,
        Err(ChunkError::Persistence(PersistenceError::Serialization(_)))
    ));
    assert!(engine_state.world.chunk(Point2::new(0, 0)).is_none());

    // The other chunks still finish, and the failed one is not tried again.
    engine_state.finish_loading().unwrap();
    assert!(engine_state.is_idle());
    assert_eq!(engine_state.world.len(), 8);
    std::fs::remove_dir_all(&dir).unwrap();
}
