mod common;

use std::sync::Arc;

use cgmath::Point2;
use fastrand::Rng;
use voxel_world::engine_state::{
    lighting::neighborhood::ChunkNeighborhood,
    rendering::meshing::{chunk_mesh::ChunkMesh, ChunkMesher},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::{block_grid::BlockGrid, BlockLookup, ChunkData},
        generation::TerrainGenerator,
        world::World,
        world_info::WorldType,
    },
};

fn mesh_of(world: &World) -> ChunkMesh {
    let neighborhood = ChunkNeighborhood::gather(world, Point2::new(0, 0)).unwrap();
    let mut mesher = ChunkMesher::new();
    mesher.build(&neighborhood, world.context()).clone()
}

#[test]
fn a_flat_world_shows_only_its_top_and_bottom() {
    let engine_state = common::loaded_engine(WorldType::Flat, 1);
    let mesh = mesh_of(&engine_state.world);

    assert_eq!(mesh.quads_facing(BlockSide::Top), 256);
    assert_eq!(mesh.quads_facing(BlockSide::Bottom), 256);
    for side in [BlockSide::Front, BlockSide::Back, BlockSide::Left, BlockSide::Right] {
        assert_eq!(mesh.quads_facing(side), 0);
    }
    assert_eq!(mesh.indices.len(), 512 * 6);
    assert!(mesh
        .vertices
        .iter()
        .filter(|v| v.normal == BlockSide::Top.normal_id())
        .all(|v| v.light == 15));
}

#[test]
fn a_flat_chunk_among_empty_chunks_shows_its_walls() {
    let context = common::context(WorldType::Flat);
    let mut world = World::new(context.clone());
    for z in -1..=1 {
        for x in -1..=1 {
            let position = Point2::new(x, z);
            let grid = if position == Point2::new(0, 0) {
                TerrainGenerator::new(&context).generate(position).blocks
            } else {
                BlockGrid::new()
            };
            world.insert(Arc::new(ChunkData::from_blocks(position, grid, &context.blocks)));
        }
    }

    let mesh = mesh_of(&world);
    assert!(mesh.has_geometry());
    assert_eq!(mesh.quads_facing(BlockSide::Top), 256);
    for side in [BlockSide::Front, BlockSide::Back, BlockSide::Left, BlockSide::Right] {
        assert_eq!(mesh.quads_facing(side), 16 * 4);
    }
}

#[test]
fn faces_between_opaque_blocks_are_culled() {
    let world = common::world_of(|_| {});
    world.modify(4, 100, 4, BlockType::Stone).unwrap();
    assert_eq!(mesh_of(&world).quad_count(), 6);

    world.modify(5, 100, 4, BlockType::Stone).unwrap();
    assert_eq!(mesh_of(&world).quad_count(), 10);
}

#[test]
fn faces_next_to_see_through_blocks_are_kept() {
    let world = common::world_of(|_| {});
    world.modify(4, 100, 4, BlockType::Stone).unwrap();
    world.modify(5, 100, 4, BlockType::OakLeaves).unwrap();
    let mesh = mesh_of(&world);
    assert_eq!(mesh.quad_count(), 12);
}

#[test]
fn grass_patches_use_their_own_quads() {
    let world = common::world_of(|_| {});
    world.modify(4, 100, 4, BlockType::GrassPatch).unwrap();
    world.modify(5, 100, 4, BlockType::Stone).unwrap();
    let mesh = mesh_of(&world);
    assert_eq!(mesh.quad_count(), 4 + 6);
    assert_eq!(mesh.quads_facing(BlockSide::Right), 1);
}

#[test]
fn culling_looks_into_the_neighboring_chunk() {
    let world = common::world_of(|_| {});
    world.modify(15, 100, 4, BlockType::Stone).unwrap();
    world.modify(16, 100, 4, BlockType::Stone).unwrap();
    let mesh = mesh_of(&world);
    assert_eq!(mesh.quad_count(), 5);
    assert_eq!(mesh.quads_facing(BlockSide::Right), 0);
}

#[test]
fn corners_in_creases_are_darker() {
    let world = common::world_of(common::stone_floor(50));
    for z in 0..16 {
        world.modify(8, 51, z, BlockType::Stone).unwrap();
        world.modify(8, 52, z, BlockType::Stone).unwrap();
    }
    for x in 9..16 {
        for z in 0..16 {
            for y in 51..55 {
                world.modify(x, y, z, BlockType::Stone).unwrap();
            }
        }
    }
    let mesh = mesh_of(&world);
    let top_lights: Vec<u8> = mesh
        .vertices
        .iter()
        .filter(|v| v.normal == BlockSide::Top.normal_id())
        .map(|v| v.light)
        .collect();
    assert!(top_lights.iter().all(|&light| light <= 15));
    assert!(mesh.vertices.iter().any(|v| v.light < 15));
}

fn random_grid(rng: &mut Rng) -> BlockGrid {
    const PALETTE: [BlockType; 5] = [
        BlockType::Air,
        BlockType::Air,
        BlockType::Stone,
        BlockType::OakLeaves,
        BlockType::Glowstone,
    ];
    let mut grid = BlockGrid::new();
    for y in 0..256 {
        for z in 0..16 {
            for x in 0..16 {
                grid.set(x, y, z, PALETTE[rng.usize(0..PALETTE.len())]);
            }
        }
    }
    grid
}

#[test]
fn every_face_between_a_block_and_a_see_through_neighbor_is_drawn_once() {
    let context = common::context(WorldType::Flat);
    let mut world = World::new(context.clone());
    let mut rng = Rng::with_seed(2024);
    for z in -1..=1 {
        for x in -1..=1 {
            let grid = random_grid(&mut rng);
            world.insert(Arc::new(ChunkData::from_blocks(Point2::new(x, z), grid, &context.blocks)));
        }
    }

    let mut expected = [0usize; 6];
    for y in 0..256 {
        for z in 0..16 {
            for x in 0..16 {
                let BlockLookup::Loaded(block_type) = world.block_at(x, y, z) else {
                    panic!("center chunk is loaded");
                };
                if block_type == BlockType::Air {
                    continue;
                }
                for side in BlockSide::all() {
                    let offset = side.offset();
                    let neighbor = match world.block_at(x + offset.x, y + offset.y, z + offset.z) {
                        BlockLookup::Loaded(neighbor) => neighbor,
                        BlockLookup::Unavailable => BlockType::Air,
                    };
                    if !context.blocks.is_opaque(neighbor) {
                        expected[side as usize] += 1;
                    }
                }
            }
        }
    }

    let mesh = mesh_of(&world);
    for side in BlockSide::all() {
        assert_eq!(mesh.quads_facing(side), expected[side as usize], "{side:?} faces");
    }
    assert_eq!(mesh.quad_count(), expected.iter().sum::<usize>());
}
