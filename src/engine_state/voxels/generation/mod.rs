//! # Terrain Generation Module
//!
//! Produces a chunk's raw block grid and the list of structures to place on it.
//!
//! ## Pipeline
//!
//! For every column:
//! 1. A low-frequency "hills" sample sets the surface height (scaled by a radial
//!    falloff on floating-island worlds, which also get a bottom height)
//! 2. A high-frequency sample sets the bedrock thickness
//! 3. Each Y is filled: bedrock, then stone and ores up to `height - 4`, then dirt,
//!    with grass on the surface
//! 4. Candidate solid voxels are carved into caves where four 3D noise channels all
//!    exceed a threshold
//!
//! Structures are then rolled from a generator seeded by the world seed and the chunk
//! position, so the whole output is reproducible for a fixed seed.

use bitvec::prelude::*;
use cgmath::Point3;
use fastrand::Rng;
use log::{debug, info};

use crate::engine_state::{
    voxels::{
        block::block_type::BlockType,
        chunk::{block_grid::BlockGrid, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH},
        world_info::WorldType,
    },
    WorldContext,
};

pub mod noise_source;
pub mod structures;

use noise_source::NoiseSource;
use structures::{structure_seed, StructureKind, StructureRequest};

/// Base surface height before the hills are added.
pub const SURFACE_HEIGHT: i32 = 64;
/// Maximum height the hills add on top of [`SURFACE_HEIGHT`].
pub const HILL_AMPLITUDE: f64 = 16.0;
/// Thickness of the dirt layer under the surface.
pub const DIRT_DEPTH: i32 = 4;
/// Radius of the large island around spawn on floating-island worlds.
pub const SPAWN_ISLAND_RADIUS: f64 = 250.0;

/// Cave threshold within the dirt layer.
const SURFACE_CAVE_THRESHOLD: f64 = 0.2;
/// Cave threshold in the stone below.
const DEEP_CAVE_THRESHOLD: f64 = 0.0;

/// Roll below these to place a structure (one in N).
pub const CAVE_ENTRANCE_CHANCE: u32 = u32::MAX / 20;
pub const TREE_CHANCE: u32 = u32::MAX / 100;
pub const WELL_CHANCE: u32 = u32::MAX / 512;

/// Flat worlds put grass on one in this many surface blocks.
pub const FLAT_GRASS_ONE_IN: u32 = 32;

/// Salt separating the flat-world surface draw from the structure rolls.
const FLAT_SURFACE_SALT: u64 = 0x5EED_F1A7;

/// The raw result of terrain generation for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainOutput {
    pub blocks: BlockGrid,
    pub structures: Vec<StructureRequest>,
}

/// Generates raw terrain for chunks of one world.
///
/// # Examples
///
/// ```
/// use cgmath::Point2;
/// use voxel_world::engine_state::{
///     voxels::{generation::TerrainGenerator, world_info::{WorldInfo, WorldType}},
///     WorldContext,
/// };
///
/// let context = WorldContext::new(WorldInfo::new("flat", 1, WorldType::Flat));
/// let output = TerrainGenerator::new(&context).generate(Point2::new(0, 0));
/// assert!(output.structures.is_empty());
/// ```
pub struct TerrainGenerator<'a> {
    context: &'a WorldContext,
}

impl<'a> TerrainGenerator<'a> {
    pub fn new(context: &'a WorldContext) -> Self {
        TerrainGenerator { context }
    }

    fn noise(&self) -> &dyn NoiseSource {
        self.context.noise.as_ref()
    }

    /// Generates the block grid and structure list of the chunk at `position`.
    pub fn generate(&self, position: ChunkPosition) -> TerrainOutput {
        let world_type = self.context.info.world_type;
        let seed = structure_seed(self.context.info.seed, position);
        let mut blocks = BlockGrid::new();

        if world_type == WorldType::Flat {
            self.fill_flat(&mut blocks, seed);
        } else {
            for z in 0..CHUNK_WIDTH {
                for x in 0..CHUNK_WIDTH {
                    let world_x = position.x * CHUNK_WIDTH as i32 + x as i32;
                    let world_z = position.y * CHUNK_WIDTH as i32 + z as i32;
                    self.fill_column(&mut blocks, x, z, world_x, world_z, world_type);
                }
            }
        }

        let structures = self.place_structures(&blocks, world_type, seed);
        debug!(
            "Generated terrain for chunk ({}, {}) with {} structures",
            position.x,
            position.y,
            structures.len()
        );

        TerrainOutput { blocks, structures }
    }

    fn fill_flat(&self, blocks: &mut BlockGrid, seed: u64) {
        let mut rng = Rng::with_seed(seed ^ FLAT_SURFACE_SALT);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                blocks.set(x, 0, z, BlockType::Bedrock);
                blocks.set(x, 1, z, BlockType::Dirt);
                blocks.set(x, 2, z, BlockType::Dirt);
                let surface = if rng.u32(0..FLAT_GRASS_ONE_IN) == 0 {
                    BlockType::Grass
                } else {
                    BlockType::Dirt
                };
                blocks.set(x, 3, z, surface);
            }
        }
    }

    fn fill_column(
        &self,
        blocks: &mut BlockGrid,
        x: usize,
        z: usize,
        world_x: i32,
        world_z: i32,
        world_type: WorldType,
    ) {
        let (wx, wz) = (world_x as f64, world_z as f64);
        let noise = self.noise();
        let mut hills = noise.sample_2d(wx * 4.0 + 500.0, wz * 4.0) * 0.5 + 0.5;
        let mut bottom_height = 0;

        if world_type == WorldType::FloatingIslands {
            let distance_to_spawn = (wx * wx + wz * wz).sqrt();
            let big_island = ((SPAWN_ISLAND_RADIUS - distance_to_spawn) / SPAWN_ISLAND_RADIUS).clamp(0.0, 1.0);
            let i1 = noise.sample_2d(wx * 0.5, wz * 0.5);
            let i2 = noise.sample_2d(wx, wz);
            let i3 = noise.sample_2d(wx * 5.0, wz * 5.0);
            let island = i1.min(i2) + big_island + i3 * 0.02;
            let island = ((island - 0.1).clamp(0.0, 1.0) / 0.9).sqrt();
            if island <= 0.0 {
                return;
            }
            hills *= island;
            bottom_height = (SURFACE_HEIGHT as f64 - island * 80.0) as i32;
        }

        let hill_height = (SURFACE_HEIGHT as f64 + hills * HILL_AMPLITUDE) as i32;
        let bedrock = noise.sample_2d(wx * 64.0, wz * 64.0) * 0.5 + 0.5;
        let bedrock_height = (1.0 + bedrock * 4.0) as i32;

        for y in bottom_height.max(0)..=hill_height.min(CHUNK_HEIGHT as i32 - 1) {
            let block_type = if y < bedrock_height {
                BlockType::Bedrock
            } else if y > hill_height - DIRT_DEPTH {
                if self.is_cave(wx, y, wz, SURFACE_CAVE_THRESHOLD) {
                    continue;
                }
                if y == hill_height {
                    BlockType::Grass
                } else {
                    BlockType::Dirt
                }
            } else {
                if self.is_cave(wx, y, wz, DEEP_CAVE_THRESHOLD) {
                    continue;
                }
                self.ore_at(wx, y, wz).unwrap_or(BlockType::Stone)
            };
            blocks.set(x, y as usize, z, block_type);
        }
    }

    fn is_cave(&self, wx: f64, y: i32, wz: f64, threshold: f64) -> bool {
        let noise = self.noise();
        let y = y as f64;
        let cave1 = noise.sample_3d(wx * 10.0 - 400.0, y * 10.0, wz * 10.0);
        let cave2 = noise.sample_3d(wx * 20.0 - 600.0, y * 20.0, wz * 20.0);
        let cave3 = noise.sample_3d(wx * 5.0 - 200.0, y * 5.0, wz * 5.0);
        let cave4 = noise.sample_3d(wx * 2.0 - 300.0, y * 2.0, wz * 2.0);
        cave1.min(cave4).min(cave2.min(cave3)) > threshold
    }

    /// Picks an ore (or stone variant) for a voxel in the stone layer.
    ///
    /// The two base channels are tested against fixed bands in order; the rarer
    /// channels are only sampled when no band matched.
    fn ore_at(&self, wx: f64, y: i32, wz: f64) -> Option<BlockType> {
        let noise = self.noise();
        let fy = y as f64;
        let ore1 = noise.sample_3d(wx * 15.0, fy * 15.0, wz * 15.0 + 300.0);
        let ore2 = noise.sample_3d(wx * 15.0, fy * 15.0, wz * 15.0 + 400.0);

        if ore1 > 0.3 && ore2 > 0.4 {
            return Some(BlockType::Diorite);
        }
        if ore1 < -0.3 && ore2 < -0.4 {
            return Some(BlockType::Granite);
        }
        if ore1 > 0.3 && ore2 < -0.4 {
            return Some(BlockType::Dirt);
        }
        let ore3 = noise.sample_3d(wx * 20.0, fy * 20.0, wz * 20.0 + 500.0);
        if ore1 < -0.3 && ore3 > 0.4 {
            return Some(BlockType::CoalOre);
        }

        let ore4 = noise.sample_3d(wx * 21.0, fy * 21.0, wz * 21.0 - 300.0);
        if ore4 > 0.6 {
            return Some(BlockType::IronOre);
        }

        if y < 32 {
            let ore5 = noise.sample_3d(wx * 22.0, fy * 22.0, wz * 22.0 - 400.0);
            if ore5 > 0.7 {
                return Some(BlockType::GoldOre);
            }
            if y < 16 && ore5 < -0.7 {
                return Some(BlockType::DiamondOre);
            }
        }
        None
    }

    fn place_structures(
        &self,
        blocks: &BlockGrid,
        world_type: WorldType,
        seed: u64,
    ) -> Vec<StructureRequest> {
        let mut rng = Rng::with_seed(seed);
        let mut structures = Vec::new();
        let mut spots_taken = bitvec![0; CHUNK_WIDTH * CHUNK_WIDTH];

        if world_type != WorldType::Flat {
            if rng.u32(..) < CAVE_ENTRANCE_CHANCE {
                if let Some(h) = blocks.topmost_non_air(8, 8) {
                    structures.push(StructureRequest::new(
                        Point3::new(0, h as i32 + 6, 0),
                        StructureKind::CaveEntrance,
                        rng.u64(..),
                    ));
                }
            }

            for z in 2..14 {
                for x in 2..14 {
                    if rng.u32(..) >= TREE_CHANCE || !is_spot_free(&spots_taken, x, z, 2) {
                        continue;
                    }
                    spots_taken.set(x + z * CHUNK_WIDTH, true);
                    if let Some(h) = blocks.topmost_non_air(x, z) {
                        if blocks.get(x, h, z) == BlockType::Grass {
                            structures.push(StructureRequest::new(
                                Point3::new(x as i32, h as i32 + 1, z as i32),
                                StructureKind::OakTree,
                                rng.u64(..),
                            ));
                        }
                    }
                }
            }
        }

        if rng.u32(..) < WELL_CHANCE && is_spot_free(&spots_taken, 7, 7, 3) {
            if let Some(h) = well_site_height(blocks) {
                for z in 5..11 {
                    for x in 5..11 {
                        spots_taken.set(x + z * CHUNK_WIDTH, true);
                    }
                }
                info!("Spawning well structure");
                structures.push(StructureRequest::new(
                    Point3::new(7, h as i32 + 1, 7),
                    StructureKind::Well,
                    rng.u64(..),
                ));
            }
        }

        structures
    }
}

/// Whether no spot within `size` columns of `(x, z)` has been reserved.
fn is_spot_free(spots_taken: &BitSlice, x: usize, z: usize, size: usize) -> bool {
    let xs = x.saturating_sub(size)..(x + size + 1).min(CHUNK_WIDTH);
    let zs = z.saturating_sub(size)..(z + size + 1).min(CHUNK_WIDTH);
    zs.flat_map(|z| xs.clone().map(move |x| (x, z)))
        .all(|(x, z)| !spots_taken[x + z * CHUNK_WIDTH])
}

/// The surface height under the well anchor if the central 6×6 patch is grass and
/// within one block of level.
fn well_site_height(blocks: &BlockGrid) -> Option<usize> {
    let mut min_h = usize::MAX;
    let mut max_h = 0;
    for z in 5..11 {
        for x in 5..11 {
            let h = blocks.topmost_non_air(x, z)?;
            if blocks.get(x, h, z) != BlockType::Grass {
                return None;
            }
            min_h = min_h.min(h);
            max_h = max_h.max(h);
        }
    }
    if max_h - min_h < 2 {
        blocks.topmost_non_air(7, 7)
    } else {
        None
    }
}
