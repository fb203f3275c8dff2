//! # Lighting Module
//!
//! Computes block light for one chunk over the 48×256×48 field covering it and its eight
//! neighbors.
//!
//! ## Algorithm
//!
//! 1. The outer ring of the field is fixed at full light, so the flood never needs data
//!    from beyond the neighborhood
//! 2. Every other column is lit at 15 from its highest block up to the sky, and one voxel
//!    per column is queued just above the highest of its own and its four neighbors'
//!    tops, so light spills sideways over cliff edges
//! 3. Light sources are seeded at their level (never lowering a brighter voxel) and
//!    queued
//! 4. A breadth-first flood raises each see-through neighbor (opacity 0: air and grass
//!    patches) to one below the current voxel. Full light falling straight down stays
//!    at full light
//!
//! The field is rebuilt from scratch for every mesh build and never stored.

use std::collections::VecDeque;

use log::trace;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_type::BlockType, BlockRegistry},
    chunk::{CHUNK_HEIGHT, CHUNK_WIDTH},
};

pub mod neighborhood;

use neighborhood::{ChunkNeighborhood, NEIGHBORHOOD_WIDTH};

/// Full daylight, and the highest level anything can have.
pub const MAX_LIGHT: u8 = 15;

const FIELD_SIZE: usize = NEIGHBORHOOD_WIDTH * NEIGHBORHOOD_WIDTH * CHUNK_HEIGHT;
const EDGE: usize = NEIGHBORHOOD_WIDTH - 1;

/// Light levels of a 3×3 chunk neighborhood.
///
/// Indexed in neighborhood coordinates (`0..48`, `0..256`, `0..48`); the center chunk
/// starts at X=16, Z=16.
#[derive(Clone)]
pub struct LightField {
    values: Vec<u8>,
}

impl std::fmt::Debug for LightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.values.iter().filter(|&&v| v > 0).count();
        f.debug_struct("LightField").field("lit", &lit).finish()
    }
}

/// Air, and anything else that does not dim light at all.
fn passes_light(registry: &BlockRegistry, block_type: BlockType) -> bool {
    registry.opacity(block_type) == 0
}

fn index(x: usize, y: usize, z: usize) -> usize {
    x + z * NEIGHBORHOOD_WIDTH + y * NEIGHBORHOOD_WIDTH * NEIGHBORHOOD_WIDTH
}

impl LightField {
    /// Floods light through `neighborhood` until no voxel can be raised further.
    pub fn compute(neighborhood: &ChunkNeighborhood, registry: &BlockRegistry) -> Self {
        let start = Instant::now();
        let mut field = LightField {
            values: vec![0; FIELD_SIZE],
        };
        let mut queue = VecDeque::new();

        for z in 0..NEIGHBORHOOD_WIDTH {
            for x in 0..NEIGHBORHOOD_WIDTH {
                if x == 0 || x == EDGE || z == 0 || z == EDGE {
                    for y in 0..CHUNK_HEIGHT {
                        field.set(x, y, z, MAX_LIGHT);
                    }
                    continue;
                }

                let own_top = neighborhood.height(x, z);
                for y in own_top..CHUNK_HEIGHT {
                    field.set(x, y, z, MAX_LIGHT);
                }

                let mut top = own_top;
                if x < EDGE - 1 {
                    top = top.max(neighborhood.height(x + 1, z));
                }
                if x > 1 {
                    top = top.max(neighborhood.height(x - 1, z));
                }
                if z < EDGE - 1 {
                    top = top.max(neighborhood.height(x, z + 1));
                }
                if z > 1 {
                    top = top.max(neighborhood.height(x, z - 1));
                }
                let seed_y = (top + 1).min(CHUNK_HEIGHT - 1);
                if seed_y < 2 {
                    continue;
                }
                queue.push_back([x, seed_y, z]);
            }
        }

        let mut sources = 0;
        for ([x, y, z], level) in neighborhood.light_sources() {
            let current = field.get(x, y, z);
            field.set(x, y, z, current.max(level.min(MAX_LIGHT)));
            queue.push_back([x, y, z]);
            sources += 1;
        }

        let mut steps = 0usize;
        while let Some([x, y, z]) = queue.pop_front() {
            steps += 1;
            let light = field.get(x, y, z);

            if y > 0 && passes_light(registry, neighborhood.block(x, y - 1, z)) {
                if light == MAX_LIGHT {
                    field.set(x, y - 1, z, MAX_LIGHT);
                    queue.push_back([x, y - 1, z]);
                } else {
                    field.relax(neighborhood, registry, &mut queue, light, [x, y - 1, z]);
                }
            }
            if x < EDGE {
                field.relax(neighborhood, registry, &mut queue, light, [x + 1, y, z]);
            }
            if x > 0 {
                field.relax(neighborhood, registry, &mut queue, light, [x - 1, y, z]);
            }
            if y < CHUNK_HEIGHT - 1 {
                field.relax(neighborhood, registry, &mut queue, light, [x, y + 1, z]);
            }
            if z < EDGE {
                field.relax(neighborhood, registry, &mut queue, light, [x, y, z + 1]);
            }
            if z > 0 {
                field.relax(neighborhood, registry, &mut queue, light, [x, y, z - 1]);
            }
        }

        trace!(
            "Light for chunk ({}, {}): {} sources, {} steps in {:?}",
            neighborhood.center().x,
            neighborhood.center().y,
            sources,
            steps,
            start.elapsed()
        );
        field
    }

    /// Raises a see-through voxel to one below `light` if it is darker than that.
    fn relax(
        &mut self,
        neighborhood: &ChunkNeighborhood,
        registry: &BlockRegistry,
        queue: &mut VecDeque<[usize; 3]>,
        light: u8,
        [x, y, z]: [usize; 3],
    ) {
        if light < 2 {
            return;
        }
        if self.get(x, y, z) < light - 1 && passes_light(registry, neighborhood.block(x, y, z)) {
            self.set(x, y, z, light - 1);
            queue.push_back([x, y, z]);
        }
    }

    /// Light at neighborhood coordinates.
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.values[index(x, y, z)]
    }

    fn set(&mut self, x: usize, y: usize, z: usize, light: u8) {
        self.values[index(x, y, z)] = light;
    }

    /// Light at a position relative to the center chunk's origin.
    ///
    /// `x` and `z` may reach one chunk beyond the center in each direction; `y` outside
    /// the world reads as full light.
    pub fn local(&self, x: i32, y: i32, z: i32) -> u8 {
        if !(0..CHUNK_HEIGHT as i32).contains(&y) {
            return MAX_LIGHT;
        }
        let offset = CHUNK_WIDTH as i32;
        self.get((x + offset) as usize, y as usize, (z + offset) as usize)
    }

    /// The center chunk's light values, for inspection and tests.
    pub fn center_values(&self) -> impl Iterator<Item = ([usize; 3], u8)> + '_ {
        (0..CHUNK_HEIGHT).flat_map(move |y| {
            (0..CHUNK_WIDTH).flat_map(move |z| {
                (0..CHUNK_WIDTH).map(move |x| {
                    ([x, y, z], self.local(x as i32, y as i32, z as i32))
                })
            })
        })
    }
}
