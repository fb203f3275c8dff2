//! The 3×3 block of ready chunks that light and meshing read from.

use std::sync::RwLockReadGuard;

use crate::engine_state::{
    error::ChunkError,
    voxels::{
        block::block_type::BlockType,
        chunk::{ChunkContents, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH},
        world::World,
    },
};

/// Width of the neighborhood in blocks along X and Z.
pub const NEIGHBORHOOD_WIDTH: usize = CHUNK_WIDTH * 3;

/// Read access to a chunk and its eight neighbors, all ready.
///
/// Addressed in neighborhood coordinates: X and Z run over `0..48` with the center chunk
/// at `16..32`. The read locks are held until the neighborhood is dropped, so nothing
/// can modify these chunks while a light field or mesh is being built.
pub struct ChunkNeighborhood<'a> {
    center: ChunkPosition,
    /// Row-major by Z then X, `(dx + 1) + (dz + 1) * 3`.
    chunks: Vec<RwLockReadGuard<'a, ChunkContents>>,
}

impl<'a> ChunkNeighborhood<'a> {
    /// Locks the nine chunks around `center`.
    ///
    /// Fails with `NeighborNotReady` naming the first chunk that is missing or not ready;
    /// the caller should retry once it is.
    pub fn gather(world: &'a World, center: ChunkPosition) -> Result<Self, ChunkError> {
        let mut chunks = Vec::with_capacity(9);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let position = ChunkPosition::new(center.x + dx, center.y + dz);
                let not_ready = ChunkError::NeighborNotReady { position };
                let chunk = world.chunk(position).ok_or(not_ready)?;
                let contents = chunk
                    .read()
                    .map_err(|_| ChunkError::NeighborNotReady { position })?;
                chunks.push(contents);
            }
        }
        Ok(ChunkNeighborhood { center, chunks })
    }

    pub fn center(&self) -> ChunkPosition {
        self.center
    }

    /// Contents of the chunk at offset `(dx, dz)`, each in `-1..=1`.
    pub fn chunk(&self, dx: i32, dz: i32) -> &ChunkContents {
        &self.chunks[((dx + 1) + (dz + 1) * 3) as usize]
    }

    pub fn center_chunk(&self) -> &ChunkContents {
        self.chunk(0, 0)
    }

    fn split(coordinate: usize) -> (i32, usize) {
        ((coordinate / CHUNK_WIDTH) as i32 - 1, coordinate % CHUNK_WIDTH)
    }

    /// Block at neighborhood coordinates. `x` and `z` must be below 48.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockType {
        debug_assert!(y < CHUNK_HEIGHT);
        let (dx, lx) = Self::split(x);
        let (dz, lz) = Self::split(z);
        self.chunk(dx, dz).blocks().get(lx, y, lz)
    }

    /// Height index entry of a neighborhood column.
    pub fn height(&self, x: usize, z: usize) -> usize {
        let (dx, lx) = Self::split(x);
        let (dz, lz) = Self::split(z);
        self.chunk(dx, dz).height_index().get(lx, lz) as usize
    }

    /// Every registered light source, in neighborhood coordinates.
    pub fn light_sources(&self) -> impl Iterator<Item = ([usize; 3], u8)> + '_ {
        (-1..=1).flat_map(move |dz| {
            (-1..=1).flat_map(move |dx| {
                self.chunk(dx, dz).light_sources().iter().map(move |(local, &level)| {
                    let x = (dx + 1) as usize * CHUNK_WIDTH + local.x as usize;
                    let z = (dz + 1) as usize * CHUNK_WIDTH + local.z as usize;
                    ([x, local.y as usize, z], level)
                })
            })
        })
    }
}
