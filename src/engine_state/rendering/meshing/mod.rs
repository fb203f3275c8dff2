//! Chunk mesh generation.
//!
//! One quad per visible block face, no merging. Each corner of a face carries the
//! average light of the four voxels in front of that corner, which shades creases and
//! overhangs without a separate occlusion pass.
//!
//! # Architecture
//! - [`ChunkMesher`]: owns the buffers and rebuilds them from a neighborhood
//! - [`chunk_mesh`]: the vertex/index buffers handed to the renderer

use log::debug;
use web_time::Instant;

use crate::engine_state::{
    lighting::{neighborhood::ChunkNeighborhood, LightField},
    rendering::texture_atlas::FaceUv,
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::{CHUNK_HEIGHT, CHUNK_WIDTH},
    },
    WorldContext,
};

pub mod chunk_mesh;

use chunk_mesh::ChunkMesh;

/// Corners of each face relative to the block's minimum corner, in bottom-left,
/// top-left, top-right, bottom-right order as seen from outside the block.
fn face_corners(side: BlockSide) -> [[i32; 3]; 4] {
    match side {
        BlockSide::Front => [[1, 0, 1], [1, 1, 1], [0, 1, 1], [0, 0, 1]],
        BlockSide::Back => [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
        BlockSide::Top => [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
        BlockSide::Bottom => [[0, 0, 1], [0, 0, 0], [1, 0, 0], [1, 0, 1]],
        BlockSide::Left => [[0, 0, 1], [0, 1, 1], [0, 1, 0], [0, 0, 0]],
        BlockSide::Right => [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
    }
}

/// Builds chunk meshes, reusing its buffers between builds.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cgmath::Point2;
/// use voxel_world::engine_state::{
///     lighting::neighborhood::ChunkNeighborhood,
///     rendering::meshing::ChunkMesher,
///     voxels::{
///         block::{block_type::BlockType, BlockRegistry},
///         chunk::{block_grid::BlockGrid, ChunkData},
///         world::World,
///         world_info::{WorldInfo, WorldType},
///     },
///     WorldContext,
/// };
///
/// let context = Arc::new(WorldContext::new(WorldInfo::new("mesh", 1, WorldType::Flat)));
/// let mut world = World::new(context.clone());
/// for z in -1..=1 {
///     for x in -1..=1 {
///         let grid = BlockGrid::new();
///         world.insert(Arc::new(ChunkData::from_blocks(Point2::new(x, z), grid, &BlockRegistry::new())));
///     }
/// }
/// world.modify(3, 70, 3, BlockType::Stone).unwrap();
///
/// let neighborhood = ChunkNeighborhood::gather(&world, Point2::new(0, 0)).unwrap();
/// let mut mesher = ChunkMesher::new();
/// let mesh = mesher.build(&neighborhood, &context);
/// assert_eq!(mesh.quad_count(), 6);
/// assert!(mesh.vertices.iter().all(|v| v.light >= 14));
/// ```
#[derive(Debug, Default)]
pub struct ChunkMesher {
    mesh: ChunkMesh,
}

impl ChunkMesher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Computes the light field and rebuilds the mesh of the neighborhood's center chunk.
    pub fn build(&mut self, neighborhood: &ChunkNeighborhood, context: &WorldContext) -> &ChunkMesh {
        let light = LightField::compute(neighborhood, &context.blocks);
        self.build_with_light(neighborhood, &light, context)
    }

    /// Rebuilds the mesh with an already computed light field.
    pub fn build_with_light(
        &mut self,
        neighborhood: &ChunkNeighborhood,
        light: &LightField,
        context: &WorldContext,
    ) -> &ChunkMesh {
        let start = Instant::now();
        self.mesh.clear();
        let offset = CHUNK_WIDTH as i32;

        for z in 0..CHUNK_WIDTH as i32 {
            for y in 0..CHUNK_HEIGHT as i32 {
                for x in 0..CHUNK_WIDTH as i32 {
                    let block_type = neighborhood.center_chunk().blocks().get(x as usize, y as usize, z as usize);
                    if block_type == BlockType::Air {
                        continue;
                    }

                    if let Some(faces) = context.blocks.custom_faces(block_type) {
                        let level = light.local(x, y, z);
                        let origin = [x as f32, y as f32, z as f32];
                        for face in faces {
                            let corners = [face.bl, face.tl, face.tr, face.br]
                                .map(|c| [c[0] + origin[0], c[1] + origin[1], c[2] + origin[2]]);
                            self.mesh.add_quad(
                                corners,
                                FaceUv::from_cell(face.cell),
                                BlockSide::Front.normal_id(),
                                [level; 4],
                            );
                        }
                        continue;
                    }

                    for side in BlockSide::all() {
                        let normal = side.offset();
                        let (nx, ny, nz) = (x + normal.x, y + normal.y, z + normal.z);
                        let neighbor_opaque = (0..CHUNK_HEIGHT as i32).contains(&ny)
                            && context.blocks.is_opaque(neighborhood.block(
                                (nx + offset) as usize,
                                ny as usize,
                                (nz + offset) as usize,
                            ));
                        if neighbor_opaque {
                            continue;
                        }
                        let Some(uv) = context.textures.face_uv(block_type, side) else {
                            continue;
                        };

                        let corners = face_corners(side);
                        let positions = corners.map(|c| [(x + c[0]) as f32, (y + c[1]) as f32, (z + c[2]) as f32]);
                        let lights = corners.map(|c| corner_light(light, side, [x, y, z], c));
                        self.mesh.add_quad(positions, uv, side.normal_id(), lights);
                    }
                }
            }
        }

        debug!(
            "Meshed chunk ({}, {}): {} quads in {:?}",
            neighborhood.center().x,
            neighborhood.center().y,
            self.mesh.quad_count(),
            start.elapsed()
        );
        &self.mesh
    }
}

/// Mean light of the four voxels in front of one corner of a face.
///
/// The voxel directly in front of the face is averaged with its neighbors toward the
/// corner along both face axes. Steps above or below the world stay in place.
fn corner_light(light: &LightField, side: BlockSide, block: [i32; 3], corner: [i32; 3]) -> u8 {
    let normal = side.offset();
    let normal = [normal.x, normal.y, normal.z];
    let step = |axis: usize, delta: i32| -> i32 {
        if axis != 1 {
            return delta;
        }
        let y = block[1] + delta;
        if (0..CHUNK_HEIGHT as i32).contains(&y) {
            delta
        } else {
            0
        }
    };

    let mut front = block;
    for axis in 0..3 {
        front[axis] += step(axis, normal[axis]);
    }

    let mut tangents = [[0i32; 3]; 2];
    let mut found = 0;
    for axis in 0..3 {
        if normal[axis] == 0 {
            let delta = if corner[axis] == 1 { 1 } else { -1 };
            tangents[found][axis] = step(axis, delta);
            found += 1;
        }
    }

    let sample = |d: [i32; 3]| -> u32 {
        light.local(front[0] + d[0], front[1] + d[1], front[2] + d[2]) as u32
    };
    let [u, v] = tangents;
    let uv = [u[0] + v[0], u[1] + v[1], u[2] + v[2]];
    ((sample([0, 0, 0]) + sample(u) + sample(v) + sample(uv)) / 4) as u8
}
