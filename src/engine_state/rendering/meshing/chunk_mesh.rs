//! The vertex and index buffers of one chunk.

use crate::engine_state::{
    rendering::{texture_atlas::FaceUv, Vertex},
    voxels::block::block_side::BlockSide,
};

/// Index pattern of one quad: two triangles sharing the bl-tr diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Geometry of one chunk, ready for upload.
///
/// Every quad is four vertices in bottom-left, top-left, top-right, bottom-right order
/// and six indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Whether there is anything to draw.
    pub fn has_geometry(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of quads facing `side`.
    pub fn quads_facing(&self, side: BlockSide) -> usize {
        self.vertices
            .chunks_exact(4)
            .filter(|quad| quad[0].normal == side.normal_id())
            .count()
    }

    /// Appends one quad.
    pub fn add_quad(&mut self, corners: [[f32; 3]; 4], uv: FaceUv, normal: u8, light: [u8; 4]) {
        let base = self.vertices.len() as u32;
        let uvs = [uv.bl, uv.tl, uv.tr, uv.br];
        for i in 0..4 {
            self.vertices
                .push(Vertex::new(corners[i], uvs[i], normal, light[i]));
        }
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
}
