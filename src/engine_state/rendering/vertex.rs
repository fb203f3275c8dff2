//! Vertex format of chunk meshes.

/// A vertex of a chunk mesh, laid out for direct upload.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes), chunk-local
/// - UV: [u8; 2] (2 bytes), texture atlas cell corner
/// - Normal: u8 (1 byte), [`BlockSide`](crate::engine_state::voxels::block::block_side::BlockSide) discriminant
/// - Light: u8 (1 byte), `0..=15`
///
/// Total size: 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [u8; 2],
    pub normal: u8,
    pub light: u8,
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [u8; 2], normal: u8, light: u8) -> Self {
        Vertex {
            position,
            uv,
            normal,
            light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_pack_into_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        let vertices = [Vertex::new([1.0, 2.0, 3.0], [4, 5], 2, 15)];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(&bytes[12..], &[4, 5, 2, 15]);
    }
}
