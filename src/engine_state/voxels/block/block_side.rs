//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, the direction each one points
//! in and the orientation identifier written into every mesh vertex.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant is the face-orientation identifier stored in the vertex buffer and
/// used by the renderer for directional shading.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    Front = 0,

    /// The back face (facing negative Z)
    Back = 1,

    /// The top face (facing positive Y)
    Top = 2,

    /// The bottom face (facing negative Y)
    Bottom = 3,

    /// The left face (facing negative X)
    Left = 4,

    /// The right face (facing positive X)
    Right = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Top,
            BlockSide::Bottom,
            BlockSide::Left,
            BlockSide::Right,
        ]
    }

    /// The orientation identifier written into vertex data.
    pub fn normal_id(self) -> u8 {
        self as u8
    }

    /// Unit offset from a block to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::Front => Vector3::new(0, 0, 1),
            BlockSide::Back => Vector3::new(0, 0, -1),
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::Left => Vector3::new(-1, 0, 0),
            BlockSide::Right => Vector3::new(1, 0, 0),
        }
    }
}
