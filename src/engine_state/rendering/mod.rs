//! # Rendering Module
//!
//! CPU side of chunk rendering: the texture atlas layout, the packed vertex format and
//! the mesher turning a lit chunk neighborhood into vertex and index buffers. Uploading
//! and drawing the buffers is left to the embedding application.

pub mod meshing;
pub mod texture_atlas;
mod vertex;

pub use vertex::Vertex;
