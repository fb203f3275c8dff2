//! # Core Module
//!
//! Concurrency primitives shared by the chunk pipeline.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `Latch`: One-way ready flag with acquire/release visibility
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::{Latch, MtResource};
//!
//! let grid = MtResource::new(vec![0u8; 4]);
//! let ready = Latch::new();
//!
//! grid.get_mut()[0] = 7;
//! ready.set();
//!
//! if ready.is_set() {
//!     assert_eq!(grid.get()[0], 7);
//! }
//! ```

pub mod latch;
pub mod mt_resource;

pub use latch::Latch;
pub use mt_resource::MtResource;
