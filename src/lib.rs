#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world: deterministic terrain and structure generation, per-chunk edit
//! persistence, a flood-fill light engine, a face mesher with smooth corner lighting and
//! a random-tick grass automaton.
//!
//! ## Key Modules
//!
//! * `core` - Shared-resource and latch primitives used across threads
//! * `engine_state` - The world, its chunk pipeline and the subsystems reading it
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cgmath::Point2;
//! use voxel_world::engine_state::{
//!     task_management::TaskManager,
//!     voxels::{persistence::MemorySaveStore, world_info::{WorldInfo, WorldType}},
//!     EngineState,
//! };
//!
//! voxel_world::init_logger();
//! let mut engine_state = EngineState::new(
//!     WorldInfo::new("usage", 3, WorldType::Flat),
//!     TaskManager::new(2),
//!     Arc::new(MemorySaveStore::new()),
//! );
//! engine_state.request_area(Point2::new(0, 0), 1);
//! engine_state.finish_loading().unwrap();
//! assert_eq!(engine_state.world.len(), 9);
//! ```

pub mod core;
pub mod engine_state;

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Calling it again is harmless.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}
