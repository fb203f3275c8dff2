//! # Chunk Pipeline Tasks
//!
//! The two background phases of a chunk, each published to the
//! [`TaskManager`](crate::engine_state::task_management::TaskManager):
//!
//! * [`terrain_generation_task`]: raw grid and structure list, then `terrain_ready`
//! * [`detail_resolution_task`]: structures and saved edits, then `chunk_ready`
//!
//! Both are created through [`ChunkData`](super::chunk::ChunkData), which checks the
//! lifecycle before handing out a task.

pub mod detail_resolution_task;
pub mod terrain_generation_task;
