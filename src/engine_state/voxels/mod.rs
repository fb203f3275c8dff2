//! # Voxel World
//!
//! Blocks, chunks and everything that produces or changes them.
//!
//! ## Architecture
//!
//! * **Block**: the block table (opacity, density, light) and face directions
//! * **Chunk**: the 16×256×16 grid, its height index, light sources and phase latches
//! * **Generation**: noise terrain and structure requests, seeded by world seed and position
//! * **Details**: expands structures and replays saved edits on top of the terrain
//! * **Persistence**: per-chunk save records and the stores holding them
//! * **World**: the map of loaded chunks and cross-chunk block access
//! * **Automaton**: random ticks spreading and smothering grass
//! * **Tasks**: the terrain and detail phases as pool tasks
//!
//! ## Data Flow
//!
//! 1. A new chunk runs terrain generation on a worker
//! 2. Once its terrain is ready, detail resolution expands structures and replays edits
//! 3. The chunk becomes ready; it can now be modified, lit and meshed
//! 4. On unload, a dirty chunk's save record is written back

pub mod automaton;
pub mod block;
pub mod chunk;
pub mod details;
pub mod generation;
pub mod persistence;
pub mod tasks;
pub mod world;
pub mod world_info;
