//! # Engine State Module
//!
//! The subsystems of the voxel world and the state that ties them together.
//!
//! ## Key Components
//!
//! * `voxels` - Blocks, chunks, terrain generation, detail resolution and persistence
//! * `lighting` - The light field computed over a 3×3 chunk neighborhood
//! * `rendering` - Texture atlas, vertex format and the chunk mesher
//! * `task_management` - The worker pool running chunk phases
//!
//! ## Architecture
//!
//! Everything a subsystem needs to know about the loaded world lives in one
//! [`WorldContext`], built once when the world is opened and shared as
//! `Arc<WorldContext>`. [`EngineState`] owns the world, the task pool and the save store,
//! and drives chunks through their phases as results come back from the workers.

use std::sync::Arc;

use log::{error, info};
use web_time::Instant;

use error::ChunkError;
use rendering::texture_atlas::TextureAtlas;
use task_management::TaskManager;
use voxels::{
    block::BlockRegistry,
    chunk::{ChunkData, ChunkPosition},
    generation::{
        noise_source::{NoiseSource, PerlinNoise},
        structures::StructureTemplates,
    },
    persistence::SaveStore,
    world::World,
    world_info::WorldInfo,
};

pub mod error;
pub mod lighting;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Everything the chunk pipeline reads about the loaded world.
///
/// Immutable once built; pass `&WorldContext` to synchronous code and clone the `Arc`
/// into tasks.
pub struct WorldContext {
    pub info: WorldInfo,
    pub blocks: BlockRegistry,
    pub textures: TextureAtlas,
    pub structures: StructureTemplates,
    pub noise: Box<dyn NoiseSource>,
}

impl WorldContext {
    /// The standard tables and Perlin noise seeded with the world seed.
    pub fn new(info: WorldInfo) -> Self {
        let noise = Box::new(PerlinNoise::new(info.seed));
        Self::with_noise(info, noise)
    }

    /// Same as [`WorldContext::new`] with a custom noise source.
    pub fn with_noise(info: WorldInfo, noise: Box<dyn NoiseSource>) -> Self {
        WorldContext {
            info,
            blocks: BlockRegistry::new(),
            textures: TextureAtlas::new(),
            structures: StructureTemplates::new(),
            noise,
        }
    }
}

/// Owns a world and drives its chunks from creation to `chunk_ready`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cgmath::Point2;
/// use voxel_world::engine_state::{
///     task_management::TaskManager,
///     voxels::{persistence::MemorySaveStore, world_info::{WorldInfo, WorldType}},
///     EngineState,
/// };
///
/// let mut engine_state = EngineState::new(
///     WorldInfo::new("demo", 7, WorldType::Flat),
///     TaskManager::new(2),
///     Arc::new(MemorySaveStore::new()),
/// );
/// engine_state.request_area(Point2::new(0, 0), 1);
/// while !engine_state.is_idle() {
///     engine_state.process_tasks().unwrap();
/// }
/// assert!(engine_state.world.chunk(Point2::new(0, 0)).unwrap().is_chunk_ready());
/// ```
pub struct EngineState {
    pub context: Arc<WorldContext>,
    pub world: World,
    pub task_manager: TaskManager,
    store: Arc<dyn SaveStore>,
}

impl EngineState {
    pub fn new(info: WorldInfo, task_manager: TaskManager, store: Arc<dyn SaveStore>) -> Self {
        info!("Opening world {info}");
        let context = Arc::new(WorldContext::new(info));
        EngineState {
            world: World::new(context.clone()),
            context,
            task_manager,
            store,
        }
    }

    /// Adds every missing chunk within `radius` of `center` and starts its terrain.
    pub fn request_area(&mut self, center: ChunkPosition, radius: i32) {
        for z in -radius..=radius {
            for x in -radius..=radius {
                let position = ChunkPosition::new(center.x + x, center.y + z);
                if self.world.chunk(position).is_some() {
                    continue;
                }
                let chunk = Arc::new(ChunkData::new(position));
                self.world.insert(chunk.clone());
                self.task_manager
                    .publish_task(Box::new(chunk.start_terrain_generation(&self.context)));
            }
        }
    }

    /// Handles finished tasks, then starts detail resolution of every chunk whose terrain
    /// is ready, handing it the cardinal neighbors that are loaded.
    ///
    /// A chunk whose save record cannot be loaded is dropped from the world and the error
    /// returned; it is not retried unless requested again.
    pub fn process_tasks(&mut self) -> Result<(), ChunkError> {
        self.task_manager.process_completed_tasks();

        let pending: Vec<Arc<ChunkData>> = self
            .world
            .chunks()
            .filter(|chunk| chunk.is_terrain_ready() && !chunk.has_started_details())
            .cloned()
            .collect();
        let mut failure = None;
        for chunk in pending {
            let neighbors = self.world.cardinal_neighbors(chunk.position());
            match chunk.start_detail_resolution(&self.context, neighbors, self.store.as_ref()) {
                Ok(task) => {
                    self.task_manager.publish_task(Box::new(task));
                }
                Err(err) => {
                    error!("Dropping chunk: {err}");
                    self.world.remove(chunk.position());
                    failure.get_or_insert(err);
                }
            }
        }

        self.task_manager.process_queued_tasks();
        failure.map_or(Ok(()), Err)
    }

    /// Runs `process_tasks` until every requested chunk is ready, stopping at the first
    /// chunk that fails to load.
    pub fn finish_loading(&mut self) -> Result<(), ChunkError> {
        let start = Instant::now();
        while !self.is_idle() {
            self.process_tasks()?;
            if self.task_manager.tasks_in_flight() == 0 {
                self.task_manager.run_queued_inline();
            }
            std::thread::yield_now();
        }
        info!(
            "Loaded {} chunks in {:?}",
            self.world.len(),
            start.elapsed()
        );
        Ok(())
    }

    /// Whether every chunk is ready and no task is pending.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle() && self.world.chunks().all(|chunk| chunk.is_chunk_ready())
    }

    /// Saves the dirty chunks and drops every chunk from memory.
    pub fn unload_all(&mut self) -> Result<usize, error::PersistenceError> {
        let mut saved = 0;
        for chunk in self.world.drain() {
            if chunk.unload(self.store.as_ref())? {
                saved += 1;
            }
        }
        Ok(saved)
    }
}
