//! # Terrain Generation Task
//!
//! Generates a chunk's raw terrain on a worker thread and publishes it by flipping the
//! chunk's `terrain_ready` latch.

use std::sync::Arc;

use log::debug;
use web_time::{Duration, Instant};

use crate::engine_state::{
    task_management::task::{Task, TaskResult},
    voxels::{
        chunk::{ChunkData, ChunkPosition},
        generation::TerrainGenerator,
    },
    WorldContext,
};

/// Generates the raw terrain of one chunk.
pub struct TerrainGenerationTask {
    chunk: Arc<ChunkData>,
    context: Arc<WorldContext>,
}

impl TerrainGenerationTask {
    pub(crate) fn new(chunk: Arc<ChunkData>, context: Arc<WorldContext>) -> Self {
        TerrainGenerationTask { chunk, context }
    }

    pub fn position(&self) -> ChunkPosition {
        self.chunk.position()
    }

    /// Runs the generation on the calling thread.
    pub fn run(self) -> TerrainGenerationTaskResult {
        let start = Instant::now();
        let output = TerrainGenerator::new(&self.context).generate(self.chunk.position());
        {
            let mut contents = self.chunk.contents().get_mut();
            contents.blocks = output.blocks;
            contents.structures = output.structures;
        }
        self.chunk.mark_terrain_ready();

        TerrainGenerationTaskResult {
            position: self.chunk.position(),
            elapsed: start.elapsed(),
        }
    }
}

impl Task for TerrainGenerationTask {
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
        Box::new(self.run())
    }
}

/// Reported once terrain generation finished.
#[derive(Debug, Clone, Copy)]
pub struct TerrainGenerationTaskResult {
    pub position: ChunkPosition,
    pub elapsed: Duration,
}

impl TaskResult for TerrainGenerationTaskResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        debug!(
            "Terrain of chunk ({}, {}) generated in {:?}",
            self.position.x, self.position.y, self.elapsed
        );
        Vec::new()
    }
}
