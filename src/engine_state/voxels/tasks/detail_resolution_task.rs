//! # Detail Resolution Task
//!
//! Applies structures and saved edits on a worker thread, then flips the chunk's
//! `chunk_ready` latch. The four neighbors handed to the task are dropped as soon as the
//! resolution is done, so a finished task never keeps other chunks alive.

use std::sync::Arc;

use log::debug;
use web_time::{Duration, Instant};

use crate::engine_state::{
    task_management::task::{Task, TaskResult},
    voxels::{
        chunk::{ChunkData, ChunkNeighbors, ChunkPosition},
        details::{DetailResolver, ResolveReport},
        persistence::SaveRecord,
    },
    WorldContext,
};

/// Resolves the details of one chunk whose terrain is ready.
pub struct DetailResolutionTask {
    chunk: Arc<ChunkData>,
    context: Arc<WorldContext>,
    neighbors: ChunkNeighbors,
    record: SaveRecord,
}

impl DetailResolutionTask {
    pub(crate) fn new(
        chunk: Arc<ChunkData>,
        context: Arc<WorldContext>,
        neighbors: ChunkNeighbors,
        record: SaveRecord,
    ) -> Self {
        DetailResolutionTask {
            chunk,
            context,
            neighbors,
            record,
        }
    }

    pub fn position(&self) -> ChunkPosition {
        self.chunk.position()
    }

    /// Runs the resolution on the calling thread.
    pub fn run(self) -> DetailResolutionTaskResult {
        let DetailResolutionTask {
            chunk,
            context,
            neighbors,
            record,
        } = self;
        let start = Instant::now();

        let report = {
            let mut contents = chunk.contents().get_mut();
            DetailResolver::new(&context).resolve(&mut contents, record, &neighbors)
        };
        drop(neighbors);
        chunk.mark_chunk_ready();

        DetailResolutionTaskResult {
            position: chunk.position(),
            report,
            elapsed: start.elapsed(),
        }
    }
}

impl Task for DetailResolutionTask {
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
        Box::new(self.run())
    }
}

/// Reported once a chunk is ready.
#[derive(Debug, Clone, Copy)]
pub struct DetailResolutionTaskResult {
    pub position: ChunkPosition,
    pub report: ResolveReport,
    pub elapsed: Duration,
}

impl TaskResult for DetailResolutionTaskResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        debug!(
            "Chunk ({}, {}) resolved in {:?}: {} structure blocks, {} saved edits",
            self.position.x,
            self.position.y,
            self.elapsed,
            self.report.applied,
            self.report.replayed_edits
        );
        Vec::new()
    }
}
