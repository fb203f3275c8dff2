//! # Voxel World Demo
//!
//! Loads a 5×5 chunk area around the origin, runs a few automaton ticks, then lights and
//! meshes the center chunk and logs what came out.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [world.json]
//! ```

use std::{error::Error, sync::Arc};

use cgmath::Point2;
use fastrand::Rng;
use log::info;
use voxel_world::engine_state::{
    lighting::{neighborhood::ChunkNeighborhood, LightField},
    rendering::meshing::ChunkMesher,
    task_management::TaskManager,
    voxels::{
        automaton::{BlockUpdateAutomaton, TickReport},
        block::block_side::BlockSide,
        persistence::MemorySaveStore,
        world_info::{WorldInfo, WorldType},
    },
    EngineState,
};

const LOAD_RADIUS: i32 = 2;
const DEMO_TICKS: usize = 200;

fn main() -> Result<(), Box<dyn Error>> {
    voxel_world::init_logger();

    let info = match std::env::args().nth(1) {
        Some(path) => WorldInfo::load(path)?,
        None => WorldInfo::new("demo", 1337, WorldType::Default),
    };

    let origin = Point2::new(0, 0);
    let mut engine_state = EngineState::new(
        info,
        TaskManager::with_available_parallelism(),
        Arc::new(MemorySaveStore::new()),
    );
    engine_state.request_area(origin, LOAD_RADIUS);
    engine_state.finish_loading()?;

    let automaton = BlockUpdateAutomaton::new();
    let mut rng = Rng::with_seed(engine_state.context.info.seed as u64);
    let mut totals = TickReport::default();
    for _ in 0..DEMO_TICKS {
        let report = automaton.tick(&engine_state.world, origin, &mut rng);
        totals.grown += report.grown;
        totals.smothered += report.smothered;
        totals.skipped += report.skipped;
    }
    info!(
        "{DEMO_TICKS} ticks: {} grown, {} smothered, {} skipped",
        totals.grown, totals.smothered, totals.skipped
    );

    let neighborhood = ChunkNeighborhood::gather(&engine_state.world, origin)?;
    let contents = neighborhood.center_chunk();
    info!(
        "Center chunk: {} solid blocks, {} light sources, {} saved edits",
        contents.blocks().count_non_air(),
        contents.light_sources().len(),
        contents.save_record().changes.len()
    );

    let light = LightField::compute(&neighborhood, &engine_state.context.blocks);
    let mut histogram = [0usize; 16];
    for (_, level) in light.center_values() {
        histogram[level as usize] += 1;
    }
    info!("Light histogram (0..=15): {histogram:?}");

    let mut mesher = ChunkMesher::new();
    let mesh = mesher.build_with_light(&neighborhood, &light, &engine_state.context);
    info!(
        "Mesh: {} quads, {} vertices, {} indices ({} facing up)",
        mesh.quad_count(),
        mesh.vertices.len(),
        mesh.indices.len(),
        mesh.quads_facing(BlockSide::Top)
    );
    drop(neighborhood);

    let saved = engine_state.unload_all()?;
    info!("Unloaded world, {saved} chunks saved");
    Ok(())
}
