//! # Detail Resolution
//!
//! Turns raw terrain into a finished chunk: structures recorded during generation are
//! expanded and stamped onto the grid, saved edits are replayed on top, and the height
//! index is rebuilt.

use cgmath::Point3;
use log::{debug, warn};

use crate::engine_state::{
    voxels::{
        block::block_type::BlockType,
        chunk::{
            block_grid::BlockGrid, height_index::HeightIndex, ChunkContents, ChunkNeighbors,
            CHUNK_HEIGHT, CHUNK_WIDTH,
        },
        persistence::SaveRecord,
    },
    WorldContext,
};

/// What one resolution did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub applied: usize,
    pub skipped_bedrock: usize,
    /// Changes refused because the new block ranks below the one it would replace.
    pub skipped_density: usize,
    /// Changes outside the chunk, dropped.
    pub out_of_bounds: usize,
    /// Out-of-bounds changes that crossed into a neighbor that was supplied.
    pub spilled_into_neighbors: usize,
    pub replayed_edits: usize,
}

/// Applies structures and saved edits to a chunk's raw terrain.
pub struct DetailResolver<'a> {
    context: &'a WorldContext,
}

impl<'a> DetailResolver<'a> {
    pub fn new(context: &'a WorldContext) -> Self {
        DetailResolver { context }
    }

    /// Resolves `contents` in place and rebuilds its height index.
    ///
    /// Neighbors are only consulted to tell which dropped changes would have crossed into
    /// a loaded chunk; they are never written.
    pub fn resolve(
        &self,
        contents: &mut ChunkContents,
        record: SaveRecord,
        neighbors: &ChunkNeighbors,
    ) -> ResolveReport {
        let mut report = ResolveReport::default();
        let registry = &self.context.blocks;
        let structures = std::mem::take(&mut contents.structures);

        for request in &structures {
            let overwrites_everything = self.context.structures.overwrites_everything(request.kind);
            for change in self.context.structures.expand(request.kind, request.seed) {
                let x = request.position.x + change.dx;
                let y = request.position.y + change.dy;
                let z = request.position.z + change.dz;
                if !BlockGrid::in_bounds(x, y, z) {
                    report.out_of_bounds += 1;
                    if crosses_into_supplied_neighbor(neighbors, x, y, z) {
                        report.spilled_into_neighbors += 1;
                    }
                    continue;
                }
                let (x, y, z) = (x as usize, y as usize, z as usize);

                let current = contents.blocks.get(x, y, z);
                if current == BlockType::Bedrock {
                    report.skipped_bedrock += 1;
                    continue;
                }
                if !overwrites_everything
                    && registry.density_rank(change.block_type) < registry.density_rank(current)
                {
                    report.skipped_density += 1;
                    continue;
                }
                contents.blocks.set(x, y, z, change.block_type);
                report.applied += 1;
            }
        }

        for change in &record.changes {
            let Some(block_type) = change.block_type() else {
                warn!("Skipping saved edit with unknown block id {}", change.b);
                continue;
            };
            let position = Point3::new(change.x as i32, change.y as i32, change.z as i32);
            if !BlockGrid::in_bounds(position.x, position.y, position.z) {
                warn!("Skipping saved edit outside the chunk at {position:?}");
                continue;
            }
            contents
                .blocks
                .set(change.x as usize, change.y as usize, change.z as usize, block_type);
            contents.update_light_source(position, block_type, registry);
            report.replayed_edits += 1;
        }
        contents.save_record = record;
        contents.height_index = HeightIndex::from_grid(&contents.blocks);

        debug!(
            "Resolved {} structures: {:?} ({} neighbors supplied)",
            structures.len(),
            report,
            neighbors.count()
        );
        report
    }
}

fn crosses_into_supplied_neighbor(neighbors: &ChunkNeighbors, x: i32, y: i32, z: i32) -> bool {
    const WIDTH: i32 = CHUNK_WIDTH as i32;
    if !(0..CHUNK_HEIGHT as i32).contains(&y) {
        return false;
    }
    let (inside_x, inside_z) = ((0..WIDTH).contains(&x), (0..WIDTH).contains(&z));
    match (x, z) {
        (x, _) if x < 0 && inside_z => neighbors.left.is_some(),
        (x, _) if x >= WIDTH && inside_z => neighbors.right.is_some(),
        (_, z) if z < 0 && inside_x => neighbors.back.is_some(),
        (_, z) if z >= WIDTH && inside_x => neighbors.front.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::{
        chunk::ChunkData,
        generation::structures::{StructureKind, StructureRequest},
        persistence::BlockChange,
        world_info::{WorldInfo, WorldType},
    };

    fn context() -> WorldContext {
        WorldContext::new(WorldInfo::new("details", 11, WorldType::Flat))
    }

    fn ground() -> ChunkContents {
        let mut contents = ChunkContents::default();
        for z in 0..16 {
            for x in 0..16 {
                contents.blocks.set(x, 0, z, BlockType::Bedrock);
                contents.blocks.fill_column(x, z, 1..4, BlockType::Dirt);
            }
        }
        contents
    }

    #[test]
    fn tree_leaves_never_replace_dirt_but_fill_air() {
        let context = context();
        let mut contents = ground();
        contents.structures.push(StructureRequest::new(
            Point3::new(8, 4, 8),
            StructureKind::OakTree,
            3,
        ));
        let report = DetailResolver::new(&context).resolve(
            &mut contents,
            SaveRecord::new(Point2::new(0, 0)),
            &ChunkNeighbors::none(),
        );
        assert!(report.applied > 0);
        assert_eq!(contents.blocks.get(8, 3, 8), BlockType::Dirt);
        assert_eq!(contents.blocks.get(8, 4, 8), BlockType::OakLog);
        assert!(contents.blocks.count(BlockType::OakLeaves) > 0);
        assert!(contents.structures.is_empty());
    }

    #[test]
    fn cave_entrance_carves_everything_but_bedrock() {
        let context = context();
        let mut contents = ground();
        contents.structures.push(StructureRequest::new(
            Point3::new(0, 3, 0),
            StructureKind::CaveEntrance,
            8,
        ));
        let report = DetailResolver::new(&context).resolve(
            &mut contents,
            SaveRecord::new(Point2::new(0, 0)),
            &ChunkNeighbors::none(),
        );
        assert!(report.skipped_bedrock > 0);
        assert_eq!(report.skipped_density, 0);
        assert_eq!(contents.blocks.count(BlockType::Bedrock), 256);
    }

    #[test]
    fn saved_edits_replay_after_structures_and_register_lights() {
        let context = context();
        let mut contents = ground();
        let mut record = SaveRecord::new(Point2::new(0, 0));
        record.changes.push(BlockChange::new(2, 10, 2, BlockType::Glowstone));
        record.changes.push(BlockChange::new(5, 3, 5, BlockType::Air));
        let report =
            DetailResolver::new(&context).resolve(&mut contents, record.clone(), &ChunkNeighbors::none());

        assert_eq!(report.replayed_edits, 2);
        assert_eq!(contents.light_sources.get(&Point3::new(2, 10, 2)), Some(&14));
        assert_eq!(contents.height_index.get(2, 2), 10);
        assert_eq!(contents.height_index.get(5, 5), 2);
        assert_eq!(contents.save_record, record);
    }

    #[test]
    fn spills_are_counted_only_toward_supplied_neighbors() {
        let context = context();
        let mut contents = ground();
        contents.structures.push(StructureRequest::new(
            Point3::new(15, 4, 8),
            StructureKind::OakTree,
            3,
        ));
        let neighbors = ChunkNeighbors {
            right: Some(Arc::new(ChunkData::new(Point2::new(1, 0)))),
            ..ChunkNeighbors::none()
        };
        let report = DetailResolver::new(&context).resolve(
            &mut contents,
            SaveRecord::new(Point2::new(0, 0)),
            &neighbors,
        );
        assert!(report.out_of_bounds > 0);
        assert_eq!(report.spilled_into_neighbors, report.out_of_bounds);
    }
}
