//! # Structures Module
//!
//! Deferred structure placements and the templates that expand them into block changes.
//!
//! Terrain generation only decides *where* a structure goes and records a
//! [`StructureRequest`]. The detail resolver later asks [`StructureTemplates::expand`] for
//! the actual block changes, each one relative to the request's anchor.

use cgmath::{Point2, Point3};
use fastrand::Rng;

use crate::engine_state::voxels::block::block_type::BlockType;

/// The kinds of structures the generator places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    OakTree,
    Well,
    /// A shaft of air winding down from the surface into the caves below.
    CaveEntrance,
}

/// A deferred placement recorded during terrain generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRequest {
    /// Anchor in chunk-local coordinates.
    pub position: Point3<i32>,
    pub kind: StructureKind,
    /// Drives the template's own randomness.
    pub seed: u64,
}

impl StructureRequest {
    pub fn new(position: Point3<i32>, kind: StructureKind, seed: u64) -> Self {
        StructureRequest {
            position,
            kind,
            seed,
        }
    }
}

/// One block change produced by a template, relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureChange {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
    pub block_type: BlockType,
}

impl StructureChange {
    fn new(dx: i32, dy: i32, dz: i32, block_type: BlockType) -> Self {
        StructureChange {
            dx,
            dy,
            dz,
            block_type,
        }
    }
}

/// Derives the seed of a chunk's structure generator from the world seed and the chunk
/// position.
///
/// A SplitMix64-style mix, so neighboring chunks get unrelated sequences.
pub fn structure_seed(world_seed: i32, position: Point2<i32>) -> u64 {
    let mut hash = (world_seed as u32 as u64) ^ 0x9E37_79B9_7F4A_7C15;
    for value in [position.x, position.y] {
        hash ^= value as u32 as u64;
        hash = hash.wrapping_add(0x9E37_79B9_7F4A_7C15);
        hash = (hash ^ (hash >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        hash = (hash ^ (hash >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        hash ^= hash >> 31;
    }
    hash
}

/// Expands structure requests into ordered block changes.
#[derive(Debug, Clone, Default)]
pub struct StructureTemplates;

impl StructureTemplates {
    pub fn new() -> Self {
        StructureTemplates
    }

    /// Whether changes of this structure ignore the density rule.
    ///
    /// Bedrock is never replaced, whatever this returns.
    pub fn overwrites_everything(&self, kind: StructureKind) -> bool {
        matches!(kind, StructureKind::CaveEntrance | StructureKind::Well)
    }

    /// The ordered block changes of a structure, driven only by `seed`.
    pub fn expand(&self, kind: StructureKind, seed: u64) -> Vec<StructureChange> {
        let mut rng = Rng::with_seed(seed);
        match kind {
            StructureKind::OakTree => oak_tree(&mut rng),
            StructureKind::Well => well(&mut rng),
            StructureKind::CaveEntrance => cave_entrance(&mut rng),
        }
    }
}

/// Anchored on the first air block above the grass it grows from.
fn oak_tree(rng: &mut Rng) -> Vec<StructureChange> {
    let trunk_height = rng.i32(4..=6);
    let mut changes = Vec::new();

    changes.push(StructureChange::new(0, -1, 0, BlockType::Dirt));
    for dy in 0..trunk_height {
        changes.push(StructureChange::new(0, dy, 0, BlockType::OakLog));
    }

    // Two wide layers around the top of the trunk, then two narrow ones above it.
    for dy in trunk_height - 2..trunk_height + 2 {
        let radius: i32 = if dy < trunk_height { 2 } else { 1 };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && dy < trunk_height {
                    continue;
                }
                let corner = dx.abs() == radius && dz.abs() == radius;
                if corner && (dy == trunk_height + 1 || rng.bool()) {
                    continue;
                }
                changes.push(StructureChange::new(dx, dy, dz, BlockType::OakLeaves));
            }
        }
    }
    changes
}

/// Anchored on the air block above the center of a flat 6×6 grass patch.
fn well(rng: &mut Rng) -> Vec<StructureChange> {
    const MIN: i32 = -2;
    const MAX: i32 = 3;
    let depth = rng.i32(4..=6);
    let mut changes = Vec::new();
    let is_rim = |dx: i32, dz: i32| dx == MIN || dx == MAX || dz == MIN || dz == MAX;

    // The shaft is dug from one below the floor up through the surface block, with
    // the rim standing one block proud of the ground.
    for dy in -depth - 1..=0 {
        for dz in MIN..=MAX {
            for dx in MIN..=MAX {
                let block_type = if is_rim(dx, dz) || dy == -depth - 1 {
                    BlockType::Cobblestone
                } else {
                    BlockType::Air
                };
                changes.push(StructureChange::new(dx, dy, dz, block_type));
            }
        }
    }
    for dy in 1..=2 {
        for (dx, dz) in [(MIN, MIN), (MAX, MIN), (MIN, MAX), (MAX, MAX)] {
            changes.push(StructureChange::new(dx, dy, dz, BlockType::OakLog));
        }
    }
    for dz in MIN..=MAX {
        for dx in MIN..=MAX {
            changes.push(StructureChange::new(dx, 3, dz, BlockType::OakPlanks));
        }
    }
    changes
}

/// Anchored at the chunk origin, a few blocks above the surface of the central column.
fn cave_entrance(rng: &mut Rng) -> Vec<StructureChange> {
    let mut changes = Vec::new();
    let (mut x, mut y, mut z) = (8.0f32, 0.0f32, 8.0f32);
    let mut heading = rng.f32() * std::f32::consts::TAU;
    let steps = rng.i32(24..=40);

    for _ in 0..steps {
        let radius = 1.5 + rng.f32() * 1.5;
        let reach = radius.ceil() as i32;
        let (cx, cy, cz) = (x.round() as i32, y.round() as i32, z.round() as i32);
        for dy in -reach..=reach {
            for dz in -reach..=reach {
                for dx in -reach..=reach {
                    if ((dx * dx + dy * dy + dz * dz) as f32) <= radius * radius {
                        changes.push(StructureChange::new(cx + dx, cy + dy, cz + dz, BlockType::Air));
                    }
                }
            }
        }
        heading += (rng.f32() - 0.5) * 0.8;
        x += heading.cos();
        z += heading.sin();
        y -= 1.0 + rng.f32() * 0.5;
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_depends_only_on_the_seed() {
        let templates = StructureTemplates::new();
        for kind in [StructureKind::OakTree, StructureKind::Well, StructureKind::CaveEntrance] {
            assert_eq!(templates.expand(kind, 42), templates.expand(kind, 42));
        }
    }

    #[test]
    fn tree_has_a_trunk_and_leaves() {
        let changes = StructureTemplates::new().expand(StructureKind::OakTree, 7);
        let logs = changes.iter().filter(|c| c.block_type == BlockType::OakLog).count();
        assert!((4..=6).contains(&logs));
        assert!(changes.iter().any(|c| c.block_type == BlockType::OakLeaves));
        assert!(changes
            .iter()
            .filter(|c| c.block_type == BlockType::OakLog)
            .all(|c| c.dx == 0 && c.dz == 0));
    }

    #[test]
    fn canopy_narrows_above_the_trunk() {
        for seed in 0..16 {
            let changes = StructureTemplates::new().expand(StructureKind::OakTree, seed);
            let top = changes
                .iter()
                .filter(|c| c.block_type == BlockType::OakLog)
                .map(|c| c.dy)
                .max()
                .unwrap()
                + 1;
            for leaf in changes.iter().filter(|c| c.block_type == BlockType::OakLeaves) {
                let reach = leaf.dx.abs().max(leaf.dz.abs());
                if leaf.dy < top {
                    assert!(reach <= 2 && leaf.dy >= top - 2);
                } else {
                    assert!(reach <= 1 && leaf.dy <= top + 1);
                }
            }
        }
    }

    #[test]
    fn cave_entrance_only_carves() {
        let templates = StructureTemplates::new();
        assert!(templates.overwrites_everything(StructureKind::CaveEntrance));
        assert!(!templates.overwrites_everything(StructureKind::OakTree));
        let changes = templates.expand(StructureKind::CaveEntrance, 99);
        assert!(!changes.is_empty());
        assert!(changes.iter().all(|c| c.block_type == BlockType::Air));
    }

    #[test]
    fn neighboring_chunks_get_different_structure_seeds() {
        let a = structure_seed(5, Point2::new(0, 0));
        let b = structure_seed(5, Point2::new(1, 0));
        let c = structure_seed(5, Point2::new(0, 1));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(a, structure_seed(5, Point2::new(0, 0)));
    }
}
