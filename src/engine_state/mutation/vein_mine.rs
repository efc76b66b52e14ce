//! Connected-region search behind vein-mining.
//!
//! A vein is every voxel reachable from the origin through the 26-neighbourhood
//! (faces, edges and corners) while staying on one block type. The search is a
//! breadth-first flood fill that stops collecting once the cap is reached, so which
//! blocks are left out of an oversized vein depends on visiting order, not distance.

use std::collections::{HashSet, VecDeque};

use cgmath::Vector3;
use web_time::Duration;

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    store::{VoxelCoordinate, VoxelStore},
};

/// Offsets to the 26 voxels surrounding a voxel.
pub fn neighborhood_offsets() -> impl Iterator<Item = Vector3<i32>> {
    (-1..=1).flat_map(|dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1)
                .map(move |dz| Vector3::new(dx, dy, dz))
                .filter(|offset| *offset != Vector3::new(0, 0, 0))
        })
    })
}

/// Squared Euclidean distance between two voxels.
pub fn distance_squared(a: VoxelCoordinate, b: VoxelCoordinate) -> i32 {
    let delta = a - b;
    delta.x * delta.x + delta.y * delta.y + delta.z * delta.z
}

/// The blocks a vein-mine will break, closest to the origin first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VeinMinePlan {
    pub blocks: Vec<VoxelCoordinate>,
    /// `true` if the search stopped at the cap with matching blocks left over.
    pub truncated: bool,
}

/// Collects the vein of `block_type` containing `origin`, at most `cap` blocks.
///
/// Returns an empty plan if `origin` does not hold `block_type`.
pub fn plan(
    store: &VoxelStore,
    origin: VoxelCoordinate,
    block_type: BlockType,
    cap: usize,
) -> VeinMinePlan {
    if cap == 0 || store.get(origin) != Some(block_type) {
        return VeinMinePlan::default();
    }

    let mut visited = HashSet::from([origin]);
    let mut blocks = vec![origin];
    let mut frontier = VecDeque::from([origin]);
    let mut truncated = false;

    'search: while let Some(current) = frontier.pop_front() {
        for offset in neighborhood_offsets() {
            let neighbor = current + offset;
            if visited.contains(&neighbor) || store.get(neighbor) != Some(block_type) {
                continue;
            }
            if blocks.len() >= cap {
                truncated = true;
                break 'search;
            }
            visited.insert(neighbor);
            blocks.push(neighbor);
            frontier.push_back(neighbor);
        }
    }

    blocks.sort_by_key(|coord| distance_squared(*coord, origin));
    VeinMinePlan { blocks, truncated }
}

/// A vein-mine being broken one block at a time.
#[derive(Debug, Clone)]
pub struct VeinMineChain {
    block_type: BlockType,
    remaining: VecDeque<VoxelCoordinate>,
    next_due: Duration,
    step: Duration,
}

impl VeinMineChain {
    /// Starts a chain whose first break is due at `now`.
    pub fn new(plan: VeinMinePlan, block_type: BlockType, now: Duration, step: Duration) -> Self {
        VeinMineChain {
            block_type,
            remaining: plan.blocks.into(),
            next_due: now,
            step,
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Takes the next block if its break is due at `now`.
    pub fn next_due(&mut self, now: Duration) -> Option<VoxelCoordinate> {
        if self.next_due > now {
            return None;
        }
        let next = self.remaining.pop_front()?;
        self.next_due += self.step;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn filled_cube(side: i32, block_type: BlockType) -> VoxelStore {
        let mut store = VoxelStore::new();
        for x in 0..side {
            for y in 0..side {
                for z in 0..side {
                    store.set(Point3::new(x, y, z), block_type);
                }
            }
        }
        store
    }

    #[test]
    fn there_are_twenty_six_neighbors() {
        let offsets: HashSet<_> = neighborhood_offsets().collect();
        assert_eq!(offsets.len(), 26);
    }

    #[test]
    fn diagonal_blocks_are_part_of_the_vein() {
        let mut store = VoxelStore::new();
        store.set(Point3::new(0, 0, 0), BlockType::CoalOre);
        store.set(Point3::new(1, 1, 1), BlockType::CoalOre);
        store.set(Point3::new(2, 2, 2), BlockType::CoalOre);
        store.set(Point3::new(4, 4, 4), BlockType::CoalOre);
        store.set(Point3::new(1, 0, 0), BlockType::Stone);

        let plan = plan(&store, Point3::new(0, 0, 0), BlockType::CoalOre, 128);
        assert_eq!(
            plan.blocks,
            vec![Point3::new(0, 0, 0), Point3::new(1, 1, 1), Point3::new(2, 2, 2)]
        );
        assert!(!plan.truncated);
    }

    #[test]
    fn large_veins_are_capped() {
        let store = filled_cube(7, BlockType::Stone);
        let plan = plan(&store, Point3::new(3, 3, 3), BlockType::Stone, 128);
        assert_eq!(plan.blocks.len(), 128);
        assert!(plan.truncated);
        let unique: HashSet<_> = plan.blocks.iter().collect();
        assert_eq!(unique.len(), 128);
    }

    #[test]
    fn plan_is_sorted_by_distance() {
        let store = filled_cube(4, BlockType::IronOre);
        let origin = Point3::new(0, 0, 0);
        let plan = plan(&store, origin, BlockType::IronOre, 128);
        assert_eq!(plan.blocks.len(), 64);
        assert_eq!(plan.blocks[0], origin);
        assert!(plan
            .blocks
            .windows(2)
            .all(|pair| distance_squared(pair[0], origin) <= distance_squared(pair[1], origin)));
    }

    #[test]
    fn wrong_origin_type_yields_nothing() {
        let store = filled_cube(2, BlockType::Dirt);
        assert!(plan(&store, Point3::new(0, 0, 0), BlockType::Stone, 128)
            .blocks
            .is_empty());
        assert!(plan(&store, Point3::new(9, 9, 9), BlockType::Dirt, 128)
            .blocks
            .is_empty());
    }

    #[test]
    fn chain_paces_its_blocks() {
        let store = filled_cube(2, BlockType::Log);
        let plan = plan(&store, Point3::new(0, 0, 0), BlockType::Log, 128);
        let step = Duration::from_millis(50);
        let mut chain = VeinMineChain::new(plan, BlockType::Log, Duration::ZERO, step);

        assert_eq!(chain.next_due(Duration::ZERO), Some(Point3::new(0, 0, 0)));
        assert_eq!(chain.next_due(Duration::from_millis(10)), None);
        assert!(chain.next_due(Duration::from_millis(50)).is_some());
        assert_eq!(chain.remaining(), 6);
    }
}
