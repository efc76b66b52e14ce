//! # Leaf Decay
//!
//! Leaves left without a nearby trunk disappear after a short random delay.
//!
//! Checks are kept in a min-heap ordered by due time, paired with a set of pending
//! coordinates so a leaf is never scheduled twice. A leaf counts as supported while any
//! trunk block sits within a fixed Manhattan distance; the offsets covering that
//! diamond are computed once when the scheduler is built.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
};

use cgmath::{Point3, Vector3};
use web_time::Duration;

use crate::engine_state::voxels::{
    block::registry::BlockRegistry,
    store::{VoxelCoordinate, VoxelStore},
};

use super::vein_mine::neighborhood_offsets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct DecayEntry {
    due: Duration,
    coord: [i32; 3],
}

/// Pending leaf-decay checks.
#[derive(Debug, Clone)]
pub struct LeafDecayScheduler {
    queue: BinaryHeap<Reverse<DecayEntry>>,
    pending: HashSet<VoxelCoordinate>,
    support_offsets: Vec<Vector3<i32>>,
    min_delay: Duration,
    max_delay: Duration,
}

impl LeafDecayScheduler {
    /// # Arguments
    /// * `support_distance` - Manhattan radius searched for a trunk block
    /// * `min_delay`, `max_delay` - Bounds of the random wait before a check runs
    pub fn new(support_distance: i32, min_delay: Duration, max_delay: Duration) -> Self {
        let mut support_offsets = Vec::new();
        for dx in -support_distance..=support_distance {
            for dy in -support_distance..=support_distance {
                for dz in -support_distance..=support_distance {
                    let manhattan = dx.abs() + dy.abs() + dz.abs();
                    if manhattan > 0 && manhattan <= support_distance {
                        support_offsets.push(Vector3::new(dx, dy, dz));
                    }
                }
            }
        }

        LeafDecayScheduler {
            queue: BinaryHeap::new(),
            pending: HashSet::new(),
            support_offsets,
            min_delay,
            max_delay,
        }
    }

    pub fn support_offsets(&self) -> &[Vector3<i32>] {
        &self.support_offsets
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, coord: VoxelCoordinate) -> bool {
        self.pending.contains(&coord)
    }

    fn random_delay(&self, rng: &mut fastrand::Rng) -> Duration {
        let spread = self.max_delay.saturating_sub(self.min_delay);
        self.min_delay + spread.mul_f64(rng.f64())
    }

    /// Schedules a check of `coord` unless one is already pending.
    ///
    /// # Returns
    /// `true` if a new check was queued.
    pub fn schedule(
        &mut self,
        coord: VoxelCoordinate,
        now: Duration,
        rng: &mut fastrand::Rng,
    ) -> bool {
        if !self.pending.insert(coord) {
            return false;
        }
        let due = now + self.random_delay(rng);
        self.queue.push(Reverse(DecayEntry {
            due,
            coord: [coord.x, coord.y, coord.z],
        }));
        true
    }

    /// Schedules a check for every leaf among the 26 neighbours of `position`.
    ///
    /// # Returns
    /// How many checks were queued.
    pub fn schedule_neighbors(
        &mut self,
        position: VoxelCoordinate,
        store: &VoxelStore,
        registry: &BlockRegistry,
        now: Duration,
        rng: &mut fastrand::Rng,
    ) -> usize {
        let mut scheduled = 0;
        for offset in neighborhood_offsets() {
            let neighbor = position + offset;
            let is_leaf = store
                .get(neighbor)
                .is_some_and(|block_type| registry.is_foliage(block_type));
            if is_leaf && self.schedule(neighbor, now, rng) {
                scheduled += 1;
            }
        }
        scheduled
    }

    /// Removes and returns up to `max` checks that are due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Duration, max: usize) -> Vec<VoxelCoordinate> {
        let mut due = Vec::new();
        while due.len() < max {
            match self.queue.peek() {
                Some(Reverse(entry)) if entry.due <= now => {}
                _ => break,
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            let [x, y, z] = entry.coord;
            let coord = Point3::new(x, y, z);
            self.pending.remove(&coord);
            due.push(coord);
        }
        due
    }

    /// `true` if a trunk block lies within the support distance of `coord`.
    pub fn is_supported(
        &self,
        coord: VoxelCoordinate,
        store: &VoxelStore,
        registry: &BlockRegistry,
    ) -> bool {
        self.support_offsets.iter().any(|offset| {
            store
                .get(coord + *offset)
                .is_some_and(|block_type| registry.is_trunk(block_type))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn scheduler() -> LeafDecayScheduler {
        LeafDecayScheduler::new(4, Duration::from_millis(500), Duration::from_millis(3200))
    }

    #[test]
    fn support_offsets_fill_the_manhattan_diamond() {
        let scheduler = scheduler();
        // 129 points with |dx|+|dy|+|dz| <= 4, minus the centre.
        assert_eq!(scheduler.support_offsets().len(), 128);
        assert!(scheduler
            .support_offsets()
            .iter()
            .all(|o| o.x.abs() + o.y.abs() + o.z.abs() <= 4));
    }

    #[test]
    fn duplicate_schedules_are_ignored() {
        let mut scheduler = scheduler();
        let mut rng = fastrand::Rng::with_seed(1);
        let coord = Point3::new(1, 2, 3);
        assert!(scheduler.schedule(coord, Duration::ZERO, &mut rng));
        assert!(!scheduler.schedule(coord, Duration::ZERO, &mut rng));
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn checks_come_due_within_the_delay_window() {
        let mut scheduler = scheduler();
        let mut rng = fastrand::Rng::with_seed(9);
        for x in 0..10 {
            scheduler.schedule(Point3::new(x, 0, 0), Duration::ZERO, &mut rng);
        }
        assert!(scheduler.pop_due(Duration::from_millis(499), 100).is_empty());

        let due = scheduler.pop_due(Duration::from_millis(3200), 4);
        assert_eq!(due.len(), 4);
        assert_eq!(scheduler.pending_count(), 6);
        assert_eq!(scheduler.pop_due(Duration::from_millis(3200), 100).len(), 6);
        assert!(!scheduler.is_pending(due[0]));
    }

    #[test]
    fn only_leaf_neighbors_are_scheduled() {
        let registry = BlockRegistry::standard();
        let mut store = VoxelStore::new();
        store.set(Point3::new(1, 1, 1), BlockType::Leaves);
        store.set(Point3::new(-1, 0, 1), BlockType::Leaves);
        store.set(Point3::new(0, 1, 0), BlockType::Dirt);
        store.set(Point3::new(2, 0, 0), BlockType::Leaves);

        let mut scheduler = scheduler();
        let mut rng = fastrand::Rng::with_seed(3);
        let scheduled =
            scheduler.schedule_neighbors(Point3::new(0, 0, 0), &store, &registry, Duration::ZERO, &mut rng);
        assert_eq!(scheduled, 2);
    }

    #[test]
    fn trunks_within_range_support_leaves() {
        let registry = BlockRegistry::standard();
        let mut store = VoxelStore::new();
        store.set(Point3::new(0, 0, 0), BlockType::Log);
        let scheduler = scheduler();

        assert!(scheduler.is_supported(Point3::new(0, 1, 0), &store, &registry));
        assert!(scheduler.is_supported(Point3::new(2, 1, 1), &store, &registry));
        assert!(!scheduler.is_supported(Point3::new(2, 2, 1), &store, &registry));
        assert!(!scheduler.is_supported(Point3::new(10, 10, 10), &store, &registry));
    }
}
