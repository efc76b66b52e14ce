//! # World Mutation
//!
//! Every change to the voxel store after terrain generation goes through
//! [`WorldMutator`], on the main thread:
//!
//! - `place_block` / `break_block` edit one voxel
//! - `vein_mine` breaks a connected same-type region at once, while
//!   `start_vein_mine_chain` + `tick_vein_mine` break it one block per step
//! - `tick_leaf_decay` removes leaves that lost their trunk
//!
//! Each edit asks the [`RemeshTrigger`] to refresh the chunks around the edited column
//! and records a [`WorldEvent`] for the outer game loop. Invalid requests (placing into
//! an occupied voxel, breaking air or an unbreakable block) are ignored.

pub mod events;
pub mod leaf_decay;
pub mod vein_mine;

use std::{collections::VecDeque, sync::Arc};

use log::{debug, trace};
use web_time::Duration;

use crate::{
    config::MutationConfig,
    core::{Clock, MtResource},
    engine_state::voxels::{
        block::{block_type::BlockType, item::ItemType, registry::BlockRegistry},
        store::{VoxelCoordinate, VoxelStore},
    },
};

pub use events::WorldEvent;
pub use leaf_decay::LeafDecayScheduler;
pub use vein_mine::{VeinMineChain, VeinMinePlan};

/// Receives "the voxel column at (x, z) changed" notifications.
pub trait RemeshTrigger {
    fn update_chunk_and_neighbors(&mut self, x: i32, z: i32);
}

/// Main-thread owner of all world edits.
pub struct WorldMutator {
    store: MtResource<VoxelStore>,
    registry: Arc<BlockRegistry>,
    config: MutationConfig,
    leaf_decay: LeafDecayScheduler,
    chains: VecDeque<VeinMineChain>,
    clock: Arc<dyn Clock>,
    rng: fastrand::Rng,
    events: Vec<WorldEvent>,
}

impl WorldMutator {
    /// # Arguments
    /// * `store` - Shared voxel store; this mutator is its only writer
    /// * `registry` - Block metadata
    /// * `config` - Vein-mine and leaf-decay tunables
    /// * `clock` - Time source for decay checks and paced vein-mines
    /// * `seed` - Seeds the decay delays and bonus drop rolls
    pub fn new(
        store: MtResource<VoxelStore>,
        registry: Arc<BlockRegistry>,
        config: MutationConfig,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        let leaf_decay = LeafDecayScheduler::new(
            config.leaf_support_distance,
            Duration::from_secs_f64(config.leaf_decay_min_delay_secs),
            Duration::from_secs_f64(config.leaf_decay_max_delay_secs),
        );
        WorldMutator {
            store,
            registry,
            config,
            leaf_decay,
            chains: VecDeque::new(),
            clock,
            rng: fastrand::Rng::with_seed(seed),
            events: Vec::new(),
        }
    }

    /// Writes `block_type` at `coord` if the voxel is empty.
    ///
    /// A placed leaf also gets a decay check of its own, so leaves placed away from
    /// any trunk decay like orphaned canopy.
    ///
    /// # Returns
    /// `true` if the block was placed.
    pub fn place_block(
        &mut self,
        coord: VoxelCoordinate,
        block_type: BlockType,
        remesh: &mut dyn RemeshTrigger,
    ) -> bool {
        {
            let mut store = self.store.get_mut();
            if let Some(existing) = store.get(coord) {
                debug!(
                    "Ignoring place of {} at {:?}: occupied by {}",
                    block_type, coord, existing
                );
                return false;
            }
            store.set(coord, block_type);
        }

        remesh.update_chunk_and_neighbors(coord.x, coord.z);
        self.events.push(WorldEvent::BlockPlaced {
            position: coord,
            block_type,
        });
        if self.registry.is_foliage(block_type) {
            let now = self.clock.now();
            self.leaf_decay.schedule(coord, now, &mut self.rng);
        }
        true
    }

    /// Removes the block at `coord`.
    ///
    /// Records the drop (and, for leaves, a possible bonus drop) and schedules decay
    /// checks for the surrounding leaves.
    ///
    /// # Returns
    /// The dropped item, or `None` if nothing was broken.
    pub fn break_block(
        &mut self,
        coord: VoxelCoordinate,
        remesh: &mut dyn RemeshTrigger,
    ) -> Option<ItemType> {
        let block_type = {
            let mut store = self.store.get_mut();
            let Some(block_type) = store.get(coord) else {
                debug!("Ignoring break at {:?}: no block", coord);
                return None;
            };
            if self.registry.get(block_type).base_break_time.is_unbreakable() {
                debug!("Ignoring break at {:?}: {} is unbreakable", coord, block_type);
                return None;
            }
            store.remove(coord);
            block_type
        };

        remesh.update_chunk_and_neighbors(coord.x, coord.z);

        let drop = self.registry.drop_for(block_type);
        self.events.push(WorldEvent::BlockBroken {
            position: coord,
            block_type,
            drop,
        });
        if self.registry.is_foliage(block_type)
            && self.rng.f64() < self.config.leaf_bonus_drop_chance
        {
            self.events.push(WorldEvent::BonusDrop {
                position: coord,
                item: ItemType::Apple,
            });
        }

        let now = self.clock.now();
        let store = self.store.get();
        self.leaf_decay
            .schedule_neighbors(coord, &store, &self.registry, now, &mut self.rng);
        Some(drop)
    }

    /// The blocks a vein-mine from `origin` would break, closest first.
    pub fn plan_vein_mine(&self, origin: VoxelCoordinate, block_type: BlockType) -> VeinMinePlan {
        let plan = vein_mine::plan(
            &self.store.get(),
            origin,
            block_type,
            self.config.vein_mine_cap,
        );
        if plan.truncated {
            debug!(
                "Vein-mine of {} at {:?} truncated at {} blocks",
                block_type,
                origin,
                plan.blocks.len()
            );
        }
        plan
    }

    /// Breaks the whole vein of `block_type` containing `origin` right away.
    ///
    /// # Returns
    /// The drops, in break order.
    pub fn vein_mine(
        &mut self,
        origin: VoxelCoordinate,
        block_type: BlockType,
        remesh: &mut dyn RemeshTrigger,
    ) -> Vec<ItemType> {
        let plan = self.plan_vein_mine(origin, block_type);
        let mut drops = Vec::with_capacity(plan.blocks.len());
        for coord in plan.blocks {
            drops.extend(self.break_block(coord, remesh));
        }
        drops
    }

    /// Plans a vein-mine and breaks it one block per step on later `tick_vein_mine`
    /// calls, starting with the origin on the next tick.
    ///
    /// # Returns
    /// How many blocks the chain will try to break.
    pub fn start_vein_mine_chain(&mut self, origin: VoxelCoordinate, block_type: BlockType) -> usize {
        let plan = self.plan_vein_mine(origin, block_type);
        let planned = plan.blocks.len();
        if planned > 0 {
            let step = Duration::from_millis(self.config.vein_mine_step_delay_ms);
            self.chains
                .push_back(VeinMineChain::new(plan, block_type, self.clock.now(), step));
        }
        planned
    }

    /// Breaks every chained block whose turn has come.
    ///
    /// A block that changed type since the chain was planned is skipped.
    ///
    /// # Returns
    /// How many blocks were broken.
    pub fn tick_vein_mine(&mut self, remesh: &mut dyn RemeshTrigger) -> usize {
        let now = self.clock.now();
        let mut chains = std::mem::take(&mut self.chains);
        let mut broken = 0;

        for chain in chains.iter_mut() {
            while let Some(coord) = chain.next_due(now) {
                let unchanged = self.store.get().get(coord) == Some(chain.block_type());
                if unchanged && self.break_block(coord, remesh).is_some() {
                    broken += 1;
                }
            }
        }

        chains.retain(|chain| !chain.is_finished());
        self.chains = chains;
        broken
    }

    pub fn active_vein_mine_chains(&self) -> usize {
        self.chains.len()
    }

    /// Schedules decay checks for the leaves around `position`.
    pub fn schedule_decay_check(&mut self, position: VoxelCoordinate) -> usize {
        let now = self.clock.now();
        let store = self.store.get();
        self.leaf_decay
            .schedule_neighbors(position, &store, &self.registry, now, &mut self.rng)
    }

    /// Runs up to `max_checks` due decay checks, breaking unsupported leaves.
    ///
    /// # Returns
    /// How many leaves decayed.
    pub fn tick_leaf_decay(&mut self, max_checks: usize, remesh: &mut dyn RemeshTrigger) -> usize {
        let now = self.clock.now();
        let mut decayed = 0;

        for coord in self.leaf_decay.pop_due(now, max_checks) {
            let orphaned = {
                let store = self.store.get();
                store
                    .get(coord)
                    .is_some_and(|block_type| self.registry.is_foliage(block_type))
                    && !self.leaf_decay.is_supported(coord, &store, &self.registry)
            };
            if orphaned && self.break_block(coord, remesh).is_some() {
                trace!("Leaf at {:?} decayed", coord);
                decayed += 1;
            }
        }
        decayed
    }

    pub fn pending_decay_checks(&self) -> usize {
        self.leaf_decay.pending_count()
    }

    /// Takes every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use cgmath::Point3;

    #[derive(Default)]
    struct RecordingRemesh {
        columns: Vec<(i32, i32)>,
    }

    impl RemeshTrigger for RecordingRemesh {
        fn update_chunk_and_neighbors(&mut self, x: i32, z: i32) {
            self.columns.push((x, z));
        }
    }

    fn mutator_with(config: MutationConfig) -> (WorldMutator, MtResource<VoxelStore>, ManualClock) {
        let store = MtResource::new(VoxelStore::new());
        let clock = ManualClock::new();
        let mutator = WorldMutator::new(
            store.clone(),
            Arc::new(BlockRegistry::standard()),
            config,
            Arc::new(clock.clone()),
            42,
        );
        (mutator, store, clock)
    }

    fn mutator() -> (WorldMutator, MtResource<VoxelStore>, ManualClock) {
        mutator_with(MutationConfig::default())
    }

    #[test]
    fn place_then_break_round_trips() {
        let (mut mutator, store, _) = mutator();
        let mut remesh = RecordingRemesh::default();
        let coord = Point3::new(3, 4, -5);

        assert!(mutator.place_block(coord, BlockType::Wool, &mut remesh));
        assert_eq!(store.get().get(coord), Some(BlockType::Wool));
        assert_eq!(
            mutator.break_block(coord, &mut remesh),
            Some(ItemType::Block(BlockType::Wool))
        );
        assert_eq!(store.get().get(coord), None);
        assert_eq!(remesh.columns, vec![(3, -5), (3, -5)]);

        let events = mutator.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], WorldEvent::BlockPlaced { .. }));
        assert!(mutator.drain_events().is_empty());
    }

    #[test]
    fn invalid_requests_are_ignored() {
        let (mut mutator, store, _) = mutator();
        let mut remesh = RecordingRemesh::default();
        let coord = Point3::new(0, 0, 0);

        assert_eq!(mutator.break_block(coord, &mut remesh), None);
        assert!(mutator.place_block(coord, BlockType::Stone, &mut remesh));
        assert!(!mutator.place_block(coord, BlockType::Dirt, &mut remesh));
        assert_eq!(store.get().get(coord), Some(BlockType::Stone));

        store.get_mut().set(Point3::new(0, -1, 0), BlockType::Bedrock);
        assert_eq!(mutator.break_block(Point3::new(0, -1, 0), &mut remesh), None);
        assert_eq!(remesh.columns.len(), 1);
    }

    #[test]
    fn ores_drop_their_material() {
        let (mut mutator, store, _) = mutator();
        let mut remesh = RecordingRemesh::default();
        store.get_mut().set(Point3::new(0, -5, 0), BlockType::CoalOre);
        store.get_mut().set(Point3::new(1, -5, 0), BlockType::DiamondOre);

        assert_eq!(
            mutator.break_block(Point3::new(0, -5, 0), &mut remesh),
            Some(ItemType::Coal)
        );
        assert_eq!(
            mutator.break_block(Point3::new(1, -5, 0), &mut remesh),
            Some(ItemType::Diamond)
        );
    }

    #[test]
    fn leaves_always_roll_a_bonus_when_the_chance_is_certain() {
        let (mut mutator, store, _) = mutator_with(MutationConfig {
            leaf_bonus_drop_chance: 1.0,
            ..MutationConfig::default()
        });
        let mut remesh = RecordingRemesh::default();
        store.get_mut().set(Point3::new(0, 0, 0), BlockType::Leaves);
        store.get_mut().set(Point3::new(1, 0, 0), BlockType::Stone);

        mutator.break_block(Point3::new(0, 0, 0), &mut remesh);
        mutator.break_block(Point3::new(1, 0, 0), &mut remesh);
        let bonuses = mutator
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, WorldEvent::BonusDrop { .. }))
            .count();
        assert_eq!(bonuses, 1);
    }

    #[test]
    fn vein_mine_breaks_the_connected_region_up_to_the_cap() {
        let (mut mutator, store, _) = mutator();
        let mut remesh = RecordingRemesh::default();
        {
            let mut voxels = store.get_mut();
            for x in 0..6 {
                for y in 0..6 {
                    for z in 0..6 {
                        voxels.set(Point3::new(x, y, z), BlockType::Stone);
                    }
                }
            }
        }

        let drops = mutator.vein_mine(Point3::new(0, 0, 0), BlockType::Stone, &mut remesh);
        assert_eq!(drops.len(), 128);
        assert_eq!(store.get().len(), 216 - 128);
    }

    #[test]
    fn chained_vein_mine_breaks_one_block_per_step() {
        let (mut mutator, store, clock) = mutator();
        let mut remesh = RecordingRemesh::default();
        for x in 0..4 {
            store.get_mut().set(Point3::new(x, 0, 0), BlockType::Log);
        }

        assert_eq!(mutator.start_vein_mine_chain(Point3::new(0, 0, 0), BlockType::Log), 4);
        assert_eq!(mutator.tick_vein_mine(&mut remesh), 1);
        assert_eq!(mutator.tick_vein_mine(&mut remesh), 0);
        clock.advance(Duration::from_millis(50));
        assert_eq!(mutator.tick_vein_mine(&mut remesh), 1);
        clock.advance(Duration::from_millis(500));
        assert_eq!(mutator.tick_vein_mine(&mut remesh), 2);
        assert_eq!(mutator.active_vein_mine_chains(), 0);
        assert!(store.get().is_empty());
    }

    #[test]
    fn orphaned_leaves_decay_and_supported_ones_stay() {
        let (mut mutator, store, clock) = mutator();
        let mut remesh = RecordingRemesh::default();
        mutator.place_block(Point3::new(0, 0, 0), BlockType::Log, &mut remesh);
        mutator.place_block(Point3::new(0, 1, 0), BlockType::Leaves, &mut remesh);
        mutator.place_block(Point3::new(10, 10, 10), BlockType::Leaves, &mut remesh);

        for _ in 0..10 {
            clock.advance(Duration::from_millis(500));
            mutator.tick_leaf_decay(5, &mut remesh);
        }

        assert_eq!(store.get().get(Point3::new(0, 1, 0)), Some(BlockType::Leaves));
        assert_eq!(store.get().get(Point3::new(10, 10, 10)), None);
        assert_eq!(mutator.pending_decay_checks(), 0);
    }

    #[test]
    fn felling_the_trunk_lets_the_canopy_decay() {
        let (mut mutator, store, clock) = mutator();
        let mut remesh = RecordingRemesh::default();
        {
            let mut voxels = store.get_mut();
            voxels.set(Point3::new(0, 0, 0), BlockType::Log);
            for x in -1..=1 {
                for z in -1..=1 {
                    voxels.set(Point3::new(x, 1, z), BlockType::Leaves);
                }
            }
        }

        mutator.break_block(Point3::new(0, 0, 0), &mut remesh);
        assert_eq!(mutator.pending_decay_checks(), 9);
        for _ in 0..20 {
            clock.advance(Duration::from_millis(500));
            mutator.tick_leaf_decay(5, &mut remesh);
        }
        assert!(store.get().is_empty());
    }

    #[test]
    fn explicit_decay_check_schedules_surrounding_leaves() {
        let (mut mutator, store, _) = mutator();
        store.get_mut().set(Point3::new(1, 1, 1), BlockType::Leaves);
        store.get_mut().set(Point3::new(0, 1, 0), BlockType::Glass);
        assert_eq!(mutator.schedule_decay_check(Point3::new(0, 0, 0)), 1);
        assert_eq!(mutator.schedule_decay_check(Point3::new(0, 0, 0)), 0);
    }
}
