//! # Engine State Module
//!
//! The world core behind one facade.
//!
//! ## Key Components
//!
//! * `EngineState` - owns every subsystem and exposes the narrow interface used by
//!   rendering, input, physics and audio glue
//! * `voxels` - block metadata, the voxel store, terrain generation and chunks
//! * `rendering` - atlas layout, chunk meshing and the chunk manager
//! * `task_management` - the background worker pool
//! * `camera_state` - viewer description and chunk visibility policy
//! * `mutation` - place, break, vein-mine and leaf decay
//!
//! ## Frame Loop
//!
//! The outer game loop drives the core once per frame, on one thread:
//!
//! ```no_run
//! use blockworld::{config::EngineConfig, engine_state::EngineState};
//! use cgmath::{Point3, Vector3};
//!
//! let mut engine = EngineState::new(EngineConfig::default())?;
//! loop {
//!     engine.tick_mesh_queue(8);
//!     engine.tick_leaf_decay(5);
//!     engine.tick_vein_mine();
//!     engine.cull_chunks(Point3::new(32.0, 10.0, 32.0), Vector3::unit_z());
//!     for event in engine.drain_events() {
//!         // spawn drops, play sounds...
//!     }
//! #   break;
//! }
//! # Ok::<(), blockworld::error::EngineError>(())
//! ```

use std::sync::Arc;

use camera_state::{Viewer, VisibilityPolicy};
use cgmath::{Point3, Rad, Vector3};
use log::info;
use mutation::{WorldEvent, WorldMutator};
use rendering::{atlas::AtlasLayout, meshing::ChunkMesher, ChunkManager};
use task_management::TaskManager;
use voxels::{
    block::{
        block_type::BlockType,
        item::ItemType,
        registry::{BlockRegistry, BreakTime},
    },
    chunk::ChunkPosition,
    store::{VoxelCoordinate, VoxelStore},
    terrain::TerrainGenerator,
};

use crate::{
    config::EngineConfig,
    core::{Clock, MtResource, SystemClock},
    error::EngineError,
};

pub mod camera_state;
pub mod mutation;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Boot options that are not part of the serialized configuration.
pub struct EngineOptions {
    /// Time source for leaf decay and paced vein-mines.
    pub clock: Arc<dyn Clock>,
    /// Fill the world with terrain before the first mesh pass. Tests that build their
    /// own scenes turn this off.
    pub generate_terrain: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            clock: Arc::new(SystemClock::new()),
            generate_terrain: true,
        }
    }
}

/// Counters for debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldStats {
    pub voxels: usize,
    pub chunks: usize,
    pub chunks_generating: usize,
    pub pending_meshes: usize,
    pub pending_decay_checks: usize,
    pub active_vein_mine_chains: usize,
}

/// The main state container for the world core.
pub struct EngineState {
    seed: u32,
    registry: Arc<BlockRegistry>,
    store: MtResource<VoxelStore>,
    chunk_manager: ChunkManager,
    mutator: WorldMutator,
}

impl EngineState {
    /// Boots a world with the wall clock and generated terrain.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_options(config, EngineOptions::default())
    }

    /// Boots a world.
    ///
    /// Validates `config`, generates terrain (unless disabled), starts the mesh
    /// workers and requests the first mesh of every populated chunk.
    ///
    /// # Errors
    /// - `EngineError::Config` if the configuration is invalid
    /// - `EngineError::WorkerSpawn` if a worker thread cannot be started
    pub fn with_options(config: EngineConfig, options: EngineOptions) -> Result<Self, EngineError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| fastrand::u32(..));
        let registry = Arc::new(BlockRegistry::standard());
        let store = MtResource::new(VoxelStore::new());

        if options.generate_terrain {
            let mut generator = TerrainGenerator::new(&config.terrain, config.world_size, seed);
            generator.generate(&mut store.get_mut());
        }

        let mesher = Arc::new(ChunkMesher::new(
            registry.clone(),
            AtlasLayout::standard(config.mesh.uv_padding),
            config.chunk_size,
            config.mesh.min_y,
            config.mesh.max_y,
        ));
        let task_manager =
            TaskManager::new(config.worker_count).map_err(EngineError::WorkerSpawn)?;
        let mut chunk_manager = ChunkManager::new(
            store.clone(),
            mesher,
            task_manager,
            VisibilityPolicy::new(&config.culling),
        );
        chunk_manager.ensure_chunks_for_populated_region();

        let mutator = WorldMutator::new(
            store.clone(),
            registry.clone(),
            config.mutation.clone(),
            options.clock,
            u64::from(seed).rotate_left(32) | u64::from(seed),
        );

        info!(
            "World ready: seed {}, {} voxels, {} chunks",
            seed,
            store.get().len(),
            chunk_manager.chunk_count()
        );

        Ok(EngineState {
            seed,
            registry,
            store,
            chunk_manager,
            mutator,
        })
    }

    /// The terrain seed this world was generated from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn chunk_manager(&self) -> &ChunkManager {
        &self.chunk_manager
    }

    /// Block at `coord`, `None` for air.
    pub fn query_block(&self, coord: VoxelCoordinate) -> Option<BlockType> {
        self.store.get().get(coord)
    }

    /// Places `block_type` at `coord` if it is empty. See [`WorldMutator::place_block`].
    pub fn place_block(&mut self, coord: VoxelCoordinate, block_type: BlockType) -> bool {
        self.mutator
            .place_block(coord, block_type, &mut self.chunk_manager)
    }

    /// Breaks the block at `coord`. See [`WorldMutator::break_block`].
    pub fn break_block(&mut self, coord: VoxelCoordinate) -> Option<ItemType> {
        self.mutator.break_block(coord, &mut self.chunk_manager)
    }

    /// Breaks the connected region of `block_type` at `origin` at once.
    pub fn vein_mine(&mut self, origin: VoxelCoordinate, block_type: BlockType) -> Vec<ItemType> {
        self.mutator
            .vein_mine(origin, block_type, &mut self.chunk_manager)
    }

    /// Starts a vein-mine that breaks one block per step on `tick_vein_mine`.
    pub fn start_vein_mine_chain(&mut self, origin: VoxelCoordinate, block_type: BlockType) -> usize {
        self.mutator.start_vein_mine_chain(origin, block_type)
    }

    pub fn tick_vein_mine(&mut self) -> usize {
        self.mutator.tick_vein_mine(&mut self.chunk_manager)
    }

    /// Runs up to `max_checks` due leaf-decay checks.
    pub fn tick_leaf_decay(&mut self, max_checks: usize) -> usize {
        self.mutator
            .tick_leaf_decay(max_checks, &mut self.chunk_manager)
    }

    /// Applies up to `max_results` finished chunk meshes.
    ///
    /// # Returns
    /// The chunks whose meshes changed.
    pub fn tick_mesh_queue(&mut self, max_results: usize) -> Vec<ChunkPosition> {
        self.chunk_manager.drain_mesh_results(max_results)
    }

    /// Asks for a fresh mesh of the chunk at `position`.
    pub fn request_remesh(&mut self, position: ChunkPosition) -> bool {
        self.chunk_manager.generate_mesh(position)
    }

    /// Re-evaluates chunk visibility for a viewer at `position` looking along `forward`.
    ///
    /// # Returns
    /// The chunks whose visibility flipped.
    pub fn cull_chunks(
        &mut self,
        position: Point3<f32>,
        forward: Vector3<f32>,
    ) -> Vec<(ChunkPosition, bool)> {
        self.chunk_manager
            .cull_chunks(&Viewer::new(position, forward))
    }

    /// Same as [`EngineState::cull_chunks`] for camera glue that tracks yaw and pitch
    /// instead of a forward vector.
    pub fn cull_chunks_yaw_pitch(
        &mut self,
        position: Point3<f32>,
        yaw: Rad<f32>,
        pitch: Rad<f32>,
    ) -> Vec<(ChunkPosition, bool)> {
        self.chunk_manager
            .cull_chunks(&Viewer::from_yaw_pitch(position, yaw, pitch))
    }

    pub fn unload_chunk(&mut self, position: ChunkPosition) -> bool {
        self.chunk_manager.unload_chunk(position)
    }

    /// Takes every world event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.mutator.drain_events()
    }

    /// How long breaking `block_type` takes with `held_tool` (`None` for bare hands).
    pub fn break_time(&self, block_type: BlockType, held_tool: Option<&str>) -> BreakTime {
        self.registry.break_time(block_type, held_tool)
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            voxels: self.store.get().len(),
            chunks: self.chunk_manager.chunk_count(),
            chunks_generating: self.chunk_manager.generating_count(),
            pending_meshes: self.chunk_manager.pending_mesh_count(),
            pending_decay_checks: self.mutator.pending_decay_checks(),
            active_vein_mine_chains: self.mutator.active_vein_mine_chains(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ConfigError, core::ManualClock};

    fn empty_world() -> EngineState {
        EngineState::with_options(
            EngineConfig {
                seed: Some(1),
                worker_count: 1,
                ..EngineConfig::default()
            },
            EngineOptions {
                clock: Arc::new(ManualClock::new()),
                generate_terrain: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            chunk_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            EngineState::new(config),
            Err(EngineError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn placing_outside_any_chunk_creates_one() {
        let mut engine = empty_world();
        assert_eq!(engine.stats().chunks, 0);
        assert!(engine.place_block(Point3::new(-3, 0, 40), BlockType::Glass));
        assert_eq!(engine.stats().chunks, 1);
        assert!(engine
            .chunk_manager()
            .chunk(ChunkPosition::new(-1, 2))
            .is_some());
    }

    #[test]
    fn break_time_goes_through_the_registry() {
        let engine = empty_world();
        assert_eq!(
            engine.break_time(BlockType::Bedrock, Some("diamond_pickaxe")),
            BreakTime::Unbreakable
        );
    }

    #[test]
    fn turning_away_hides_a_mid_range_chunk() {
        let mut engine = empty_world();
        assert!(engine.place_block(Point3::new(48, 0, 8), BlockType::Stone));
        let eye = Point3::new(8.0, 0.0, 8.0);

        let behind = engine.cull_chunks_yaw_pitch(eye, Rad(std::f32::consts::PI), Rad(0.0));
        assert_eq!(behind, vec![(ChunkPosition::new(3, 0), false)]);

        let ahead = engine.cull_chunks_yaw_pitch(eye, Rad(0.0), Rad(0.0));
        assert_eq!(ahead, vec![(ChunkPosition::new(3, 0), true)]);
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(empty_world().seed(), 1);
    }
}
