//! # Terrain Generation
//!
//! Populates the voxel store once, before any chunk is meshed.
//!
//! ## Algorithm
//!
//! For every column (x, z) of the square world:
//! 1. Sample 2D Perlin noise at `(x, z) * noise_frequency`, scale it by `height_scale`
//!    and floor it to get the surface height.
//! 2. Write grass at the surface and a few layers of dirt beneath it.
//! 3. Fill down to the bedrock floor with stone, replacing individual voxels with ore
//!    by independent random draws (diamond only below `diamond_max_y`).
//! 4. Write bedrock at `bedrock_y`.
//!
//! A second pass plants trees on a small fraction of the non-border columns: a log
//! trunk topped with a leaf canopy that narrows as it goes up and skips its corners.
//!
//! Output is a pure function of the seed, so a world can be reproduced exactly.

use cgmath::Point3;
use log::{debug, info};
use noise::{NoiseFn, Perlin};
use web_time::Instant;

use crate::config::TerrainConfig;

use super::{block::block_type::BlockType, store::VoxelStore};

/// Canopy layers as (height relative to the trunk top, radius), bottom to top.
const CANOPY_LAYERS: [(i32, i32); 4] = [(-1, 2), (0, 2), (1, 1), (2, 1)];

/// Counters reported after generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainSummary {
    pub columns: usize,
    pub trees: usize,
    pub voxels: usize,
}

/// Seeded height-map terrain generator.
pub struct TerrainGenerator {
    config: TerrainConfig,
    world_size: i32,
    seed: u32,
    perlin: Perlin,
    rng: fastrand::Rng,
}

impl TerrainGenerator {
    /// Creates a generator for a `world_size` x `world_size` world.
    ///
    /// # Arguments
    /// * `config` - Terrain tunables
    /// * `world_size` - Side length of the world; columns span `0..world_size`
    /// * `seed` - Seeds both the height noise and the ore/tree draws
    pub fn new(config: &TerrainConfig, world_size: i32, seed: u32) -> Self {
        TerrainGenerator {
            config: config.clone(),
            world_size,
            seed,
            perlin: Perlin::new(seed),
            rng: fastrand::Rng::with_seed(seed as u64),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Surface height of the column at (`x`, `z`).
    ///
    /// Never lower than one voxel above the bedrock floor.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.perlin.get([
            x as f64 * self.config.noise_frequency,
            z as f64 * self.config.noise_frequency,
        ]);
        let height = (sample * self.config.height_scale).floor() as i32;
        height.max(self.config.bedrock_y + 1)
    }

    /// Fills `store` with the whole world.
    pub fn generate(&mut self, store: &mut VoxelStore) -> TerrainSummary {
        let start = Instant::now();
        let size = self.world_size;
        let mut heights = Vec::with_capacity((size * size) as usize);

        for x in 0..size {
            for z in 0..size {
                let surface = self.surface_height(x, z);
                self.fill_column(store, x, z, surface);
                heights.push(surface);
            }
        }

        let mut trees = 0;
        for x in 2..size - 2 {
            for z in 2..size - 2 {
                if self.rng.f64() < self.config.tree_chance {
                    let surface = heights[(x * size + z) as usize];
                    self.plant_tree(store, Point3::new(x, surface, z));
                    trees += 1;
                }
            }
        }

        let summary = TerrainSummary {
            columns: heights.len(),
            trees,
            voxels: store.len(),
        };
        info!(
            "Generated terrain for seed {}: {} columns, {} trees, {} voxels in {:?}",
            self.seed,
            summary.columns,
            summary.trees,
            summary.voxels,
            start.elapsed()
        );
        summary
    }

    fn fill_column(&mut self, store: &mut VoxelStore, x: i32, z: i32, surface: i32) {
        let bedrock_y = self.config.bedrock_y;
        let subsoil_bottom = (surface - self.config.subsoil_depth).max(bedrock_y + 1);

        store.set(Point3::new(x, surface, z), BlockType::Grass);
        for y in subsoil_bottom..surface {
            store.set(Point3::new(x, y, z), BlockType::Dirt);
        }
        for y in bedrock_y + 1..subsoil_bottom {
            let block_type = self.underground_block(y);
            store.set(Point3::new(x, y, z), block_type);
        }
        store.set(Point3::new(x, bedrock_y, z), BlockType::Bedrock);
    }

    fn underground_block(&mut self, y: i32) -> BlockType {
        if y <= self.config.diamond_max_y && self.rng.f64() < self.config.diamond_chance {
            BlockType::DiamondOre
        } else if self.rng.f64() < self.config.iron_chance {
            BlockType::IronOre
        } else if self.rng.f64() < self.config.coal_chance {
            BlockType::CoalOre
        } else {
            BlockType::Stone
        }
    }

    /// Plants a tree whose trunk starts directly above `surface`.
    fn plant_tree(&mut self, store: &mut VoxelStore, surface: Point3<i32>) {
        let trunk_height = self
            .rng
            .i32(self.config.trunk_height_min..=self.config.trunk_height_max);
        let top = surface.y + trunk_height;

        for y in surface.y + 1..=top {
            store.set(Point3::new(surface.x, y, surface.z), BlockType::Log);
        }

        for (dy, radius) in CANOPY_LAYERS {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if dx.abs() == radius && dz.abs() == radius {
                        continue;
                    }
                    let leaf = Point3::new(surface.x + dx, top + dy, surface.z + dz);
                    if !store.contains(leaf) {
                        store.set(leaf, BlockType::Leaves);
                    }
                }
            }
        }
        debug!("Planted tree at {:?} with trunk height {}", surface, trunk_height);
    }
}
