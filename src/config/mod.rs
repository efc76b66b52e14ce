//! # Engine Configuration
//!
//! Every tunable of the world core lives in [`EngineConfig`]. The struct deserializes
//! from JSON with every field optional, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! { "world_size": 32, "seed": 7, "mutation": { "vein_mine_cap": 64 } }
//! ```

mod loader;

use std::path::Path;

use serde::Deserialize;

pub use loader::{load_config, ConfigError};

/// Top-level configuration for an [`EngineState`](crate::engine_state::EngineState).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the square world, in voxels. Columns span `0..world_size` on X and Z.
    pub world_size: i32,
    /// Side length of a chunk's horizontal footprint, in voxels.
    pub chunk_size: i32,
    /// Terrain seed. `None` picks a random seed per run.
    pub seed: Option<u32>,
    /// Number of background mesh workers.
    pub worker_count: usize,
    pub terrain: TerrainConfig,
    pub mesh: MeshConfig,
    pub culling: CullingConfig,
    pub mutation: MutationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Frequency the surface noise is sampled at.
    pub noise_frequency: f64,
    /// Multiplier applied to the noise sample before flooring to a height.
    pub height_scale: f64,
    /// Number of subsoil layers below the topsoil block.
    pub subsoil_depth: i32,
    /// Y of the unbreakable floor.
    pub bedrock_y: i32,
    pub coal_chance: f64,
    pub iron_chance: f64,
    pub diamond_chance: f64,
    /// Diamond ore only appears at or below this height.
    pub diamond_max_y: i32,
    pub tree_chance: f64,
    pub trunk_height_min: i32,
    pub trunk_height_max: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Lowest Y (inclusive) visited by the mesh walk.
    pub min_y: i32,
    /// Highest Y (exclusive) visited by the mesh walk.
    pub max_y: i32,
    /// Inset applied to every UV rectangle edge.
    pub uv_padding: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Chunks whose centre is further than this from the viewer are hidden.
    pub max_distance: f32,
    /// Chunks closer than this are always shown.
    pub always_visible_distance: f32,
    /// Chunks in between are shown while `dot(direction, forward)` stays above this.
    pub backward_cutoff: f32,
    /// Extra margin a visible chunk gets before it is hidden again.
    pub hysteresis: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Hard limit on how many blocks a single vein-mine can collect.
    pub vein_mine_cap: usize,
    /// Delay between consecutive breaks of a paced vein-mine chain.
    pub vein_mine_step_delay_ms: u64,
    pub leaf_decay_min_delay_secs: f64,
    pub leaf_decay_max_delay_secs: f64,
    /// Manhattan distance within which a trunk block keeps a leaf alive.
    pub leaf_support_distance: i32,
    /// Chance that breaking a leaf also produces a bonus drop.
    pub leaf_bonus_drop_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            world_size: 64,
            chunk_size: 16,
            seed: None,
            worker_count: 4,
            terrain: TerrainConfig::default(),
            mesh: MeshConfig::default(),
            culling: CullingConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            noise_frequency: 0.03,
            height_scale: 8.0,
            subsoil_depth: 3,
            bedrock_y: -12,
            coal_chance: 0.06,
            iron_chance: 0.03,
            diamond_chance: 0.01,
            diamond_max_y: -8,
            tree_chance: 0.02,
            trunk_height_min: 4,
            trunk_height_max: 5,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig {
            min_y: -12,
            max_y: 64,
            uv_padding: 0.001,
        }
    }
}

impl Default for CullingConfig {
    fn default() -> Self {
        CullingConfig {
            max_distance: 96.0,
            always_visible_distance: 24.0,
            backward_cutoff: -0.35,
            hysteresis: 0.1,
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        MutationConfig {
            vein_mine_cap: 128,
            vein_mine_step_delay_ms: 50,
            leaf_decay_min_delay_secs: 0.5,
            leaf_decay_max_delay_secs: 3.2,
            leaf_support_distance: 4,
            leaf_bonus_drop_chance: 0.05,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: EngineConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::Invalid(reason.to_string()));

        if self.world_size <= 0 {
            return invalid("world_size must be positive");
        }
        if self.chunk_size <= 0 {
            return invalid("chunk_size must be positive");
        }
        if self.worker_count == 0 {
            return invalid("worker_count must be at least 1");
        }
        if self.mesh.min_y >= self.mesh.max_y {
            return invalid("mesh.min_y must be below mesh.max_y");
        }
        if self.terrain.trunk_height_min > self.terrain.trunk_height_max
            || self.terrain.trunk_height_min < 1
        {
            return invalid("terrain trunk heights must satisfy 1 <= min <= max");
        }
        if self.mutation.vein_mine_cap == 0 {
            return invalid("mutation.vein_mine_cap must be at least 1");
        }
        if self.mutation.leaf_decay_min_delay_secs < 0.0
            || self.mutation.leaf_decay_min_delay_secs > self.mutation.leaf_decay_max_delay_secs
        {
            return invalid("leaf decay delays must satisfy 0 <= min <= max");
        }
        if self.culling.always_visible_distance > self.culling.max_distance {
            return invalid("culling.always_visible_distance must not exceed max_distance");
        }
        Ok(())
    }
}
