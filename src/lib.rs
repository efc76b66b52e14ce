#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Blockworld
//!
//! The world core of a block-building game: a sparse voxel store, seeded terrain,
//! background chunk meshing with face culling and atlas UVs, and the mutation rules
//! (place, break, vein-mine, leaf decay) that keep block data and meshes consistent.
//!
//! Rendering, input, audio and UI are not part of this crate. They talk to the core
//! through [`engine_state::EngineState`]: block queries, edit calls, per-frame ticks
//! and a stream of [`WorldEvent`](engine_state::mutation::WorldEvent)s.
//!
//! ## Key Modules
//!
//! * `core` - Concurrency and timing primitives
//! * `config` - JSON-loadable engine configuration
//! * `error` - Error types
//! * `engine_state` - The world facade and every subsystem behind it
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> Result<(), blockworld::error::EngineError> {
//!     blockworld::run(None)
//! }
//! ```

use std::{path::Path, thread};

use cgmath::{Point3, Vector3};
use log::info;
use web_time::{Duration, Instant};

use config::EngineConfig;
use engine_state::EngineState;
use error::EngineError;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Target frame time of the headless loop.
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Finished meshes applied per frame.
const MESH_RESULTS_PER_FRAME: usize = 8;
/// Leaf-decay checks run per frame.
const DECAY_CHECKS_PER_FRAME: usize = 5;

/// Boots a world and runs a headless frame loop until every chunk has its first mesh.
///
/// # Arguments
/// * `config_path` - Optional JSON configuration; defaults are used without one
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or the engine fails to boot.
pub fn run(config_path: Option<&Path>) -> Result<(), EngineError> {
    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
    info!("Logger initialized");

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };

    let center = config.world_size as f32 / 2.0;
    let viewer_position = Point3::new(center, config.terrain.height_scale as f32 + 2.0, center);
    let mut engine = EngineState::new(config)?;

    let start = Instant::now();
    let mut frames = 0u64;
    loop {
        let frame_start = Instant::now();
        engine.tick_mesh_queue(MESH_RESULTS_PER_FRAME);
        engine.tick_leaf_decay(DECAY_CHECKS_PER_FRAME);
        engine.tick_vein_mine();
        engine.cull_chunks(viewer_position, Vector3::unit_z());
        engine.drain_events();
        frames += 1;

        if engine.chunk_manager().is_idle() {
            break;
        }
        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    info!(
        "Initial meshing finished after {} frames in {:?}: {:?}",
        frames,
        start.elapsed(),
        engine.stats()
    );
    Ok(())
}
