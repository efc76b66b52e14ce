//! Error types shared across the engine.

use cgmath::Point2;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures that can stop an engine from booting.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to spawn mesh worker: {0}")]
    WorkerSpawn(std::io::Error),
}

/// Why a background mesh walk produced no mesh.
///
/// These never reach callers of the engine. The chunk that requested the walk logs
/// the error, clears its generation flag and keeps its previous mesh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("voxel store lock was poisoned")]
    StorePoisoned,
    #[error("empty vertical mesh range {min}..{max}")]
    EmptyVerticalRange { min: i32, max: i32 },
    #[error("mesh worker panicked while meshing chunk {chunk:?}: {reason}")]
    WorkerPanicked { chunk: Point2<i32>, reason: String },
}
