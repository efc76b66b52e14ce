//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: meshes one chunk from the shared voxel store

pub mod chunk_mesh_generation_task;

pub use chunk_mesh_generation_task::{ChunkMeshGenerationTask, ChunkMeshGenerationTaskResult};
