//! Render-side half of the world core.
//!
//! Everything here prepares data for a renderer without owning one: the atlas layout,
//! the vertex format, chunk meshing and the chunk map that schedules it. Uploading
//! `MeshBuffer` bytes to a GPU is left to the render glue.

pub mod atlas;
pub mod chunk_manager;
pub mod meshing;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use atlas::{AtlasLayout, UvRect};
pub use chunk_manager::ChunkManager;
pub use vertex::Vertex;
