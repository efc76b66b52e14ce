//! # Voxel World Data
//!
//! The data side of the world core.
//!
//! ## Architecture
//!
//! * **Block**: block types, their registry metadata, tools and drops
//! * **Store**: the sparse coordinate → block map every other system reads
//! * **Terrain**: one-shot seeded population of the store
//! * **Chunk**: the horizontal partition used as the unit of meshing and culling
//!
//! ## Data Flow
//!
//! 1. Terrain generation fills the store once at startup
//! 2. Chunks are created for every populated region and meshed in the background
//! 3. Mutations write the store on the main thread and ask the touched chunks to remesh
//!
//! ## Thread Safety
//!
//! The store lives behind an [`MtResource`](crate::core::MtResource). The main thread
//! is the only writer; mesh workers only take the read side.

pub mod block;
pub mod chunk;
pub mod store;
pub mod terrain;
