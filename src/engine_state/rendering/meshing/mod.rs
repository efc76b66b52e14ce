//! Conversion of voxel data into renderable chunk meshes.
//!
//! # Architecture
//! - `ChunkMesher`: walks one chunk and applies the face-culling rule
//! - `Face`: fixed four-corner template per block side
//! - `MeshBuffer`: triangle-list output for one render layer
//!
//! Every visible face becomes two triangles; there is no merging of coplanar faces.
//! Meshes are built in world space so chunks need no per-draw transform.

mod face;
mod mesh_buffer;
mod mesher;

pub use face::Face;
pub use mesh_buffer::{ChunkMeshData, MeshBuffer, MeshLayer};
pub use mesher::{should_draw_face, ChunkMesher};
