//! Face-culling mesh walk for a single chunk.

use std::sync::Arc;

use cgmath::Point3;
use log::trace;

use crate::{
    error::MeshError,
    engine_state::{
        rendering::atlas::AtlasLayout,
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType, registry::BlockRegistry},
            chunk::ChunkPosition,
            store::VoxelStore,
        },
    },
};

use super::{
    face::Face,
    mesh_buffer::{ChunkMeshData, MeshLayer},
};

/// Decides whether the face of `current` that touches `neighbor` is drawn.
///
/// - Air (or the world edge) next to anything: drawn.
/// - Passable block: drawn unless the neighbor is the same block type.
/// - Solid block: drawn only against a passable neighbor.
pub fn should_draw_face(
    registry: &BlockRegistry,
    current: BlockType,
    neighbor: Option<BlockType>,
) -> bool {
    let Some(neighbor) = neighbor else {
        return true;
    };
    if registry.is_passable(current) {
        neighbor != current
    } else {
        registry.is_passable(neighbor)
    }
}

/// Builds chunk meshes from the voxel store.
///
/// Holds only immutable state, so one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct ChunkMesher {
    registry: Arc<BlockRegistry>,
    atlas: AtlasLayout,
    chunk_size: i32,
    min_y: i32,
    max_y: i32,
}

impl ChunkMesher {
    /// # Arguments
    /// * `registry` - Block metadata used for culling and atlas lookups
    /// * `atlas` - Geometry of the texture strip
    /// * `chunk_size` - Horizontal chunk footprint in voxels
    /// * `min_y`, `max_y` - Vertical range walked, `min_y` inclusive and `max_y` exclusive
    pub fn new(
        registry: Arc<BlockRegistry>,
        atlas: AtlasLayout,
        chunk_size: i32,
        min_y: i32,
        max_y: i32,
    ) -> Self {
        ChunkMesher {
            registry,
            atlas,
            chunk_size,
            min_y,
            max_y,
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Walks every voxel column of the chunk at `position` and emits its visible faces.
    ///
    /// Each face lands in the buffer of its own block's layer; the neighbour only
    /// decides whether it is drawn at all.
    pub fn mesh_chunk(
        &self,
        store: &VoxelStore,
        position: ChunkPosition,
    ) -> Result<ChunkMeshData, MeshError> {
        if self.min_y >= self.max_y {
            return Err(MeshError::EmptyVerticalRange {
                min: self.min_y,
                max: self.max_y,
            });
        }

        let mut mesh = ChunkMeshData::default();
        let origin_x = position.x * self.chunk_size;
        let origin_z = position.y * self.chunk_size;

        for x in origin_x..origin_x + self.chunk_size {
            for z in origin_z..origin_z + self.chunk_size {
                for y in self.min_y..self.max_y {
                    let voxel = Point3::new(x, y, z);
                    if let Some(block_type) = store.get(voxel) {
                        self.mesh_voxel(store, voxel, block_type, &mut mesh);
                    }
                }
            }
        }

        trace!(
            "Meshed chunk {:?}: {} solid faces, {} passable faces",
            position,
            mesh.solid.face_count(),
            mesh.passable.face_count()
        );
        Ok(mesh)
    }

    fn mesh_voxel(
        &self,
        store: &VoxelStore,
        voxel: Point3<i32>,
        block_type: BlockType,
        mesh: &mut ChunkMeshData,
    ) {
        let layer = if self.registry.is_passable(block_type) {
            MeshLayer::Passable
        } else {
            MeshLayer::Solid
        };

        for side in BlockSide::all() {
            let neighbor = store.get(voxel + side.normal());
            if !should_draw_face(&self.registry, block_type, neighbor) {
                continue;
            }
            let row = self.registry.atlas_face_index(block_type, side);
            mesh.layer_mut(layer)
                .push_face(&Face::new(voxel, side), self.atlas.uv_rect(row));
        }
    }
}
