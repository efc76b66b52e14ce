//! # Chunk Module
//!
//! A chunk is a fixed-size horizontal column region of the world used as the unit of
//! mesh (re)generation and culling. It does not own any block data; the voxels inside
//! its footprint stay in the [`VoxelStore`](super::store::VoxelStore). What a chunk
//! owns is the derived geometry:
//!
//! - a solid mesh (opaque, single-sided)
//! - a passable mesh (transparent, double-sided)
//! - the bookkeeping that keeps at most one background mesh walk in flight
//!
//! ## Generation Lifecycle
//!
//! 1. `begin_generation()` flips the in-progress flag. If a walk is already in flight
//!    the request is remembered instead and the call reports that nothing was started.
//! 2. A background worker meshes the chunk and queues the result.
//! 3. The main thread applies the result with `apply_mesh()` (or drops it on failure)
//!    and calls `finish_generation()`, which reports whether a request arrived while
//!    the walk was running so it can be dispatched again.
//!
//! Every chunk also carries an instance id. A chunk that is unloaded and created
//! again at the same position gets a new id, so a walk started for the old chunk
//! can be told apart from one started for the new one.

use std::collections::HashMap;

use cgmath::{Point2, Point3};

use crate::engine_state::rendering::meshing::{ChunkMeshData, MeshBuffer, MeshLayer};

/// Position of a chunk in chunk coordinates (X, Z).
pub type ChunkPosition = Point2<i32>;

/// All live chunks, keyed by position.
pub type ChunkMap = HashMap<ChunkPosition, Chunk>;

/// Returns the chunk containing the voxel column at (`x`, `z`).
///
/// Uses floor division so negative coordinates land in negative chunks.
pub fn chunk_position_of(x: i32, z: i32, chunk_size: i32) -> ChunkPosition {
    Point2::new(x.div_euclid(chunk_size), z.div_euclid(chunk_size))
}

/// Position of the voxel column (`x`, `z`) inside its chunk, both in `0..chunk_size`.
pub fn local_column_of(x: i32, z: i32, chunk_size: i32) -> Point2<i32> {
    Point2::new(x.rem_euclid(chunk_size), z.rem_euclid(chunk_size))
}

/// A chunk's derived render state.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkPosition,
    instance: u64,
    solid_mesh: MeshBuffer,
    passable_mesh: MeshBuffer,
    generating: bool,
    remesh_requested: bool,
    visible: bool,
    /// Number of meshes applied so far. Render glue compares it to decide what to
    /// re-upload.
    mesh_revision: u64,
}

impl Chunk {
    /// Creates a chunk with empty meshes, visible and not generating.
    pub fn new(position: ChunkPosition) -> Self {
        Self::with_instance(position, 0)
    }

    /// Creates a chunk tagged with `instance`, which mesh results must match to be
    /// applied.
    pub fn with_instance(position: ChunkPosition, instance: u64) -> Self {
        Chunk {
            position,
            instance,
            solid_mesh: MeshBuffer::new(MeshLayer::Solid),
            passable_mesh: MeshBuffer::new(MeshLayer::Passable),
            generating: false,
            remesh_requested: false,
            visible: true,
            mesh_revision: 0,
        }
    }

    /// World-space voxel coordinate of this chunk's minimum corner at height `y`.
    pub fn origin(&self, chunk_size: i32, y: i32) -> Point3<i32> {
        Point3::new(self.position.x * chunk_size, y, self.position.y * chunk_size)
    }

    /// Marks a background walk as started.
    ///
    /// # Returns
    /// - `true` if the caller should dispatch a walk now
    /// - `false` if one is already in flight; the request is recorded so that
    ///   `finish_generation()` can ask for another pass
    pub fn begin_generation(&mut self) -> bool {
        if self.generating {
            self.remesh_requested = true;
            return false;
        }
        self.generating = true;
        true
    }

    /// Clears the in-progress flag after a walk's result (or failure) was handled.
    ///
    /// # Returns
    /// `true` if another walk was requested while this one ran.
    pub fn finish_generation(&mut self) -> bool {
        self.generating = false;
        std::mem::take(&mut self.remesh_requested)
    }

    /// Replaces both meshes with freshly generated ones.
    pub fn apply_mesh(&mut self, mesh: ChunkMeshData) {
        self.solid_mesh = mesh.solid;
        self.passable_mesh = mesh.passable;
        self.mesh_revision += 1;
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn solid_mesh(&self) -> &MeshBuffer {
        &self.solid_mesh
    }

    pub fn passable_mesh(&self) -> &MeshBuffer {
        &self.passable_mesh
    }

    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the chunk.
    ///
    /// # Returns
    /// `true` if visibility changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_positions_floor_negative_coordinates() {
        assert_eq!(chunk_position_of(0, 0, 16), Point2::new(0, 0));
        assert_eq!(chunk_position_of(15, 16, 16), Point2::new(0, 1));
        assert_eq!(chunk_position_of(-1, -16, 16), Point2::new(-1, -1));
        assert_eq!(chunk_position_of(-17, 5, 16), Point2::new(-2, 0));
        assert_eq!(local_column_of(-1, 17, 16), Point2::new(15, 1));
    }

    #[test]
    fn second_begin_is_remembered_not_started() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        assert!(chunk.begin_generation());
        assert!(!chunk.begin_generation());
        assert!(!chunk.begin_generation());
        assert!(chunk.finish_generation());
        assert!(!chunk.is_generating());
        // The remembered request is consumed once.
        assert!(chunk.begin_generation());
        assert!(!chunk.finish_generation());
    }

    #[test]
    fn applying_a_mesh_bumps_the_revision() {
        let mut chunk = Chunk::new(Point2::new(2, -3));
        chunk.apply_mesh(ChunkMeshData::default());
        assert_eq!(chunk.mesh_revision(), 1);
        assert_eq!(chunk.origin(16, 5), Point3::new(32, 5, -48));
    }

    #[test]
    fn visibility_reports_changes() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        assert!(!chunk.set_visible(true));
        assert!(chunk.set_visible(false));
        assert!(!chunk.is_visible());
    }
}
