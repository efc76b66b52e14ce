//! # Chunk Manager
//!
//! Owns every [`Chunk`] and drives its mesh through the background worker pool.
//!
//! ## Frame Flow
//! 1. Edits call [`ChunkManager::update_chunk_and_neighbors`], which marks the chunk
//!    under the edit (and any neighbour sharing the edited boundary column) for a
//!    fresh mesh walk.
//! 2. Workers mesh the chunks from the shared voxel store.
//! 3. [`ChunkManager::drain_mesh_results`] applies at most a fixed number of
//!    finished meshes per frame. This is the only place chunk meshes change.
//! 4. [`ChunkManager::cull_chunks`] toggles visibility. It never drops mesh data.

use std::{collections::HashSet, sync::Arc};

use cgmath::Point3;
use log::{info, trace};

use crate::{
    core::MtResource,
    engine_state::{
        camera_state::{Viewer, VisibilityPolicy},
        mutation::RemeshTrigger,
        task_management::TaskManager,
        voxels::{
            chunk::{chunk_position_of, local_column_of, Chunk, ChunkMap, ChunkPosition},
            store::VoxelStore,
        },
    },
};

use super::{meshing::ChunkMesher, tasks::ChunkMeshGenerationTask};

/// The `{chunk position -> Chunk}` map and its meshing pipeline.
pub struct ChunkManager {
    chunks: ChunkMap,
    task_manager: TaskManager,
    store: MtResource<VoxelStore>,
    mesher: Arc<ChunkMesher>,
    visibility: VisibilityPolicy,
    next_instance: u64,
}

impl ChunkManager {
    pub fn new(
        store: MtResource<VoxelStore>,
        mesher: Arc<ChunkMesher>,
        task_manager: TaskManager,
        visibility: VisibilityPolicy,
    ) -> Self {
        ChunkManager {
            chunks: ChunkMap::new(),
            task_manager,
            store,
            mesher,
            visibility,
            next_instance: 0,
        }
    }

    fn chunk_size(&self) -> i32 {
        self.mesher.chunk_size()
    }

    /// Creates a chunk for every chunk position that holds at least one voxel and
    /// starts its first mesh walk.
    ///
    /// # Returns
    /// How many chunks were created.
    pub fn ensure_chunks_for_populated_region(&mut self) -> usize {
        let chunk_size = self.chunk_size();
        let populated: HashSet<ChunkPosition> = self
            .store
            .get()
            .coordinates()
            .map(|coord| chunk_position_of(coord.x, coord.z, chunk_size))
            .collect();

        let created = populated
            .into_iter()
            .filter(|position| self.ensure_chunk(*position))
            .count();
        info!("Created {} chunks for the populated region", created);
        created
    }

    /// Creates the chunk at `position` if it does not exist yet and starts meshing it.
    ///
    /// # Returns
    /// `true` if a new chunk was created.
    pub fn ensure_chunk(&mut self, position: ChunkPosition) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        self.next_instance += 1;
        self.chunks
            .insert(position, Chunk::with_instance(position, self.next_instance));
        self.generate_mesh(position);
        true
    }

    /// Requests a fresh mesh for the chunk at `position`.
    ///
    /// If a walk for the chunk is already running, the request is remembered and a new
    /// walk starts as soon as the running one lands.
    ///
    /// # Returns
    /// `true` if a walk was dispatched (or queued for a worker) by this call.
    pub fn generate_mesh(&mut self, position: ChunkPosition) -> bool {
        let Some(chunk) = self.chunks.get_mut(&position) else {
            return false;
        };
        if !chunk.begin_generation() {
            trace!("Chunk {:?} is already meshing, remesh deferred", position);
            return false;
        }
        let task = ChunkMeshGenerationTask::new(
            position,
            chunk.instance(),
            self.store.clone(),
            self.mesher.clone(),
        );
        self.task_manager.publish_task(Box::new(task));
        true
    }

    /// Remeshes the chunk containing voxel column (`x`, `z`) and every existing neighbour
    /// chunk whose border touches that column.
    ///
    /// The chunk under the edit is created if it does not exist yet.
    ///
    /// # Returns
    /// The chunk positions that were asked to remesh.
    pub fn update_chunk_and_neighbors(&mut self, x: i32, z: i32) -> Vec<ChunkPosition> {
        let chunk_size = self.chunk_size();
        let position = chunk_position_of(x, z, chunk_size);
        let local = local_column_of(x, z, chunk_size);

        let mut affected = vec![position];
        if local.x == 0 {
            affected.push(ChunkPosition::new(position.x - 1, position.y));
        }
        if local.x == chunk_size - 1 {
            affected.push(ChunkPosition::new(position.x + 1, position.y));
        }
        if local.y == 0 {
            affected.push(ChunkPosition::new(position.x, position.y - 1));
        }
        if local.y == chunk_size - 1 {
            affected.push(ChunkPosition::new(position.x, position.y + 1));
        }
        affected.dedup();

        if !self.ensure_chunk(position) {
            self.generate_mesh(position);
        }
        for neighbor in &affected[1..] {
            if self.chunks.contains_key(neighbor) {
                self.generate_mesh(*neighbor);
            }
        }
        affected
    }

    /// Applies up to `max_results` finished meshes. Call once per frame on the main
    /// thread.
    ///
    /// # Returns
    /// The chunks whose meshes changed, for the render glue to re-upload.
    pub fn drain_mesh_results(&mut self, max_results: usize) -> Vec<ChunkPosition> {
        self.task_manager
            .process_completed_tasks(&mut self.chunks, max_results)
    }

    /// Re-evaluates the visibility of every chunk against `viewer`.
    ///
    /// Distances are measured horizontally from the viewer to the chunk centre.
    ///
    /// # Returns
    /// The chunks whose visibility flipped, with their new visibility.
    pub fn cull_chunks(&mut self, viewer: &Viewer) -> Vec<(ChunkPosition, bool)> {
        let half = self.chunk_size() as f32 / 2.0;
        let chunk_size = self.chunk_size() as f32;
        let mut changes = Vec::new();

        for (position, chunk) in self.chunks.iter_mut() {
            let center = Point3::new(
                position.x as f32 * chunk_size + half,
                viewer.position.y,
                position.y as f32 * chunk_size + half,
            );
            let visible = self
                .visibility
                .is_visible(viewer, center, chunk.is_visible());
            if chunk.set_visible(visible) {
                changes.push((*position, visible));
            }
        }

        if !changes.is_empty() {
            trace!("Culling flipped visibility of {} chunks", changes.len());
        }
        changes
    }

    /// Forgets the chunk at `position`. A walk still running for it is discarded when
    /// it lands.
    pub fn unload_chunk(&mut self, position: ChunkPosition) -> bool {
        self.chunks.remove(&position).is_some()
    }

    pub fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks with a walk in flight.
    pub fn generating_count(&self) -> usize {
        self.chunks
            .values()
            .filter(|chunk| chunk.is_generating())
            .count()
    }

    /// Mesh walks queued, running or waiting to be applied.
    pub fn pending_mesh_count(&self) -> usize {
        self.task_manager.queued_count() + self.task_manager.in_flight_count()
    }

    /// `true` once every requested mesh has been applied.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle()
    }
}

impl RemeshTrigger for ChunkManager {
    fn update_chunk_and_neighbors(&mut self, x: i32, z: i32) {
        ChunkManager::update_chunk_and_neighbors(self, x, z);
    }
}
