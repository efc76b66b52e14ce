//! Task for generating mesh data for chunks in a background thread.
//!
//! The worker takes the voxel store's read lock for the duration of one walk and
//! builds both layers into private buffers. Nothing shared is written until the
//! result is handled on the main thread.

use std::sync::Arc;

use log::{debug, error};

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::{ChunkMeshData, ChunkMesher},
        task_management::task::{Task, TaskOutcome, TaskResult},
        voxels::{
            chunk::{ChunkMap, ChunkPosition},
            store::VoxelStore,
        },
    },
    error::MeshError,
};

/// Meshes one chunk from the shared voxel store.
#[derive(Clone)]
pub struct ChunkMeshGenerationTask {
    position: ChunkPosition,
    /// Instance id of the chunk the walk was started for.
    instance: u64,
    store: MtResource<VoxelStore>,
    mesher: Arc<ChunkMesher>,
}

impl ChunkMeshGenerationTask {
    pub fn new(
        position: ChunkPosition,
        instance: u64,
        store: MtResource<VoxelStore>,
        mesher: Arc<ChunkMesher>,
    ) -> Self {
        ChunkMeshGenerationTask {
            position,
            instance,
            store,
            mesher,
        }
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    fn finish(&self, outcome: Result<ChunkMeshData, MeshError>) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkMeshGenerationTaskResult {
            task: self.clone(),
            outcome,
        })
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let outcome = match self.store.try_read() {
            Ok(store) => self.mesher.mesh_chunk(&store, self.position),
            Err(_) => Err(MeshError::StorePoisoned),
        };
        self.finish(outcome)
    }

    fn fail(&self, reason: String) -> Box<dyn TaskResult + Send> {
        self.finish(Err(MeshError::WorkerPanicked {
            chunk: self.position,
            reason,
        }))
    }
}

/// The outcome of one mesh walk, plus what is needed to dispatch another.
pub struct ChunkMeshGenerationTaskResult {
    task: ChunkMeshGenerationTask,
    outcome: Result<ChunkMeshData, MeshError>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Installs the new meshes and releases the chunk's generation flag.
    ///
    /// On failure the chunk keeps its previous meshes. In both cases a remesh that was
    /// requested during the walk is returned as a follow-up task. A result for a chunk
    /// that was unloaded, or unloaded and created again, is dropped untouched.
    fn handle_result(self: Box<Self>, chunks: &mut ChunkMap) -> TaskOutcome {
        let position = self.task.position;
        let Some(chunk) = chunks
            .get_mut(&position)
            .filter(|chunk| chunk.instance() == self.task.instance)
        else {
            debug!("Dropping mesh for unloaded chunk {:?}", position);
            return TaskOutcome::default();
        };

        let updated_chunk = match self.outcome {
            Ok(mesh) => {
                chunk.apply_mesh(mesh);
                Some(position)
            }
            Err(err) => {
                error!("Mesh generation failed for chunk {:?}: {}", position, err);
                None
            }
        };

        let mut follow_up: Vec<Box<dyn Task + Send>> = Vec::new();
        if chunk.finish_generation() && chunk.begin_generation() {
            follow_up.push(Box::new(self.task));
        }

        TaskOutcome {
            follow_up,
            updated_chunk,
        }
    }
}
