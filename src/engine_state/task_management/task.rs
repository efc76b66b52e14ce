//! # Task System Core Traits
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult` (or `fail()` builds one if `process()` panicked)
//! 4. The result's `handle_result()` is called on the main thread
//! 5. The result can update chunk state and spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - Tasks only read shared state; all writes happen in `handle_result()`

use crate::engine_state::voxels::chunk::{ChunkMap, ChunkPosition};

/// A unit of work executed on a background worker.
///
/// Tasks own everything they need (shared handles included) and must not mutate
/// shared state.
pub trait Task: Send {
    /// Performs the work. Runs on a worker thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;

    /// Builds the result reported when `process()` panicked.
    ///
    /// # Arguments
    /// * `reason` - The panic message, if one could be extracted
    fn fail(&self, reason: String) -> Box<dyn TaskResult + Send>;
}

/// What handling a result changed.
#[derive(Default)]
pub struct TaskOutcome {
    /// Tasks to publish next.
    pub follow_up: Vec<Box<dyn Task + Send>>,
    /// Chunk whose meshes were replaced, if any.
    pub updated_chunk: Option<ChunkPosition>,
}

/// The result of processing a `Task`, applied on the main thread.
pub trait TaskResult: Send {
    /// Applies the result to the chunk map.
    ///
    /// Runs on the main thread; keep it cheap.
    fn handle_result(self: Box<Self>, chunks: &mut ChunkMap) -> TaskOutcome;
}
