//! # Task Management System
//!
//! A fixed pool of worker threads that run [`Task`]s off the main thread and hand
//! their [`TaskResult`]s back through a single FIFO channel.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the workers, a queue of tasks waiting for a free worker,
//!   and the shared result receiver
//! - Each worker has a dedicated task channel and accepts at most
//!   [`MAX_TASKS_IN_FLIGHT`] tasks at a time
//! - A worker slot is freed only when its result is drained on the main thread, so
//!   results left in the channel by a bounded drain also hold back new dispatches
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to free workers round-robin, or queues them
//! 3. Workers process tasks and send the results back
//! 4. `process_completed_tasks()` applies up to a fixed number of results per call
//! 5. Follow-up tasks returned by results are published again
//!
//! A panic inside `Task::process()` is caught on the worker and turned into the
//! task's failure result; the worker keeps serving.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(4)?;
//! task_manager.publish_task(Box::new(MyTask::new()));
//!
//! // In the frame loop:
//! let updated = task_manager.process_completed_tasks(&mut chunks, 8);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use std::{
    any::Any,
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};
use task::{Task, TaskResult};

use super::voxels::chunk::{ChunkMap, ChunkPosition};

type CompletedTask = (usize, Box<dyn TaskResult + Send>);

/// A worker thread and the channel used to feed it.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    result_receiver: Receiver<CompletedTask>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn run_task(task: &dyn Task) -> Box<dyn TaskResult + Send> {
    match panic::catch_unwind(AssertUnwindSafe(|| task.process())) {
        Ok(result) => result,
        Err(payload) => task.fail(panic_reason(payload)),
    }
}

impl TaskManager {
    /// Creates a `TaskManager` with `num_workers` named worker threads.
    ///
    /// # Errors
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(num_workers: usize) -> std::io::Result<Self> {
        let (result_tx, result_rx) = channel::<CompletedTask>();
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let result_tx = result_tx.clone();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = run_task(task.as_ref());
                    if result_tx.send((worker_index, result)).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("mesh-worker-{worker_index}"))
                .spawn(task_closure)?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        info!(
            "Started {} mesh workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        Ok(TaskManager {
            channels,
            result_receiver: result_rx,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks handed to a worker whose result has not been handled yet.
    pub fn in_flight_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// `true` when nothing is queued, running or waiting to be handled.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was handed to the worker
    /// - `Err(task)` if the worker is gone, giving the task back for requeueing
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds a worker that can accept a task, round-robin from the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a task for execution.
    ///
    /// # Returns
    /// - `true` if the task was handed to a worker right away
    /// - `false` if it was queued because every worker is busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("Mesh worker {} is gone, queueing task", channel_idx);
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to free workers, oldest first, until one side runs out.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Applies up to `max_results` completed results to `chunks`.
    ///
    /// Results beyond the cap stay in the channel for the next call. Follow-up tasks
    /// produced by the handled results are published before returning.
    ///
    /// # Returns
    /// The chunks whose meshes were replaced, in the order their results were handled.
    pub fn process_completed_tasks(
        &mut self,
        chunks: &mut ChunkMap,
        max_results: usize,
    ) -> Vec<ChunkPosition> {
        let mut tasks_to_queue = Vec::new();
        let mut updated = Vec::new();

        for _ in 0..max_results {
            let Ok((worker_index, result)) = self.result_receiver.try_recv() else {
                break;
            };
            if let Some(channel) = self.channels.get_mut(worker_index) {
                channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
            }
            let outcome = result.handle_result(chunks);
            updated.extend(outcome.updated_chunk);
            tasks_to_queue.extend(outcome.follow_up);
        }

        if !tasks_to_queue.is_empty() {
            debug!("Publishing {} follow-up tasks", tasks_to_queue.len());
        }
        for task in tasks_to_queue {
            self.publish_task(task);
        }
        self.process_queued_tasks();

        updated
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for TaskChannel {
            task_sender, worker, ..
        } in self.channels.drain(..)
        {
            drop(task_sender);
            if worker.join().is_err() {
                warn!("Mesh worker exited with a panic");
            }
        }
    }
}
