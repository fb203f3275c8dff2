//! # Task Management System
//!
//! A small worker pool for the chunk pipeline. Terrain generation and detail resolution
//! of each chunk are published as tasks; the pool spreads them over worker threads and
//! hands the results back to the owning thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the workers and the queue of tasks waiting for one
//! - `Task` / `TaskResult`: see [`task`]
//! - `TaskChannel`: the pair of channels between the manager and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to free workers round-robin, queueing the rest
//! 3. Workers process tasks and send back results
//! 4. `process_completed_tasks()` handles results on the owning thread
//! 5. Results may publish new tasks
//!
//! ## Example Usage
//! ```
//! use voxel_world::engine_state::task_management::{task::{Task, TaskResult}, TaskManager};
//!
//! struct Double(u32);
//! struct Doubled;
//!
//! impl Task for Double {
//!     fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
//!         assert_eq!(self.0 * 2, 42);
//!         Box::new(Doubled)
//!     }
//! }
//!
//! impl TaskResult for Doubled {
//!     fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! task_manager.publish_task(Box::new(Double(21)));
//! while !task_manager.is_idle() {
//!     task_manager.process_completed_tasks();
//!     task_manager.process_queued_tasks();
//! }
//! ```

pub mod task;

use log::{debug, error, info};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::{Task, TaskResult};

/// A communication channel between the manager and one worker thread.
///
/// Dropping the channel closes the task sender, which ends the worker's loop.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Not shared between threads: the owning thread publishes tasks and polls results.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Stands in for the result of a task that panicked, so the worker's in-flight count
/// still drops.
struct PanickedTask;

impl TaskResult for PanickedTask {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        Vec::new()
    }
}

/// Maximum number of tasks in flight per worker channel.
///
/// Keeping this at 1 leaves the remaining work in the manager's queue, where any worker
/// that frees up can take it.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a manager with `num_workers` worker threads.
    ///
    /// With zero workers, tasks only ever queue; useful for driving a pipeline by hand.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting {num_workers} task workers, available parallelism: {:?}",
            thread::available_parallelism()
        );
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| task.process()))
                        .unwrap_or_else(|_| -> Box<dyn TaskResult + Send> {
                            error!("A task panicked, its result is dropped");
                            Box::new(PanickedTask)
                        });
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// A manager with one worker per available core.
    pub fn with_available_parallelism() -> Self {
        Self::new(thread::available_parallelism().map_or(1, |n| n.get()))
    }

    /// Sends a task to one worker, handing it back if the worker is gone.
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

    /// The next channel below `MAX_TASKS_IN_FLIGHT`, searching round-robin from the last
    /// one used.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a task. Returns `true` if a worker took it immediately, `false` if it was
    /// queued.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
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

    /// Hands queued tasks, oldest first, to workers that are free.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Worker is gone; keep the task and stop.
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles every result received so far and publishes the tasks they return.
    ///
    /// Returns the number of results handled.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                tasks_to_queue.extend(result.handle_result());
                handled += 1;
            }
        }

        if !tasks_to_queue.is_empty() {
            debug!("Results scheduled {} follow-up tasks", tasks_to_queue.len());
        }
        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Runs every queued task on the calling thread, including the tasks their results
    /// schedule. Used when the manager has no workers.
    pub fn run_queued_inline(&mut self) -> usize {
        let mut handled = 0;
        while let Some(task) = self.queued_tasks.pop_front() {
            self.queued_tasks.extend(task.process().handle_result());
            handled += 1;
        }
        handled
    }

    /// Number of tasks currently running on workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether nothing is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.tasks_in_flight() == 0 && self.queued_tasks.is_empty()
    }
}
