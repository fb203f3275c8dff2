//! # Task System Core Traits
//!
//! A `Task` is a unit of work moved onto a worker thread. Its `TaskResult` travels back to
//! the thread that owns the [`TaskManager`](super::TaskManager) and may schedule
//! follow-up tasks.
//!
//! ## Task Lifecycle
//! 1. A `Task` is published via `TaskManager::publish_task()`
//! 2. `process()` runs on a worker thread and consumes the task
//! 3. The returned `TaskResult` is sent back to the owning thread
//! 4. `handle_result()` runs there and returns any tasks to publish next

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they need. Shared data is reached through `Arc`s whose contents
/// are published by the task itself (see the chunk latches).
pub trait Task: Send {
    /// Runs the task. Consumes it, so borrowed neighbors and buffers are released as
    /// soon as the work is done.
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a `Task`, handled on the thread that owns the task manager.
pub trait TaskResult: Send {
    /// Returns the tasks to schedule next; may be empty.
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>>;
}
