//! # Task System Core Traits
//!
//! This module defines the building blocks of deferred work.
//!
//! ## Core Components
//! - `Task`: a unit of work run by `TaskManager::process_queued_tasks()`
//! - `TaskResult`: what a task produced; it may schedule follow-up tasks
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. When its turn comes, the task's `process()` method runs
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` runs immediately afterwards
//! 5. Any tasks it returns are appended to the back of the queue
//!
//! Everything runs on the simulation thread, so tasks may hold
//! [`StResource`](crate::core::StResource) handles to shared state.

/// A unit of deferred work.
///
/// Tasks own the handles they need. They should be coarse enough that one
/// tick's budget of them makes visible progress.
pub trait Task {
    /// Human readable name for logging.
    fn label(&self) -> String;

    /// Performs the work and returns its result.
    fn process(&self) -> Box<dyn TaskResult>;
}

/// The result of processing a `Task`.
pub trait TaskResult {
    /// Consumes the result and returns the tasks to schedule next (possibly none).
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>>;
}

/// A result with no follow-up work.
pub struct Done;

impl TaskResult for Done {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        Vec::new()
    }
}
