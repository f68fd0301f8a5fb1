//! # Task Management System
//!
//! Deferred, budgeted execution of work on the simulation thread.
//!
//! World generation is split into many small tasks so that no single tick has
//! to build the whole world. Each tick the session asks the manager to run at
//! most `tasks_per_tick` of them, oldest first.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()` and queued FIFO
//! 2. `process_queued_tasks()` pops up to the budget and runs each one
//! 3. Each result may return follow-up tasks, which join the back of the queue
//! 4. The cycle continues until the queue is empty
//!
//! Because follow-ups queue behind everything already published, a task that
//! schedules follow-ups gets a second pass that runs after all of its peers.
//!
//! ## Cancellation
//! There is none beyond `clear()`: a task that has started always finishes,
//! and clearing only drops what has not started yet.
//!
//! ## Example Usage
//! ```rust
//! use voxel_sandbox::engine_state::task_management::{
//!     task::{Done, Task, TaskResult},
//!     TaskManager,
//! };
//!
//! struct Hello;
//!
//! impl Task for Hello {
//!     fn label(&self) -> String {
//!         "hello".to_string()
//!     }
//!
//!     fn process(&self) -> Box<dyn TaskResult> {
//!         Box::new(Done)
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(4);
//! task_manager.publish_task(Box::new(Hello));
//!
//! // In your game loop:
//! task_manager.process_queued_tasks();
//! assert!(task_manager.is_idle());
//! ```

pub mod task;

use std::collections::VecDeque;

use log::trace;
use task::Task;

/// FIFO queue of deferred tasks with a per-tick budget.
pub struct TaskManager {
    queued_tasks: VecDeque<Box<dyn Task>>,
    tasks_per_tick: usize,
}

impl TaskManager {
    /// Creates an empty manager that runs at most `tasks_per_tick` tasks per
    /// call to `process_queued_tasks`. A budget of zero is treated as one.
    pub fn new(tasks_per_tick: usize) -> Self {
        TaskManager {
            queued_tasks: VecDeque::new(),
            tasks_per_tick: tasks_per_tick.max(1),
        }
    }

    /// Appends a task to the back of the queue.
    pub fn publish_task(&mut self, task: Box<dyn Task>) {
        self.queued_tasks.push_back(task);
    }

    /// Runs up to one tick's budget of queued tasks, oldest first, and queues
    /// their follow-ups. Returns how many tasks ran.
    pub fn process_queued_tasks(&mut self) -> usize {
        let mut processed = 0;
        while processed < self.tasks_per_tick {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            self.run(task);
            processed += 1;
        }
        processed
    }

    /// Runs every queued task, including follow-ups, until the queue is empty.
    /// Returns how many tasks ran.
    pub fn run_to_completion(&mut self) -> usize {
        let mut processed = 0;
        while let Some(task) = self.queued_tasks.pop_front() {
            self.run(task);
            processed += 1;
        }
        processed
    }

    /// Drops every task that has not started.
    pub fn clear(&mut self) {
        self.queued_tasks.clear();
    }

    /// Whether nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.queued_tasks.len()
    }

    fn run(&mut self, task: Box<dyn Task>) {
        trace!("Running task {}", task.label());
        let follow_ups = task.process().handle_result();
        self.queued_tasks.extend(follow_ups);
    }
}
