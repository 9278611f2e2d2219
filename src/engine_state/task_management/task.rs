//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//! - `TaskContext`: The main-thread state a result may update
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`, or `failed()` supplies one if it panicked
//! 4. The result's `handle_result()` is called on the main thread with a `TaskContext`
//! 5. The result can update the world or the mesh manager and spawn new tasks

use crate::engine_state::{rendering::MeshManager, voxels::world::World};

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks own everything they need, including shared handles to any chunks they
/// read, so they can be moved to a worker thread.
pub trait Task: Send {
    /// Processes the task on a worker thread and returns a result to be handled
    /// on the main thread.
    fn process(&self) -> Box<dyn TaskResult>;

    /// The result handed to the main thread when `process` panicked.
    ///
    /// Tasks that leave bookkeeping behind when they are published override this
    /// to undo it. The default does nothing.
    fn failed(&self) -> Box<dyn TaskResult> {
        Box::new(NoResult)
    }
}

/// A result with nothing to apply.
pub struct NoResult;

impl TaskResult for NoResult {
    fn handle_result(self: Box<Self>, _context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>> {
        Vec::new()
    }
}

/// Main-thread state handed to [`TaskResult::handle_result`].
pub struct TaskContext<'a> {
    /// Resident chunks and pending generation requests
    pub world: &'a mut World,
    /// Completed meshes and in-flight mesh builds
    pub mesh_manager: &'a mut MeshManager,
}

/// A trait representing the result of processing a `Task`.
pub trait TaskResult: Send {
    /// Handles the result of a completed task on the main thread.
    ///
    /// # Arguments
    /// * `context` - The world and mesh state the result may update
    ///
    /// # Returns
    /// New tasks to schedule (can be empty)
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task>>;
}
