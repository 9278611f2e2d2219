//! # Task Management System
//!
//! This module provides a task management system for executing work
//! asynchronously across a pool of worker threads.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the main thread and worker threads
//!
//! Each worker is a `std::thread` with a dedicated pair of MPSC channels: one
//! carrying tasks to the worker and one carrying results back.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks asynchronously and return results
//! 4. Results are processed on the main thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks, which are published in turn
//! 6. The cycle continues until all work is complete
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(num_workers);
//!
//! // Publish a task for background processing
//! task_manager.publish_task(Box::new(MyTask::new(...)));
//!
//! // In your main/game loop:
//! task_manager.process_completed_tasks(&mut context);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{error, info, trace, warn};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

pub use task::{Task, TaskContext, TaskResult};

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `disconnected`: Set once the worker has gone away; the channel is skipped from then on
/// - `_worker`: Handle to the worker thread
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    result_receiver: Receiver<Box<dyn TaskResult>>,
    num_tasks_in_flight: usize,
    disconnected: bool,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting and processing task results
/// - Handling task queuing when all workers are busy
///
/// Workers exit when the manager is dropped and their task channel closes. A
/// task that panics does not take its worker down; its `Task::failed` result is
/// handled instead.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 to ensure tasks are processed in order within each channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create, typically the number of CPU cores
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} workers, available parallelism: {:?}",
            num_workers,
            thread::available_parallelism()
        );

        for worker_idx in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = match panic::catch_unwind(AssertUnwindSafe(|| task.process())) {
                        Ok(result) => result,
                        Err(_) => {
                            error!("Task panicked on worker {}", worker_idx);
                            task.failed()
                        }
                    };
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                disconnected: false,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker has disconnected; the channel is marked dead
    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                error!("Worker {} disconnected, no longer scheduling on it", channel_idx);
                channel.disconnected = true;
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// This implements a round-robin scheduling strategy starting from the last
    /// used channel to ensure even distribution of tasks across all workers.
    /// Busy and disconnected channels are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| {
                let channel = &self.channels[idx];
                !channel.disconnected && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// The task will be executed as soon as a worker becomes available, or queued
    /// if all workers are busy.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued
    pub fn publish_task(&mut self, mut task: Box<dyn Task>) -> bool {
        while let Some(channel_idx) = self.find_available_channel() {
            match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    return true;
                }
                Err(returned) => task = returned,
            }
        }
        trace!("All workers busy, queueing task");
        self.queued_tasks.push_back(task);
        false
    }

    /// Processes any queued tasks if workers are available.
    ///
    /// This method should be called periodically (typically once per frame).
    /// Tasks are scheduled in FIFO order until the queue is empty or all
    /// workers are busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => self.queued_tasks.push_front(task),
            }
        }
    }

    /// Processes all completed task results from worker threads.
    ///
    /// Must be called on the main thread. Results are handled in the order
    /// they are received per worker; tasks they spawn are published afterwards.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self, context: &mut TaskContext<'_>) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for (idx, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        handled += 1;
                        tasks_to_queue.extend(result.handle_result(context));
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if !channel.disconnected {
                            error!(
                                "Worker {} exited with {} tasks in flight",
                                idx, channel.num_tasks_in_flight
                            );
                        }
                        channel.num_tasks_in_flight = 0;
                        channel.disconnected = true;
                        break;
                    }
                }
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Number of tasks currently being processed by workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// `true` when no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }

    /// Blocks until every queued and in-flight task, including tasks spawned by
    /// results along the way, has been processed and its result handled.
    pub fn wait_idle(&mut self, context: &mut TaskContext<'_>) {
        loop {
            self.process_completed_tasks(context);
            self.process_queued_tasks();
            if self.is_idle() {
                return;
            }

            let Some(idx) = self
                .channels
                .iter()
                .position(|channel| channel.num_tasks_in_flight > 0)
            else {
                warn!(
                    "No live workers left, dropping {} queued tasks",
                    self.queued_tasks.len()
                );
                self.queued_tasks.clear();
                return;
            };

            match self.channels[idx].result_receiver.recv() {
                Ok(result) => {
                    self.channels[idx].num_tasks_in_flight -= 1;
                    for task in result.handle_result(context) {
                        self.publish_task(task);
                    }
                }
                Err(_) => {
                    error!(
                        "Worker {} exited with {} tasks in flight",
                        idx, self.channels[idx].num_tasks_in_flight
                    );
                    self.channels[idx].num_tasks_in_flight = 0;
                    self.channels[idx].disconnected = true;
                }
            }
        }
    }
}
