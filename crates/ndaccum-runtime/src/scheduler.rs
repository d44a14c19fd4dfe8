use core::{fmt::Display, ops::Range};
use std::{num::NonZeroUsize, thread};

use crate::config::{GlobalConfig, Logger, scheduler::SchedulerLogLevel};

/// Errors raised while running partition tasks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A worker panicked; none of the partial results are returned.
    #[error("Worker {worker} panicked while computing its partitions")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },
}

/// Runs one task per partition on a bounded set of scoped worker threads.
///
/// Tasks only borrow read-only inputs and return their partial result by value: nothing is
/// shared between workers, and results are handed back only once every worker finished.
#[derive(Debug)]
pub struct Scheduler {
    workers: usize,
    min_partition_len: usize,
    logger: spin::Mutex<Logger>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(GlobalConfig::get())
    }
}

impl Scheduler {
    /// Create a scheduler from the given configuration.
    pub fn from_config(config: std::sync::Arc<GlobalConfig>) -> Self {
        let workers = config
            .scheduler
            .max_workers
            .unwrap_or_else(available_parallelism);
        let min_partition_len = config.scheduler.min_partition_len;
        let logger = Logger::from_config(config);

        Self {
            workers: workers.max(1),
            min_partition_len: min_partition_len.max(1),
            logger: spin::Mutex::new(logger),
        }
    }

    /// Create a scheduler with an explicit worker count and the global logging configuration.
    pub fn new(workers: usize) -> Self {
        let mut scheduler = Self::default();
        scheduler.workers = workers.max(1);
        scheduler
    }

    /// Maximum number of threads used by [`Scheduler::execute`].
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Minimum partition length used when the partition count is chosen automatically.
    pub fn min_partition_len(&self) -> usize {
        self.min_partition_len
    }

    /// Run `task` once per partition and return the results in partition order.
    ///
    /// Partitions are split into contiguous groups, one group per worker. With a single
    /// worker or a single partition, tasks run inline on the calling thread.
    pub fn execute<T, F>(
        &self,
        partitions: &[Range<usize>],
        task: F,
    ) -> Result<Vec<T>, SchedulerError>
    where
        T: Send,
        F: Fn(Range<usize>) -> T + Sync,
    {
        let workers = self.workers.min(partitions.len());

        if workers <= 1 {
            return Ok(partitions.iter().cloned().map(task).collect());
        }

        let group_len = partitions.len().div_ceil(workers);
        let groups = partitions.chunks(group_len);
        self.log_dispatch(partitions.len(), groups.len());

        let task = &task;
        let full_logs = matches!(self.log_level(), SchedulerLogLevel::Full);

        thread::scope(|scope| {
            let handles = groups
                .enumerate()
                .map(|(worker, group)| {
                    scope.spawn(move || {
                        log::trace!("Worker {worker} started on {} partitions", group.len());
                        if full_logs {
                            self.log(&format!("Worker {worker} started"));
                        }
                        let partials = group.iter().cloned().map(task).collect::<Vec<_>>();
                        log::trace!("Worker {worker} stopped");
                        if full_logs {
                            self.log(&format!("Worker {worker} stopped"));
                        }
                        partials
                    })
                })
                .collect::<Vec<_>>();

            let mut partials = Vec::with_capacity(partitions.len());
            let mut failed = None;

            for (worker, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(values) => partials.extend(values),
                    Err(_) => failed = failed.or(Some(worker)),
                }
            }

            match failed {
                Some(worker) => {
                    self.log(&format!("Worker {worker} panicked, discarding all partials"));
                    Err(SchedulerError::WorkerPanicked { worker })
                }
                None => Ok(partials),
            }
        })
    }

    /// Log a message to the scheduler channel.
    pub fn log<S: Display>(&self, msg: &S) {
        self.logger.lock().log_scheduler(msg);
    }

    /// Log a message to the reduce channel.
    pub fn log_reduce<S: Display>(&self, msg: &S) {
        self.logger.lock().log_reduce(msg);
    }

    fn log_level(&self) -> SchedulerLogLevel {
        self.logger.lock().log_level_scheduler()
    }

    fn log_dispatch(&self, partitions: usize, workers: usize) {
        if !matches!(self.log_level(), SchedulerLogLevel::Disabled) {
            self.log(&format!("Dispatching {partitions} partitions on {workers} workers"));
        }
    }
}

fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
