use super::logger::{LogLevel, LoggerConfig};

/// Configuration of the partition scheduler.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SchedulerConfig {
    /// Logger configuration for scheduling logs.
    #[serde(default)]
    pub logger: LoggerConfig<SchedulerLogLevel>,
    /// Maximum number of worker threads. Uses the available parallelism when unset.
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Minimum number of elements a partition holds when the partition count is picked
    /// automatically.
    #[serde(default = "default_min_partition_len")]
    pub min_partition_len: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            logger: Default::default(),
            max_workers: None,
            min_partition_len: default_min_partition_len(),
        }
    }
}

fn default_min_partition_len() -> usize {
    4096
}

/// Log levels for scheduling.
#[derive(Default, Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum SchedulerLogLevel {
    /// Scheduler logging is disabled.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// One line per dispatch: partition and worker counts.
    #[serde(rename = "basic")]
    Basic,

    /// Every worker start and stop is logged as well.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for SchedulerLogLevel {}
