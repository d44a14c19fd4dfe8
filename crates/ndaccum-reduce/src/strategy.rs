use derive_new::new;
use ndaccum_runtime::{MergeStrategy, config::GlobalConfig};
use serde::{Deserialize, Serialize};

use crate::ReduceError;

/// How a reduction is split and merged.
#[derive(new, Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct ReduceStrategy {
    /// Number of partitions folded independently.
    /// When unset, it's picked from the input length, the minimum partition length and the
    /// number of workers.
    pub partitions: Option<usize>,

    /// How partial results are merged.
    pub merge: MergeStrategy,

    /// If true, partitions are folded on the scheduler workers.
    /// Else, every partition is folded on the calling thread.
    pub parallel: bool,
}

impl ReduceStrategy {
    /// Check that the strategy can be executed.
    pub fn validate(self) -> Result<Self, ReduceError> {
        if self.partitions == Some(0) {
            return Err(ReduceError::InvalidStrategy(
                "the partition count must be at least 1".to_string(),
            ));
        }

        Ok(self)
    }

    /// Strategy used when the caller doesn't provide one.
    pub fn fallback_strategy() -> Self {
        let config = GlobalConfig::get();
        Self {
            partitions: None,
            merge: config.reduce.merge,
            parallel: true,
        }
    }

    /// Same strategy with an explicit partition count.
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = Some(partitions);
        self
    }
}
