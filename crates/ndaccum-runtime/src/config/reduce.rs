use crate::MergeStrategy;

use super::logger::{BinaryLogLevel, LoggerConfig};

/// Settings applied to every reduction that doesn't provide its own strategy.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ReduceSettings {
    /// Logger configuration for reduction launches and finalization.
    #[serde(default)]
    pub logger: LoggerConfig<ReduceLogLevel>,
    /// How partial results are merged.
    #[serde(default)]
    pub merge: MergeStrategy,
}

/// Log level for reductions.
pub type ReduceLogLevel = BinaryLogLevel;
