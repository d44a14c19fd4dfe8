#![warn(missing_docs)]

//! Runtime pieces shared by every reduction: global configuration, logging, partitioning of
//! the input into independent chunks, concurrent execution of those chunks and merging of
//! their partial results.

/// Global configuration and loggers.
pub mod config;

mod merge;
mod partition;
mod scheduler;

pub use merge::*;
pub use partition::*;
pub use scheduler::*;
