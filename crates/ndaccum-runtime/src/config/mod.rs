/// Reduce config module.
pub mod reduce;
/// Scheduler config module.
pub mod scheduler;

mod base;
mod logger;

pub use base::*;
pub use logger::*;
