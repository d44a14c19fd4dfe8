mod abs;
mod argmax;
mod argmin;
mod base;
mod dynamic;
mod max;
mod mean;
mod min;
mod norm;
mod pairwise;
mod prod;
mod sum;
mod variance;

pub use abs::*;
pub use argmax::*;
pub use argmin::*;
pub use base::*;
pub use dynamic::*;
pub use max::*;
pub use mean::*;
pub use min::*;
pub use norm::*;
pub use pairwise::*;
pub use prod::*;
pub use sum::*;
pub use variance::*;
