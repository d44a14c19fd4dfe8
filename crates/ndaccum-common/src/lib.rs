#![warn(missing_docs)]

//! Common types shared by the ndaccum crates: numeric precisions, elements, precision-typed
//! scalars and read-only tensors.

mod element;
mod precision;
mod scalar;
mod stride;
mod tensor;

pub use element::*;
pub use precision::*;
pub use scalar::*;
pub use stride::*;
pub use tensor::*;

pub use num_traits::Float;
