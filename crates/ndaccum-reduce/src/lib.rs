#![warn(missing_docs)]

//! Accumulation ops: reductions of a tensor, or of a pair of tensors, to a scalar or along an
//! axis.
//!
//! A reduction is described by a [`ReduceInstruction`]: its identity element at every
//! precision, a per-item fold, an associative merge of partial results and a final
//! transformation. The input is split into partitions folded independently, possibly on
//! several workers, then the partials are merged following the [`ReduceStrategy`].

mod accumulation;
mod axis;
mod config;
mod error;
mod instructions;
mod launch;
mod no_op;
mod precision;
mod strategy;

pub use accumulation::*;
pub use axis::*;
pub use error::*;
pub use instructions::*;
pub use launch::*;
pub use no_op::*;
pub use precision::*;
pub use strategy::*;

pub use ndaccum_runtime::MergeStrategy;


use ndaccum_common::{Scalar, Tensor};

/// Entry point for full reductions.
///
/// Folds every element of `x` (paired with `y` for pairwise instructions) and returns the
/// finalized result.
pub fn reduce<P: ReducePrecision, I: ReduceInstruction>(
    instruction: I,
    x: Tensor<P::EI>,
    y: Option<Tensor<P::EI>>,
    strategy: Option<ReduceStrategy>,
) -> Result<Scalar, ReduceError> {
    Accumulation::<P, I>::new(instruction, x, y)?.execute(strategy)
}

/// Entry point for reductions along one axis.
///
/// See [`reduce_axis_on`].
pub fn reduce_axis<P: ReducePrecision, I: ReduceInstruction>(
    instruction: I,
    x: Tensor<P::EI>,
    y: Option<Tensor<P::EI>>,
    axis: usize,
    strategy: Option<ReduceStrategy>,
) -> Result<Tensor<P::EA>, ReduceError> {
    reduce_axis_on::<P, I>(instruction, x, y, axis, strategy, default_scheduler())
}
