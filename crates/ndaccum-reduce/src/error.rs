use ndaccum_common::{Scalar, TensorError, UnknownPrecision};
use ndaccum_runtime::SchedulerError;

/// Errors raised while building or running a reduction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReduceError {
    /// `x` and `y` don't have the same shape or value kind.
    #[error("Shape mismatch between x {x:?} and y {y:?}")]
    ShapeMismatch {
        /// Shape of `x`.
        x: Vec<usize>,
        /// Shape of `y`.
        y: Vec<usize>,
    },
    /// A contract of the accumulation was broken.
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
    /// Complex accumulations don't produce a real scalar result.
    #[error("Complex accumulations don't have a scalar final result")]
    UnsupportedForComplex,
    /// The instruction reads pairs of elements but no `y` was given.
    #[error("The instruction requires a second input tensor")]
    MissingPairwise,
    /// The instruction reads single elements but a `y` was given.
    #[error("The instruction doesn't accept a second input tensor")]
    UnexpectedPairwise,
    /// The reduction axis is out of bounds.
    #[error("Can't reduce along axis {axis} of a tensor of rank {rank}")]
    InvalidAxis {
        /// Requested axis.
        axis: usize,
        /// Rank of the input.
        rank: usize,
    },
    /// More elements were requested than the input holds.
    #[error("Can't fold {n} elements out of an input of {len}")]
    InvalidRepeat {
        /// Requested element count.
        n: usize,
        /// Number of elements of the input.
        len: usize,
    },
    /// The strategy can't be executed.
    #[error("Invalid reduce strategy: {0}")]
    InvalidStrategy(String),
    /// No instruction is registered under this name.
    #[error("Unknown reduce instruction `{0}`")]
    UnknownInstruction(String),
    /// A tensor couldn't be built.
    #[error(transparent)]
    Tensor(#[from] TensorError),
    /// Partition tasks failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Broken accumulation contracts.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// The final result was already stored with a different value.
    #[error("Final result is already {stored}, can't replace it with {attempted}")]
    FinalResultChanged {
        /// The value stored first.
        stored: Scalar,
        /// The rejected value.
        attempted: Scalar,
    },
    /// No zero value is declared for the requested precision.
    #[error("No zero value is declared for precision `{0}`")]
    UndeclaredPrecision(String),
}

impl From<UnknownPrecision> for ReduceError {
    fn from(value: UnknownPrecision) -> Self {
        InvariantViolation::UndeclaredPrecision(value.0).into()
    }
}
