use half::f16;
use ndaccum_common::Float;

use super::{AMax, ReduceInstruction, ReduceItem, zero_of};
use crate::{NoOp, ReducePrecision};

/// Sum of absolute values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Norm1;

/// Euclidean norm: square root of the sum of squares.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Norm2;

/// Infinity norm: greatest absolute value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormMax;

/// Sum of squares.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SquaredNorm;

macro_rules! zero_is_zero {
    () => {
        fn zero_double(&self) -> f64 {
            0.0
        }

        fn zero_float(&self) -> f32 {
            0.0
        }

        fn zero_half(&self) -> f16 {
            f16::ZERO
        }

        fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
            zero_of(self)
        }
    };
}

impl ReduceInstruction for Norm1 {
    type Accumulator<P: ReducePrecision> = P::EA;

    zero_is_zero!();

    fn no_op(&self) -> NoOp {
        NoOp::Abs
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        *accumulator + item.value::<P::EA>().abs()
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs + rhs
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}

impl ReduceInstruction for Norm2 {
    type Accumulator<P: ReducePrecision> = P::EA;

    zero_is_zero!();

    fn no_op(&self) -> NoOp {
        NoOp::Abs
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        SquaredNorm.reduce::<P>(accumulator, item)
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs + rhs
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator.sqrt()
    }
}

impl ReduceInstruction for NormMax {
    type Accumulator<P: ReducePrecision> = P::EA;

    zero_is_zero!();

    fn no_op(&self) -> NoOp {
        NoOp::Abs
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        AMax.reduce::<P>(accumulator, item)
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        AMax.combine_partial::<P>(lhs, rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}

impl ReduceInstruction for SquaredNorm {
    type Accumulator<P: ReducePrecision> = P::EA;

    zero_is_zero!();

    fn no_op(&self) -> NoOp {
        NoOp::Square
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        let value = item.value::<P::EA>();
        *accumulator + value * value
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs + rhs
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}
