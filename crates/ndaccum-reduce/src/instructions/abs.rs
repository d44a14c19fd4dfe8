use half::f16;
use ndaccum_common::Float;

use super::{ReduceInstruction, ReduceItem, zero_of};
use crate::{NoOp, ReducePrecision};

/// Greatest absolute value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AMax;

/// Smallest absolute value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AMin;

impl ReduceInstruction for AMax {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        0.0
    }

    fn zero_float(&self) -> f32 {
        0.0
    }

    fn zero_half(&self) -> f16 {
        f16::ZERO
    }

    fn no_op(&self) -> NoOp {
        NoOp::Abs
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        zero_of(self)
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        accumulator.max(item.value::<P::EA>().abs())
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs.max(rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}

impl ReduceInstruction for AMin {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        f64::INFINITY
    }

    fn zero_float(&self) -> f32 {
        f32::INFINITY
    }

    fn zero_half(&self) -> f16 {
        f16::INFINITY
    }

    fn no_op(&self) -> NoOp {
        NoOp::Abs
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        zero_of(self)
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        accumulator.min(item.value::<P::EA>().abs())
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs.min(rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}
