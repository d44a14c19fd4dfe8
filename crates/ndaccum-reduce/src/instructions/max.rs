use half::f16;
use ndaccum_common::Float;

use super::{ReduceInstruction, ReduceItem, zero_of};
use crate::ReducePrecision;

/// Greatest element. NaN elements are skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Max;

impl ReduceInstruction for Max {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn zero_float(&self) -> f32 {
        f32::NEG_INFINITY
    }

    fn zero_half(&self) -> f16 {
        f16::NEG_INFINITY
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        zero_of(self)
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        accumulator.max(item.value::<P::EA>())
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs.max(rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}
