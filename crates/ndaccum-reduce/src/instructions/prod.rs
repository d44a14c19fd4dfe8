use half::f16;

use super::{ReduceInstruction, ReduceItem, zero_of};
use crate::ReducePrecision;

/// Product of all elements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Prod;

impl ReduceInstruction for Prod {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        1.0
    }

    fn zero_float(&self) -> f32 {
        1.0
    }

    fn zero_half(&self) -> f16 {
        f16::ONE
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        zero_of(self)
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        *accumulator * item.value::<P::EA>()
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs * rhs
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}
