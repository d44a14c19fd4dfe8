use half::f16;

use super::{ReduceInstruction, ReduceItem, zero_of};
use crate::ReducePrecision;

/// Sum of all elements.
///
/// The zero is `-0.0`, the additive identity that keeps the sign of a lone `-0.0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sum;

impl ReduceInstruction for Sum {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        -0.0
    }

    fn zero_float(&self) -> f32 {
        -0.0
    }

    fn zero_half(&self) -> f16 {
        f16::NEG_ZERO
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        zero_of(self)
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        *accumulator + item.value::<P::EA>()
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        lhs + rhs
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, _n: usize) -> P::EA {
        accumulator
    }
}
