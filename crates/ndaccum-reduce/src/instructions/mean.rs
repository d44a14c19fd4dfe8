use half::f16;
use ndaccum_common::Element;

use super::{ReduceInstruction, ReduceItem, Sum};
use crate::ReducePrecision;

/// Arithmetic mean: the sum of the elements divided by their count.
///
/// The mean of an empty domain is NaN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mean;

impl ReduceInstruction for Mean {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        Sum.zero_double()
    }

    fn zero_float(&self) -> f32 {
        Sum.zero_float()
    }

    fn zero_half(&self) -> f16 {
        Sum.zero_half()
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        Sum.null_accumulator::<P>()
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        Sum.reduce::<P>(accumulator, item)
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        Sum.combine_partial::<P>(lhs, rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, n: usize) -> P::EA {
        accumulator / P::EA::from_f64(n as f64)
    }
}
