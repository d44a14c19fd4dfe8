use half::f16;

use super::{
    ReduceInstruction, ReduceItem, ReduceRequirements, argmax::coordinate_value, choose_argmin,
    zero_of,
};
use crate::{NoOp, ReducePrecision};

/// Coordinate of the smallest element, the lowest one in case of equality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArgMin;

impl ReduceInstruction for ArgMin {
    type Accumulator<P: ReducePrecision> = (P::EA, usize);

    fn requirements(&self) -> ReduceRequirements {
        ReduceRequirements {
            coordinates: true,
            pairwise: false,
        }
    }

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
        NoOp::Fill(0.0)
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> (P::EA, usize) {
        (zero_of(self), usize::MAX)
    }

    fn reduce<P: ReducePrecision>(
        &self,
        accumulator: &(P::EA, usize),
        item: ReduceItem<P::EI>,
    ) -> (P::EA, usize) {
        choose_argmin(*accumulator, (item.value(), item.coordinate))
    }

    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: (P::EA, usize),
        rhs: (P::EA, usize),
    ) -> (P::EA, usize) {
        choose_argmin(lhs, rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: (P::EA, usize), _n: usize) -> P::EA {
        coordinate_value(accumulator.1)
    }
}
