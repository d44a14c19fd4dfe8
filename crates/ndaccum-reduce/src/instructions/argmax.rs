use half::f16;
use ndaccum_common::Element;

use super::{ReduceInstruction, ReduceItem, ReduceRequirements, choose_argmax, zero_of};
use crate::{NoOp, ReducePrecision};

/// Coordinate of the greatest element, the lowest one in case of equality.
///
/// The coordinate is returned as a value of the accumulation precision. An empty domain
/// has no maximum and yields NaN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArgMax;

impl ReduceInstruction for ArgMax {
    type Accumulator<P: ReducePrecision> = (P::EA, usize);

    fn requirements(&self) -> ReduceRequirements {
        ReduceRequirements {
            coordinates: true,
            pairwise: false,
        }
    }

    fn zero_double(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn zero_float(&self) -> f32 {
        f32::NEG_INFINITY
    }

    fn zero_half(&self) -> f16 {
        f16::NEG_INFINITY
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
        choose_argmax(*accumulator, (item.value(), item.coordinate))
    }

    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: (P::EA, usize),
        rhs: (P::EA, usize),
    ) -> (P::EA, usize) {
        choose_argmax(lhs, rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: (P::EA, usize), _n: usize) -> P::EA {
        coordinate_value(accumulator.1)
    }
}

pub(crate) fn coordinate_value<E: Element>(coordinate: usize) -> E {
    match coordinate {
        usize::MAX => E::from_f64(f64::NAN),
        coordinate => E::from_f64(coordinate as f64),
    }
}
