use core::fmt::Debug;

use half::f16;
use ndaccum_common::{Element, Float, Precision, Scalar};

use crate::{NoOp, ReducePrecision};

/// What an instruction needs from its inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReduceRequirements {
    /// The instruction reads the coordinate of every item.
    pub coordinates: bool,
    /// The instruction reads an `(x, y)` pair for every item.
    pub pairwise: bool,
}

/// One item fed to [`ReduceInstruction::reduce`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceItem<E> {
    /// The element of `x`.
    pub value: E,
    /// The element of `y` at the same coordinate, for pairwise instructions.
    pub pair: Option<E>,
    /// Position of the item along the reduced domain.
    pub coordinate: usize,
}

impl<E: Element> ReduceItem<E> {
    /// The value cast to the accumulation precision.
    pub fn value<EA: Element>(&self) -> EA {
        self.value.cast()
    }

    /// The paired value cast to the accumulation precision.
    ///
    /// Pairwise instructions are only built with a `y` tensor, so a missing pair reads as zero.
    pub fn pair<EA: Element>(&self) -> EA {
        self.pair.map(|pair| pair.cast()).unwrap_or_else(|| EA::from_f64(0.0))
    }
}

/// A reduction: an identity element, a per-item fold, an associative merge of partial
/// results and a final transformation of the merged accumulator.
///
/// Instructions are immutable descriptions shared by every worker. The accumulator is
/// threaded by value, so workers never share mutable state.
pub trait ReduceInstruction: Debug + Clone + Send + Sync + 'static {
    /// Partial result of the reduction.
    type Accumulator<P: ReducePrecision>: Copy + PartialEq + Debug + Send + Sync;

    /// What the instruction needs from its inputs.
    fn requirements(&self) -> ReduceRequirements {
        ReduceRequirements::default()
    }

    /// Identity element at double precision.
    fn zero_double(&self) -> f64;

    /// Identity element at single precision.
    fn zero_float(&self) -> f32;

    /// Identity element at half precision.
    fn zero_half(&self) -> f16;

    /// Identity element at the given precision.
    fn zero_value(&self, precision: Precision) -> Scalar {
        match precision {
            Precision::Double => Scalar::F64(self.zero_double()),
            Precision::Single => Scalar::F32(self.zero_float()),
            Precision::Half => Scalar::F16(self.zero_half()),
        }
    }

    /// Parameters of the instruction, appended after the zero value in the extra arguments.
    fn extra_args(&self, _precision: Precision) -> Vec<Scalar> {
        Vec::new()
    }

    /// Output substituted when the reduction domain holds a single element.
    fn no_op(&self) -> NoOp {
        NoOp::PassThrough
    }

    /// Accumulator holding no item. Merging it with any partial leaves the partial unchanged.
    fn null_accumulator<P: ReducePrecision>(&self) -> Self::Accumulator<P>;

    /// Fold one item into the accumulator.
    fn reduce<P: ReducePrecision>(
        &self,
        accumulator: &Self::Accumulator<P>,
        item: ReduceItem<P::EI>,
    ) -> Self::Accumulator<P>;

    /// Merge two partial results. Must be associative.
    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: Self::Accumulator<P>,
        rhs: Self::Accumulator<P>,
    ) -> Self::Accumulator<P>;

    /// Turn the merged accumulator of `n` items into the reduction result.
    fn merge<P: ReducePrecision>(&self, accumulator: Self::Accumulator<P>, n: usize) -> P::EA;
}

/// The zero value of an instruction as an element.
pub fn zero_of<E: Element, I: ReduceInstruction>(instruction: &I) -> E {
    E::from_scalar(instruction.zero_value(E::PRECISION))
}

/// Keep the greatest item, or the lowest coordinate on equality. NaN items lose
/// to any number but win over the null accumulator.
pub(crate) fn choose_argmax<E: Element>(lhs: (E, usize), rhs: (E, usize)) -> (E, usize) {
    if rhs.1 == usize::MAX {
        return lhs;
    }
    if lhs.1 == usize::MAX {
        return rhs;
    }
    let keep_lhs = if lhs.0 == rhs.0 {
        lhs.1 <= rhs.1
    } else {
        lhs.0 > rhs.0 || rhs.0.is_nan()
    };
    if keep_lhs { lhs } else { rhs }
}

/// Keep the smallest item, or the lowest coordinate on equality. NaN items lose
/// to any number but win over the null accumulator.
pub(crate) fn choose_argmin<E: Element>(lhs: (E, usize), rhs: (E, usize)) -> (E, usize) {
    if rhs.1 == usize::MAX {
        return lhs;
    }
    if lhs.1 == usize::MAX {
        return rhs;
    }
    let keep_lhs = if lhs.0 == rhs.0 {
        lhs.1 <= rhs.1
    } else {
        lhs.0 < rhs.0 || rhs.0.is_nan()
    };
    if keep_lhs { lhs } else { rhs }
}
