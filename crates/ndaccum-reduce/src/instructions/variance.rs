use half::f16;
use ndaccum_common::{Element, Float, Precision, Scalar};

use super::{ReduceInstruction, ReduceItem, zero_of};
use crate::{NoOp, ReducePrecision};

/// Running count, mean and sum of squared deviations of a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments<E> {
    /// Number of items folded.
    pub count: usize,
    /// Mean of the items folded.
    pub mean: E,
    /// Sum of squared deviations from the mean.
    pub m2: E,
}

impl<E: Element> Moments<E> {
    /// Welford update with one item.
    fn push(self, value: E) -> Self {
        let count = self.count + 1;
        let delta = value - self.mean;
        let mean = self.mean + delta / E::from_f64(count as f64);
        let m2 = self.m2 + delta * (value - mean);

        Self { count, mean, m2 }
    }

    /// Chan et al. parallel merge.
    fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }

        let count = self.count + other.count;
        let total = E::from_f64(count as f64);
        let lhs = E::from_f64(self.count as f64);
        let rhs = E::from_f64(other.count as f64);
        let delta = other.mean - self.mean;

        Self {
            count,
            mean: self.mean + delta * rhs / total,
            m2: self.m2 + other.m2 + delta * delta * lhs * rhs / total,
        }
    }
}

/// Variance of the elements.
///
/// With `bias_corrected`, the sum of squared deviations is divided by `n - 1` (sample
/// variance), otherwise by `n` (population variance). Undefined variances are NaN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Variance {
    /// Apply Bessel's correction.
    pub bias_corrected: bool,
}

impl Variance {
    /// Sample variance.
    pub fn sample() -> Self {
        Self {
            bias_corrected: true,
        }
    }

    /// Population variance.
    pub fn population() -> Self {
        Self {
            bias_corrected: false,
        }
    }

    fn finish<E: Element>(&self, moments: Moments<E>) -> E {
        let count = moments.count as f64;
        let denominator = if self.bias_corrected {
            count - 1.0
        } else {
            count
        };

        if denominator <= 0.0 {
            return E::nan();
        }
        moments.m2 / E::from_f64(denominator)
    }

    fn single_item_value(&self) -> f64 {
        if self.bias_corrected { f64::NAN } else { 0.0 }
    }
}

impl ReduceInstruction for Variance {
    type Accumulator<P: ReducePrecision> = Moments<P::EA>;

    fn zero_double(&self) -> f64 {
        0.0
    }

    fn zero_float(&self) -> f32 {
        0.0
    }

    fn zero_half(&self) -> f16 {
        f16::ZERO
    }

    fn extra_args(&self, precision: Precision) -> Vec<Scalar> {
        let flag = if self.bias_corrected { 1.0 } else { 0.0 };
        vec![Scalar::F64(flag).cast(precision)]
    }

    fn no_op(&self) -> NoOp {
        NoOp::Fill(self.single_item_value())
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> Moments<P::EA> {
        let zero = zero_of::<P::EA, _>(self);
        Moments {
            count: 0,
            mean: zero,
            m2: zero,
        }
    }

    fn reduce<P: ReducePrecision>(
        &self,
        accumulator: &Moments<P::EA>,
        item: ReduceItem<P::EI>,
    ) -> Moments<P::EA> {
        accumulator.push(item.value())
    }

    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: Moments<P::EA>,
        rhs: Moments<P::EA>,
    ) -> Moments<P::EA> {
        lhs.merge(rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: Moments<P::EA>, _n: usize) -> P::EA {
        self.finish(accumulator)
    }
}

/// Standard deviation: square root of the [variance](Variance).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StandardDeviation {
    /// Apply Bessel's correction.
    pub bias_corrected: bool,
}

impl StandardDeviation {
    fn variance(&self) -> Variance {
        Variance {
            bias_corrected: self.bias_corrected,
        }
    }
}

impl ReduceInstruction for StandardDeviation {
    type Accumulator<P: ReducePrecision> = Moments<P::EA>;

    fn zero_double(&self) -> f64 {
        self.variance().zero_double()
    }

    fn zero_float(&self) -> f32 {
        self.variance().zero_float()
    }

    fn zero_half(&self) -> f16 {
        self.variance().zero_half()
    }

    fn extra_args(&self, precision: Precision) -> Vec<Scalar> {
        self.variance().extra_args(precision)
    }

    fn no_op(&self) -> NoOp {
        self.variance().no_op()
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> Moments<P::EA> {
        self.variance().null_accumulator::<P>()
    }

    fn reduce<P: ReducePrecision>(
        &self,
        accumulator: &Moments<P::EA>,
        item: ReduceItem<P::EI>,
    ) -> Moments<P::EA> {
        accumulator.push(item.value())
    }

    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: Moments<P::EA>,
        rhs: Moments<P::EA>,
    ) -> Moments<P::EA> {
        lhs.merge(rhs)
    }

    fn merge<P: ReducePrecision>(&self, accumulator: Moments<P::EA>, n: usize) -> P::EA {
        self.variance().merge::<P>(accumulator, n).sqrt()
    }
}
