use core::{fmt, ops::Range};
use std::sync::OnceLock;

use ndaccum_common::{Element, Precision, Scalar, Tensor, pack_extra_args};
use ndaccum_runtime::Scheduler;

use crate::{
    InvariantViolation, ReduceError, ReduceInstruction, ReduceItem, ReducePrecision,
    ReduceStrategy, launch::default_scheduler, launch::launch_reduce,
};

/// A reduction of `x` (and `y` for pairwise instructions) to a single scalar.
///
/// The op description is immutable and shared by every worker folding a partition. The only
/// mutable state is the final result slot, which can be written once.
pub struct Accumulation<P: ReducePrecision, I: ReduceInstruction> {
    instruction: I,
    x: Tensor<P::EI>,
    y: Option<Tensor<P::EI>>,
    n: usize,
    final_result: OnceLock<Scalar>,
}

impl<P: ReducePrecision, I: ReduceInstruction> fmt::Debug for Accumulation<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulation")
            .field("instruction", &self.instruction)
            .field("precision", &self.precision())
            .field("shape", &self.x.shape())
            .field("pairwise", &self.y.is_some())
            .field("n", &self.n)
            .field("final_result", &self.final_result.get())
            .finish()
    }
}

impl<P: ReducePrecision, I: ReduceInstruction> Accumulation<P, I> {
    /// Create an accumulation over every element of `x`.
    pub fn new(
        instruction: I,
        x: Tensor<P::EI>,
        y: Option<Tensor<P::EI>>,
    ) -> Result<Self, ReduceError> {
        let n = x.len();
        Self::with_n(instruction, x, y, n)
    }

    /// Create an accumulation over the first `n` elements of `x`.
    pub fn with_n(
        instruction: I,
        x: Tensor<P::EI>,
        y: Option<Tensor<P::EI>>,
        n: usize,
    ) -> Result<Self, ReduceError> {
        validate_inputs(&instruction, &x, y.as_ref())?;

        if n > x.len() {
            return Err(ReduceError::InvalidRepeat { n, len: x.len() });
        }

        Ok(Self {
            instruction,
            x,
            y,
            n,
            final_result: OnceLock::new(),
        })
    }

    /// The reduction.
    pub fn instruction(&self) -> &I {
        &self.instruction
    }

    /// The input.
    pub fn x(&self) -> &Tensor<P::EI> {
        &self.x
    }

    /// The second input of pairwise reductions.
    pub fn y(&self) -> Option<&Tensor<P::EI>> {
        self.y.as_ref()
    }

    /// Number of elements folded.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The working precision, the one of the input elements.
    pub fn precision(&self) -> Precision {
        P::EI::PRECISION
    }

    /// Identity element of the reduction at the given precision.
    pub fn zero_value(&self, precision: Precision) -> Scalar {
        self.instruction.zero_value(precision)
    }

    /// Identity element of the reduction at a precision given by name.
    pub fn zero_value_named(&self, precision: &str) -> Result<Scalar, ReduceError> {
        Ok(self.zero_value(precision.parse()?))
    }

    /// Arguments for backend kernels: the zero value at the working precision followed by the
    /// parameters of the instruction.
    pub fn extra_args(&self) -> Vec<Scalar> {
        let precision = self.precision();
        let mut args = vec![self.zero_value(precision)];
        args.extend(self.instruction.extra_args(precision));
        args
    }

    /// The extra arguments packed as bytes.
    pub fn packed_extra_args(&self) -> Vec<u8> {
        pack_extra_args(&self.extra_args())
    }

    /// Result of the reduction over a single-element domain, computed without folding.
    ///
    /// The input is widened to the accumulation precision first, like the items of a fold.
    pub fn no_op(&self) -> Tensor<P::EA> {
        self.instruction.no_op().apply(&self.x.cast::<P::EA>())
    }

    /// Whether the op reads complex values. Complex ops have no scalar final result.
    pub fn is_complex_accumulation(&self) -> bool {
        self.x.is_complex() || self.y.as_ref().is_some_and(Tensor::is_complex)
    }

    /// Accumulator holding no element.
    pub fn null_accumulator(&self) -> I::Accumulator<P> {
        self.instruction.null_accumulator::<P>()
    }

    /// Fold the elements in `range`, clipped to the first `n` elements, starting from the
    /// zero value.
    pub fn reduce_partition(&self, range: Range<usize>) -> I::Accumulator<P> {
        let end = range.end.min(self.n);
        let start = range.start.min(end);

        let xs = &self.x.as_slice()[start..end];
        let ys = self.y.as_ref().map(|y| &y.as_slice()[start..end]);

        let mut accumulator = self.null_accumulator();
        for (offset, value) in xs.iter().enumerate() {
            let item = ReduceItem {
                value: *value,
                pair: ys.map(|ys| ys[offset]),
                coordinate: start + offset,
            };
            accumulator = self.instruction.reduce::<P>(&accumulator, item);
        }
        accumulator
    }

    /// Merge two partial results.
    pub fn combine_partial(
        &self,
        lhs: I::Accumulator<P>,
        rhs: I::Accumulator<P>,
    ) -> I::Accumulator<P> {
        self.instruction.combine_partial::<P>(lhs, rhs)
    }

    /// Store the final result.
    ///
    /// Storing the same value again (bit for bit) is accepted; any other value is an
    /// [invariant violation](InvariantViolation::FinalResultChanged).
    pub fn set_final_result(&self, value: Scalar) -> Result<(), ReduceError> {
        if self.is_complex_accumulation() {
            return Err(ReduceError::UnsupportedForComplex);
        }

        let stored = self.final_result.get_or_init(|| value);
        if stored.bit_eq(&value) {
            Ok(())
        } else {
            Err(InvariantViolation::FinalResultChanged {
                stored: *stored,
                attempted: value,
            }
            .into())
        }
    }

    /// The stored final result, if any. Always `None` for complex ops.
    pub fn final_result(&self) -> Option<Scalar> {
        self.final_result.get().copied()
    }

    /// Run the reduction on the default scheduler and store its result.
    ///
    /// Uses [`ReduceStrategy::fallback_strategy`] when no strategy is given.
    pub fn execute(&self, strategy: Option<ReduceStrategy>) -> Result<Scalar, ReduceError> {
        self.execute_on(strategy, default_scheduler())
    }

    /// Run the reduction on the given scheduler and store its result.
    ///
    /// An op that already holds a result returns it without folding again.
    pub fn execute_on(
        &self,
        strategy: Option<ReduceStrategy>,
        scheduler: &Scheduler,
    ) -> Result<Scalar, ReduceError> {
        if self.is_complex_accumulation() {
            return Err(ReduceError::UnsupportedForComplex);
        }
        if let Some(result) = self.final_result() {
            return Ok(result);
        }

        let strategy = strategy
            .map(ReduceStrategy::validate)
            .unwrap_or_else(|| Ok(ReduceStrategy::fallback_strategy()))?;

        let accumulator = launch_reduce(self, &strategy, scheduler)?;
        let result = self
            .instruction
            .merge::<P>(accumulator, self.n)
            .into_scalar();

        self.set_final_result(result)?;
        scheduler.log_reduce(&format_args!(
            "{:?} over {} elements finalized to {result}",
            self.instruction, self.n
        ));

        Ok(result)
    }
}

/// Checks shared by every reduction entry point.
pub(crate) fn validate_inputs<I: ReduceInstruction, E: Element>(
    instruction: &I,
    x: &Tensor<E>,
    y: Option<&Tensor<E>>,
) -> Result<(), ReduceError> {
    let pairwise = instruction.requirements().pairwise;

    match y {
        None if pairwise => Err(ReduceError::MissingPairwise),
        Some(_) if !pairwise => Err(ReduceError::UnexpectedPairwise),
        Some(y) if !x.same_shape(y) => Err(ReduceError::ShapeMismatch {
            x: x.shape().to_vec(),
            y: y.shape().to_vec(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use half::f16;
    use ndaccum_runtime::MergeStrategy;

    use super::*;
    use crate::{Dot, Max, SquaredNorm, Sum, Variance};

    fn vector(values: &[f64]) -> Tensor<f64> {
        Tensor::vector(values.to_vec())
    }

    #[test]
    fn partials_of_two_partitions() {
        let op = Accumulation::<f64, _>::new(Sum, vector(&[1.0, 2.0, 3.0, 4.0]), None).unwrap();

        let lhs = op.reduce_partition(0..2);
        let rhs = op.reduce_partition(2..4);
        assert_eq!((lhs, rhs), (3.0, 7.0));

        let total = op.combine_partial(lhs, rhs);
        op.set_final_result(Scalar::F64(total)).unwrap();
        assert_eq!(op.final_result(), Some(Scalar::F64(10.0)));
    }

    #[test]
    fn final_result_is_set_once() {
        let x = vector(&[-5.0, 3.0, 0.0, 9.0, 2.0]);
        let op = Accumulation::<f64, _>::new(Max, x, None).unwrap();
        let strategy = ReduceStrategy::new(Some(1), MergeStrategy::Tree, false);

        assert_eq!(op.final_result(), None);
        assert_eq!(op.execute(Some(strategy)), Ok(Scalar::F64(9.0)));

        assert_eq!(op.set_final_result(Scalar::F64(9.0)), Ok(()));
        assert_eq!(
            op.set_final_result(Scalar::F64(8.0)),
            Err(ReduceError::InvariantViolation(
                InvariantViolation::FinalResultChanged {
                    stored: Scalar::F64(9.0),
                    attempted: Scalar::F64(8.0),
                }
            ))
        );
        assert_eq!(op.final_result(), Some(Scalar::F64(9.0)));
    }

    #[test]
    fn signed_zero_is_a_different_result() {
        let op = Accumulation::<f64, _>::new(Sum, vector(&[]), None).unwrap();
        op.set_final_result(Scalar::F64(0.0)).unwrap();
        assert!(op.set_final_result(Scalar::F64(-0.0)).is_err());
    }

    #[test]
    fn complex_ops_have_no_final_result() {
        let x = Tensor::complex(vec![1.0f64, 2.0, 3.0, 4.0], vec![2]).unwrap();
        let op = Accumulation::<f64, _>::new(Sum, x, None).unwrap();

        assert!(op.is_complex_accumulation());
        assert_eq!(
            op.set_final_result(Scalar::F64(1.0)),
            Err(ReduceError::UnsupportedForComplex)
        );
        assert_eq!(op.execute(None), Err(ReduceError::UnsupportedForComplex));
        assert_eq!(op.final_result(), None);
    }

    #[test]
    fn pairwise_inputs_are_validated() {
        let x = vector(&[1.0, 2.0]);

        assert_eq!(
            Accumulation::<f64, _>::new(Dot, x.clone(), None).unwrap_err(),
            ReduceError::MissingPairwise
        );
        assert_eq!(
            Accumulation::<f64, _>::new(Sum, x.clone(), Some(x.clone())).unwrap_err(),
            ReduceError::UnexpectedPairwise
        );
        assert_eq!(
            Accumulation::<f64, _>::new(Dot, x.clone(), Some(vector(&[1.0]))).unwrap_err(),
            ReduceError::ShapeMismatch {
                x: vec![2],
                y: vec![1],
            }
        );
    }

    #[test]
    fn with_n_folds_a_prefix() {
        let x = vector(&[1.0, 2.0, 3.0, 4.0]);

        let op = Accumulation::<f64, _>::with_n(Sum, x.clone(), None, 2).unwrap();
        assert_eq!(op.execute(None), Ok(Scalar::F64(3.0)));

        assert_eq!(
            Accumulation::<f64, _>::with_n(Sum, x, None, 5).unwrap_err(),
            ReduceError::InvalidRepeat { n: 5, len: 4 }
        );
    }

    #[test]
    fn extra_args_start_with_the_zero_value() {
        let x = Tensor::vector(vec![f16::ONE; 3]);
        let op = Accumulation::<f16, _>::new(Variance::sample(), x, None).unwrap();

        assert_eq!(op.precision(), Precision::Half);
        assert_eq!(
            op.extra_args(),
            vec![Scalar::F16(f16::ZERO), Scalar::F16(f16::ONE)]
        );
        assert_eq!(op.packed_extra_args().len(), 4);
    }

    #[test]
    fn zero_value_by_precision_name() {
        let op = Accumulation::<f32, _>::new(Max, Tensor::vector(vec![1.0f32]), None).unwrap();

        assert_eq!(
            op.zero_value_named("double"),
            Ok(Scalar::F64(f64::NEG_INFINITY))
        );
        assert_eq!(
            op.zero_value_named("bfloat16"),
            Err(ReduceError::InvariantViolation(
                InvariantViolation::UndeclaredPrecision("bfloat16".into())
            ))
        );
    }

    #[test]
    fn no_op_of_variance_is_filled() {
        let op = Accumulation::<f64, _>::new(Variance::population(), vector(&[4.0, -2.0]), None)
            .unwrap();
        assert_eq!(op.no_op().as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn no_op_of_half_squares_in_single_precision() {
        let x = Tensor::vector(vec![f16::from_f32(300.0), f16::from_f32(-2.5)]);
        let op = Accumulation::<f16, _>::new(SquaredNorm, x, None).unwrap();
        assert_eq!(op.no_op().as_slice(), &[90000.0f32, 6.25]);
    }
}
