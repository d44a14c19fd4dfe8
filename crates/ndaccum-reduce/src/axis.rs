use core::ops::Range;

use ndaccum_common::{Element, Tensor, unravel_index};
use ndaccum_runtime::Scheduler;

use crate::{
    ReduceError, ReduceInstruction, ReduceItem, ReducePrecision, ReduceStrategy,
    accumulation::validate_inputs, config::ReduceConfig,
};

/// Reduce `x` along `axis` on the given scheduler.
///
/// The output keeps the rank of `x` with a size of 1 along `axis`. Every output element is
/// one fold over the `shape[axis]` elements of its slice; slices are partitioned across
/// workers, a single slice is never split.
pub fn reduce_axis_on<P: ReducePrecision, I: ReduceInstruction>(
    instruction: I,
    x: Tensor<P::EI>,
    y: Option<Tensor<P::EI>>,
    axis: usize,
    strategy: Option<ReduceStrategy>,
    scheduler: &Scheduler,
) -> Result<Tensor<P::EA>, ReduceError> {
    validate_inputs(&instruction, &x, y.as_ref())?;

    if x.is_complex() {
        return Err(ReduceError::UnsupportedForComplex);
    }
    if axis >= x.rank() {
        return Err(ReduceError::InvalidAxis {
            axis,
            rank: x.rank(),
        });
    }

    let shape_axis = x.shape()[axis];
    if shape_axis == 1 && !instruction.requirements().pairwise {
        return Ok(instruction.no_op().apply(&x.cast::<P::EA>()));
    }

    let strategy = strategy
        .map(ReduceStrategy::validate)
        .unwrap_or_else(|| Ok(ReduceStrategy::fallback_strategy()))?;

    let mut output_shape = x.shape().to_vec();
    output_shape[axis] = 1;

    let slices = AxisSlices {
        instruction: &instruction,
        x: &x,
        y: y.as_ref(),
        axis,
        output_shape: &output_shape,
    };

    let output_len = output_shape.iter().product();
    let config = ReduceConfig::generate(output_len, shape_axis, &strategy, scheduler);

    log::debug!(
        "Reduce {instruction:?} along axis {axis} of {:?}: {} slices in {} partitions",
        x.shape(),
        output_len,
        config.plan.count(),
    );

    let chunks = if config.parallel {
        scheduler.execute(config.plan.ranges(), |range| slices.fold::<P>(range))?
    } else {
        config
            .plan
            .ranges()
            .iter()
            .cloned()
            .map(|range| slices.fold::<P>(range))
            .collect()
    };

    let values = chunks.into_iter().flatten().collect();
    Ok(Tensor::new(values, output_shape)?)
}

struct AxisSlices<'a, I, E: Element> {
    instruction: &'a I,
    x: &'a Tensor<E>,
    y: Option<&'a Tensor<E>>,
    axis: usize,
    output_shape: &'a [usize],
}

impl<I: ReduceInstruction, E: Element> AxisSlices<'_, I, E> {
    /// Reduce the slices of the output elements in `range`.
    fn fold<P: ReducePrecision<EI = E>>(&self, range: Range<usize>) -> Vec<P::EA> {
        range.map(|index| self.fold_slice::<P>(index)).collect()
    }

    fn fold_slice<P: ReducePrecision<EI = E>>(&self, index: usize) -> P::EA {
        let strides = self.x.strides();
        let shape_axis = self.x.shape()[self.axis];
        let stride = strides[self.axis];

        let start: usize = unravel_index(index, self.output_shape)
            .iter()
            .zip(strides)
            .map(|(coordinate, stride)| coordinate * stride)
            .sum();

        let xs = self.x.as_slice();
        let ys = self.y.map(Tensor::as_slice);

        let mut accumulator = self.instruction.null_accumulator::<P>();
        for coordinate in 0..shape_axis {
            let offset = start + coordinate * stride;
            let item = ReduceItem {
                value: xs[offset],
                pair: ys.map(|ys| ys[offset]),
                coordinate,
            };
            accumulator = self.instruction.reduce::<P>(&accumulator, item);
        }

        self.instruction.merge::<P>(accumulator, shape_axis)
    }
}

#[cfg(test)]
mod tests {
    use half::f16;
    use ndaccum_common::Scalar;
    use ndaccum_runtime::MergeStrategy;

    use super::*;
    use crate::{Accumulation, ArgMax, Dot, Norm2, SquaredNorm, Sum, Variance, reduce_axis};

    fn matrix() -> Tensor<f32> {
        // [[1, -2, 3],
        //  [4,  5, -6]]
        Tensor::new(vec![1.0, -2.0, 3.0, 4.0, 5.0, -6.0], vec![2, 3]).unwrap()
    }

    #[test]
    fn keeps_the_reduced_axis() {
        let rows = reduce_axis::<f32, _>(Sum, matrix(), None, 1, None).unwrap();
        assert_eq!(rows.shape(), &[2, 1]);
        assert_eq!(rows.as_slice(), &[2.0, 3.0]);

        let columns = reduce_axis::<f32, _>(Sum, matrix(), None, 0, None).unwrap();
        assert_eq!(columns.shape(), &[1, 3]);
        assert_eq!(columns.as_slice(), &[5.0, 3.0, -3.0]);
    }

    #[test]
    fn slices_in_many_partitions() {
        let strategy = ReduceStrategy::new(Some(3), MergeStrategy::Sequential, true);
        let columns =
            reduce_axis_on::<f32, _>(ArgMax, matrix(), None, 0, Some(strategy), &Scheduler::new(2))
                .unwrap();
        assert_eq!(columns.as_slice(), &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn unit_axis_uses_the_no_op() {
        let x = Tensor::new(vec![-3.0f32, 4.0], vec![2, 1]).unwrap();

        let norms = reduce_axis::<f32, _>(Norm2, x.clone(), None, 1, None).unwrap();
        assert_eq!(norms.as_slice(), &[3.0, 4.0]);

        let variances = reduce_axis::<f32, _>(Variance::population(), x, None, 1, None).unwrap();
        assert_eq!(variances.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn unit_axis_of_half_matches_a_fold() {
        // 300 squared overflows a half but not its single precision accumulator.
        let x = Tensor::new(vec![f16::from_f32(300.0)], vec![1, 1]).unwrap();

        let no_op = reduce_axis::<f16, _>(SquaredNorm, x.clone(), None, 1, None).unwrap();
        assert_eq!(no_op.as_slice(), &[90000.0f32]);

        let folded = Accumulation::<f16, _>::new(SquaredNorm, x.reshape(vec![1]).unwrap(), None)
            .unwrap()
            .execute(None);
        assert_eq!(folded, Ok(Scalar::F32(90000.0)));
    }

    #[test]
    fn pairwise_along_axis() {
        let dots = reduce_axis::<f32, _>(Dot, matrix(), Some(matrix()), 1, None).unwrap();
        assert_eq!(dots.as_slice(), &[14.0, 77.0]);
    }

    #[test]
    fn invalid_axis() {
        assert_eq!(
            reduce_axis::<f32, _>(Sum, matrix(), None, 2, None).unwrap_err(),
            ReduceError::InvalidAxis { axis: 2, rank: 2 }
        );
    }
}
