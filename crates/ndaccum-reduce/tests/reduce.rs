use half::f16;
use ndaccum_common::{Element, Scalar, Tensor};
use ndaccum_reduce::{
    AMax, AMin, Accumulation, ArgMax, ArgMin, Dynamic, Max, Mean, MergeStrategy, Min, Norm1,
    Norm2, NormMax, Prod, ReduceError, ReduceInstruction, ReducePrecision, ReduceStrategy,
    SquaredNorm, StandardDeviation, Sum, Variance, reduce, reduce_axis,
};
use ndaccum_runtime::Scheduler;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn strategy(partitions: usize, merge: MergeStrategy) -> Option<ReduceStrategy> {
    Some(ReduceStrategy::new(Some(partitions), merge, true))
}

#[test]
fn sum_of_two_partitions() {
    let x = Tensor::vector(vec![1.0f64, 2.0, 3.0, 4.0]);
    let result = reduce::<f64, _>(Sum, x, None, strategy(2, MergeStrategy::Sequential));
    assert_eq!(result, Ok(Scalar::F64(10.0)));
}

#[test]
fn max_in_a_single_partition() {
    let x = Tensor::vector(vec![-5.0f64, 3.0, 0.0, 9.0, 2.0]);
    let result = reduce::<f64, _>(Max, x, None, strategy(1, MergeStrategy::Tree));
    assert_eq!(result, Ok(Scalar::F64(9.0)));
}

#[test]
fn integer_valued_inputs_agree_exactly_across_partitions() {
    let values = (0..10_000).map(|i| ((i * 7) % 13) as f32 - 6.0).collect::<Vec<_>>();
    let expected = values.iter().map(|v| *v as f64).sum::<f64>() as f32;

    for partitions in [1, 4, 16] {
        for merge in [MergeStrategy::Sequential, MergeStrategy::Tree] {
            let x = Tensor::vector(values.clone());
            let result = reduce::<f32, _>(Sum, x, None, strategy(partitions, merge));
            assert_eq!(
                result,
                Ok(Scalar::F32(expected)),
                "{partitions} partitions, {merge} merge"
            );
        }
    }
}

#[test]
fn float_inputs_agree_within_tolerance_across_partitions() {
    let mut rng = StdRng::seed_from_u64(42);
    let values = (0..50_000)
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect::<Vec<_>>();
    let expected = values.iter().map(|v| *v as f64 * *v as f64).sum::<f64>().sqrt();

    for partitions in [1, 4, 16] {
        let x = Tensor::vector(values.clone());
        let result = reduce::<f32, _>(Norm2, x, None, strategy(partitions, MergeStrategy::Tree))
            .unwrap()
            .to_f64();
        assert!(
            ((result - expected) / expected).abs() < 1e-4,
            "{partitions} partitions: {result} != {expected}"
        );
    }
}

#[test]
fn half_inputs_accumulate_in_single_precision() {
    // 4096 halves of 1.0 sum past the largest integer a half holds exactly.
    let x = Tensor::vector(vec![f16::ONE; 4096]);
    let result = reduce::<f16, _>(Sum, x.clone(), None, strategy(4, MergeStrategy::Tree));
    assert_eq!(result, Ok(Scalar::F32(4096.0)));

    let op = Accumulation::<(f16, f64), _>::new(Mean, x, None).unwrap();
    assert_eq!(op.execute(None), Ok(Scalar::F64(1.0)));
}

// A unit axis takes the no-op path; a one element vector is folded.
fn assert_no_op_matches_reduction<P: ReducePrecision, I: ReduceInstruction>(instruction: &I) {
    let values = [-300.0, -2.5, -0.0, 0.0, 1.5, 300.0].map(P::EI::from_f64);
    let x = Tensor::new(values.to_vec(), vec![values.len(), 1]).unwrap();

    let no_op = reduce_axis::<P, I>(instruction.clone(), x, None, 1, None).unwrap();
    assert_eq!(no_op.shape(), &[values.len(), 1]);

    for (value, substituted) in values.iter().zip(no_op.as_slice()) {
        let op = Accumulation::<P, I>::new(
            instruction.clone(),
            Tensor::vector(vec![*value]),
            None,
        )
        .unwrap();
        let folded = op.execute(None).unwrap();
        let substituted = substituted.into_scalar();

        if folded.to_f64().is_nan() {
            assert!(substituted.to_f64().is_nan(), "{instruction:?} of {value}");
        } else {
            assert!(
                folded.bit_eq(&substituted),
                "{instruction:?} of {value}: folded {folded}, no-op {substituted}"
            );
        }
    }
}

fn assert_no_op_matches_reduction_all_precisions<I: ReduceInstruction>(instruction: I) {
    assert_no_op_matches_reduction::<f64, I>(&instruction);
    assert_no_op_matches_reduction::<f32, I>(&instruction);
    assert_no_op_matches_reduction::<f16, I>(&instruction);
}

#[test]
fn no_op_equals_a_genuine_reduction() {
    assert_no_op_matches_reduction_all_precisions(Sum);
    assert_no_op_matches_reduction_all_precisions(Prod);
    assert_no_op_matches_reduction_all_precisions(Mean);
    assert_no_op_matches_reduction_all_precisions(Max);
    assert_no_op_matches_reduction_all_precisions(Min);
    assert_no_op_matches_reduction_all_precisions(AMax);
    assert_no_op_matches_reduction_all_precisions(AMin);
    assert_no_op_matches_reduction_all_precisions(Norm1);
    assert_no_op_matches_reduction_all_precisions(Norm2);
    assert_no_op_matches_reduction_all_precisions(NormMax);
    assert_no_op_matches_reduction_all_precisions(SquaredNorm);
    assert_no_op_matches_reduction_all_precisions(Variance::sample());
    assert_no_op_matches_reduction_all_precisions(Variance::population());
    assert_no_op_matches_reduction_all_precisions(StandardDeviation::default());
    assert_no_op_matches_reduction_all_precisions(ArgMax);
    assert_no_op_matches_reduction_all_precisions(ArgMin);
}

fn assert_lone_nan_coordinate<I: ReduceInstruction>(instruction: I) {
    let x = Tensor::new(vec![f32::NAN], vec![1, 1]).unwrap();

    let no_op = reduce_axis::<f32, I>(instruction.clone(), x.clone(), None, 1, None).unwrap();
    assert_eq!(no_op.as_slice(), &[0.0]);

    let folded = reduce::<f32, I>(instruction.clone(), x, None, None);
    assert_eq!(folded, Ok(Scalar::F32(0.0)), "{instruction:?}");
}

#[test]
fn lone_nan_coordinate_matches_the_no_op() {
    assert_lone_nan_coordinate(ArgMax);
    assert_lone_nan_coordinate(ArgMin);

    let x = Tensor::vector(vec![f32::NAN, 1.0]);
    assert_eq!(reduce::<f32, _>(ArgMax, x.clone(), None, None), Ok(Scalar::F32(1.0)));
    assert_eq!(reduce::<f32, _>(ArgMin, x, None, None), Ok(Scalar::F32(1.0)));
}

#[test]
fn complex_inputs_are_rejected_before_folding() {
    let x = Tensor::complex(vec![1.0f32, -1.0, 2.0, 0.5], vec![2]).unwrap();

    assert_eq!(
        reduce::<f32, _>(Sum, x.clone(), None, None),
        Err(ReduceError::UnsupportedForComplex)
    );
    assert_eq!(
        reduce_axis::<f32, _>(Sum, x, None, 0, None).unwrap_err(),
        ReduceError::UnsupportedForComplex
    );
}

#[test]
fn execute_returns_the_stored_result() {
    let x = Tensor::vector((1..=100).map(|i| i as f64 / 10.0).collect());
    let op = Accumulation::<f64, _>::new(Sum, x, None).unwrap();

    let first = op.execute(strategy(1, MergeStrategy::Sequential)).unwrap();
    let second = op.execute(strategy(16, MergeStrategy::Tree)).unwrap();

    assert!(first.bit_eq(&second));
    assert_eq!(op.final_result(), Some(first));
}

#[test]
fn dynamic_instruction_by_name() {
    let instruction: Dynamic = "mean".parse().unwrap();
    let x = Tensor::vector(vec![2.0f32, 4.0, 6.0]);
    assert_eq!(reduce::<f32, _>(instruction, x, None, None), Ok(Scalar::F32(4.0)));
}

#[test]
fn explicit_scheduler() {
    let scheduler = Scheduler::new(4);
    let x = Tensor::vector((0..1000).map(|i| i as f64).collect());
    let op = Accumulation::<f64, _>::new(ArgMax, x, None).unwrap();

    let result = op.execute_on(strategy(8, MergeStrategy::Tree), &scheduler);
    assert_eq!(result, Ok(Scalar::F64(999.0)));
}

#[test]
fn invalid_strategy_is_rejected() {
    let x = Tensor::vector(vec![1.0f64]);
    let strategy = ReduceStrategy::new(Some(0), MergeStrategy::Tree, true);
    assert!(matches!(
        reduce::<f64, _>(Sum, x, None, Some(strategy)),
        Err(ReduceError::InvalidStrategy(_))
    ));
}
