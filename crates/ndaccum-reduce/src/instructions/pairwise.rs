//! Reductions over pairs of elements taken at the same coordinate of `x` and `y`.

use half::f16;
use ndaccum_common::Float;

use super::{ReduceInstruction, ReduceItem, ReduceRequirements, zero_of};
use crate::ReducePrecision;

const PAIRWISE: ReduceRequirements = ReduceRequirements {
    coordinates: false,
    pairwise: true,
};

/// Dot product: `Σ x·y`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dot;

/// Euclidean distance: `√Σ (x - y)²`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanDistance;

/// Manhattan distance: `Σ |x - y|`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManhattanDistance;

/// Cosine similarity: `Σ x·y / (√Σ x² · √Σ y²)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CosineSimilarity;

macro_rules! pairwise_sum {
    ($name:ident, |$x:ident, $y:ident| $term:expr, |$acc:ident| $merge:expr) => {
        impl ReduceInstruction for $name {
            type Accumulator<P: ReducePrecision> = P::EA;

            fn requirements(&self) -> ReduceRequirements {
                PAIRWISE
            }

            fn zero_double(&self) -> f64 {
                0.0
            }

            fn zero_float(&self) -> f32 {
                0.0
            }

            fn zero_half(&self) -> f16 {
                f16::ZERO
            }

            fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
                zero_of(self)
            }

            fn reduce<P: ReducePrecision>(
                &self,
                accumulator: &P::EA,
                item: ReduceItem<P::EI>,
            ) -> P::EA {
                let $x: P::EA = item.value();
                let $y: P::EA = item.pair();
                *accumulator + $term
            }

            fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
                lhs + rhs
            }

            fn merge<P: ReducePrecision>(&self, $acc: P::EA, _n: usize) -> P::EA {
                $merge
            }
        }
    };
}

pairwise_sum!(Dot, |x, y| x * y, |accumulator| accumulator);
pairwise_sum!(
    EuclideanDistance,
    |x, y| (x - y) * (x - y),
    |accumulator| accumulator.sqrt()
);
pairwise_sum!(ManhattanDistance, |x, y| (x - y).abs(), |accumulator| {
    accumulator
});

/// Running `(Σ x·y, Σ x², Σ y²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineAccumulator<E> {
    /// Dot product of the items folded.
    pub dot: E,
    /// Squared norm of the `x` items folded.
    pub x_squared: E,
    /// Squared norm of the `y` items folded.
    pub y_squared: E,
}

impl ReduceInstruction for CosineSimilarity {
    type Accumulator<P: ReducePrecision> = CosineAccumulator<P::EA>;

    fn requirements(&self) -> ReduceRequirements {
        PAIRWISE
    }

    fn zero_double(&self) -> f64 {
        0.0
    }

    fn zero_float(&self) -> f32 {
        0.0
    }

    fn zero_half(&self) -> f16 {
        f16::ZERO
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> CosineAccumulator<P::EA> {
        let zero = zero_of::<P::EA, _>(self);
        CosineAccumulator {
            dot: zero,
            x_squared: zero,
            y_squared: zero,
        }
    }

    fn reduce<P: ReducePrecision>(
        &self,
        accumulator: &CosineAccumulator<P::EA>,
        item: ReduceItem<P::EI>,
    ) -> CosineAccumulator<P::EA> {
        let x: P::EA = item.value();
        let y: P::EA = item.pair();
        CosineAccumulator {
            dot: accumulator.dot + x * y,
            x_squared: accumulator.x_squared + x * x,
            y_squared: accumulator.y_squared + y * y,
        }
    }

    fn combine_partial<P: ReducePrecision>(
        &self,
        lhs: CosineAccumulator<P::EA>,
        rhs: CosineAccumulator<P::EA>,
    ) -> CosineAccumulator<P::EA> {
        CosineAccumulator {
            dot: lhs.dot + rhs.dot,
            x_squared: lhs.x_squared + rhs.x_squared,
            y_squared: lhs.y_squared + rhs.y_squared,
        }
    }

    fn merge<P: ReducePrecision>(&self, accumulator: CosineAccumulator<P::EA>, _n: usize) -> P::EA {
        accumulator.dot / (accumulator.x_squared.sqrt() * accumulator.y_squared.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<I: ReduceInstruction>(instruction: &I, x: &[f64], y: &[f64]) -> f64 {
        let accumulator = x.iter().zip(y).enumerate().fold(
            instruction.null_accumulator::<f64>(),
            |acc, (coordinate, (x, y))| {
                let item = ReduceItem {
                    value: *x,
                    pair: Some(*y),
                    coordinate,
                };
                instruction.reduce::<f64>(&acc, item)
            },
        );
        instruction.merge::<f64>(accumulator, x.len())
    }

    #[test]
    fn distances() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 6.0, 3.0];

        assert_eq!(fold(&Dot, &x, &y), 25.0);
        assert_eq!(fold(&EuclideanDistance, &x, &y), 5.0);
        assert_eq!(fold(&ManhattanDistance, &x, &y), 7.0);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let x = [1.0, 2.0, 2.0];
        let y = [2.0, 4.0, 4.0];
        assert_eq!(fold(&CosineSimilarity, &x, &y), 1.0);
        assert!(fold(&CosineSimilarity, &[0.0], &[1.0]).is_nan());
    }
}
