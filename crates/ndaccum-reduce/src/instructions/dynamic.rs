use core::str::FromStr;

use half::f16;
use ndaccum_common::{Precision, Scalar};

use super::{Max, Mean, Min, Prod, ReduceInstruction, ReduceItem, Sum};
use crate::{NoOp, ReduceError, ReducePrecision};

/// A reduction picked at runtime, for callers that only know the reduction by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dynamic {
    /// See [`Sum`].
    Sum(Sum),
    /// See [`Prod`].
    Prod(Prod),
    /// See [`Mean`].
    Mean(Mean),
    /// See [`Max`].
    Max(Max),
    /// See [`Min`].
    Min(Min),
}

impl FromStr for Dynamic {
    type Err = ReduceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "sum" => Ok(Dynamic::Sum(Sum)),
            "prod" | "product" => Ok(Dynamic::Prod(Prod)),
            "mean" => Ok(Dynamic::Mean(Mean)),
            "max" => Ok(Dynamic::Max(Max)),
            "min" => Ok(Dynamic::Min(Min)),
            _ => Err(ReduceError::UnknownInstruction(name.to_string())),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $inst:ident => $body:expr) => {
        match $self {
            Dynamic::Sum($inst) => $body,
            Dynamic::Prod($inst) => $body,
            Dynamic::Mean($inst) => $body,
            Dynamic::Max($inst) => $body,
            Dynamic::Min($inst) => $body,
        }
    };
}

impl ReduceInstruction for Dynamic {
    type Accumulator<P: ReducePrecision> = P::EA;

    fn zero_double(&self) -> f64 {
        dispatch!(self, inst => inst.zero_double())
    }

    fn zero_float(&self) -> f32 {
        dispatch!(self, inst => inst.zero_float())
    }

    fn zero_half(&self) -> f16 {
        dispatch!(self, inst => inst.zero_half())
    }

    fn extra_args(&self, precision: Precision) -> Vec<Scalar> {
        dispatch!(self, inst => inst.extra_args(precision))
    }

    fn no_op(&self) -> NoOp {
        dispatch!(self, inst => inst.no_op())
    }

    fn null_accumulator<P: ReducePrecision>(&self) -> P::EA {
        dispatch!(self, inst => inst.null_accumulator::<P>())
    }

    fn reduce<P: ReducePrecision>(&self, accumulator: &P::EA, item: ReduceItem<P::EI>) -> P::EA {
        dispatch!(self, inst => inst.reduce::<P>(accumulator, item))
    }

    fn combine_partial<P: ReducePrecision>(&self, lhs: P::EA, rhs: P::EA) -> P::EA {
        dispatch!(self, inst => inst.combine_partial::<P>(lhs, rhs))
    }

    fn merge<P: ReducePrecision>(&self, accumulator: P::EA, n: usize) -> P::EA {
        dispatch!(self, inst => inst.merge::<P>(accumulator, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("Sum".parse::<Dynamic>(), Ok(Dynamic::Sum(Sum)));
        assert_eq!("product".parse::<Dynamic>(), Ok(Dynamic::Prod(Prod)));
        assert_eq!(
            "median".parse::<Dynamic>(),
            Err(ReduceError::UnknownInstruction("median".into()))
        );
    }

    #[test]
    fn delegates_to_the_selected_instruction() {
        let max = Dynamic::Max(Max);
        assert_eq!(max.zero_double(), f64::NEG_INFINITY);
        assert_eq!(max.combine_partial::<f32>(2.0, 3.0), 3.0);

        let mean = Dynamic::Mean(Mean);
        assert_eq!(mean.merge::<f64>(12.0, 4), 3.0);
    }
}
