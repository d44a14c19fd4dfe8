use ndaccum_common::{Element, Float, Tensor};
use serde::{Deserialize, Serialize};

/// Output of a reduction over a domain holding a single element, computed without folding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoOp {
    /// The input is returned unchanged.
    PassThrough,
    /// Absolute value of every element.
    Abs,
    /// Square of every element.
    Square,
    /// Every element is replaced by a constant.
    Fill(f64),
}

impl NoOp {
    /// Apply the no-op to `x`. The shape is preserved.
    ///
    /// Complex tensors are always passed through.
    pub fn apply<E: Element>(&self, x: &Tensor<E>) -> Tensor<E> {
        if x.is_complex() {
            return x.clone();
        }

        match self {
            NoOp::PassThrough => x.clone(),
            NoOp::Abs => x.map(|value| value.abs()),
            NoOp::Square => x.map(|value| value * value),
            NoOp::Fill(value) => Tensor::filled(E::from_f64(*value), x.shape().to_vec()),
        }
    }
}
