use half::f16;
use ndaccum_common::Element;

/// Precision used for the reduction.
pub trait ReducePrecision: Send + Sync + 'static {
    /// Precision used for the input tensor.
    type EI: Element;
    /// Precision used for the accumulation.
    type EA: Element;
}

impl<EI: Element, EA: Element> ReducePrecision for (EI, EA) {
    type EI = EI;
    type EA = EA;
}

impl ReducePrecision for f64 {
    type EI = f64;
    type EA = f64;
}

impl ReducePrecision for f32 {
    type EI = f32;
    type EA = f32;
}

impl ReducePrecision for f16 {
    type EI = f16;
    type EA = f32;
}
