use core::fmt::{Debug, Display};

use half::f16;
use num_traits::Float;

use crate::{Precision, Scalar};

/// A floating-point element a tensor can hold and a reduction can accumulate into.
pub trait Element:
    Float + bytemuck::Pod + Default + Debug + Display + Send + Sync + 'static
{
    /// Precision of this element type.
    const PRECISION: Precision;

    /// Convert a scalar of any precision into this element type.
    ///
    /// Scalars already at [`Self::PRECISION`] are returned bit-for-bit.
    fn from_scalar(scalar: Scalar) -> Self;

    /// Wrap the value into a precision-typed scalar.
    fn into_scalar(self) -> Scalar;

    /// Lossy conversion from a double.
    fn from_f64(value: f64) -> Self;

    /// Widening conversion to a double.
    fn as_f64(self) -> f64;

    /// Convert into another element type, going through double precision.
    fn cast<E: Element>(self) -> E {
        E::from_f64(self.as_f64())
    }
}

impl Element for f64 {
    const PRECISION: Precision = Precision::Double;

    fn from_scalar(scalar: Scalar) -> Self {
        match scalar {
            Scalar::F64(value) => value,
            other => other.to_f64(),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::F64(self)
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}

impl Element for f32 {
    const PRECISION: Precision = Precision::Single;

    fn from_scalar(scalar: Scalar) -> Self {
        match scalar {
            Scalar::F32(value) => value,
            other => other.to_f64() as f32,
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::F32(self)
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f16 {
    const PRECISION: Precision = Precision::Half;

    fn from_scalar(scalar: Scalar) -> Self {
        match scalar {
            Scalar::F16(value) => value,
            other => f16::from_f64(other.to_f64()),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::F16(self)
    }

    fn from_f64(value: f64) -> Self {
        f16::from_f64(value)
    }

    fn as_f64(self) -> f64 {
        self.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scalar_keeps_bits_at_same_precision() {
        let negative_zero = f16::from_bits(0x8000);
        let value = f16::from_scalar(Scalar::F16(negative_zero));
        assert_eq!(value.to_bits(), 0x8000);
    }

    #[test]
    fn cast_between_precisions() {
        let value: f32 = f16::from_f32(1.5).cast();
        assert_eq!(value, 1.5);
        assert_eq!(f64::PRECISION, Precision::Double);
        assert_eq!(f16::PRECISION.size(), 2);
    }
}
