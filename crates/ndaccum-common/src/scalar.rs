use derive_more::Display;
use half::f16;
use serde::{Deserialize, Serialize};

use crate::Precision;

/// A single numeric value tagged with the precision it was produced at.
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Double precision value.
    F64(f64),
    /// Single precision value.
    F32(f32),
    /// Half precision value.
    F16(f16),
}

impl Scalar {
    /// The precision the value is stored at.
    pub fn precision(&self) -> Precision {
        match self {
            Scalar::F64(_) => Precision::Double,
            Scalar::F32(_) => Precision::Single,
            Scalar::F16(_) => Precision::Half,
        }
    }

    /// Widen the value to double precision.
    pub fn to_f64(&self) -> f64 {
        match self {
            Scalar::F64(value) => *value,
            Scalar::F32(value) => *value as f64,
            Scalar::F16(value) => value.to_f64(),
        }
    }

    /// Convert the value to the given precision.
    pub fn cast(&self, precision: Precision) -> Scalar {
        if self.precision() == precision {
            return *self;
        }

        let value = self.to_f64();
        match precision {
            Precision::Double => Scalar::F64(value),
            Precision::Single => Scalar::F32(value as f32),
            Precision::Half => Scalar::F16(f16::from_f64(value)),
        }
    }

    /// Bitwise equality: same precision and same bit pattern.
    ///
    /// Unlike `==`, a NaN is equal to itself and `0.0` differs from `-0.0`.
    pub fn bit_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::F64(lhs), Scalar::F64(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Scalar::F32(lhs), Scalar::F32(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Scalar::F16(lhs), Scalar::F16(rhs)) => lhs.to_bits() == rhs.to_bits(),
            _ => false,
        }
    }

    /// Native little-endian bytes of the value.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Scalar::F64(value) => value.to_le_bytes().to_vec(),
            Scalar::F32(value) => value.to_le_bytes().to_vec(),
            Scalar::F16(value) => value.to_le_bytes().to_vec(),
        }
    }
}

/// Pack a sequence of extra arguments into the byte layout consumed by backend kernels.
///
/// Each scalar is written at its own precision, one after the other, without padding.
pub fn pack_extra_args(args: &[Scalar]) -> Vec<u8> {
    let size = args.iter().map(|arg| arg.precision().size()).sum();
    let mut bytes = Vec::with_capacity(size);
    for arg in args {
        bytes.extend_from_slice(&arg.to_le_bytes());
    }
    bytes
}
