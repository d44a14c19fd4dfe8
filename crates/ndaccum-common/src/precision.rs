use core::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Numeric representation width at which a reduction evaluates its identity and arithmetic.
///
/// Backend dispatch may pick any of the three variants independently of the reduction
/// author's intent, so every reduction declares an identity for each of them.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    /// IEEE 754 binary64.
    #[display("double")]
    #[serde(rename = "double")]
    Double,
    /// IEEE 754 binary32.
    #[display("single")]
    #[serde(rename = "single")]
    Single,
    /// IEEE 754 binary16.
    #[display("half")]
    #[serde(rename = "half")]
    Half,
}

impl Precision {
    /// All declared precisions, widest first.
    pub const ALL: [Precision; 3] = [Precision::Double, Precision::Single, Precision::Half];

    /// Size of one element of this precision in bytes.
    pub const fn size(&self) -> usize {
        match self {
            Precision::Double => 8,
            Precision::Single => 4,
            Precision::Half => 2,
        }
    }
}

/// A precision name that doesn't match any declared [precision](Precision).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown precision `{0}`, expected one of double, single or half")]
pub struct UnknownPrecision(pub String);

impl FromStr for Precision {
    type Err = UnknownPrecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "double" | "f64" => Ok(Precision::Double),
            "single" | "float" | "f32" => Ok(Precision::Single),
            "half" | "f16" => Ok(Precision::Half),
            _ => Err(UnknownPrecision(s.to_string())),
        }
    }
}
