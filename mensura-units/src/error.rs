//! Unit layer errors

use mensura_core::{ErrorKind, NumberError};
use thiserror::Error;

use crate::Dimension;

/// Error codes added by the unit layer
pub mod codes {
    pub const INCOMPATIBLE_DIMENSIONS: &str = "INCOMPATIBLE_DIMENSIONS";
    pub const NON_LINEAR_RADIX: &str = "NON_LINEAR_RADIX";
    pub const RADIX_ORDER: &str = "RADIX_ORDER";
    pub const TOO_MANY_COEFFICIENTS: &str = "TOO_MANY_COEFFICIENTS";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("cannot convert {from} ({from_dim}) to {to} ({to_dim}): incompatible dimensions")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },

    #[error("converter from {from} to {to} is not linear")]
    NonLinearRadix { from: String, to: String },

    #[error("{unit} is not smaller than {previous}: mixed radix units must decrease in size")]
    RadixOrder { unit: String, previous: String },

    #[error("{given} coefficients for a mixed radix of {units} units")]
    TooManyCoefficients { given: usize, units: usize },

    #[error(transparent)]
    Number(#[from] NumberError),
}

impl UnitError {
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::IncompatibleDimensions { .. } => codes::INCOMPATIBLE_DIMENSIONS,
            UnitError::NonLinearRadix { .. } => codes::NON_LINEAR_RADIX,
            UnitError::RadixOrder { .. } => codes::RADIX_ORDER,
            UnitError::TooManyCoefficients { .. } => codes::TOO_MANY_COEFFICIENTS,
            UnitError::Number(e) => e.code(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UnitError::NonLinearRadix { .. } | UnitError::RadixOrder { .. } => ErrorKind::Construction,
            UnitError::IncompatibleDimensions { .. } | UnitError::TooManyCoefficients { .. } => ErrorKind::Operation,
            UnitError::Number(e) => e.kind(),
        }
    }
}
