//! Mensura Core - numeric representations
//!
//! This crate provides the value types the unit engine computes with:
//! - `Scalar`: a number in one of several representations
//! - `Rational`: exact fractions of arbitrary precision integers
//! - `Decimal`: arbitrary precision decimals rounded under a `MathContext`
//! - `NumberError`: structured arithmetic errors

mod context;
mod decimal;
mod error;
mod pi;
mod proptests;
mod rational;
mod scalar;

pub use context::{math_context, set_math_context, MathContext, RoundingMode, DEFAULT_PRECISION};
pub use decimal::Decimal;
pub use error::{codes, ErrorKind, NumberError};
pub use pi::pi;
pub use rational::Rational;
pub use scalar::{Representation, Scalar};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{Decimal, MathContext, NumberError, Rational, Representation, RoundingMode, Scalar};
}
