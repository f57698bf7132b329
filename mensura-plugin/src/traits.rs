//! Number system traits

use mensura_core::{math_context, MathContext, NumberError, Scalar};
use serde::Serialize;
use std::cmp::Ordering;

/// Metadata describing a number system
#[derive(Debug, Clone, Serialize)]
pub struct NumberSystemMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Integer and rational arithmetic never rounds
    pub exact: bool,
}

/// Pluggable arithmetic engine over [`Scalar`] values.
///
/// Every operation accepts any pair of representations. An engine that
/// cannot handle a value reports [`NumberError::Unsupported`] instead of
/// silently converting it to a lossy form.
pub trait NumberSystem: Send + Sync {
    fn meta(&self) -> NumberSystemMeta;

    fn name(&self) -> &'static str {
        self.meta().name
    }

    /// Precision used by the inexact fallback paths of this engine
    fn context(&self) -> MathContext {
        math_context()
    }

    fn add(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError>;
    fn subtract(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError>;
    fn multiply(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError>;
    fn divide(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError>;

    /// `x^exponent`; `0^0` is an error
    fn power(&self, x: &Scalar, exponent: i32) -> Result<Scalar, NumberError>;
    fn reciprocal(&self, x: &Scalar) -> Result<Scalar, NumberError>;
    fn negate(&self, x: &Scalar) -> Result<Scalar, NumberError>;
    fn abs(&self, x: &Scalar) -> Result<Scalar, NumberError>;
    fn signum(&self, x: &Scalar) -> Result<i32, NumberError>;
    fn compare(&self, x: &Scalar, y: &Scalar) -> Result<Ordering, NumberError>;
    fn is_integer(&self, x: &Scalar) -> Result<bool, NumberError>;

    /// Most compact exact representation of `x`
    fn narrow(&self, x: &Scalar) -> Result<Scalar, NumberError>;

    /// Integral quotient and remainder of `x / y`.
    ///
    /// The quotient is truncated towards zero and the remainder carries
    /// the sign of `x`. With `round_towards_zero` an inexact remainder is
    /// truncated to an integer as well.
    fn divide_and_remainder(
        &self,
        x: &Scalar,
        y: &Scalar,
        round_towards_zero: bool,
    ) -> Result<(Scalar, Scalar), NumberError>;

    /// Natural exponential
    fn exp(&self, x: &Scalar) -> Result<Scalar, NumberError>;

    /// Natural logarithm
    fn log(&self, x: &Scalar) -> Result<Scalar, NumberError>;

    fn is_zero(&self, x: &Scalar) -> Result<bool, NumberError> {
        Ok(self.signum(x)? == 0)
    }

    fn is_one(&self, x: &Scalar) -> Result<bool, NumberError> {
        Ok(self.compare(x, &Scalar::one())? == Ordering::Equal)
    }

    /// `|x| < 1`
    fn is_less_than_one(&self, x: &Scalar) -> Result<bool, NumberError> {
        let magnitude = self.abs(x)?;
        Ok(self.compare(&magnitude, &Scalar::one())? == Ordering::Less)
    }
}
