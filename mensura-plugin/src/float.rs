//! Double precision number system

use mensura_core::{NumberError, Scalar};
use std::cmp::Ordering;

use crate::{NumberSystem, NumberSystemMeta};

/// Engine computing every operation in `f64`.
///
/// Values whose magnitude does not fit an `f64` are reported as
/// unsupported rather than turned into infinities.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatNumberSystem;

impl FloatNumberSystem {
    pub const NAME: &'static str = "float";

    pub fn new() -> Self {
        Self
    }

    fn value(x: &Scalar) -> Result<f64, NumberError> {
        x.ensure_finite()?;
        let v = x.to_f64();
        if v.is_finite() {
            Ok(v)
        } else {
            Err(NumberError::unsupported(format!("{} {} out of f64 range", x.representation(), x)))
        }
    }

    fn result(v: f64) -> Result<Scalar, NumberError> {
        if v.is_finite() {
            Ok(Scalar::F64(v))
        } else {
            Err(NumberError::NonFinite(v))
        }
    }
}

impl NumberSystem for FloatNumberSystem {
    fn meta(&self) -> NumberSystemMeta {
        NumberSystemMeta {
            name: Self::NAME,
            description: "IEEE 754 double precision arithmetic",
            exact: false,
        }
    }

    fn add(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(Self::value(x)? + Self::value(y)?)
    }

    fn subtract(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(Self::value(x)? - Self::value(y)?)
    }

    fn multiply(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(Self::value(x)? * Self::value(y)?)
    }

    fn divide(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        let (a, b) = (Self::value(x)?, Self::value(y)?);
        if b == 0.0 {
            return Err(NumberError::DivisionByZero);
        }
        Self::result(a / b)
    }

    fn power(&self, x: &Scalar, exponent: i32) -> Result<Scalar, NumberError> {
        let a = Self::value(x)?;
        if a == 0.0 && exponent == 0 {
            return Err(NumberError::ZeroToZero);
        }
        Self::result(a.powi(exponent))
    }

    fn reciprocal(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        let a = Self::value(x)?;
        if a == 0.0 {
            return Err(NumberError::ReciprocalOfZero);
        }
        Self::result(1.0 / a)
    }

    fn negate(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(-Self::value(x)?)
    }

    fn abs(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(Self::value(x)?.abs())
    }

    fn signum(&self, x: &Scalar) -> Result<i32, NumberError> {
        let a = Self::value(x)?;
        Ok(if a == 0.0 { 0 } else if a < 0.0 { -1 } else { 1 })
    }

    fn compare(&self, x: &Scalar, y: &Scalar) -> Result<Ordering, NumberError> {
        let (a, b) = (Self::value(x)?, Self::value(y)?);
        a.partial_cmp(&b)
            .ok_or_else(|| NumberError::internal("finite values must be ordered"))
    }

    fn is_integer(&self, x: &Scalar) -> Result<bool, NumberError> {
        Ok(Self::value(x)?.fract() == 0.0)
    }

    fn narrow(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        let a = Self::value(x)?;
        if a.fract() == 0.0 && a >= i64::MIN as f64 && a < i64::MAX as f64 {
            Ok(Scalar::narrowest_i64(a as i64))
        } else {
            Ok(Scalar::F64(a))
        }
    }

    fn divide_and_remainder(
        &self,
        x: &Scalar,
        y: &Scalar,
        round_towards_zero: bool,
    ) -> Result<(Scalar, Scalar), NumberError> {
        let (a, b) = (Self::value(x)?, Self::value(y)?);
        if b == 0.0 {
            return Err(NumberError::DivisionByZero);
        }
        let quotient = (a / b).trunc();
        let remainder = a % b;
        let remainder = if round_towards_zero { remainder.trunc() } else { remainder };
        Ok((Self::result(quotient)?, Self::result(remainder)?))
    }

    fn exp(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        Self::result(Self::value(x)?.exp())
    }

    fn log(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        let a = Self::value(x)?;
        if a <= 0.0 {
            return Err(NumberError::domain("logarithm of non-positive number"));
        }
        Self::result(a.ln())
    }
}
