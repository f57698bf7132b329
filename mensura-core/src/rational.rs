//! Exact rational numbers
//!
//! A [`Rational`] is always stored canceled to lowest terms, with the sign
//! kept apart from two non-negative magnitudes and a strictly positive
//! divisor. Zero has exactly one representation (`0/1`).

use dashu_base::{Gcd, UnsignedAbs};
use dashu_int::{IBig, UBig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::decimal::pow10;
use crate::{math_context, Decimal, MathContext, NumberError, RoundingMode};

/// Exact fraction of two arbitrary precision integers
#[derive(Clone)]
pub struct Rational {
    signum: i8,
    abs_dividend: UBig,
    abs_divisor: UBig,
    /// Decimal expansion under the context current at first use
    decimal: OnceLock<Decimal>,
}

fn sign_of(v: &IBig) -> i8 {
    match v.cmp(&IBig::ZERO) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl Rational {
    // ========== Construction ==========

    pub fn zero() -> Self {
        Self::canonical(0, UBig::ZERO, UBig::ONE)
    }

    pub fn one() -> Self {
        Self::canonical(1, UBig::ONE, UBig::ONE)
    }

    /// Cancel by GCD; callers guarantee `abs_divisor != 0`
    fn canonical(signum: i8, abs_dividend: UBig, abs_divisor: UBig) -> Self {
        if abs_dividend == UBig::ZERO {
            return Self {
                signum: 0,
                abs_dividend: UBig::ZERO,
                abs_divisor: UBig::ONE,
                decimal: OnceLock::new(),
            };
        }
        let gcd = abs_dividend.clone().gcd(abs_divisor.clone());
        let (abs_dividend, abs_divisor) = if gcd == UBig::ONE {
            (abs_dividend, abs_divisor)
        } else {
            (abs_dividend / &gcd, abs_divisor / &gcd)
        };
        Self { signum, abs_dividend, abs_divisor, decimal: OnceLock::new() }
    }

    /// Signed numerator over a known non-zero divisor
    fn from_signed(dividend: IBig, abs_divisor: UBig) -> Self {
        let signum = sign_of(&dividend);
        Self::canonical(signum, dividend.unsigned_abs(), abs_divisor)
    }

    pub fn of(dividend: i64, divisor: i64) -> Result<Self, NumberError> {
        Self::of_big(IBig::from(dividend), IBig::from(divisor))
    }

    pub fn of_big(dividend: IBig, divisor: IBig) -> Result<Self, NumberError> {
        if divisor == IBig::ZERO {
            return Err(NumberError::ZeroDivisor(dividend.to_string()));
        }
        let signum = sign_of(&dividend) * sign_of(&divisor);
        Ok(Self::canonical(signum, dividend.unsigned_abs(), divisor.unsigned_abs()))
    }

    pub fn of_integer(n: i64) -> Self {
        Self::from_integer(IBig::from(n))
    }

    pub fn from_integer(n: IBig) -> Self {
        Self::from_signed(n, UBig::ONE)
    }

    /// Exact value of a decimal, from its unscaled magnitude and scale
    pub fn from_decimal(value: &Decimal) -> Self {
        let scale = value.scale();
        if scale <= 0 {
            Self::from_integer(value.unscaled() * pow10((-scale) as usize))
        } else {
            Self::from_signed(value.unscaled().clone(), pow10(scale as usize).unsigned_abs())
        }
    }

    /// Exact value of the shortest decimal that round-trips to `f`
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        Ok(Self::from_decimal(&Decimal::from_f64(f)?))
    }

    pub fn from_f32(f: f32) -> Result<Self, NumberError> {
        Ok(Self::from_decimal(&Decimal::from_f32(f)?))
    }

    // ========== Accessors ==========

    pub fn signum(&self) -> i32 {
        self.signum as i32
    }

    pub fn abs_dividend(&self) -> &UBig {
        &self.abs_dividend
    }

    pub fn abs_divisor(&self) -> &UBig {
        &self.abs_divisor
    }

    /// Signed numerator
    pub fn dividend(&self) -> IBig {
        let magnitude = IBig::from(self.abs_dividend.clone());
        if self.signum < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Positive denominator
    pub fn divisor(&self) -> IBig {
        IBig::from(self.abs_divisor.clone())
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.signum == 0
    }

    pub fn is_one(&self) -> bool {
        self.signum == 1 && self.abs_dividend == UBig::ONE && self.abs_divisor == UBig::ONE
    }

    pub fn is_negative(&self) -> bool {
        self.signum < 0
    }

    pub fn is_integer(&self) -> bool {
        self.abs_divisor == UBig::ONE
    }

    // ========== Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let dividend = self.dividend() * other.divisor() + other.dividend() * self.divisor();
        Self::from_signed(dividend, &self.abs_divisor * &other.abs_divisor)
    }

    pub fn subtract(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        Self::canonical(
            self.signum * other.signum,
            &self.abs_dividend * &other.abs_dividend,
            &self.abs_divisor * &other.abs_divisor,
        )
    }

    pub fn divide(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(self.multiply(&other.reciprocal()?))
    }

    pub fn negate(&self) -> Self {
        Self {
            signum: -self.signum,
            abs_dividend: self.abs_dividend.clone(),
            abs_divisor: self.abs_divisor.clone(),
            decimal: OnceLock::new(),
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    pub fn reciprocal(&self) -> Result<Self, NumberError> {
        if self.is_zero() {
            return Err(NumberError::ReciprocalOfZero);
        }
        Ok(Self {
            signum: self.signum,
            abs_dividend: self.abs_divisor.clone(),
            abs_divisor: self.abs_dividend.clone(),
            decimal: OnceLock::new(),
        })
    }

    /// Integer power. Negative exponents invert first.
    pub fn pow(&self, exponent: i32) -> Result<Self, NumberError> {
        if exponent == 0 {
            if self.is_zero() {
                return Err(NumberError::ZeroToZero);
            }
            return Ok(Self::one());
        }
        let base = if exponent < 0 { self.reciprocal()? } else { self.clone() };
        let n = exponent.unsigned_abs() as usize;
        let signum = if base.signum < 0 && n % 2 == 1 { -1 } else { base.signum };
        // Powers of coprime magnitudes stay coprime, so no re-cancel is needed
        Ok(Self {
            signum,
            abs_dividend: base.abs_dividend.pow(n),
            abs_divisor: base.abs_divisor.pow(n),
            decimal: OnceLock::new(),
        })
    }

    /// Exact ordering by cross-multiplication
    pub fn compare_to(&self, other: &Self) -> Ordering {
        if self.signum != other.signum {
            return self.signum.cmp(&other.signum);
        }
        (self.dividend() * other.divisor()).cmp(&(other.dividend() * self.divisor()))
    }

    // ========== Conversion ==========

    /// Decimal expansion, computed once under the global math context
    pub fn to_decimal(&self) -> &Decimal {
        self.decimal.get_or_init(|| self.to_decimal_with(&math_context()))
    }

    /// Decimal expansion under an explicit context (not memoized)
    pub fn to_decimal_with(&self, ctx: &MathContext) -> Decimal {
        Decimal::quotient(&self.dividend(), &self.divisor(), 0, ctx)
    }

    /// Integer part, truncated towards zero
    pub fn trunc(&self) -> IBig {
        self.dividend() / self.divisor()
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> f64 {
        self.to_decimal_with(&MathContext::new(20, RoundingMode::HalfEven)).to_f64()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::of_integer(n)
    }
}

impl From<IBig> for Rational {
    fn from(n: IBig) -> Self {
        Self::from_integer(n)
    }
}

impl From<&Decimal> for Rational {
    fn from(d: &Decimal) -> Self {
        Self::from_decimal(d)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signum < 0 { "-" } else { "" };
        if self.is_integer() {
            write!(f, "{}{}", sign, self.abs_dividend)
        } else {
            write!(f, "{}{}/{}", sign, self.abs_dividend, self.abs_divisor)
        }
    }
}

impl FromStr for Rational {
    type Err = NumberError;

    /// Supports: "3", "-7/2", "1.25", "6e-1"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.split_once('/') {
            Some((num, den)) => {
                let num: IBig = num.trim().parse().map_err(|_| NumberError::ParseError(s.to_string()))?;
                let den: IBig = den.trim().parse().map_err(|_| NumberError::ParseError(s.to_string()))?;
                Self::of_big(num, den)
            }
            None => Ok(Self::from_decimal(&text.parse::<Decimal>()?)),
        }
    }
}

/// Equality compares decimal expansions at the configured precision, so
/// two distinct fractions that agree to every retained digit are equal.
impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        if self.signum == other.signum
            && self.abs_dividend == other.abs_dividend
            && self.abs_divisor == other.abs_divisor
        {
            return true;
        }
        self.to_decimal() == other.to_decimal()
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else {
            Some(self.compare_to(other))
        }
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
