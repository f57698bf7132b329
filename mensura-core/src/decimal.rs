//! Arbitrary precision decimal numbers
//!
//! A [`Decimal`] is `unscaled × 10^-scale` with an arbitrary precision
//! unscaled magnitude. Addition, subtraction and multiplication are exact;
//! division and the transcendental functions round under a
//! [`MathContext`]. Transcendentals go through dashu-float's `DBig`.

use dashu_base::{BitTest, UnsignedAbs};
use dashu_float::DBig;
use dashu_int::{IBig, UBig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{MathContext, NumberError};

/// Extra digits carried through intermediate transcendental steps
const GUARD_DIGITS: u32 = 10;

/// `10^n` as an arbitrary precision integer
pub(crate) fn pow10(n: usize) -> IBig {
    IBig::from(10u8).pow(n)
}

/// Number of decimal digits in the magnitude of `v` (zero has one digit)
pub(crate) fn digit_count(v: &IBig) -> usize {
    let magnitude = v.unsigned_abs();
    if magnitude == UBig::ZERO {
        return 1;
    }
    // Lower bound from the bit length; the true count is at most one more
    let estimate = ((magnitude.bit_len() - 1) as f64 * std::f64::consts::LOG10_2) as usize + 1;
    if magnitude >= UBig::from(10u8).pow(estimate) {
        estimate + 1
    } else {
        estimate
    }
}

/// Arbitrary precision decimal number
#[derive(Debug, Clone)]
pub struct Decimal {
    unscaled: IBig,
    scale: i64,
}

impl Decimal {
    // ========== Construction ==========

    pub fn new(unscaled: IBig, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    pub fn zero() -> Self {
        Self::new(IBig::ZERO, 0)
    }

    pub fn one() -> Self {
        Self::new(IBig::ONE, 0)
    }

    pub fn from_i64(n: i64) -> Self {
        Self::new(IBig::from(n), 0)
    }

    pub fn from_integer(n: IBig) -> Self {
        Self::new(n, 0)
    }

    /// Exact decimal form of a finite `f64`, using its shortest
    /// round-trip representation so no spurious binary digits appear.
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::NonFinite(f));
        }
        format!("{:e}", f).parse()
    }

    pub fn from_f32(f: f32) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::NonFinite(f as f64));
        }
        format!("{:e}", f).parse()
    }

    pub fn from_dbig(value: DBig) -> Self {
        let (significand, exponent) = value.into_repr().into_parts();
        Self::new(significand, -(exponent as i64))
    }

    pub fn to_dbig(&self) -> DBig {
        DBig::from_parts(self.unscaled.clone(), -self.scale as isize)
    }

    // ========== Accessors ==========

    pub fn unscaled(&self) -> &IBig {
        &self.unscaled
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Number of significant digits in the unscaled value
    pub fn precision(&self) -> usize {
        digit_count(&self.unscaled)
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.unscaled == IBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled < IBig::ZERO
    }

    pub fn signum(&self) -> i32 {
        match self.unscaled.cmp(&IBig::ZERO) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.to_integer().is_some()
    }

    // ========== Exact Arithmetic ==========

    pub fn negate(&self) -> Self {
        Self::new(-&self.unscaled, self.scale)
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    /// Both unscaled values brought to the larger of the two scales
    fn aligned(&self, other: &Self) -> (IBig, IBig, i64) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Less => {
                let shift = (other.scale - self.scale) as usize;
                (&self.unscaled * pow10(shift), other.unscaled.clone(), other.scale)
            }
            Ordering::Greater => {
                let shift = (self.scale - other.scale) as usize;
                (self.unscaled.clone(), &other.unscaled * pow10(shift), self.scale)
            }
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Self::new(a + b, scale)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Self::new(a - b, scale)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.unscaled * &other.unscaled, self.scale + other.scale)
    }

    // ========== Rounded Arithmetic ==========

    /// Round to `ctx.precision` significant digits
    pub fn round(&self, ctx: &MathContext) -> Self {
        round_digits(self.unscaled.clone(), self.scale, false, ctx)
    }

    /// Division rounded under `ctx`
    pub fn div(&self, other: &Self, ctx: &MathContext) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Self::quotient(&self.unscaled, &other.unscaled, self.scale - other.scale, ctx))
    }

    /// `num / den × 10^-scale` rounded under `ctx`; `den` must be non-zero
    pub(crate) fn quotient(num: &IBig, den: &IBig, scale: i64, ctx: &MathContext) -> Self {
        if *num == IBig::ZERO {
            return Self::zero();
        }
        // Scale the dividend so the integer quotient carries at least
        // precision + 2 digits before rounding.
        let spread = digit_count(num) as i64 - digit_count(den) as i64;
        let shift = ctx.precision as i64 + 3 - spread;
        let (num, den) = if shift >= 0 {
            (num * pow10(shift as usize), den.clone())
        } else {
            (num.clone(), den * pow10((-shift) as usize))
        };
        let quotient = &num / &den;
        let sticky = &num % &den != IBig::ZERO;
        round_digits(quotient, scale + shift, sticky, ctx)
    }

    pub fn reciprocal(&self, ctx: &MathContext) -> Result<Self, NumberError> {
        if self.is_zero() {
            return Err(NumberError::ReciprocalOfZero);
        }
        Self::one().div(self, ctx)
    }

    /// Integer power, rounded under `ctx`
    pub fn pow(&self, exponent: i32, ctx: &MathContext) -> Result<Self, NumberError> {
        if exponent == 0 {
            if self.is_zero() {
                return Err(NumberError::ZeroToZero);
            }
            return Ok(Self::one());
        }
        let work = ctx.with_precision(ctx.precision + GUARD_DIGITS);
        let mut base = self.clone();
        let mut result = Self::one();
        let mut n = exponent.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base).round(&work);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base).round(&work);
            }
        }
        if exponent < 0 {
            result.reciprocal(ctx)
        } else {
            Ok(result.round(ctx))
        }
    }

    /// Integral part of `self / other`, truncated towards zero
    pub fn divide_to_integral(&self, other: &Self) -> Result<IBig, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let shift = other.scale - self.scale;
        let (num, den) = if shift >= 0 {
            (&self.unscaled * pow10(shift as usize), other.unscaled.clone())
        } else {
            (self.unscaled.clone(), &other.unscaled * pow10((-shift) as usize))
        };
        Ok(num / den)
    }

    // ========== Transcendental Functions ==========

    /// Natural logarithm
    pub fn ln(&self, ctx: &MathContext) -> Result<Self, NumberError> {
        if self.signum() <= 0 {
            return Err(NumberError::domain("logarithm of non-positive number"));
        }
        let val = self
            .to_dbig()
            .with_precision((ctx.precision + GUARD_DIGITS) as usize)
            .value();
        Ok(Self::from_dbig(val.ln()).round(ctx))
    }

    /// Exponential function (e^x)
    pub fn exp(&self, ctx: &MathContext) -> Self {
        let val = self
            .to_dbig()
            .with_precision((ctx.precision + GUARD_DIGITS) as usize)
            .value();
        Self::from_dbig(val.exp()).round(ctx)
    }

    // ========== Integral Conversion ==========

    /// Exact integer value, if there is no fractional part
    pub fn to_integer(&self) -> Option<IBig> {
        if self.scale <= 0 {
            return Some(&self.unscaled * pow10((-self.scale) as usize));
        }
        let divisor = pow10(self.scale as usize);
        if &self.unscaled % &divisor == IBig::ZERO {
            Some(&self.unscaled / &divisor)
        } else {
            None
        }
    }

    /// Integer part, truncated towards zero
    pub fn trunc(&self) -> IBig {
        if self.scale <= 0 {
            return &self.unscaled * pow10((-self.scale) as usize);
        }
        &self.unscaled / pow10(self.scale as usize)
    }

    /// Largest integer not above `self`
    pub fn floor(&self) -> IBig {
        let truncated = self.trunc();
        if self.is_negative() && !self.is_integer() {
            truncated - IBig::ONE
        } else {
            truncated
        }
    }

    /// Same value with trailing zeros of the unscaled magnitude removed
    pub fn strip_trailing_zeros(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let ten = IBig::from(10u8);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        while &unscaled % &ten == IBig::ZERO {
            unscaled = unscaled / &ten;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    /// Convert to f64 (may lose precision, may overflow to infinity)
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }
}

/// Round `unscaled × 10^-scale` to `ctx.precision` significant digits.
///
/// `sticky` records that non-zero digits were already discarded below the
/// last digit of `unscaled`.
fn round_digits(unscaled: IBig, scale: i64, sticky: bool, ctx: &MathContext) -> Decimal {
    let negative = unscaled < IBig::ZERO;
    let magnitude = if negative { -unscaled } else { unscaled };
    let digits = digit_count(&magnitude);
    let precision = ctx.precision as usize;

    let (kept, discarded, divisor, drop) = if digits > precision {
        let drop = digits - precision;
        let divisor = pow10(drop);
        (&magnitude / &divisor, &magnitude % &divisor, divisor, drop)
    } else if sticky {
        (magnitude, IBig::ZERO, IBig::ONE, 0)
    } else {
        let unscaled = if negative { -magnitude } else { magnitude };
        return Decimal::new(unscaled, scale);
    };

    let half = match (IBig::from(2u8) * &discarded).cmp(&divisor) {
        Ordering::Equal if sticky => Ordering::Greater,
        other => other,
    };
    let inexact = sticky || discarded != IBig::ZERO;
    let odd = &kept % IBig::from(2u8) != IBig::ZERO;

    let mut kept = if ctx.rounding.round_up(negative, odd, half, inexact) {
        kept + IBig::ONE
    } else {
        kept
    };
    let mut scale = scale - drop as i64;
    if digit_count(&kept) > precision {
        kept = kept / IBig::from(10u8);
        scale -= 1;
    }
    let unscaled = if negative { -kept } else { kept };
    Decimal::new(unscaled, scale)
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<IBig> for Decimal {
    fn from(n: IBig) -> Self {
        Self::from_integer(n)
    }
}

impl FromStr for Decimal {
    type Err = NumberError;

    /// Supports: "123", "-3.14", ".5", "1.5e10", "602214076e15"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || NumberError::ParseError(s.to_string());

        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp: i64 = text[pos + 1..].trim_start_matches('+').parse().map_err(|_| err())?;
                (&text[..pos], exp)
            }
            None => (text, 0),
        };

        let (sign, body) = match mantissa.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let plain = if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        };
        let value: DBig = plain.parse().map_err(|_| err())?;
        let (unscaled, power) = value.into_repr().into_parts();
        let scale = (power as i64)
            .checked_add(exponent)
            .and_then(i64::checked_neg)
            .ok_or_else(err)?;
        Ok(Self::new(unscaled, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.unscaled.to_string();
        let digits = digits.trim_start_matches('-');

        if self.scale <= 0 {
            let zeros = if self.is_zero() { 0 } else { (-self.scale) as usize };
            return write!(f, "{}{}{}", sign, digits, "0".repeat(zeros));
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
