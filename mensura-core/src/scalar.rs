//! Scalar values across every supported representation
//!
//! [`Scalar`] is the closed set of numeric representations a number system
//! operates on. [`Representation`] names each variant; its declaration
//! order is the widening order used to pick the wider operand of a binary
//! operation.

use dashu_int::IBig;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Decimal, MathContext, NumberError, Rational};

/// Kind of a [`Scalar`], ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    I8,
    I16,
    I32,
    I64,
    #[serde(rename = "bigint")]
    BigInt,
    Rational,
    F32,
    F64,
    Decimal,
}

impl Representation {
    /// Fixed-width or arbitrary precision integer
    pub fn is_integer(self) -> bool {
        self <= Representation::BigInt
    }

    /// Integer or rational: arithmetic stays exact
    pub fn is_exact(self) -> bool {
        self <= Representation::Rational
    }

    pub fn is_float(self) -> bool {
        matches!(self, Representation::F32 | Representation::F64)
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Representation::I8 => "i8",
            Representation::I16 => "i16",
            Representation::I32 => "i32",
            Representation::I64 => "i64",
            Representation::BigInt => "bigint",
            Representation::Rational => "rational",
            Representation::F32 => "f32",
            Representation::F64 => "f64",
            Representation::Decimal => "decimal",
        };
        write!(f, "{}", name)
    }
}

/// A number in one of the supported representations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalarRepr", into = "ScalarRepr")]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    BigInt(IBig),
    Rational(Rational),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
}

impl Scalar {
    pub fn zero() -> Self {
        Scalar::I8(0)
    }

    pub fn one() -> Self {
        Scalar::I8(1)
    }

    pub fn representation(&self) -> Representation {
        match self {
            Scalar::I8(_) => Representation::I8,
            Scalar::I16(_) => Representation::I16,
            Scalar::I32(_) => Representation::I32,
            Scalar::I64(_) => Representation::I64,
            Scalar::BigInt(_) => Representation::BigInt,
            Scalar::Rational(_) => Representation::Rational,
            Scalar::F32(_) => Representation::F32,
            Scalar::F64(_) => Representation::F64,
            Scalar::Decimal(_) => Representation::Decimal,
        }
    }

    /// Integer result as `I64` when it fits, otherwise `BigInt`
    pub fn from_integer(value: IBig) -> Self {
        match i64::try_from(value.clone()) {
            Ok(n) => Scalar::I64(n),
            Err(_) => Scalar::BigInt(value),
        }
    }

    /// Integer in the narrowest fixed-width type that holds it exactly
    pub fn narrowest_integer(value: IBig) -> Self {
        match i64::try_from(value.clone()) {
            Ok(n) => Self::narrowest_i64(n),
            Err(_) => Scalar::BigInt(value),
        }
    }

    pub fn narrowest_i64(n: i64) -> Self {
        if let Ok(v) = i8::try_from(n) {
            Scalar::I8(v)
        } else if let Ok(v) = i16::try_from(n) {
            Scalar::I16(v)
        } else if let Ok(v) = i32::try_from(n) {
            Scalar::I32(v)
        } else {
            Scalar::I64(n)
        }
    }

    /// Exact rational result, collapsed to an integer when the divisor is 1
    pub fn from_rational(value: Rational) -> Self {
        if value.is_integer() {
            Self::from_integer(value.dividend())
        } else {
            Scalar::Rational(value)
        }
    }

    /// Value of a fixed-width integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I8(v) => Some(*v as i64),
            Scalar::I16(v) => Some(*v as i64),
            Scalar::I32(v) => Some(*v as i64),
            Scalar::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of any integer representation
    pub fn to_integer(&self) -> Option<IBig> {
        match self {
            Scalar::BigInt(v) => Some(v.clone()),
            other => other.as_i64().map(IBig::from),
        }
    }

    /// Exact rational value of an integer or rational
    pub fn to_rational(&self) -> Option<Rational> {
        match self {
            Scalar::Rational(r) => Some(r.clone()),
            other => other.to_integer().map(Rational::from_integer),
        }
    }

    /// Floating point payload, widened to f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::F32(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// False only for NaN or infinite floats
    pub fn is_finite(&self) -> bool {
        self.as_float().map_or(true, f64::is_finite)
    }

    /// Reject NaN and infinities
    pub fn ensure_finite(&self) -> Result<(), NumberError> {
        match self.as_float() {
            Some(f) if !f.is_finite() => Err(NumberError::NonFinite(f)),
            _ => Ok(()),
        }
    }

    /// Decimal value; exact except for rationals, which round under `ctx`
    pub fn to_decimal(&self, ctx: &MathContext) -> Result<Decimal, NumberError> {
        match self {
            Scalar::Rational(r) => Ok(r.to_decimal_with(ctx)),
            Scalar::F32(f) => Decimal::from_f32(*f),
            Scalar::F64(f) => Decimal::from_f64(*f),
            Scalar::Decimal(d) => Ok(d.clone()),
            other => other
                .to_integer()
                .map(Decimal::from_integer)
                .ok_or_else(|| NumberError::internal(format!("no decimal form for {}", other.representation()))),
        }
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> f64 {
        match self {
            Scalar::I8(v) => *v as f64,
            Scalar::I16(v) => *v as f64,
            Scalar::I32(v) => *v as f64,
            Scalar::I64(v) => *v as f64,
            Scalar::BigInt(v) => v.to_string().parse().unwrap_or(f64::NAN),
            Scalar::Rational(r) => r.to_f64(),
            Scalar::F32(v) => *v as f64,
            Scalar::F64(v) => *v,
            Scalar::Decimal(d) => d.to_f64(),
        }
    }

    /// Parse text produced by `Display` back into the given representation
    pub fn parse_as(kind: Representation, text: &str) -> Result<Self, NumberError> {
        let err = || NumberError::ParseError(format!("{} as {}", text, kind));
        let text = text.trim();
        Ok(match kind {
            Representation::I8 => Scalar::I8(text.parse().map_err(|_| err())?),
            Representation::I16 => Scalar::I16(text.parse().map_err(|_| err())?),
            Representation::I32 => Scalar::I32(text.parse().map_err(|_| err())?),
            Representation::I64 => Scalar::I64(text.parse().map_err(|_| err())?),
            Representation::BigInt => Scalar::BigInt(text.parse().map_err(|_| err())?),
            Representation::Rational => Scalar::Rational(text.parse()?),
            Representation::F32 => Scalar::F32(text.parse().map_err(|_| err())?),
            Representation::F64 => Scalar::F64(text.parse().map_err(|_| err())?),
            Representation::Decimal => Scalar::Decimal(text.parse()?),
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::BigInt(v) => write!(f, "{}", v),
            Scalar::Rational(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Decimal(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    IBig => BigInt,
    Rational => Rational,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
}

/// Tagged text form used for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalarRepr {
    #[serde(rename = "type")]
    kind: Representation,
    value: String,
}

impl From<Scalar> for ScalarRepr {
    fn from(s: Scalar) -> Self {
        ScalarRepr { kind: s.representation(), value: s.to_string() }
    }
}

impl TryFrom<ScalarRepr> for Scalar {
    type Error = NumberError;

    fn try_from(repr: ScalarRepr) -> Result<Self, Self::Error> {
        Scalar::parse_as(repr.kind, &repr.value)
    }
}
