//! Default number system
//!
//! Binary operations classify both operands by [`Representation`] and
//! dispatch on the wider one:
//! - integers use checked 64-bit arithmetic, promoting to `BigInt` on overflow
//! - rationals (and integers mixed with them) combine exactly
//! - anything touching a float or a decimal is computed as a decimal and
//!   rounded under the engine's [`MathContext`]

use dashu_int::IBig;
use mensura_core::{math_context, Decimal, MathContext, NumberError, Rational, Representation, Scalar};
use std::cmp::Ordering;

use crate::{NumberSystem, NumberSystemMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOp {
    fn checked(self, x: i64, y: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Subtract => x.checked_sub(y),
            BinaryOp::Multiply => x.checked_mul(y),
        }
    }

    fn big(self, x: &IBig, y: &IBig) -> IBig {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Subtract => x - y,
            BinaryOp::Multiply => x * y,
        }
    }

    fn rational(self, x: &Rational, y: &Rational) -> Rational {
        match self {
            BinaryOp::Add => x.add(y),
            BinaryOp::Subtract => x.subtract(y),
            BinaryOp::Multiply => x.multiply(y),
        }
    }

    fn decimal(self, x: &Decimal, y: &Decimal) -> Decimal {
        match self {
            BinaryOp::Add => x.add(y),
            BinaryOp::Subtract => x.sub(y),
            BinaryOp::Multiply => x.mul(y),
        }
    }
}

/// Exact-where-possible arithmetic over every [`Scalar`] representation
#[derive(Debug, Clone, Default)]
pub struct DefaultNumberSystem {
    context: Option<MathContext>,
}

impl DefaultNumberSystem {
    pub const NAME: &'static str = "default";

    /// Engine following the global math context
    pub fn new() -> Self {
        Self { context: None }
    }

    /// Engine pinned to an explicit context
    pub fn with_context(mut self, ctx: MathContext) -> Self {
        self.context = Some(ctx);
        self
    }

    fn integer(x: &Scalar) -> Result<IBig, NumberError> {
        x.to_integer()
            .ok_or_else(|| NumberError::internal(format!("{} is not an integer", x.representation())))
    }

    fn rational(x: &Scalar) -> Result<Rational, NumberError> {
        x.to_rational()
            .ok_or_else(|| NumberError::internal(format!("{} is not exact", x.representation())))
    }

    fn decimal(&self, x: &Scalar) -> Result<Decimal, NumberError> {
        x.to_decimal(&self.context())
    }

    fn widest(x: &Scalar, y: &Scalar) -> Result<Representation, NumberError> {
        x.ensure_finite()?;
        y.ensure_finite()?;
        Ok(x.representation().max(y.representation()))
    }

    fn arithmetic(&self, op: BinaryOp, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        match Self::widest(x, y)? {
            wide if wide.is_integer() => match (x.as_i64(), y.as_i64()) {
                (Some(a), Some(b)) => Ok(op
                    .checked(a, b)
                    .map(Scalar::I64)
                    .unwrap_or_else(|| Scalar::from_integer(op.big(&IBig::from(a), &IBig::from(b))))),
                _ => Ok(Scalar::from_integer(op.big(&Self::integer(x)?, &Self::integer(y)?))),
            },
            Representation::Rational => {
                Ok(Scalar::from_rational(op.rational(&Self::rational(x)?, &Self::rational(y)?)))
            }
            _ => {
                let result = op.decimal(&self.decimal(x)?, &self.decimal(y)?);
                Ok(Scalar::Decimal(result.round(&self.context())))
            }
        }
    }
}

impl NumberSystem for DefaultNumberSystem {
    fn meta(&self) -> NumberSystemMeta {
        NumberSystemMeta {
            name: Self::NAME,
            description: "Exact integer and rational arithmetic with arbitrary precision decimal fallback",
            exact: true,
        }
    }

    fn context(&self) -> MathContext {
        self.context.unwrap_or_else(math_context)
    }

    fn add(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        self.arithmetic(BinaryOp::Add, x, y)
    }

    fn subtract(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        self.arithmetic(BinaryOp::Subtract, x, y)
    }

    fn multiply(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        self.arithmetic(BinaryOp::Multiply, x, y)
    }

    fn divide(&self, x: &Scalar, y: &Scalar) -> Result<Scalar, NumberError> {
        let wide = Self::widest(x, y)?;
        if self.is_zero(y)? {
            return Err(NumberError::DivisionByZero);
        }
        if wide.is_exact() {
            let quotient = Self::rational(x)?.divide(&Self::rational(y)?)?;
            Ok(Scalar::from_rational(quotient))
        } else {
            Ok(Scalar::Decimal(self.decimal(x)?.div(&self.decimal(y)?, &self.context())?))
        }
    }

    fn power(&self, x: &Scalar, exponent: i32) -> Result<Scalar, NumberError> {
        x.ensure_finite()?;
        let kind = x.representation();
        if kind.is_integer() && exponent > 0 {
            Ok(Scalar::from_integer(Self::integer(x)?.pow(exponent as usize)))
        } else if kind.is_exact() {
            Ok(Scalar::from_rational(Self::rational(x)?.pow(exponent)?))
        } else {
            Ok(Scalar::Decimal(self.decimal(x)?.pow(exponent, &self.context())?))
        }
    }

    fn reciprocal(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        x.ensure_finite()?;
        if x.representation().is_exact() {
            Ok(Scalar::from_rational(Self::rational(x)?.reciprocal()?))
        } else {
            Ok(Scalar::Decimal(self.decimal(x)?.reciprocal(&self.context())?))
        }
    }

    fn negate(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        x.ensure_finite()?;
        Ok(match x {
            Scalar::I8(v) => v.checked_neg().map_or(Scalar::I16(-(*v as i16)), Scalar::I8),
            Scalar::I16(v) => v.checked_neg().map_or(Scalar::I32(-(*v as i32)), Scalar::I16),
            Scalar::I32(v) => v.checked_neg().map_or(Scalar::I64(-(*v as i64)), Scalar::I32),
            Scalar::I64(v) => v.checked_neg().map_or_else(|| Scalar::BigInt(-IBig::from(*v)), Scalar::I64),
            Scalar::BigInt(v) => Scalar::from_integer(-v.clone()),
            Scalar::Rational(r) => Scalar::Rational(r.negate()),
            Scalar::F32(v) => Scalar::F32(-v),
            Scalar::F64(v) => Scalar::F64(-v),
            Scalar::Decimal(d) => Scalar::Decimal(d.negate()),
        })
    }

    fn abs(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        if self.signum(x)? < 0 {
            self.negate(x)
        } else {
            Ok(x.clone())
        }
    }

    fn signum(&self, x: &Scalar) -> Result<i32, NumberError> {
        x.ensure_finite()?;
        Ok(match x {
            Scalar::I8(v) => v.signum() as i32,
            Scalar::I16(v) => v.signum() as i32,
            Scalar::I32(v) => v.signum(),
            Scalar::I64(v) => v.signum() as i32,
            Scalar::BigInt(v) => match v.cmp(&IBig::ZERO) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            },
            Scalar::Rational(r) => r.signum(),
            Scalar::F32(v) => float_signum(*v as f64),
            Scalar::F64(v) => float_signum(*v),
            Scalar::Decimal(d) => d.signum(),
        })
    }

    fn compare(&self, x: &Scalar, y: &Scalar) -> Result<Ordering, NumberError> {
        match Self::widest(x, y)? {
            wide if wide.is_integer() => Ok(Self::integer(x)?.cmp(&Self::integer(y)?)),
            Representation::Rational => Ok(Self::rational(x)?.compare_to(&Self::rational(y)?)),
            _ => Ok(self.decimal(x)?.cmp(&self.decimal(y)?)),
        }
    }

    fn is_integer(&self, x: &Scalar) -> Result<bool, NumberError> {
        x.ensure_finite()?;
        Ok(match x {
            Scalar::Rational(r) => r.is_integer(),
            Scalar::F32(v) => v.fract() == 0.0,
            Scalar::F64(v) => v.fract() == 0.0,
            Scalar::Decimal(d) => d.is_integer(),
            _ => true,
        })
    }

    fn narrow(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        x.ensure_finite()?;
        let integral = match x {
            Scalar::Rational(r) if r.is_integer() => Some(r.dividend()),
            Scalar::Rational(_) => None,
            Scalar::F32(_) | Scalar::F64(_) => {
                if self.is_integer(x)? {
                    self.decimal(x)?.to_integer()
                } else {
                    None
                }
            }
            Scalar::Decimal(d) => d.to_integer(),
            _ => Some(Self::integer(x)?),
        };
        Ok(integral.map_or_else(|| x.clone(), Scalar::narrowest_integer))
    }

    fn divide_and_remainder(
        &self,
        x: &Scalar,
        y: &Scalar,
        round_towards_zero: bool,
    ) -> Result<(Scalar, Scalar), NumberError> {
        let wide = Self::widest(x, y)?;
        if self.is_zero(y)? {
            return Err(NumberError::DivisionByZero);
        }

        if wide.is_integer() {
            let (x_negative, x_abs) = magnitude(Self::integer(x)?);
            let (y_negative, y_abs) = magnitude(Self::integer(y)?);
            let quotient = &x_abs / &y_abs;
            let remainder = &x_abs % &y_abs;
            let quotient = if x_negative != y_negative { -quotient } else { quotient };
            let remainder = if x_negative { -remainder } else { remainder };
            return Ok((Scalar::from_integer(quotient), Scalar::from_integer(remainder)));
        }

        if wide.is_exact() {
            let (rx, ry) = (Self::rational(x)?, Self::rational(y)?);
            let quotient = rx.divide(&ry)?.trunc();
            let remainder = rx.subtract(&ry.multiply(&Rational::from_integer(quotient.clone())));
            let remainder = if round_towards_zero {
                Scalar::from_integer(remainder.trunc())
            } else {
                Scalar::from_rational(remainder)
            };
            return Ok((Scalar::from_integer(quotient), remainder));
        }

        let (dx, dy) = (self.decimal(x)?, self.decimal(y)?);
        let quotient = dx.divide_to_integral(&dy)?;
        // Exact: callers decide how the remainder is rounded
        let remainder = dx.sub(&dy.mul(&Decimal::from_integer(quotient.clone())));
        let remainder = if round_towards_zero {
            Scalar::from_integer(remainder.trunc())
        } else {
            Scalar::Decimal(remainder)
        };
        Ok((Scalar::from_integer(quotient), remainder))
    }

    fn exp(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        if self.is_zero(x)? {
            return Ok(Scalar::one());
        }
        Ok(Scalar::Decimal(self.decimal(x)?.exp(&self.context())))
    }

    fn log(&self, x: &Scalar) -> Result<Scalar, NumberError> {
        if self.is_one(x)? {
            return Ok(Scalar::zero());
        }
        Ok(Scalar::Decimal(self.decimal(x)?.ln(&self.context())?))
    }
}

fn float_signum(v: f64) -> i32 {
    if v == 0.0 {
        0
    } else if v < 0.0 {
        -1
    } else {
        1
    }
}

/// Sign and magnitude of an integer
fn magnitude(v: IBig) -> (bool, IBig) {
    if v < IBig::ZERO {
        (true, -v)
    } else {
        (false, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_core::RoundingMode;

    fn ns() -> DefaultNumberSystem {
        DefaultNumberSystem::new().with_context(MathContext::default())
    }

    fn rational(n: i64, d: i64) -> Scalar {
        Scalar::Rational(Rational::of(n, d).unwrap())
    }

    fn decimal(s: &str) -> Scalar {
        Scalar::Decimal(s.parse().unwrap())
    }

    // ========== Arithmetic ==========

    #[test]
    fn test_add_promotes_instead_of_overflowing() {
        let x = Scalar::I32(2_000_000_000);
        assert_eq!(ns().add(&x, &x).unwrap(), Scalar::I64(4_000_000_000));
    }

    #[test]
    fn test_i64_overflow_becomes_bigint() {
        let result = ns().add(&Scalar::I64(i64::MAX), &Scalar::I8(1)).unwrap();
        assert_eq!(result, Scalar::BigInt(IBig::from(i64::MAX) + IBig::ONE));
        let product = ns().multiply(&Scalar::I64(i64::MAX), &Scalar::I64(2)).unwrap();
        assert_eq!(product.representation(), Representation::BigInt);
        // back into range
        let back = ns().subtract(&result, &Scalar::I8(1)).unwrap();
        assert_eq!(back, Scalar::I64(i64::MAX));
    }

    #[test]
    fn test_rational_arithmetic_stays_exact() {
        let third = ns().divide(&Scalar::I8(1), &Scalar::I8(3)).unwrap();
        assert_eq!(third, rational(1, 3));
        let half = ns().add(&third, &rational(1, 6)).unwrap();
        assert_eq!(half, rational(1, 2));
        let one = ns().multiply(&half, &Scalar::I16(2)).unwrap();
        assert_eq!(one, Scalar::I64(1));
    }

    #[test]
    fn test_integer_division_collapses() {
        assert_eq!(ns().divide(&Scalar::I32(6), &Scalar::I8(3)).unwrap(), Scalar::I64(2));
        assert_eq!(ns().divide(&Scalar::I32(7), &Scalar::I8(2)).unwrap(), rational(7, 2));
    }

    #[test]
    fn test_float_funnels_to_decimal() {
        let result = ns().add(&Scalar::F64(0.5), &Scalar::I8(1)).unwrap();
        assert_eq!(result, decimal("1.5"));
        let result = ns().multiply(&rational(1, 4), &decimal("2")).unwrap();
        assert_eq!(result, decimal("0.5"));
    }

    #[test]
    fn test_decimal_division_rounds() {
        let ctx = MathContext::new(5, RoundingMode::HalfEven);
        let ns = DefaultNumberSystem::new().with_context(ctx);
        let result = ns.divide(&decimal("2"), &decimal("3")).unwrap();
        assert_eq!(result.to_string(), "0.66667");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(ns().divide(&Scalar::I8(1), &Scalar::I64(0)), Err(NumberError::DivisionByZero));
        assert_eq!(ns().divide(&Scalar::F64(1.0), &decimal("0.00")), Err(NumberError::DivisionByZero));
        assert!(ns().divide_and_remainder(&Scalar::I8(1), &Scalar::I8(0), false).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ns().add(&Scalar::F64(f64::NAN), &Scalar::I8(1)).unwrap_err();
        assert!(matches!(err, NumberError::NonFinite(_)));
        assert!(ns().narrow(&Scalar::F32(f32::INFINITY)).is_err());
    }

    #[test]
    fn test_power() {
        assert_eq!(ns().power(&Scalar::I8(2), 10).unwrap(), Scalar::I64(1024));
        assert_eq!(ns().power(&Scalar::I8(2), -2).unwrap(), rational(1, 4));
        assert_eq!(ns().power(&rational(2, 3), 2).unwrap(), rational(4, 9));
        assert_eq!(ns().power(&Scalar::I8(0), 0), Err(NumberError::ZeroToZero));
        assert_eq!(ns().power(&decimal("1.5"), 2).unwrap(), decimal("2.25"));
    }

    #[test]
    fn test_reciprocal() {
        assert_eq!(ns().reciprocal(&Scalar::I8(4)).unwrap(), rational(1, 4));
        assert_eq!(ns().reciprocal(&rational(1, 4)).unwrap(), Scalar::I64(4));
        assert_eq!(ns().reciprocal(&Scalar::I8(0)), Err(NumberError::ReciprocalOfZero));
    }

    #[test]
    fn test_negate_widens_at_the_edge() {
        assert_eq!(ns().negate(&Scalar::I8(5)).unwrap(), Scalar::I8(-5));
        assert_eq!(ns().negate(&Scalar::I8(i8::MIN)).unwrap(), Scalar::I16(128));
        assert_eq!(
            ns().negate(&Scalar::I64(i64::MIN)).unwrap(),
            Scalar::BigInt(-IBig::from(i64::MIN))
        );
        assert_eq!(ns().abs(&rational(-1, 2)).unwrap(), rational(1, 2));
    }

    // ========== Comparison ==========

    #[test]
    fn test_compare_across_representations() {
        let ns = ns();
        assert_eq!(ns.compare(&Scalar::I8(1), &Scalar::I64(1)).unwrap(), Ordering::Equal);
        assert_eq!(ns.compare(&rational(1, 3), &Scalar::I8(0)).unwrap(), Ordering::Greater);
        assert_eq!(ns.compare(&Scalar::F64(0.25), &rational(1, 4)).unwrap(), Ordering::Equal);
        assert_eq!(ns.compare(&decimal("-2"), &Scalar::I8(-1)).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_predicates() {
        let ns = ns();
        assert!(ns.is_zero(&decimal("0.000")).unwrap());
        assert!(ns.is_one(&rational(3, 3)).unwrap());
        assert!(ns.is_less_than_one(&rational(-1, 2)).unwrap());
        assert!(!ns.is_less_than_one(&Scalar::I8(-3)).unwrap());
        assert!(ns.is_integer(&Scalar::F64(3.0)).unwrap());
        assert!(!ns.is_integer(&rational(1, 2)).unwrap());
        assert_eq!(ns.signum(&Scalar::F32(-0.5)).unwrap(), -1);
    }

    // ========== Narrowing ==========

    #[test]
    fn test_narrow() {
        let ns = ns();
        assert_eq!(ns.narrow(&Scalar::F64(2.0)).unwrap(), Scalar::I8(2));
        assert_eq!(ns.narrow(&decimal("5.00")).unwrap(), Scalar::I8(5));
        assert_eq!(ns.narrow(&Scalar::I64(40_000)).unwrap(), Scalar::I32(40_000));
        assert_eq!(ns.narrow(&rational(10, 2)).unwrap(), Scalar::I8(5));
        assert_eq!(ns.narrow(&rational(1, 2)).unwrap(), rational(1, 2));
        assert_eq!(ns.narrow(&Scalar::F64(2.5)).unwrap(), Scalar::F64(2.5));
        let big = Scalar::BigInt(IBig::from(i64::MAX) * IBig::from(10));
        assert_eq!(ns.narrow(&big).unwrap(), big);
    }

    #[test]
    fn test_narrow_is_idempotent() {
        let ns = ns();
        let samples = vec![
            Scalar::I64(7),
            Scalar::I32(-129),
            Scalar::F32(1e6),
            Scalar::F64(-0.125),
            decimal("1e20"),
            decimal("3.14"),
            rational(22, 7),
            rational(-8, 4),
            Scalar::BigInt(IBig::from(i64::MIN) - IBig::ONE),
        ];
        for v in samples {
            let once = ns.narrow(&v).unwrap();
            assert_eq!(ns.narrow(&once).unwrap(), once, "narrowing {}", v);
        }
    }

    // ========== Divide and Remainder ==========

    #[test]
    fn test_integer_divide_and_remainder_signs() {
        let ns = ns();
        let (q, r) = ns.divide_and_remainder(&Scalar::I8(-7), &Scalar::I8(2), false).unwrap();
        assert_eq!((q, r), (Scalar::I64(-3), Scalar::I64(-1)));
        let (q, r) = ns.divide_and_remainder(&Scalar::I8(7), &Scalar::I8(-2), false).unwrap();
        assert_eq!((q, r), (Scalar::I64(-3), Scalar::I64(1)));
    }

    #[test]
    fn test_rational_divide_and_remainder() {
        let ns = ns();
        let (q, r) = ns.divide_and_remainder(&rational(7, 2), &Scalar::I8(1), false).unwrap();
        assert_eq!(q, Scalar::I64(3));
        assert_eq!(r, rational(1, 2));
        let (q, r) = ns.divide_and_remainder(&rational(-7, 2), &Scalar::I8(1), true).unwrap();
        assert_eq!(q, Scalar::I64(-3));
        assert_eq!(r, Scalar::I64(0));
    }

    #[test]
    fn test_decimal_divide_and_remainder() {
        let ns = ns();
        let (q, r) = ns.divide_and_remainder(&decimal("7.5"), &Scalar::I8(2), false).unwrap();
        assert_eq!(q, Scalar::I64(3));
        assert_eq!(r, decimal("1.5"));
        let (_, r) = ns.divide_and_remainder(&decimal("7.5"), &Scalar::I8(2), true).unwrap();
        assert_eq!(r, Scalar::I64(1));
    }

    #[test]
    fn test_decimal_remainder_is_exact() {
        let ns = DefaultNumberSystem::new().with_context(MathContext::new(5, RoundingMode::HalfEven));
        let (q, r) = ns.divide_and_remainder(&decimal("119.99999"), &Scalar::I8(60), false).unwrap();
        assert_eq!(q, Scalar::I64(1));
        assert_eq!(r, decimal("59.99999"));
        assert_eq!(ns.compare(&r, &Scalar::I8(60)).unwrap(), Ordering::Less);
    }

    // ========== Transcendental ==========

    #[test]
    fn test_exp_and_log() {
        let ctx = MathContext::new(30, RoundingMode::HalfEven);
        let ns = DefaultNumberSystem::new().with_context(ctx);
        assert_eq!(ns.exp(&Scalar::I8(0)).unwrap(), Scalar::I8(1));
        assert_eq!(ns.log(&Scalar::I8(1)).unwrap(), Scalar::I8(0));
        assert!(ns.log(&Scalar::I8(-1)).is_err());

        let e_squared = ns.exp(&Scalar::I8(2)).unwrap();
        let two = ns.log(&e_squared).unwrap();
        let Scalar::Decimal(two) = two else { panic!("expected decimal") };
        assert_eq!(two.round(&MathContext::new(20, RoundingMode::HalfEven)), Decimal::from_i64(2));
    }

    #[test]
    fn test_meta() {
        let ns = DefaultNumberSystem::new();
        assert_eq!(ns.name(), "default");
        assert!(ns.meta().exact);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integer_ops_never_overflow(a in any::<i64>(), b in any::<i64>()) {
                let ns = ns();
                let (x, y) = (Scalar::I64(a), Scalar::I64(b));
                let sum = ns.add(&x, &y).unwrap().to_integer().unwrap();
                prop_assert_eq!(sum.to_string(), (a as i128 + b as i128).to_string());
                let product = ns.multiply(&x, &y).unwrap().to_integer().unwrap();
                prop_assert_eq!(product.to_string(), (a as i128 * b as i128).to_string());
            }

            #[test]
            fn remainder_reconstructs_dividend(a in any::<i32>(), b in any::<i32>().prop_filter("non-zero", |b| *b != 0)) {
                let ns = ns();
                let (q, r) = ns.divide_and_remainder(&Scalar::I32(a), &Scalar::I32(b), false).unwrap();
                let back = ns.add(&ns.multiply(&q, &Scalar::I32(b)).unwrap(), &r).unwrap();
                prop_assert_eq!(back, Scalar::I64(a as i64));
                prop_assert!(r.as_i64().unwrap().abs() < (b as i64).abs());
            }
        }
    }
}
