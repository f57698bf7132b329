//! Converters between measurement scales
//!
//! A [`Converter`] is an invertible scalar transform. Converters compose
//! with [`Converter::concatenate`], which fuses what can be fused and keeps
//! the rest in a canonical chain, so two chains describing the same
//! transform compare equal.

use mensura_core::{pi, Decimal, MathContext, NumberError, Rational, Scalar};
use mensura_plugin::{DefaultNumberSystem, NumberSystem};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::fusion;
use crate::normal_form::{self, NormalFormOrder};

/// Extra digits used when raising π to a power
const PI_GUARD_DIGITS: u32 = 10;

/// `π^exponent`, computed on first use and kept for the context it was
/// computed under
#[derive(Debug, Clone)]
pub struct PiPower {
    exponent: i32,
    factor: OnceLock<(MathContext, Result<Decimal, NumberError>)>,
}

impl PiPower {
    pub fn new(exponent: i32) -> Self {
        Self { exponent, factor: OnceLock::new() }
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// The factor under `ctx`. The first context is computed once and
    /// cached; other contexts are computed on every call.
    pub fn factor(&self, ctx: &MathContext) -> Result<Decimal, NumberError> {
        let (cached, value) = self.factor.get_or_init(|| (*ctx, Self::compute(self.exponent, ctx)));
        if cached == ctx {
            value.clone()
        } else {
            Self::compute(self.exponent, ctx)
        }
    }

    /// Context the cached factor was computed under, if any
    pub fn cached_context(&self) -> Option<MathContext> {
        self.factor.get().map(|(ctx, _)| *ctx)
    }

    fn compute(exponent: i32, ctx: &MathContext) -> Result<Decimal, NumberError> {
        let work = ctx.with_precision(ctx.precision + PI_GUARD_DIGITS);
        Ok(pi(work.precision).pow(exponent, &work)?.round(ctx))
    }
}

/// Invertible transform from one scale to another
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ConverterRepr", into = "ConverterRepr")]
pub enum Converter {
    Identity,
    /// `x + offset`
    Add(Scalar),
    /// `x × factor`, exact
    MultiplyRational(Rational),
    /// `x × factor` in double precision
    MultiplyDouble(f64),
    /// `x × base^exponent`
    PowerOfInt { base: i32, exponent: i32 },
    /// `x × π^exponent`
    PowerOfPi(PiPower),
    /// `log_base(x)`
    Log(f64),
    /// `base^x`
    Exp(f64),
    /// `left ∘ right`: apply `right`, then `left`
    Pair(Arc<Converter>, Arc<Converter>),
}

impl Converter {
    // ========== Factories ==========

    pub fn identity() -> Self {
        Converter::Identity
    }

    /// Shift by a constant offset
    pub fn add(offset: impl Into<Scalar>) -> Result<Self, NumberError> {
        let offset = DefaultNumberSystem::new().narrow(&offset.into())?;
        Ok(Converter::Add(offset))
    }

    /// Scale by `factor`: exact values become a rational factor, floats a
    /// double factor
    pub fn multiply(factor: impl Into<Scalar>) -> Result<Self, NumberError> {
        let factor = factor.into();
        match &factor {
            Scalar::F32(f) => Self::double(*f as f64),
            Scalar::F64(f) => Self::double(*f),
            Scalar::Decimal(d) => Self::of_rational(Rational::from_decimal(d)),
            exact => {
                let r = exact
                    .to_rational()
                    .ok_or_else(|| NumberError::internal(format!("{} is not exact", exact.representation())))?;
                Self::of_rational(r)
            }
        }
    }

    /// Scale by `dividend / divisor`
    pub fn rational(dividend: i64, divisor: i64) -> Result<Self, NumberError> {
        Self::of_rational(Rational::of(dividend, divisor)?)
    }

    pub fn of_rational(factor: Rational) -> Result<Self, NumberError> {
        if factor.is_zero() {
            return Err(NumberError::InvalidFactor("multiplication by zero is not invertible".into()));
        }
        Ok(Converter::MultiplyRational(factor))
    }

    pub fn double(factor: f64) -> Result<Self, NumberError> {
        if !factor.is_finite() {
            return Err(NumberError::NonFinite(factor));
        }
        if factor == 0.0 {
            return Err(NumberError::InvalidFactor("multiplication by zero is not invertible".into()));
        }
        Ok(Converter::MultiplyDouble(factor))
    }

    /// Scale by `base^exponent`
    pub fn power_of_int(base: i32, exponent: i32) -> Result<Self, NumberError> {
        match (base, exponent) {
            (0, 0) => Err(NumberError::ZeroToZero),
            (0, _) => Err(NumberError::InvalidFactor("power of zero is not invertible".into())),
            _ => Ok(Converter::PowerOfInt { base, exponent }),
        }
    }

    /// Scale by `10^exponent`
    pub fn ten_exponent(exponent: i32) -> Self {
        Converter::PowerOfInt { base: 10, exponent }
    }

    pub fn power_of_pi(exponent: i32) -> Self {
        Converter::PowerOfPi(PiPower::new(exponent))
    }

    /// Logarithm to `base`
    pub fn log(base: f64) -> Result<Self, NumberError> {
        Ok(Converter::Log(check_base(base)?))
    }

    /// Exponential with `base`
    pub fn exp(base: f64) -> Result<Self, NumberError> {
        Ok(Converter::Exp(check_base(base)?))
    }

    /// Unreduced `left ∘ right`; prefer [`Converter::concatenate`]
    pub fn pair(left: Converter, right: Converter) -> Self {
        Converter::Pair(Arc::new(left), Arc::new(right))
    }

    // ========== Properties ==========

    /// True when the converter maps every value to itself
    pub fn is_identity(&self) -> bool {
        match self {
            Converter::Identity => true,
            Converter::Add(offset) => is_zero(offset),
            Converter::MultiplyRational(r) => r.is_one(),
            Converter::MultiplyDouble(f) => *f == 1.0,
            Converter::PowerOfInt { base, exponent } => *exponent == 0 || *base == 1,
            Converter::PowerOfPi(p) => p.exponent == 0,
            Converter::Log(_) | Converter::Exp(_) => false,
            Converter::Pair(left, right) => left.is_identity() && right.is_identity(),
        }
    }

    /// True for pure scalings, which commute with each other
    pub fn is_linear(&self) -> bool {
        match self {
            Converter::Identity
            | Converter::MultiplyRational(_)
            | Converter::MultiplyDouble(_)
            | Converter::PowerOfInt { .. }
            | Converter::PowerOfPi(_) => true,
            Converter::Add(_) | Converter::Log(_) | Converter::Exp(_) => false,
            Converter::Pair(left, right) => left.is_linear() && right.is_linear(),
        }
    }

    /// Rank used to order commuting converters in normal form
    pub fn normal_form_order(&self) -> NormalFormOrder {
        match self {
            Converter::Identity => NormalFormOrder::Identity,
            Converter::PowerOfInt { .. } => NormalFormOrder::PowerOfInt,
            Converter::MultiplyRational(_) => NormalFormOrder::MultiplyRational,
            Converter::PowerOfPi(_) => NormalFormOrder::PowerOfPi,
            Converter::MultiplyDouble(_) => NormalFormOrder::MultiplyDouble,
            Converter::Add(_) => NormalFormOrder::Add,
            Converter::Log(_) => NormalFormOrder::Log,
            Converter::Exp(_) => NormalFormOrder::Exp,
            Converter::Pair(..) => NormalFormOrder::Pair,
        }
    }

    /// Exact scale factor of power-of-int and rational converters
    pub(crate) fn exact_factor(&self) -> Option<Rational> {
        match self {
            Converter::MultiplyRational(r) => Some(r.clone()),
            Converter::PowerOfInt { base, exponent } => Rational::of_integer(*base as i64).pow(*exponent).ok(),
            _ => None,
        }
    }

    /// Primitive steps in application order; empty for identity
    pub fn conversion_steps(&self) -> Vec<Converter> {
        let mut steps = Vec::new();
        self.collect_steps(&mut steps);
        steps
    }

    fn collect_steps(&self, steps: &mut Vec<Converter>) {
        match self {
            Converter::Pair(left, right) => {
                right.collect_steps(steps);
                left.collect_steps(steps);
            }
            c if c.is_identity() => {}
            c => steps.push(c.clone()),
        }
    }

    // ========== Algebra ==========

    /// `self ∘ other`: apply `other` first, then `self`
    pub fn concatenate(&self, other: &Converter) -> Converter {
        if self.is_identity() {
            return other.clone();
        }
        if other.is_identity() {
            return self.clone();
        }
        normal_form::compose(self, other, fusion::can_reduce, fusion::reduce)
    }

    /// The transform undoing this one
    pub fn inverse(&self) -> Result<Converter, NumberError> {
        let negated = |exponent: i32| {
            exponent
                .checked_neg()
                .ok_or_else(|| NumberError::InvalidFactor(format!("exponent {} has no inverse", exponent)))
        };
        Ok(match self {
            Converter::Identity => Converter::Identity,
            Converter::Add(offset) => Converter::Add(DefaultNumberSystem::new().negate(offset)?),
            Converter::MultiplyRational(r) => Converter::MultiplyRational(r.reciprocal()?),
            Converter::MultiplyDouble(f) => Converter::double(1.0 / f)?,
            Converter::PowerOfInt { base, exponent } => Converter::PowerOfInt { base: *base, exponent: negated(*exponent)? },
            Converter::PowerOfPi(p) => Converter::power_of_pi(negated(p.exponent)?),
            Converter::Log(base) => Converter::Exp(*base),
            Converter::Exp(base) => Converter::Log(*base),
            Converter::Pair(left, right) => right.inverse()?.concatenate(&left.inverse()?),
        })
    }

    // ========== Evaluation ==========

    /// Convert with the currently selected number system
    pub fn convert(&self, value: &Scalar) -> Result<Scalar, NumberError> {
        let system = mensura_plugin::current();
        self.convert_with(value, system.as_ref())
    }

    /// Convert with an explicit number system
    pub fn convert_with(&self, value: &Scalar, ns: &dyn NumberSystem) -> Result<Scalar, NumberError> {
        value.ensure_finite()?;
        match self {
            Converter::Identity => Ok(value.clone()),
            Converter::Add(offset) => ns.add(value, offset),
            Converter::MultiplyRational(r) => ns.multiply(value, &Scalar::from_rational(r.clone())),
            Converter::MultiplyDouble(f) => ns.multiply(value, &Scalar::F64(*f)),
            Converter::PowerOfInt { base, exponent } => {
                let factor = ns.power(&Scalar::I32(*base), *exponent)?;
                ns.multiply(value, &factor)
            }
            Converter::PowerOfPi(p) => ns.multiply(value, &Scalar::Decimal(p.factor(&ns.context())?)),
            Converter::Log(base) => {
                let ln_base = ns.log(&Scalar::F64(*base))?;
                ns.divide(&ns.log(value)?, &ln_base)
            }
            Converter::Exp(base) => {
                let ln_base = ns.log(&Scalar::F64(*base))?;
                ns.exp(&ns.multiply(value, &ln_base)?)
            }
            Converter::Pair(left, right) => left.convert_with(&right.convert_with(value, ns)?, ns),
        }
    }

    /// Double precision evaluation
    pub fn convert_f64(&self, value: f64) -> Result<f64, NumberError> {
        if !value.is_finite() {
            return Err(NumberError::NonFinite(value));
        }
        Ok(self.apply_f64(value))
    }

    fn apply_f64(&self, x: f64) -> f64 {
        match self {
            Converter::Identity => x,
            Converter::Add(offset) => x + offset.to_f64(),
            Converter::MultiplyRational(r) => x * r.to_f64(),
            Converter::MultiplyDouble(f) => x * f,
            Converter::PowerOfInt { base, exponent } => x * (*base as f64).powi(*exponent),
            Converter::PowerOfPi(p) => x * std::f64::consts::PI.powi(p.exponent),
            Converter::Log(base) => x.ln() / base.ln(),
            Converter::Exp(base) => base.powf(x),
            Converter::Pair(left, right) => left.apply_f64(right.apply_f64(x)),
        }
    }
}

fn check_base(base: f64) -> Result<f64, NumberError> {
    if !base.is_finite() {
        return Err(NumberError::NonFinite(base));
    }
    if base <= 0.0 || base == 1.0 {
        return Err(NumberError::domain(format!("invalid logarithm base {}", base)));
    }
    Ok(base)
}

fn is_zero(value: &Scalar) -> bool {
    matches!(DefaultNumberSystem::new().signum(value), Ok(0))
}

/// Numeric order of two offsets, falling back to a representation order
/// for values the default engine rejects
pub(crate) fn compare_scalars(a: &Scalar, b: &Scalar) -> Ordering {
    DefaultNumberSystem::new().compare(a, b).unwrap_or_else(|_| {
        a.representation()
            .cmp(&b.representation())
            .then_with(|| a.to_string().cmp(&b.to_string()))
    })
}

impl Default for Converter {
    fn default() -> Self {
        Converter::Identity
    }
}

// ========== Equality and Ordering ==========

impl Ord for Converter {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_identity(), other.is_identity()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        // power-of-int and rational factors are interchangeable
        match (self, other) {
            (
                Converter::PowerOfInt { base: b1, exponent: e1 },
                Converter::PowerOfInt { base: b2, exponent: e2 },
            ) if b1 == b2 && e1 == e2 => return Ordering::Equal,
            _ => {}
        }
        if let (Some(a), Some(b)) = (self.exact_factor(), other.exact_factor()) {
            return a.compare_to(&b);
        }

        let rank = self.normal_form_order().cmp(&other.normal_form_order());
        if rank != Ordering::Equal {
            return rank;
        }
        match (self, other) {
            (Converter::Add(a), Converter::Add(b)) => compare_scalars(a, b),
            (Converter::MultiplyDouble(a), Converter::MultiplyDouble(b)) => a.total_cmp(b),
            (Converter::PowerOfPi(a), Converter::PowerOfPi(b)) => a.exponent.cmp(&b.exponent),
            (Converter::Log(a), Converter::Log(b)) | (Converter::Exp(a), Converter::Exp(b)) => a.total_cmp(b),
            (Converter::Pair(l1, r1), Converter::Pair(l2, r2)) => l1.cmp(l2).then_with(|| r1.cmp(r2)),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Converter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Converter {}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Identity => write!(f, "identity"),
            Converter::Add(offset) => write!(f, "+{}", offset),
            Converter::MultiplyRational(r) => write!(f, "×{}", r),
            Converter::MultiplyDouble(factor) => write!(f, "×{}", factor),
            Converter::PowerOfInt { base, exponent } => write!(f, "×{}^{}", base, exponent),
            Converter::PowerOfPi(p) => write!(f, "×π^{}", p.exponent),
            Converter::Log(base) => write!(f, "log({})", base),
            Converter::Exp(base) => write!(f, "exp({})", base),
            Converter::Pair(left, right) => write!(f, "{} ∘ {}", left, right),
        }
    }
}

// ========== Serialization ==========

/// Tagged form; deserialization goes back through the validating factories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ConverterRepr {
    Identity,
    Add { offset: Scalar },
    MultiplyRational { factor: Rational },
    MultiplyDouble { factor: f64 },
    PowerOfInt { base: i32, exponent: i32 },
    PowerOfPi { exponent: i32 },
    Log { base: f64 },
    Exp { base: f64 },
    Pair { left: Box<ConverterRepr>, right: Box<ConverterRepr> },
}

impl From<Converter> for ConverterRepr {
    fn from(c: Converter) -> Self {
        match c {
            Converter::Identity => ConverterRepr::Identity,
            Converter::Add(offset) => ConverterRepr::Add { offset },
            Converter::MultiplyRational(factor) => ConverterRepr::MultiplyRational { factor },
            Converter::MultiplyDouble(factor) => ConverterRepr::MultiplyDouble { factor },
            Converter::PowerOfInt { base, exponent } => ConverterRepr::PowerOfInt { base, exponent },
            Converter::PowerOfPi(p) => ConverterRepr::PowerOfPi { exponent: p.exponent },
            Converter::Log(base) => ConverterRepr::Log { base },
            Converter::Exp(base) => ConverterRepr::Exp { base },
            Converter::Pair(left, right) => ConverterRepr::Pair {
                left: Box::new(left.as_ref().clone().into()),
                right: Box::new(right.as_ref().clone().into()),
            },
        }
    }
}

impl TryFrom<ConverterRepr> for Converter {
    type Error = NumberError;

    fn try_from(repr: ConverterRepr) -> Result<Self, Self::Error> {
        match repr {
            ConverterRepr::Identity => Ok(Converter::Identity),
            ConverterRepr::Add { offset } => Converter::add(offset),
            ConverterRepr::MultiplyRational { factor } => Converter::of_rational(factor),
            ConverterRepr::MultiplyDouble { factor } => Converter::double(factor),
            ConverterRepr::PowerOfInt { base, exponent } => Converter::power_of_int(base, exponent),
            ConverterRepr::PowerOfPi { exponent } => Ok(Converter::power_of_pi(exponent)),
            ConverterRepr::Log { base } => Converter::log(base),
            ConverterRepr::Exp { base } => Converter::exp(base),
            ConverterRepr::Pair { left, right } => {
                let left = Converter::try_from(*left)?;
                let right = Converter::try_from(*right)?;
                Ok(left.concatenate(&right))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_core::RoundingMode;

    fn ns() -> DefaultNumberSystem {
        DefaultNumberSystem::new().with_context(MathContext::default())
    }

    fn ratio(n: i64, d: i64) -> Converter {
        Converter::rational(n, d).unwrap()
    }

    fn samples() -> Vec<Converter> {
        vec![
            Converter::Identity,
            Converter::add(5).unwrap(),
            ratio(3, 7),
            Converter::double(2.5).unwrap(),
            Converter::power_of_int(2, 3).unwrap(),
            Converter::power_of_pi(2),
            Converter::log(10.0).unwrap(),
            Converter::exp(2.0).unwrap(),
            Converter::add(1).unwrap().concatenate(&ratio(9, 5)),
        ]
    }

    // ========== Construction ==========

    #[test]
    fn test_invalid_construction() {
        assert_eq!(Converter::power_of_int(0, 0), Err(NumberError::ZeroToZero));
        assert!(matches!(Converter::power_of_int(0, 2), Err(NumberError::InvalidFactor(_))));
        assert!(matches!(Converter::rational(0, 5), Err(NumberError::InvalidFactor(_))));
        assert!(matches!(Converter::rational(1, 0), Err(NumberError::ZeroDivisor(_))));
        assert!(matches!(Converter::double(f64::NAN), Err(NumberError::NonFinite(_))));
        assert!(Converter::log(1.0).is_err());
        assert!(Converter::exp(-2.0).is_err());
    }

    #[test]
    fn test_multiply_picks_representation() {
        assert_eq!(Converter::multiply(1000).unwrap(), ratio(1000, 1));
        let d: Decimal = "0.3048".parse().unwrap();
        assert_eq!(Converter::multiply(d).unwrap(), ratio(3048, 10000));
        assert!(matches!(Converter::multiply(0.5f64).unwrap(), Converter::MultiplyDouble(_)));
    }

    #[test]
    fn test_identity_valued_variants() {
        for c in [
            Converter::add(0).unwrap(),
            ratio(4, 4),
            Converter::double(1.0).unwrap(),
            Converter::ten_exponent(0),
            Converter::power_of_int(1, 7).unwrap(),
            Converter::power_of_pi(0),
        ] {
            assert!(c.is_identity(), "{}", c);
            assert_eq!(c, Converter::Identity);
        }
    }

    #[test]
    fn test_linearity() {
        assert!(ratio(1, 2).is_linear());
        assert!(Converter::power_of_pi(1).is_linear());
        assert!(!Converter::add(1).unwrap().is_linear());
        assert!(!Converter::log(10.0).unwrap().is_linear());
        assert!(ratio(1, 2).concatenate(&Converter::ten_exponent(3)).is_linear());
    }

    // ========== Algebra ==========

    #[test]
    fn test_identity_law() {
        for c in samples() {
            assert_eq!(c.concatenate(&Converter::Identity), c);
            assert_eq!(Converter::Identity.concatenate(&c), c);
        }
    }

    #[test]
    fn test_rational_inverse_law() {
        let c = ratio(3048, 10000);
        let round_trip = c.inverse().unwrap().concatenate(&c);
        assert!(round_trip.is_identity());
        for x in [Scalar::I8(7), Scalar::Rational(Rational::of(-5, 3).unwrap()), Scalar::I64(123_456_789)] {
            let y = c.convert_with(&x, &ns()).unwrap();
            let back = c.inverse().unwrap().convert_with(&y, &ns()).unwrap();
            assert_eq!(ns().compare(&back, &x).unwrap(), Ordering::Equal);
        }
    }

    #[test]
    fn test_power_of_int_cancels() {
        let up = Converter::power_of_int(2, 3).unwrap();
        let down = Converter::power_of_int(2, -3).unwrap();
        assert_eq!(up.concatenate(&down), Converter::Identity);
        assert_eq!(down.concatenate(&up), Converter::Identity);
        assert!(matches!(down.concatenate(&up), Converter::Identity));
    }

    #[test]
    fn test_log_exp_cancel() {
        let log = Converter::log(10.0).unwrap();
        let exp = Converter::exp(10.0).unwrap();
        assert!(matches!(log.concatenate(&exp), Converter::Identity));
        assert!(matches!(exp.concatenate(&log), Converter::Identity));
        let other = Converter::exp(2.0).unwrap();
        assert!(matches!(log.concatenate(&other), Converter::Pair(..)));
    }

    #[test]
    fn test_fusions() {
        let kilo = Converter::ten_exponent(3);
        let third = ratio(1, 3);
        assert!(matches!(kilo.concatenate(&third), Converter::MultiplyRational(_)));
        assert_eq!(kilo.concatenate(&third), ratio(1000, 3));

        let offsets = Converter::add(2).unwrap().concatenate(&Converter::add(-2).unwrap());
        assert_eq!(offsets, Converter::Identity);

        let doubles = Converter::double(2.0).unwrap().concatenate(&ratio(1, 4));
        assert!(matches!(doubles, Converter::MultiplyDouble(f) if f == 0.5));

        let pis = Converter::power_of_pi(2).concatenate(&Converter::power_of_pi(-1));
        assert!(matches!(pis, Converter::PowerOfPi(ref p) if p.exponent() == 1));
    }

    #[test]
    fn test_pi_factor_is_shared_by_concurrent_first_reads() {
        let square = PiPower::new(2);
        let ctx = MathContext::new(30, RoundingMode::HalfEven);
        let factors: Vec<Decimal> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| square.factor(&ctx).unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(factors.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(factors[0].precision(), 30);
        assert!(factors[0].to_string().starts_with("9.86960440108935861883449099"));
        assert_eq!(square.cached_context(), Some(ctx));

        let coarse = MathContext::new(5, RoundingMode::HalfEven);
        assert_eq!(square.factor(&coarse).unwrap(), "9.8696".parse::<Decimal>().unwrap());
        assert_eq!(square.cached_context(), Some(ctx));
    }

    #[test]
    fn test_power_of_int_equals_rational_value() {
        assert_eq!(Converter::ten_exponent(3), ratio(1000, 1));
        assert_eq!(Converter::power_of_int(4, 1).unwrap(), Converter::power_of_int(2, 2).unwrap());
        assert!(Converter::ten_exponent(-3) < ratio(1, 999));
    }

    #[test]
    fn test_pair_inverse() {
        // celsius to kelvin: x + 273.15
        let to_kelvin = Converter::add("273.15".parse::<Decimal>().unwrap()).unwrap();
        let fahrenheit = ratio(5, 9).concatenate(&Converter::add(-32).unwrap());
        let fahrenheit = to_kelvin.concatenate(&fahrenheit);
        let inverse = fahrenheit.inverse().unwrap();
        assert!(inverse.concatenate(&fahrenheit).is_identity());

        let kelvin = fahrenheit.convert_with(&Scalar::I16(212), &ns()).unwrap();
        assert_eq!(kelvin, Scalar::Decimal("373.15".parse().unwrap()));
        let back = inverse.convert_with(&kelvin, &ns()).unwrap();
        assert_eq!(ns().narrow(&back).unwrap(), Scalar::I16(212));
    }

    // ========== Evaluation ==========

    #[test]
    fn test_convert_exact() {
        let km_to_m = Converter::ten_exponent(3);
        assert_eq!(km_to_m.convert_with(&Scalar::I8(5), &ns()).unwrap(), Scalar::I64(5000));
        let m_to_km = km_to_m.inverse().unwrap();
        assert_eq!(
            m_to_km.convert_with(&Scalar::I8(5), &ns()).unwrap(),
            Scalar::Rational(Rational::of(1, 200).unwrap())
        );
    }

    #[test]
    fn test_convert_rejects_non_finite() {
        let c = ratio(1, 2);
        assert!(matches!(c.convert_with(&Scalar::F64(f64::NAN), &ns()), Err(NumberError::NonFinite(_))));
        assert!(c.convert_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_convert_transcendental() {
        let ctx = MathContext::new(40, RoundingMode::HalfEven);
        let ns = DefaultNumberSystem::new().with_context(ctx);
        let degrees = Converter::power_of_pi(1).concatenate(&ratio(1, 180));
        let radians = degrees.convert_with(&Scalar::I16(180), &ns).unwrap();
        assert_eq!(radians, Scalar::Decimal(pi(40)));

        let bel = Converter::log(10.0).unwrap();
        let Scalar::Decimal(two) = bel.convert_with(&Scalar::I8(100), &ns).unwrap() else {
            panic!("expected a decimal")
        };
        assert_eq!(two.round(&MathContext::new(30, RoundingMode::HalfEven)), Decimal::from_i64(2));
    }

    #[test]
    fn test_convert_f64() {
        let f = Converter::add(32).unwrap().concatenate(&ratio(9, 5));
        assert!((f.convert_f64(100.0).unwrap() - 212.0).abs() < 1e-9);
        let db = Converter::exp(10.0).unwrap().concatenate(&ratio(1, 10));
        assert!((db.convert_f64(20.0).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversion_steps() {
        let chain = ratio(1, 2).concatenate(&Converter::add(3).unwrap());
        let steps = chain.conversion_steps();
        assert_eq!(steps, vec![Converter::add(3).unwrap(), ratio(1, 2)]);
        assert!(Converter::Identity.conversion_steps().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(ratio(3, 10).to_string(), "×3/10");
        assert_eq!(Converter::power_of_pi(2).to_string(), "×π^2");
        let chain = ratio(1, 2).concatenate(&Converter::add(3).unwrap());
        assert_eq!(chain.to_string(), "×1/2 ∘ +3");
    }

    #[test]
    fn test_serde_round_trip() {
        for c in samples() {
            let json = serde_json::to_string(&c).unwrap();
            let back: Converter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, c, "{}", json);
        }
        let json = serde_json::to_string(&Converter::ten_exponent(3)).unwrap();
        assert_eq!(json, r#"{"kind":"power_of_int","base":10,"exponent":3}"#);
    }

    #[test]
    fn test_serde_revalidates() {
        let bad = r#"{"kind":"power_of_int","base":0,"exponent":0}"#;
        assert!(serde_json::from_str::<Converter>(bad).is_err());
        let zero = r#"{"kind":"multiply_double","factor":0.0}"#;
        assert!(serde_json::from_str::<Converter>(zero).is_err());
    }
}
