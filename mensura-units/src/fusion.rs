//! Pairwise fusion table
//!
//! `fuse(outer, inner)` answers whether `outer ∘ inner` collapses into a
//! single converter. Every `(outer, inner)` combination is spelled out so
//! a new converter variant cannot be added without deciding its fusions.

use mensura_core::{Rational, Scalar};
use mensura_plugin::{DefaultNumberSystem, NumberSystem};

use crate::Converter;

/// Whether `outer ∘ inner` fuses into one converter
pub fn can_reduce(outer: &Converter, inner: &Converter) -> bool {
    fuse(outer, inner).is_some()
}

/// `outer ∘ inner` fused, or the unreduced pair when no fusion applies
pub fn reduce(outer: &Converter, inner: &Converter) -> Converter {
    fuse(outer, inner).unwrap_or_else(|| Converter::pair(outer.clone(), inner.clone()))
}

/// Fused converter, collapsed to `Identity` when the fusion is identity
/// valued
pub fn fuse(outer: &Converter, inner: &Converter) -> Option<Converter> {
    use Converter::*;

    let fused = match outer {
        Identity => Some(inner.clone()),
        Add(a) => match inner {
            Identity => Some(outer.clone()),
            Add(b) => add_offsets(a, b),
            MultiplyRational(_) | MultiplyDouble(_) | PowerOfInt { .. } | PowerOfPi(_) | Log(_) | Exp(_)
            | Pair(..) => None,
        },
        MultiplyRational(a) => match inner {
            Identity => Some(outer.clone()),
            MultiplyRational(b) => Some(MultiplyRational(a.multiply(b))),
            PowerOfInt { base, exponent } => power_times_rational(*base, *exponent, a),
            MultiplyDouble(b) => double(a.to_f64() * b),
            Add(_) | PowerOfPi(_) | Log(_) | Exp(_) | Pair(..) => None,
        },
        PowerOfInt { base, exponent } => match inner {
            Identity => Some(outer.clone()),
            PowerOfInt { base: other_base, exponent: other_exponent } if base == other_base => exponent
                .checked_add(*other_exponent)
                .map(|exponent| PowerOfInt { base: *base, exponent }),
            MultiplyRational(r) => power_times_rational(*base, *exponent, r),
            MultiplyDouble(f) => double((*base as f64).powi(*exponent) * f),
            PowerOfInt { .. } | Add(_) | PowerOfPi(_) | Log(_) | Exp(_) | Pair(..) => None,
        },
        PowerOfPi(a) => match inner {
            Identity => Some(outer.clone()),
            PowerOfPi(b) => a.exponent().checked_add(b.exponent()).map(Converter::power_of_pi),
            Add(_) | MultiplyRational(_) | MultiplyDouble(_) | PowerOfInt { .. } | Log(_) | Exp(_) | Pair(..) => {
                None
            }
        },
        MultiplyDouble(a) => match inner {
            Identity => Some(outer.clone()),
            MultiplyDouble(b) => double(a * b),
            MultiplyRational(r) => double(a * r.to_f64()),
            PowerOfInt { base, exponent } => double(a * (*base as f64).powi(*exponent)),
            Add(_) | PowerOfPi(_) | Log(_) | Exp(_) | Pair(..) => None,
        },
        Log(a) => match inner {
            Identity => Some(outer.clone()),
            Exp(b) if a == b => Some(Identity),
            Exp(_) | Add(_) | MultiplyRational(_) | MultiplyDouble(_) | PowerOfInt { .. } | PowerOfPi(_) | Log(_)
            | Pair(..) => None,
        },
        Exp(a) => match inner {
            Identity => Some(outer.clone()),
            Log(b) if a == b => Some(Identity),
            Log(_) | Add(_) | MultiplyRational(_) | MultiplyDouble(_) | PowerOfInt { .. } | PowerOfPi(_) | Exp(_)
            | Pair(..) => None,
        },
        Pair(..) => match inner {
            Identity => Some(outer.clone()),
            Add(_) | MultiplyRational(_) | MultiplyDouble(_) | PowerOfInt { .. } | PowerOfPi(_) | Log(_) | Exp(_)
            | Pair(..) => None,
        },
    };

    fused.map(|c| if c.is_identity() { Identity } else { c })
}

fn add_offsets(a: &Scalar, b: &Scalar) -> Option<Converter> {
    let ns = DefaultNumberSystem::new();
    let sum = ns.add(a, b).and_then(|sum| ns.narrow(&sum)).ok()?;
    Some(Converter::Add(sum))
}

/// `base^exponent × r` as an exact rational factor
fn power_times_rational(base: i32, exponent: i32, r: &Rational) -> Option<Converter> {
    let power = Rational::of_integer(base as i64).pow(exponent).ok()?;
    Converter::of_rational(power.multiply(r)).ok()
}

/// Double factor, unless the product left the finite non-zero range
fn double(factor: f64) -> Option<Converter> {
    Converter::double(factor).ok()
}
