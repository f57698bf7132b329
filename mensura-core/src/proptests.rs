//! Property-based tests for exact and decimal arithmetic.

#[cfg(test)]
mod tests {
    use dashu_base::Gcd;
    use dashu_int::UBig;
    use proptest::prelude::*;

    use crate::{Decimal, MathContext, Rational, RoundingMode};

    fn small_int() -> impl Strategy<Value = i64> {
        -10_000i64..10_000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-10_000i64..=-1i64), (1i64..=10_000i64)]
    }

    proptest! {
        #[test]
        fn rational_is_canonical(n in small_int(), d in non_zero_int()) {
            let r = Rational::of(n, d).unwrap();
            prop_assert!(*r.abs_divisor() > UBig::ZERO);
            if n == 0 {
                prop_assert_eq!(r.signum(), 0);
                prop_assert_eq!(r.abs_divisor(), &UBig::ONE);
            } else {
                let gcd = r.abs_dividend().clone().gcd(r.abs_divisor().clone());
                prop_assert_eq!(gcd, UBig::ONE);
                prop_assert_eq!(r.signum(), (n.signum() * d.signum()) as i32);
            }
        }

        #[test]
        fn rational_add_then_subtract(a in small_int(), b in non_zero_int(), c in small_int(), d in non_zero_int()) {
            let x = Rational::of(a, b).unwrap();
            let y = Rational::of(c, d).unwrap();
            prop_assert_eq!(x.add(&y).subtract(&y), x);
        }

        #[test]
        fn rational_multiplicative_inverse(a in non_zero_int(), b in non_zero_int()) {
            let x = Rational::of(a, b).unwrap();
            prop_assert!(x.multiply(&x.reciprocal().unwrap()).is_one());
        }

        #[test]
        fn rational_order_matches_cross_product(a in small_int(), b in non_zero_int(), c in small_int(), d in non_zero_int()) {
            let x = Rational::of(a, b).unwrap();
            let y = Rational::of(c, d).unwrap();
            let lhs = a as i128 * b.signum() as i128 * (d.abs() as i128);
            let rhs = c as i128 * d.signum() as i128 * (b.abs() as i128);
            prop_assert_eq!(x.compare_to(&y), lhs.cmp(&rhs));
        }

        #[test]
        fn decimal_rounding_respects_precision(n in any::<i64>(), digits in 1u32..12) {
            let ctx = MathContext::new(digits, RoundingMode::HalfEven);
            let rounded = Decimal::from_i64(n).round(&ctx);
            prop_assert!(rounded.precision() <= digits as usize);
        }

        #[test]
        fn decimal_floor_never_exceeds_value(a in small_int(), b in non_zero_int()) {
            let value = Rational::of(a, b).unwrap().to_decimal_with(&MathContext::new(30, RoundingMode::HalfEven));
            let floor = Decimal::from_integer(value.floor());
            prop_assert!(floor <= value);
            prop_assert!(value.sub(&floor) < Decimal::one());
        }
    }
}
