//! High precision π
//!
//! π is computed from Machin's formula
//! `π = 16·arctan(1/5) − 4·arctan(1/239)` in fixed point, then memoized per
//! requested digit count. Racing first computations of the same key are
//! harmless: the results are identical and the last insert wins.

use dashu_int::IBig;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::decimal::pow10;
use crate::{Decimal, MathContext, RoundingMode};

/// Guard digits carried below the requested precision
const GUARD_DIGITS: u32 = 20;

static PI_CACHE: OnceLock<RwLock<HashMap<u32, Decimal>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<u32, Decimal>> {
    PI_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// π to `digits` significant decimal digits (half-even rounded)
pub fn pi(digits: u32) -> Decimal {
    let digits = digits.max(1);
    if let Ok(cache) = get_cache().read() {
        if let Some(value) = cache.get(&digits) {
            return value.clone();
        }
    }

    let value = machin(digits);
    tracing::debug!(digits, "computed pi");
    if let Ok(mut cache) = get_cache().write() {
        cache.insert(digits, value.clone());
    }
    value
}

fn machin(digits: u32) -> Decimal {
    let scale = digits + GUARD_DIGITS;
    let unity = pow10(scale as usize);
    let four = IBig::from(4u8);
    let fixed = &four * (&four * arctan_inverse(5, &unity) - arctan_inverse(239, &unity));
    Decimal::new(fixed, scale as i64).round(&MathContext::new(digits, RoundingMode::HalfEven))
}

/// `arctan(1/x)` scaled by `unity`, by its alternating Taylor series
fn arctan_inverse(x: u32, unity: &IBig) -> IBig {
    let x = IBig::from(x);
    let x_squared = &x * &x;
    let mut power = unity / &x;
    let mut sum = power.clone();
    let mut k: u32 = 1;
    loop {
        power = &power / &x_squared;
        if power == IBig::ZERO {
            break;
        }
        let term = &power / IBig::from(2 * k + 1);
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI_60: &str = "3.14159265358979323846264338327950288419716939937510582097494";

    #[test]
    fn test_pi_digits() {
        assert_eq!(pi(50).to_string(), "3.1415926535897932384626433832795028841971693993751");
        assert_eq!(pi(1).to_string(), "3");
        assert_eq!(pi(3).to_string(), "3.14");
    }

    #[test]
    fn test_pi_rounds_last_digit() {
        // 3.14159265358979323846|26… rounds down, 3.1415926535897932384|626… rounds up
        assert_eq!(pi(21).to_string(), "3.14159265358979323846");
        assert_eq!(pi(20).to_string(), "3.1415926535897932385");
    }

    #[test]
    fn test_pi_against_reference() {
        let reference: Decimal = PI_60.parse().unwrap();
        let expected = reference.round(&MathContext::new(40, RoundingMode::HalfEven));
        assert_eq!(pi(40), expected);
    }

    #[test]
    fn test_pi_is_memoized() {
        let first = pi(75);
        let second = pi(75);
        assert_eq!(first, second);
        assert!(get_cache().read().unwrap().contains_key(&75));
    }
}
