//! Dimensional signatures
//!
//! A dimension is the vector of exponents of the seven SI base quantities:
//! [length, mass, time, current, temperature, amount, luminosity]

use serde::{Deserialize, Serialize};
use std::fmt;

const SYMBOLS: [&str; 7] = ["L", "M", "T", "I", "Θ", "N", "J"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub exponents: [i32; 7],
}

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [0; 7] };
    pub const LENGTH: Dimension = Dimension::base(0);
    pub const MASS: Dimension = Dimension::base(1);
    pub const TIME: Dimension = Dimension::base(2);
    pub const CURRENT: Dimension = Dimension::base(3);
    pub const TEMPERATURE: Dimension = Dimension::base(4);
    pub const AMOUNT: Dimension = Dimension::base(5);
    pub const LUMINOSITY: Dimension = Dimension::base(6);

    const fn base(index: usize) -> Dimension {
        let mut exponents = [0; 7];
        exponents[index] = 1;
        Dimension { exponents }
    }

    pub fn new(exponents: [i32; 7]) -> Self {
        Dimension { exponents }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Dimension of a product (exponents added)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        self.zip(other, |a, b| a + b)
    }

    /// Dimension of a quotient (exponents subtracted)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.zip(other, |a, b| a - b)
    }

    pub fn power(&self, exp: i32) -> Dimension {
        Dimension { exponents: self.exponents.map(|e| e * exp) }
    }

    fn zip(&self, other: &Dimension, f: impl Fn(i32, i32) -> i32) -> Dimension {
        let mut exponents = [0; 7];
        for (i, e) in exponents.iter_mut().enumerate() {
            *e = f(self.exponents[i], other.exponents[i]);
        }
        Dimension { exponents }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .exponents
            .iter()
            .zip(SYMBOLS)
            .filter(|(exp, _)| **exp != 0)
            .map(|(&exp, symbol)| if exp == 1 { symbol.to_string() } else { format!("{}^{}", symbol, exp) })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}
