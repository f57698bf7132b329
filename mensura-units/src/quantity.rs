//! Quantity type - a value with an associated unit

use mensura_core::Scalar;
use mensura_plugin::NumberSystem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::{Unit, UnitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Scalar,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: impl Into<Scalar>, unit: Unit) -> Self {
        Quantity { value: value.into(), unit }
    }

    /// The same quantity expressed in `target`
    pub fn to(&self, target: &Unit) -> Result<Quantity, UnitError> {
        let value = self.unit.convert(&self.value, target)?;
        Ok(Quantity::new(value, target.clone()))
    }

    pub fn to_with(&self, target: &Unit, ns: &dyn NumberSystem) -> Result<Quantity, UnitError> {
        let value = self.unit.convert_with(&self.value, target, ns)?;
        Ok(Quantity::new(value, target.clone()))
    }

    /// Compare magnitudes after converting `other` into this unit
    pub fn compare_with(&self, other: &Quantity, ns: &dyn NumberSystem) -> Result<Ordering, UnitError> {
        let other = other.to_with(&self.unit, ns)?;
        Ok(ns.compare(&self.value, &other.value)?)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Converter, Dimension};
    use mensura_core::MathContext;
    use mensura_plugin::DefaultNumberSystem;

    fn ns() -> DefaultNumberSystem {
        DefaultNumberSystem::new().with_context(MathContext::default())
    }

    fn metre() -> Unit {
        Unit::system("m", "metre", Dimension::LENGTH)
    }

    fn kilometre() -> Unit {
        Unit::derived("km", "kilometre", &metre(), Converter::ten_exponent(3))
    }

    #[test]
    fn test_to_other_unit() {
        let q = Quantity::new(2i8, kilometre());
        let m = q.to_with(&metre(), &ns()).unwrap();
        assert_eq!(m.value, Scalar::I64(2000));
        assert_eq!(m.to_string(), "2000 m");
    }

    #[test]
    fn test_compare_across_units() {
        let a = Quantity::new(1500i16, metre());
        let b = Quantity::new(1i8, kilometre());
        assert_eq!(a.compare_with(&b, &ns()).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_incompatible() {
        let second = Unit::system("s", "second", Dimension::TIME);
        let q = Quantity::new(1i8, metre());
        assert!(q.to_with(&second, &ns()).is_err());
    }
}
