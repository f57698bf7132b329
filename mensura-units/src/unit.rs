//! Units defined by a converter to their system unit

use mensura_core::{Rational, Scalar};
use mensura_plugin::NumberSystem;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Converter, Dimension, UnitError};

/// A unit of measurement.
///
/// `to_system` converts a value in this unit into the system unit of its
/// dimension (metre for length, second for time, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub symbol: String,
    pub name: String,
    pub dimension: Dimension,
    pub to_system: Converter,
}

impl Unit {
    /// The system unit of `dimension`
    pub fn system(symbol: &str, name: &str, dimension: Dimension) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            to_system: Converter::Identity,
        }
    }

    /// A unit whose values convert into `base` through `converter`
    pub fn derived(symbol: &str, name: &str, base: &Unit, converter: Converter) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension: base.dimension,
            to_system: base.to_system.concatenate(&converter),
        }
    }

    /// `factor` of `base`, e.g. an inch is 254/100 of a centimetre
    pub fn scaled(symbol: &str, name: &str, base: &Unit, factor: Rational) -> Result<Self, UnitError> {
        Ok(Self::derived(symbol, name, base, Converter::of_rational(factor)?))
    }

    pub fn is_system_unit(&self) -> bool {
        self.to_system.is_identity()
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Converter taking values in this unit to values in `target`
    pub fn converter_to(&self, target: &Unit) -> Result<Converter, UnitError> {
        if !self.is_compatible(target) {
            return Err(UnitError::IncompatibleDimensions {
                from: self.symbol.clone(),
                to: target.symbol.clone(),
                from_dim: self.dimension,
                to_dim: target.dimension,
            });
        }
        Ok(target.to_system.inverse()?.concatenate(&self.to_system))
    }

    pub fn convert(&self, value: &Scalar, target: &Unit) -> Result<Scalar, UnitError> {
        Ok(self.converter_to(target)?.convert(value)?)
    }

    pub fn convert_with(&self, value: &Scalar, target: &Unit, ns: &dyn NumberSystem) -> Result<Scalar, UnitError> {
        Ok(self.converter_to(target)?.convert_with(value, ns)?)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn foot() -> Unit {
        Unit::scaled("ft", "foot", &metre(), Rational::of(3048, 10000).unwrap()).unwrap()
    }

    #[test]
    fn test_system_unit() {
        assert!(metre().is_system_unit());
        assert!(!kilometre().is_system_unit());
    }

    #[test]
    fn test_compatibility() {
        let second = Unit::system("s", "second", Dimension::TIME);
        assert!(metre().is_compatible(&kilometre()));
        assert!(matches!(
            metre().converter_to(&second),
            Err(UnitError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn test_converter_between_units() {
        let km_to_ft = kilometre().converter_to(&foot()).unwrap();
        assert!(matches!(km_to_ft, Converter::MultiplyRational(_)));
        let feet = km_to_ft.convert_with(&Scalar::I8(3), &ns()).unwrap();
        assert_eq!(feet, Scalar::Rational(Rational::of(3_000_000_000, 304_800).unwrap()));

        let m_to_km = metre().convert_with(&Scalar::I16(5000), &kilometre(), &ns()).unwrap();
        assert_eq!(m_to_km, Scalar::I64(5));
    }

    #[test]
    fn test_same_unit_is_identity() {
        assert!(foot().converter_to(&foot()).unwrap().is_identity());
    }

    #[test]
    fn test_offset_units() {
        let kelvin = Unit::system("K", "kelvin", Dimension::TEMPERATURE);
        let offset = Converter::add("273.15".parse::<mensura_core::Decimal>().unwrap()).unwrap();
        let celsius = Unit::derived("°C", "degree Celsius", &kelvin, offset);
        let to_kelvin = celsius.convert_with(&Scalar::I8(100), &kelvin, &ns()).unwrap();
        assert_eq!(to_kelvin, Scalar::Decimal("373.15".parse().unwrap()));
        let back = kelvin.convert_with(&to_kelvin, &celsius, &ns()).unwrap();
        assert_eq!(ns().narrow(&back).unwrap(), Scalar::I8(100));
    }
}
