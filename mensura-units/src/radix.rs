//! Mixed-radix scales
//!
//! A [`MixedRadix`] is an ordered list of compatible units of strictly
//! decreasing size, such as `h:min:s` or `ft:in:pica`. Each unit is a
//! digit position; the radix between two neighbours is how many of the
//! smaller unit make one of the larger.

use mensura_core::{RoundingMode, Scalar};
use mensura_plugin::NumberSystem;
use std::fmt;

use crate::{Quantity, Unit, UnitError};

#[derive(Debug, Clone)]
pub struct MixedRadix {
    /// Most significant first
    units: Vec<Unit>,
    primary_index: usize,
    /// `radices[i]` converts one `units[i]` into `units[i + 1]`
    radices: Vec<Scalar>,
}

impl MixedRadix {
    /// Radix of a single unit, which is also the primary unit
    pub fn of(primary: Unit) -> Self {
        MixedRadix { units: vec![primary], primary_index: 0, radices: Vec::new() }
    }

    /// Append a less significant unit
    pub fn mix(self, next: Unit) -> Result<Self, UnitError> {
        let system = mensura_plugin::current();
        self.mix_with(next, system.as_ref())
    }

    /// Append a less significant unit and make it the primary unit
    pub fn mix_primary(self, next: Unit) -> Result<Self, UnitError> {
        let system = mensura_plugin::current();
        self.mix_primary_with(next, system.as_ref())
    }

    pub fn mix_primary_with(self, next: Unit, ns: &dyn NumberSystem) -> Result<Self, UnitError> {
        let mut radix = self.mix_with(next, ns)?;
        radix.primary_index = radix.units.len() - 1;
        Ok(radix)
    }

    pub fn mix_with(mut self, next: Unit, ns: &dyn NumberSystem) -> Result<Self, UnitError> {
        let previous = self.lowest_unit();
        let converter = previous.converter_to(&next)?;
        if !converter.is_linear() {
            return Err(UnitError::NonLinearRadix { from: previous.symbol.clone(), to: next.symbol.clone() });
        }
        let radix = converter.convert_with(&Scalar::one(), ns)?;
        if ns.is_less_than_one(&radix)? {
            return Err(UnitError::RadixOrder { unit: next.symbol.clone(), previous: previous.symbol.clone() });
        }
        tracing::debug!(from = %previous, to = %next, %radix, "mixed radix position added");
        self.radices.push(ns.narrow(&radix)?);
        self.units.push(next);
        Ok(self)
    }

    // ========== Accessors ==========

    pub fn primary_unit(&self) -> &Unit {
        &self.units[self.primary_index]
    }

    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The least significant unit
    pub fn lowest_unit(&self) -> &Unit {
        &self.units[self.units.len() - 1]
    }

    pub fn radices(&self) -> &[Scalar] {
        &self.radices
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false: a mixed radix holds at least its primary unit
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    // ========== Quantities ==========

    /// Quantity in the primary unit from coefficients given most
    /// significant first; missing trailing coefficients count as zero
    pub fn create_quantity(&self, coefficients: &[Scalar]) -> Result<Quantity, UnitError> {
        let system = mensura_plugin::current();
        self.create_quantity_with(coefficients, system.as_ref())
    }

    pub fn create_quantity_with(&self, coefficients: &[Scalar], ns: &dyn NumberSystem) -> Result<Quantity, UnitError> {
        if coefficients.len() > self.units.len() {
            return Err(UnitError::TooManyCoefficients { given: coefficients.len(), units: self.units.len() });
        }
        let zero = Scalar::zero();
        let mut total = coefficients.first().cloned().unwrap_or_else(Scalar::zero);
        for (i, radix) in self.radices.iter().enumerate() {
            let next = coefficients.get(i + 1).unwrap_or(&zero);
            total = ns.add(&ns.multiply(&total, radix)?, next)?;
        }
        let lowest = Quantity::new(total, self.lowest_unit().clone());
        lowest.to_with(self.primary_unit(), ns)
    }

    /// Coefficients of `quantity` in this radix, most significant first.
    ///
    /// The least significant coefficient keeps any fractional part; when
    /// it is a decimal it is rounded once, towards negative infinity, at
    /// the engine's precision.
    pub fn extract_values(&self, quantity: &Quantity) -> Result<Vec<Scalar>, UnitError> {
        let system = mensura_plugin::current();
        self.extract_values_with(quantity, system.as_ref())
    }

    pub fn extract_values_with(&self, quantity: &Quantity, ns: &dyn NumberSystem) -> Result<Vec<Scalar>, UnitError> {
        let mut carry = quantity.to_with(self.lowest_unit(), ns)?.value;
        let mut values = vec![Scalar::zero(); self.units.len()];
        for (i, radix) in self.radices.iter().enumerate().rev() {
            let (quotient, remainder) = ns.divide_and_remainder(&carry, radix, false)?;
            values[i + 1] = remainder;
            carry = quotient;
        }
        values[0] = carry;

        let last = values.len() - 1;
        if let Scalar::Decimal(d) = &values[last] {
            let floor = ns.context().with_rounding(RoundingMode::Floor);
            values[last] = Scalar::Decimal(d.round(&floor));
        }
        values.iter().map(|v| Ok(ns.narrow(v)?)).collect()
    }
}

impl fmt::Display for MixedRadix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.units.iter().map(|u| u.symbol.as_str()).collect();
        write!(f, "{}", symbols.join(":"))
    }
}
