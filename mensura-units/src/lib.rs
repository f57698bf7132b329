//! Mensura Units - Converter algebra and mixed-radix quantities
//!
//! Provides:
//! - `Converter`: composable value converters kept in a normal form
//! - `Unit` and `Dimension`: units defined by their converter to the system unit
//! - `Quantity`: a value in a unit
//! - `MixedRadix`: multi-unit scales such as `h:min:s` or `ft:in`
//!
//! Values are evaluated through the current `NumberSystem` unless a
//! `*_with` variant is given one explicitly.

mod converter;
mod dimension;
mod error;
mod fusion;
mod normal_form;
mod proptests;
mod quantity;
mod radix;
mod unit;

pub use converter::{Converter, PiPower};
pub use dimension::Dimension;
pub use error::{codes, UnitError};
pub use normal_form::{compose, NormalFormOrder};
pub use quantity::Quantity;
pub use radix::MixedRadix;
pub use unit::Unit;

pub mod prelude {
    pub use crate::{Converter, Dimension, MixedRadix, Quantity, Unit, UnitError};
    pub use mensura_plugin::prelude::*;
}
