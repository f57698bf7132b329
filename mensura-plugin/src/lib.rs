//! Mensura Plugin System
//!
//! Provides the pluggable arithmetic engines converters evaluate with:
//! - `NumberSystem`: the engine trait
//! - `DefaultNumberSystem`: exact arithmetic with decimal fallback
//! - `FloatNumberSystem`: double precision arithmetic
//! - `NumberSystemRegistry` and process-wide selection of the current engine

mod context;
mod default;
mod float;
mod registry;
mod traits;

pub use context::{available, current, lookup, register, select, set_current};
pub use default::DefaultNumberSystem;
pub use float::FloatNumberSystem;
pub use registry::NumberSystemRegistry;
pub use traits::{NumberSystem, NumberSystemMeta};

/// Re-export core types for engine authors
pub mod prelude {
    pub use crate::{DefaultNumberSystem, FloatNumberSystem, NumberSystem, NumberSystemMeta, NumberSystemRegistry};
    pub use mensura_core::prelude::*;
}
