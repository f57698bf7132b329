//! Precision configuration for decimal fallback paths
//!
//! A single process-wide [`MathContext`] governs every computation that
//! cannot stay exact. The initial value is read once from the environment:
//!
//! - `MENSURA_PRECISION`: significant decimal digits (default 128)
//! - `MENSURA_ROUNDING`: one of `up`, `down`, `ceiling`, `floor`,
//!   `half_up`, `half_down`, `half_even` (default `half_even`)
//!
//! Changing the context affects subsequent computations only.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

use crate::NumberError;

/// Default number of significant decimal digits
pub const DEFAULT_PRECISION: u32 = 128;

/// How digits beyond the configured precision are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Towards zero (truncation)
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties towards zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
}

impl RoundingMode {
    /// Decide whether a truncated magnitude must be incremented.
    ///
    /// `half` is the discarded fraction compared against one half,
    /// `inexact` whether anything non-zero was discarded at all.
    pub(crate) fn round_up(
        self,
        negative: bool,
        odd: bool,
        half: std::cmp::Ordering,
        inexact: bool,
    ) -> bool {
        use std::cmp::Ordering::*;
        if !inexact {
            return false;
        }
        match self {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => !negative,
            RoundingMode::Floor => negative,
            RoundingMode::HalfUp => half != Less,
            RoundingMode::HalfDown => half == Greater,
            RoundingMode::HalfEven => half == Greater || (half == Equal && odd),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "up" => Ok(RoundingMode::Up),
            "down" => Ok(RoundingMode::Down),
            "ceiling" => Ok(RoundingMode::Ceiling),
            "floor" => Ok(RoundingMode::Floor),
            "half_up" => Ok(RoundingMode::HalfUp),
            "half_down" => Ok(RoundingMode::HalfDown),
            "half_even" => Ok(RoundingMode::HalfEven),
            _ => Err(NumberError::ParseError(format!("rounding mode '{}'", s))),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
            RoundingMode::HalfUp => "half_up",
            RoundingMode::HalfDown => "half_down",
            RoundingMode::HalfEven => "half_even",
        };
        write!(f, "{}", name)
    }
}

/// Precision and rounding applied to inexact decimal results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MathContext {
    /// Significant decimal digits, always at least 1
    pub precision: u32,
    pub rounding: RoundingMode,
}

impl MathContext {
    pub fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self { precision: precision.max(1), rounding }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.max(1);
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Build the process default from the environment, ignoring values
    /// that do not parse.
    pub fn from_env() -> Self {
        let mut ctx = Self::default();
        if let Ok(p) = env::var("MENSURA_PRECISION") {
            match p.trim().parse::<u32>() {
                Ok(precision) => ctx = ctx.with_precision(precision),
                Err(_) => tracing::warn!(value = %p, "ignoring invalid MENSURA_PRECISION"),
            }
        }
        if let Ok(r) = env::var("MENSURA_ROUNDING") {
            match r.parse::<RoundingMode>() {
                Ok(rounding) => ctx = ctx.with_rounding(rounding),
                Err(_) => tracing::warn!(value = %r, "ignoring invalid MENSURA_ROUNDING"),
            }
        }
        ctx
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self { precision: DEFAULT_PRECISION, rounding: RoundingMode::HalfEven }
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precision={} rounding={}", self.precision, self.rounding)
    }
}

static MATH_CONTEXT: OnceLock<RwLock<MathContext>> = OnceLock::new();

fn global() -> &'static RwLock<MathContext> {
    MATH_CONTEXT.get_or_init(|| RwLock::new(MathContext::from_env()))
}

/// The current process-wide math context
pub fn math_context() -> MathContext {
    match global().read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Replace the process-wide math context, returning the previous one
pub fn set_math_context(ctx: MathContext) -> MathContext {
    let mut guard = match global().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let previous = std::mem::replace(&mut *guard, ctx);
    tracing::debug!(%previous, current = %ctx, "math context changed");
    previous
}
