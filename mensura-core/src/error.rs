//! Structured numeric errors
//!
//! Errors never crash the process. Every failure is a value the caller can
//! inspect, classify by [`ErrorKind`] and either recover from or propagate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const ZERO_DIVISOR: &str = "ZERO_DIVISOR";
    pub const ZERO_POW_ZERO: &str = "ZERO_POW_ZERO";
    pub const RECIPROCAL_ZERO: &str = "RECIPROCAL_ZERO";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INVALID_FACTOR: &str = "INVALID_FACTOR";
    pub const UNSUPPORTED: &str = "UNSUPPORTED";
    pub const UNKNOWN_SYSTEM: &str = "UNKNOWN_SYSTEM";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Broad classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A value object was built from arguments that violate its invariants
    Construction,
    /// An operation was applied to values it is undefined for
    Operation,
    /// The active number system does not handle a representation
    Unsupported,
    /// A broken internal invariant (a bug, never caller error)
    Internal,
}

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Zero divisor in rational {0}/0")]
    ZeroDivisor(String),

    #[error("Zero raised to the power of zero is undefined")]
    ZeroToZero,

    #[error("Reciprocal of zero is undefined")]
    ReciprocalOfZero,

    #[error("Non-finite floating point value: {0}")]
    NonFinite(f64),

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Invalid conversion factor: {0}")]
    InvalidFactor(String),

    #[error("Unsupported representation: {0}")]
    Unsupported(String),

    #[error("Unknown number system: {0}")]
    UnknownSystem(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NumberError {
    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            NumberError::ParseError(_) => codes::PARSE_ERROR,
            NumberError::DivisionByZero => codes::DIV_ZERO,
            NumberError::ZeroDivisor(_) => codes::ZERO_DIVISOR,
            NumberError::ZeroToZero => codes::ZERO_POW_ZERO,
            NumberError::ReciprocalOfZero => codes::RECIPROCAL_ZERO,
            NumberError::NonFinite(_) => codes::NON_FINITE,
            NumberError::DomainError(_) => codes::DOMAIN_ERROR,
            NumberError::InvalidFactor(_) => codes::INVALID_FACTOR,
            NumberError::Unsupported(_) => codes::UNSUPPORTED,
            NumberError::UnknownSystem(_) => codes::UNKNOWN_SYSTEM,
            NumberError::Internal(_) => codes::INTERNAL,
        }
    }

    /// Classification of this error.
    ///
    /// `ZeroToZero` counts as an operation error, including when a
    /// power converter factory reports it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NumberError::ZeroDivisor(_) | NumberError::InvalidFactor(_) => ErrorKind::Construction,
            NumberError::ParseError(_)
            | NumberError::DivisionByZero
            | NumberError::ZeroToZero
            | NumberError::ReciprocalOfZero
            | NumberError::NonFinite(_)
            | NumberError::DomainError(_) => ErrorKind::Operation,
            NumberError::Unsupported(_) | NumberError::UnknownSystem(_) => ErrorKind::Unsupported,
            NumberError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    pub fn unsupported(details: impl Into<String>) -> Self {
        NumberError::Unsupported(details.into())
    }

    pub fn domain(details: impl Into<String>) -> Self {
        NumberError::DomainError(details.into())
    }

    pub fn internal(details: impl Into<String>) -> Self {
        NumberError::Internal(details.into())
    }
}
