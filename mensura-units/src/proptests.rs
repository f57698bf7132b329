//! Property-based tests for converter algebra.
