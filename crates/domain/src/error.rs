//! Unified error types for the domain layer
//!
//! Formulas in this crate degrade gracefully (non-numeric input reads as zero,
//! out-of-range output is clamped). The variants below are reserved for the
//! few cases that are genuine contract violations or malformed identifiers.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., an attribute assignment breaks a rule)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Level below 1 passed to a level-based formula
    #[error("Level must be at least 1, got {0}")]
    InvalidLevel(i32),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// An attribute name that does not follow the repeating-row layout
    #[error("Invalid attribute key: {0}")]
    InvalidAttributeKey(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if remaining < 0 {
    ///     return Err(DomainError::validation("Attribute points overspent"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid level error
    pub fn invalid_level(level: i32) -> Self {
        Self::InvalidLevel(level)
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid attribute key error
    pub fn invalid_attribute_key(key: impl Into<String>) -> Self {
        Self::InvalidAttributeKey(key.into())
    }
}
