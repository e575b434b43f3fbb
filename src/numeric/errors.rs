// ============================================================================
// Numeric Errors
// Error types for decimal arithmetic operations
// ============================================================================

use std::fmt;

/// Errors that can occur during decimal arithmetic operations.
///
/// The core arithmetic is deliberately silent: `div` saturates on a zero
/// divisor and the sizing constructors truncate without rounding. These
/// variants cover the explicitly fallible paths (`checked_div`, `sqrt`,
/// boundary conversions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Attempted division by zero (checked path only; `div` saturates instead)
    DivisionByZero,
    /// Square root of a negative value
    NegativeSquareRoot,
    /// Value does not fit the target representation
    Overflow,
    /// Conversion would lose significant digits
    PrecisionLoss,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::NegativeSquareRoot => {
                write!(f, "square root of a negative value")
            },
            NumericError::Overflow => {
                write!(f, "overflow: value does not fit the target representation")
            },
            NumericError::PrecisionLoss => write!(
                f,
                "precision loss: conversion would lose significant digits"
            ),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::NegativeSquareRoot.to_string(),
            "square root of a negative value"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::DivisionByZero, NumericError::DivisionByZero);
        assert_ne!(NumericError::DivisionByZero, NumericError::Overflow);
    }
}
