// ============================================================================
// Numeric Module
// Fixed-width decimal arithmetic in scientific notation
// ============================================================================
//
// This module provides:
// - UNumber: sign + digit significand + decimal exponent value type
// - sqrt: iterative square root over UNumber
// - NumericError: error types for the fallible paths
//
// Design principles:
// - Long-hand digit algorithms (explicit carry/borrow propagation)
// - Arithmetic mutates the receiver and never the argument
// - Significand width is fixed at construction time
// - Every operation leaves its result normalized

mod errors;
mod sqrt;
mod unumber;

pub use errors::{NumericError, NumericResult};
pub use sqrt::sqrt;
pub use unumber::UNumber;
