// ============================================================================
// UNumber Library
// Fixed-width decimal arithmetic engine with long-hand digit algorithms
// ============================================================================

//! # UNumber
//!
//! A fixed-width decimal arithmetic engine. Values are stored in scientific
//! notation as a sign, a base-10 digit significand, and a decimal exponent;
//! the four basic operations are computed long-hand, digit by digit, with
//! explicit carry and borrow propagation rather than binary conversion.
//!
//! ## Features
//!
//! - **Exact decimal arithmetic** at any significand width chosen per value
//! - **Long-hand algorithms**: carry/borrow addition, ten's-complement
//!   subtraction, school-book multiplication, restoring division
//! - **Iterative square root** via Newton-Raphson at full digit width
//! - **Literal validation** through a finite-state-machine recognizer
//! - **Measurement semantics**: values carry an error term and a unit label
//!   with first-order uncertainty propagation
//!
//! ## Example
//!
//! ```rust
//! use unumber::prelude::*;
//!
//! // Raw values: operations mutate the receiver in place.
//! let mut sum = UNumber::from(123i64);
//! sum.add(&UNumber::from(456i64));
//! assert_eq!(sum.to_string(), "+0.579E+3");
//!
//! // The calculator façade validates text operands and formats results.
//! let mut calc = Calculator::with_width(5);
//! calc.set_operand1("1").unwrap();
//! calc.set_operand2("3").unwrap();
//! assert_eq!(calc.division().unwrap(), "+0.33333E+0");
//! ```

pub mod domain;
pub mod engine;
pub mod numeric;
pub mod recognizer;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::MeasuredValue;
    pub use crate::engine::{Calculator, CalculatorError};
    pub use crate::numeric::{sqrt, NumericError, NumericResult, UNumber};
    pub use crate::recognizer::{check_measured_value, parse_measured_value, SyntaxError};
}
