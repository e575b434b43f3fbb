// ============================================================================
// Engine Module
// Contains the calculator business logic
// ============================================================================

mod calculator;

pub use calculator::{Calculator, CalculatorError};
