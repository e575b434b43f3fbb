// ============================================================================
// Recognizer Module
// Finite-state-machine validation and parsing of numeric literals
// ============================================================================

mod measured_value;

pub use measured_value::{check_measured_value, parse_measured_value, SyntaxError};
