// ============================================================================
// Domain Models Module
// Value objects carried through the calculator
// ============================================================================

pub mod measured_value;

pub use measured_value::MeasuredValue;
