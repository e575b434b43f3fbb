// ============================================================================
// Measured Value
// A numeric value paired with a measurement uncertainty and an optional unit
// ============================================================================

use crate::numeric::{sqrt, NumericError, NumericResult, UNumber};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value as produced by a physical measurement: the measured quantity, a
/// non-negative error term bounding the uncertainty, and an optional unit
/// label carried verbatim.
///
/// Arithmetic mirrors the underlying [`UNumber`] convention: operations
/// mutate the receiver in place and leave the argument untouched. The error
/// term propagates by first-order rules (uncertainties add under addition and
/// subtraction; products and quotients scale each operand's uncertainty by
/// the other's magnitude). Units are not a dimensional algebra: addition and
/// subtraction keep a unit both operands share and drop a mismatched one,
/// every other operation drops the unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasuredValue {
    value: UNumber,
    error_term: UNumber,
    unit: Option<String>,
}

impl MeasuredValue {
    /// An exact value: zero error term (at the value's width), no unit.
    pub fn new(value: UNumber) -> Self {
        let error_term = UNumber::zero(value.length());
        Self {
            value,
            error_term,
            unit: None,
        }
    }

    /// Builder-style error term.
    pub fn with_error_term(mut self, error_term: UNumber) -> Self {
        self.set_error_term(error_term);
        self
    }

    /// Builder-style unit label.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[inline]
    pub fn value(&self) -> &UNumber {
        &self.value
    }

    #[inline]
    pub fn error_term(&self) -> &UNumber {
        &self.error_term
    }

    #[inline]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Replace the error term; the sign is discarded, uncertainties are
    /// magnitudes.
    pub fn set_error_term(&mut self, mut error_term: UNumber) {
        error_term.abs();
        self.error_term = error_term;
    }

    /// Replace the unit label; `None` clears it.
    pub fn set_unit(&mut self, unit: Option<String>) {
        self.unit = unit;
    }

    /// `self ← self + that`; uncertainties add.
    pub fn add(&mut self, that: &Self) {
        self.value.add(&that.value);
        self.error_term.add(&that.error_term);
        self.unit = combined_unit(self.unit.take(), that.unit.as_deref());
    }

    /// `self ← self - that`; uncertainties still add (they bound magnitude,
    /// not direction).
    pub fn sub(&mut self, that: &Self) {
        self.value.sub(&that.value);
        self.error_term.add(&that.error_term);
        self.unit = combined_unit(self.unit.take(), that.unit.as_deref());
    }

    /// `self ← self × that`; the uncertainty becomes `e₁·|v₂| + e₂·|v₁|`.
    pub fn mpy(&mut self, that: &Self) {
        let mut scaled_self = self.error_term.clone();
        scaled_self.mpy(&magnitude(&that.value));

        let mut scaled_that = that.error_term.clone();
        scaled_that.mpy(&magnitude(&self.value));

        scaled_self.add(&scaled_that);
        self.error_term = scaled_self;
        self.value.mpy(&that.value);
        self.unit = None;
    }

    /// `self ← self ÷ that`; the uncertainty becomes `(e₁ + e₂·|r|) / |v₂|`
    /// where `r` is the quotient.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] for a zero divisor; the
    /// receiver is left unchanged.
    pub fn div(&mut self, that: &Self) -> NumericResult<()> {
        if that.value.is_zero() {
            return Err(NumericError::DivisionByZero);
        }

        let mut quotient = self.value.clone();
        quotient.div(&that.value);

        let mut error = that.error_term.clone();
        error.mpy(&magnitude(&quotient));
        error.add(&self.error_term);
        error.div(&magnitude(&that.value));

        self.value = quotient;
        self.error_term = error;
        self.unit = None;
        Ok(())
    }

    /// `self ← √self`; the uncertainty becomes `e / (2·r)` where `r` is the
    /// root. The error term of a zero value is carried through unchanged
    /// (the first-order rule has no meaning at zero).
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::NegativeSquareRoot`] for a negative value; the
    /// receiver is left unchanged.
    pub fn sqrt(&mut self) -> NumericResult<()> {
        let root = sqrt(&self.value)?;
        if !root.is_zero() {
            let mut divisor = root.clone();
            divisor.mpy(&UNumber::from(2i64));
            self.error_term.div(&divisor);
        }
        self.value = root;
        self.unit = None;
        Ok(())
    }
}

/// Absolute value of `value`, as a fresh copy.
fn magnitude(value: &UNumber) -> UNumber {
    let mut copy = value.clone();
    copy.abs();
    copy
}

/// Unit surviving an additive operation: kept when shared, dropped when
/// mismatched or missing on either side.
fn combined_unit(left: Option<String>, right: Option<&str>) -> Option<String> {
    match (left, right) {
        (Some(l), Some(r)) if l == r => Some(l),
        _ => None,
    }
}

impl fmt::Display for MeasuredValue {
    /// `value ± error unit`, eliding a zero error term and a missing unit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.error_term.is_zero() {
            write!(f, " ± {}", self.error_term)?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}
