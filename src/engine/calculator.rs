// ============================================================================
// Calculator
// Business-logic façade: operand entry, validation, and the five operations
// ============================================================================

use crate::domain::MeasuredValue;
use crate::numeric::{NumericError, UNumber};
use crate::recognizer::{parse_measured_value, SyntaxError};
use std::fmt;

/// Errors surfaced by the calculator façade.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorError {
    /// The operand text failed literal validation.
    Syntax(SyntaxError),
    /// The arithmetic itself failed (division by zero, negative square root).
    Numeric(NumericError),
    /// An operation was requested before its operands were entered.
    UndefinedOperand,
}

impl fmt::Display for CalculatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculatorError::Syntax(err) => write!(f, "invalid operand: {}", err),
            CalculatorError::Numeric(err) => write!(f, "arithmetic error: {}", err),
            CalculatorError::UndefinedOperand => write!(f, "operand not defined"),
        }
    }
}

impl std::error::Error for CalculatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalculatorError::Syntax(err) => Some(err),
            CalculatorError::Numeric(err) => Some(err),
            CalculatorError::UndefinedOperand => None,
        }
    }
}

impl From<SyntaxError> for CalculatorError {
    fn from(err: SyntaxError) -> Self {
        CalculatorError::Syntax(err)
    }
}

impl From<NumericError> for CalculatorError {
    fn from(err: NumericError) -> Self {
        CalculatorError::Numeric(err)
    }
}

/// The calculator: two entered operands, the last computed result, and the
/// significand width every parsed value is sized to.
///
/// Operand text is validated and parsed on entry, so the arithmetic never
/// sees malformed input. Operations never mutate the stored operands; each
/// result is computed on a fresh copy, stored, and returned formatted.
#[derive(Debug, Clone)]
pub struct Calculator {
    operand1: Option<MeasuredValue>,
    operand2: Option<MeasuredValue>,
    result: Option<MeasuredValue>,
    width: usize,
}

impl Calculator {
    /// A calculator at the default significand width.
    pub fn new() -> Self {
        Self::with_width(UNumber::DEFAULT_WIDTH)
    }

    /// A calculator whose parsed values carry `width` significand digits.
    pub fn with_width(width: usize) -> Self {
        Self {
            operand1: None,
            operand2: None,
            result: None,
            width: width.max(1),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Enter the first operand from literal text; empty text clears it.
    ///
    /// # Errors
    ///
    /// Returns `CalculatorError::Syntax` for a malformed literal; the stored
    /// operand is left unchanged.
    pub fn set_operand1(&mut self, text: &str) -> Result<(), CalculatorError> {
        self.operand1 = self.parse_operand(text)?;
        Ok(())
    }

    /// Enter the second operand from literal text; empty text clears it.
    ///
    /// # Errors
    ///
    /// Returns `CalculatorError::Syntax` for a malformed literal; the stored
    /// operand is left unchanged.
    pub fn set_operand2(&mut self, text: &str) -> Result<(), CalculatorError> {
        self.operand2 = self.parse_operand(text)?;
        Ok(())
    }

    /// Attach an error term to the first operand.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when no first operand has been entered,
    /// or `Syntax` for a malformed literal.
    pub fn set_operand1_error_term(&mut self, text: &str) -> Result<(), CalculatorError> {
        let term = parse_measured_value(text, self.width)?;
        match &mut self.operand1 {
            Some(operand) => {
                operand.set_error_term(term);
                Ok(())
            },
            None => Err(CalculatorError::UndefinedOperand),
        }
    }

    /// Attach an error term to the second operand.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when no second operand has been entered,
    /// or `Syntax` for a malformed literal.
    pub fn set_operand2_error_term(&mut self, text: &str) -> Result<(), CalculatorError> {
        let term = parse_measured_value(text, self.width)?;
        match &mut self.operand2 {
            Some(operand) => {
                operand.set_error_term(term);
                Ok(())
            },
            None => Err(CalculatorError::UndefinedOperand),
        }
    }

    /// Attach a unit label to the first operand; empty text clears it.
    /// Quietly ignored when the operand is undefined.
    pub fn set_operand1_unit(&mut self, unit: &str) {
        if let Some(operand) = &mut self.operand1 {
            operand.set_unit(non_empty(unit));
        }
    }

    /// Attach a unit label to the second operand; empty text clears it.
    /// Quietly ignored when the operand is undefined.
    pub fn set_operand2_unit(&mut self, unit: &str) {
        if let Some(operand) = &mut self.operand2 {
            operand.set_unit(non_empty(unit));
        }
    }

    #[inline]
    pub fn operand1_defined(&self) -> bool {
        self.operand1.is_some()
    }

    #[inline]
    pub fn operand2_defined(&self) -> bool {
        self.operand2.is_some()
    }

    /// The last computed result, if any operation has succeeded.
    #[inline]
    pub fn result(&self) -> Option<&MeasuredValue> {
        self.result.as_ref()
    }

    /// `operand1 + operand2`.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when either operand is missing.
    pub fn addition(&mut self) -> Result<String, CalculatorError> {
        let result = {
            let (op1, op2) = self.binary_operands()?;
            let mut result = op1.clone();
            result.add(op2);
            result
        };
        tracing::debug!("addition result: {}", result);
        Ok(self.store(result))
    }

    /// `operand1 - operand2`.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when either operand is missing.
    pub fn subtraction(&mut self) -> Result<String, CalculatorError> {
        let result = {
            let (op1, op2) = self.binary_operands()?;
            let mut result = op1.clone();
            result.sub(op2);
            result
        };
        tracing::debug!("subtraction result: {}", result);
        Ok(self.store(result))
    }

    /// `operand1 × operand2`.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when either operand is missing.
    pub fn multiplication(&mut self) -> Result<String, CalculatorError> {
        let result = {
            let (op1, op2) = self.binary_operands()?;
            let mut result = op1.clone();
            result.mpy(op2);
            result
        };
        tracing::debug!("multiplication result: {}", result);
        Ok(self.store(result))
    }

    /// `operand1 ÷ operand2`.
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when either operand is missing, or
    /// `Numeric(DivisionByZero)` for a zero second operand.
    pub fn division(&mut self) -> Result<String, CalculatorError> {
        let result = {
            let (op1, op2) = self.binary_operands()?;
            let mut result = op1.clone();
            result.div(op2)?;
            result
        };
        tracing::debug!("division result: {}", result);
        Ok(self.store(result))
    }

    /// `√operand1` (unary; the second operand is ignored).
    ///
    /// # Errors
    ///
    /// Fails with `UndefinedOperand` when the first operand is missing, or
    /// `Numeric(NegativeSquareRoot)` for a negative one.
    pub fn square_root(&mut self) -> Result<String, CalculatorError> {
        let result = {
            let op1 = self
                .operand1
                .as_ref()
                .ok_or(CalculatorError::UndefinedOperand)?;
            let mut result = op1.clone();
            result.sqrt()?;
            result
        };
        tracing::debug!("square root result: {}", result);
        Ok(self.store(result))
    }

    fn parse_operand(&self, text: &str) -> Result<Option<MeasuredValue>, CalculatorError> {
        if text.is_empty() {
            return Ok(None);
        }
        let value = parse_measured_value(text, self.width)?;
        Ok(Some(MeasuredValue::new(value)))
    }

    fn binary_operands(&self) -> Result<(&MeasuredValue, &MeasuredValue), CalculatorError> {
        match (&self.operand1, &self.operand2) {
            (Some(op1), Some(op2)) => Ok((op1, op2)),
            _ => Err(CalculatorError::UndefinedOperand),
        }
    }

    fn store(&mut self, result: MeasuredValue) -> String {
        let formatted = result.to_string();
        self.result = Some(result);
        formatted
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addition() {
        let mut calc = Calculator::with_width(3);
        calc.set_operand1("123").unwrap();
        calc.set_operand2("456").unwrap();
        assert_eq!(calc.addition().unwrap(), "+0.579E+3");
    }

    #[test]
    fn test_subtraction() {
        let mut calc = Calculator::with_width(3);
        calc.set_operand1("100").unwrap();
        calc.set_operand2("1").unwrap();
        // Both operands carry three digits, so the aligned window spans
        // 100.00 and the difference keeps two fractional positions.
        assert_eq!(calc.subtraction().unwrap(), "+0.9900E+2");
    }

    #[test]
    fn test_multiplication() {
        let mut calc = Calculator::with_width(2);
        calc.set_operand1("25").unwrap();
        calc.set_operand2("4").unwrap();
        assert_eq!(calc.multiplication().unwrap(), "+0.10E+3");
    }

    #[test]
    fn test_division() {
        let mut calc = Calculator::with_width(5);
        calc.set_operand1("1").unwrap();
        calc.set_operand2("3").unwrap();
        assert_eq!(calc.division().unwrap(), "+0.33333E+0");
    }

    #[test]
    fn test_division_by_zero_is_rejected() {
        let mut calc = Calculator::with_width(5);
        calc.set_operand1("5").unwrap();
        calc.set_operand2("0").unwrap();
        assert_eq!(
            calc.division(),
            Err(CalculatorError::Numeric(NumericError::DivisionByZero))
        );
    }

    #[test]
    fn test_square_root() {
        let mut calc = Calculator::with_width(4);
        calc.set_operand1("144").unwrap();
        assert_eq!(calc.square_root().unwrap(), "+0.1200E+2");
    }

    #[test]
    fn test_square_root_of_negative_is_rejected() {
        let mut calc = Calculator::with_width(4);
        calc.set_operand1("-4").unwrap();
        assert_eq!(
            calc.square_root(),
            Err(CalculatorError::Numeric(NumericError::NegativeSquareRoot))
        );
    }

    #[test]
    fn test_undefined_operands() {
        let mut calc = Calculator::new();
        assert_eq!(calc.addition(), Err(CalculatorError::UndefinedOperand));

        calc.set_operand1("1").unwrap();
        assert_eq!(calc.addition(), Err(CalculatorError::UndefinedOperand));
        assert!(calc.square_root().is_ok());
    }

    #[test]
    fn test_empty_text_clears_operand() {
        let mut calc = Calculator::new();
        calc.set_operand1("42").unwrap();
        assert!(calc.operand1_defined());
        calc.set_operand1("").unwrap();
        assert!(!calc.operand1_defined());
    }

    #[test]
    fn test_malformed_operand_leaves_state_unchanged() {
        let mut calc = Calculator::new();
        calc.set_operand1("42").unwrap();
        assert!(calc.set_operand1("4x2").is_err());
        assert!(calc.operand1_defined());
    }

    #[test]
    fn test_error_terms_and_units_flow_through() {
        let mut calc = Calculator::with_width(4);
        calc.set_operand1("10").unwrap();
        calc.set_operand1_error_term("0.1").unwrap();
        calc.set_operand1_unit("m");
        calc.set_operand2("20").unwrap();
        calc.set_operand2_error_term("0.2").unwrap();
        calc.set_operand2_unit("m");

        let formatted = calc.addition().unwrap();
        assert_eq!(formatted, "+0.3000E+2 ± +0.3000E+0 m");
    }

    #[test]
    fn test_error_term_requires_operand() {
        let mut calc = Calculator::new();
        assert_eq!(
            calc.set_operand1_error_term("0.1"),
            Err(CalculatorError::UndefinedOperand)
        );
    }

    #[test]
    fn test_operands_survive_operations() {
        let mut calc = Calculator::with_width(5);
        calc.set_operand1("10").unwrap();
        calc.set_operand2("3").unwrap();
        calc.division().unwrap();
        // Same operands, different operation: entry state was not consumed.
        assert_eq!(calc.multiplication().unwrap(), "+0.30000E+2");
    }

    #[test]
    fn test_result_is_stored() {
        let mut calc = Calculator::with_width(3);
        calc.set_operand1("2").unwrap();
        calc.set_operand2("3").unwrap();
        calc.addition().unwrap();
        let result = calc.result().unwrap();
        assert_eq!(result.value(), &UNumber::from(5i64));
    }
}
