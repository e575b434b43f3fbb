// ============================================================================
// Measured Value Recognizer
// Finite-state-machine validation of numeric literals
// ============================================================================

use crate::numeric::UNumber;
use std::fmt;

/// A rejected numeric literal: the offending input, the character index the
/// scan stopped at, and what the scanner expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    input: String,
    index: usize,
    message: String,
}

impl SyntaxError {
    fn new(input: &str, index: usize, message: &str) -> Self {
        Self {
            input: input.to_string(),
            index,
            message: message.to_string(),
        }
    }

    /// Character index (not byte offset) of the offending position; equals
    /// the input length when the literal ended too early.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for SyntaxError {
    /// Renders the message, the offending input, and a caret line pointing
    /// at the position the scan stopped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at position {}", self.message, self.index)?;
        writeln!(f, "  {}", self.input)?;
        write!(f, "  {}^", " ".repeat(self.index))
    }
}

impl std::error::Error for SyntaxError {}

/// Scanner states. The variants marked final accept end-of-input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed yet.
    Start,
    /// A leading mantissa sign was consumed.
    MantissaSign,
    /// Inside the whole-number digits (final).
    IntegerPart,
    /// A decimal point with no integer digits before it.
    LeadingPoint,
    /// Inside the fraction digits, or just past the decimal point when
    /// integer digits exist (final).
    FractionPart,
    /// An `E`/`e` was consumed.
    ExponentMark,
    /// An exponent sign was consumed.
    ExponentSign,
    /// Inside the exponent digits (final).
    ExponentPart,
}

/// Validate a numeric literal of the form
/// `[+|-] digits [. digits] [E|e [+|-] digits]`, where the integer digits may
/// be omitted when fraction digits are present.
///
/// The walk is a mechanical state machine over the characters; all scanner
/// state lives on the stack, so concurrent callers never interfere.
///
/// # Errors
///
/// Returns a [`SyntaxError`] locating the first offending character, or the
/// end of input when the literal stops in a non-final state (including empty
/// input).
pub fn check_measured_value(input: &str) -> Result<(), SyntaxError> {
    let mut state = State::Start;

    for (index, c) in input.chars().enumerate() {
        state = match (state, c) {
            (State::Start, '+' | '-') => State::MantissaSign,
            (State::Start | State::MantissaSign, '0'..='9') => State::IntegerPart,
            (State::Start | State::MantissaSign, '.') => State::LeadingPoint,
            (State::Start | State::MantissaSign, _) => {
                return Err(SyntaxError::new(
                    input,
                    index,
                    "expected a digit, sign, or decimal point",
                ))
            },

            (State::IntegerPart, '0'..='9') => State::IntegerPart,
            (State::IntegerPart, '.') => State::FractionPart,
            (State::LeadingPoint | State::FractionPart, '0'..='9') => State::FractionPart,
            (State::LeadingPoint, _) => {
                return Err(SyntaxError::new(
                    input,
                    index,
                    "expected a digit after the decimal point",
                ))
            },

            (State::IntegerPart | State::FractionPart, 'E' | 'e') => State::ExponentMark,
            (State::IntegerPart | State::FractionPart, _) => {
                return Err(SyntaxError::new(input, index, "unexpected character"))
            },

            (State::ExponentMark, '+' | '-') => State::ExponentSign,
            (State::ExponentMark | State::ExponentSign, '0'..='9') => State::ExponentPart,
            (State::ExponentMark | State::ExponentSign, _) => {
                return Err(SyntaxError::new(input, index, "expected an exponent digit"))
            },

            (State::ExponentPart, '0'..='9') => State::ExponentPart,
            (State::ExponentPart, _) => {
                return Err(SyntaxError::new(input, index, "unexpected character"))
            },
        };
    }

    match state {
        State::IntegerPart | State::FractionPart | State::ExponentPart => Ok(()),
        State::Start => Err(SyntaxError::new(input, 0, "empty input")),
        _ => Err(SyntaxError::new(
            input,
            input.chars().count(),
            "unexpected end of input",
        )),
    }
}

/// Validate a literal and decompose it into a [`UNumber`] at the given
/// significand width.
///
/// The integer and fraction digits concatenate into the significand; the
/// characteristic is the integer digit count plus the explicit exponent,
/// adjusted down for any leading zeros so the stored value is normalized.
/// An all-zero literal (any sign) maps to the canonical zero.
///
/// # Errors
///
/// Returns a [`SyntaxError`] for a malformed literal or an exponent outside
/// the `i32` range.
pub fn parse_measured_value(input: &str, width: usize) -> Result<UNumber, SyntaxError> {
    check_measured_value(input)?;

    let mut chars = input.chars().peekable();
    let mut sign = true;
    match chars.peek() {
        Some('+') => {
            chars.next();
        },
        Some('-') => {
            sign = false;
            chars.next();
        },
        _ => {},
    }

    let mut digits = String::new();
    let mut integer_len = 0i32;
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        integer_len += 1;
        chars.next();
    }

    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(c) = chars.peek().copied() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            chars.next();
        }
    }

    let mut exponent = 0i32;
    if matches!(chars.peek(), Some('E' | 'e')) {
        chars.next();
        let exponent_text: String = chars.collect();
        exponent = exponent_text.parse().map_err(|_| {
            SyntaxError::new(input, input.chars().count(), "exponent out of range")
        })?;
    }

    // Leading zeros shift the characteristic rather than occupying
    // significand positions.
    match digits.bytes().position(|b| b != b'0') {
        None => Ok(UNumber::zero(width)),
        Some(skip) => {
            // The explicit exponent fits i32, but the characteristic it
            // implies may not.
            let characteristic = integer_len
                .checked_add(exponent)
                .and_then(|c| c.checked_sub(skip as i32))
                .ok_or_else(|| {
                    SyntaxError::new(input, input.chars().count(), "exponent out of range")
                })?;
            Ok(UNumber::from_digits_sized(
                &digits[skip..],
                characteristic,
                sign,
                width,
            ))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_literals() {
        for input in [
            "0", "7", "123", "+1", "-42", "1.5", "+1.5", "-0.75", ".5", "-.5", "1.", "1e10",
            "1E10", "2.5e-3", "+.25E+2", "9.81e0", "000123",
        ] {
            assert!(
                check_measured_value(input).is_ok(),
                "should accept {:?}",
                input
            );
        }
    }

    #[test]
    fn test_rejects_invalid_literals() {
        for input in [
            "", "+", "-", ".", "+.", "e5", "E5", "1e", "1e+", "1e-", "--1", "+-1", "1.2.3",
            "12x", "1.5ee3", "1e5.2", " 1", "1 ",
        ] {
            assert!(
                check_measured_value(input).is_err(),
                "should reject {:?}",
                input
            );
        }
    }

    #[test]
    fn test_error_index_points_at_offender() {
        let err = check_measured_value("1.2x5").unwrap_err();
        assert_eq!(err.index(), 3);

        // A literal that stops too early points one past the end.
        let err = check_measured_value("1.2e").unwrap_err();
        assert_eq!(err.index(), 4);

        let err = check_measured_value("").unwrap_err();
        assert_eq!(err.index(), 0);
    }

    #[test]
    fn test_error_display_caret() {
        let err = check_measured_value("12a4").unwrap_err();
        let rendered = err.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  12a4");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn test_parse_integer() {
        let n = parse_measured_value("123", 5).unwrap();
        assert_eq!(n.digits(), &[1, 2, 3, 0, 0]);
        assert_eq!(n.characteristic(), 3);
        assert!(n.sign());
    }

    #[test]
    fn test_parse_fraction_and_exponent() {
        let n = parse_measured_value("12.5", 4).unwrap();
        assert_eq!(n.digits(), &[1, 2, 5, 0]);
        assert_eq!(n.characteristic(), 2);

        let n = parse_measured_value(".5e3", 3).unwrap();
        assert_eq!(n.digits(), &[5, 0, 0]);
        assert_eq!(n.characteristic(), 3);

        let n = parse_measured_value("-2.5E-3", 4).unwrap();
        assert_eq!(n.digits(), &[2, 5, 0, 0]);
        assert_eq!(n.characteristic(), -2);
        assert!(!n.sign());
    }

    #[test]
    fn test_parse_strips_leading_zeros() {
        let n = parse_measured_value("0.005", 3).unwrap();
        assert_eq!(n.digits(), &[5, 0, 0]);
        assert_eq!(n.characteristic(), -2);

        let n = parse_measured_value("000123", 4).unwrap();
        assert_eq!(n.digits(), &[1, 2, 3, 0]);
        assert_eq!(n.characteristic(), 3);
    }

    #[test]
    fn test_parse_zero_is_canonical() {
        for input in ["0", "-0", "0.000", "-0.0e5"] {
            let n = parse_measured_value(input, 4).unwrap();
            assert!(n.is_zero(), "{:?} should parse to zero", input);
            assert_eq!(n.characteristic(), 0);
            assert!(n.sign());
        }
    }

    #[test]
    fn test_parse_truncates_excess_digits() {
        let n = parse_measured_value("123456789", 4).unwrap();
        assert_eq!(n.digits(), &[1, 2, 3, 4]);
        assert_eq!(n.characteristic(), 9);
    }

    #[test]
    fn test_parse_huge_exponent_fails() {
        assert!(parse_measured_value("1e99999999999", 4).is_err());
    }

    #[test]
    fn test_parse_characteristic_overflow_fails() {
        // The explicit exponent is a valid i32, but adding the integer digit
        // count (or subtracting stripped leading zeros) pushes the
        // characteristic past the i32 range.
        assert!(parse_measured_value("1e2147483647", 4).is_err());
        assert!(parse_measured_value(".001e-2147483647", 4).is_err());
    }
}
