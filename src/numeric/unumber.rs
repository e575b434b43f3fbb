// ============================================================================
// UNumber
// Fixed-width decimal significand with long-hand carry/borrow arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::Decimal;
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inline storage sized to the default significand width; wider values spill
/// to the heap.
pub(crate) type DigitVec = SmallVec<[u8; 20]>;

/// A fixed-width decimal value stored in scientific notation.
///
/// The magnitude is `0.<digits> × 10^characteristic`: `digits` holds one
/// decimal digit (0-9) per element with the most significant digit at index 0
/// and the implied decimal point to its left, `characteristic` is the decimal
/// exponent, and `sign` is true for non-negative values.
///
/// The digit width is fixed when a value is constructed; arithmetic keeps the
/// receiver's width (growing by at most one digit for a final carry) rather
/// than growing elastically like a bignum. All four arithmetic operations
/// mutate the receiver in place and leave their argument untouched.
///
/// Every operation leaves its result normalized: either the leading digit is
/// non-zero, or the value is the canonical zero (all digits zero,
/// characteristic zero, non-negative sign). `-0` is never observable.
///
/// # Example
/// ```ignore
/// use unumber::UNumber;
///
/// let mut sum = UNumber::from(123i64);
/// sum.add(&UNumber::from(456i64));
/// assert_eq!(sum.to_string(), "+0.579E+3");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawUNumber"))]
pub struct UNumber {
    pub(crate) digits: DigitVec,
    pub(crate) characteristic: i32,
    pub(crate) sign: bool,
}

impl UNumber {
    /// Default significand width (matches the inline digit storage).
    pub const DEFAULT_WIDTH: usize = 20;

    /// Characteristic of the saturated value produced by division by zero.
    pub const SATURATED_CHARACTERISTIC: i32 = 999_999;

    /// Below this decimal exponent an `f64` conversion collapses to zero.
    const F64_UNDERFLOW_CHARACTERISTIC: i32 = -324;

    /// `f64` carries no useful information beyond this many decimal digits.
    const F64_USEFUL_DIGITS: usize = 17;

    // ========================================================================
    // Construction
    // ========================================================================

    /// A canonical zero with the given significand width.
    pub fn zero(width: usize) -> Self {
        Self {
            digits: smallvec![0; width.max(1)],
            characteristic: 0,
            sign: true,
        }
    }

    /// Create a value from a digit string, a characteristic, and a sign.
    ///
    /// The string length fixes the significand width. Characters are expected
    /// to be '0'-'9'; syntax validation is the caller's job (see the
    /// recognizer module), not re-done here.
    pub fn from_digits(digits: &str, characteristic: i32, sign: bool) -> Self {
        if digits.is_empty() {
            return Self::zero(1);
        }
        let digits = digits.bytes().map(byte_to_digit).collect();
        Self {
            digits,
            characteristic,
            sign,
        }
    }

    /// Create a value from a digit string with an explicit significand width.
    ///
    /// A string shorter than `width` is padded on the right with zero digits;
    /// a longer one is truncated without rounding. Callers that need a
    /// correctly rounded result must round before constructing.
    pub fn from_digits_sized(digits: &str, characteristic: i32, sign: bool, width: usize) -> Self {
        let width = width.max(1);
        let mut d: DigitVec = smallvec![0; width];
        for (slot, byte) in d.iter_mut().zip(digits.bytes()) {
            *slot = byte_to_digit(byte);
        }
        Self {
            digits: d,
            characteristic,
            sign,
        }
    }

    /// Copy of this value with the significand resized to `width`.
    ///
    /// Extra positions are zero-filled; excess digits are discarded without
    /// rounding.
    pub fn resized(&self, width: usize) -> Self {
        let width = width.max(1);
        let mut digits: DigitVec = smallvec![0; width];
        let keep = self.digits.len().min(width);
        digits[..keep].copy_from_slice(&self.digits[..keep]);
        Self {
            digits,
            characteristic: self.characteristic,
            sign: self.sign,
        }
    }

    /// Working copy of `value` sized and positioned so that `value` and
    /// `other` share one decimal-point-aligned digit window.
    ///
    /// The window spans `left` digits before the decimal point (the larger of
    /// the two characteristics, at least zero) and `right` digits after it;
    /// the copy is padded with leading and trailing zeros accordingly and its
    /// characteristic fixed to `left`. The result may be unnormalized; it is
    /// the scratch representation addition and subtraction work in.
    pub fn aligned(value: &Self, other: &Self) -> Self {
        let left = value.characteristic.max(other.characteristic).max(0);
        let right = (value.digits.len() as i32 - value.characteristic)
            .max(other.digits.len() as i32 - other.characteristic)
            .max(0);
        let width = (left + right) as usize;
        let mut digits: DigitVec = smallvec![0; width.max(1)];
        let lead = (left - value.characteristic) as usize;
        digits[lead..lead + value.digits.len()].copy_from_slice(&value.digits);
        Self {
            digits,
            characteristic: left,
            sign: value.sign,
        }
    }

    /// Create a value from an `f64`, rounded to 14 significant digits.
    pub fn from_f64(value: f64) -> Self {
        Self::from_f64_rounded(value, 14)
    }

    /// Create a value from an `f64`, rounded half-up to `digits` significant
    /// digits.
    ///
    /// The decimal exponent comes from `floor(log10(|v|)) + 1`; the mantissa
    /// is scaled into `[0.1, 1.0)` and its digits peeled off one at a time,
    /// with one guard digit generated beyond the requested precision to drive
    /// the rounding. A rounding carry that escapes the most significant digit
    /// inserts a new leading 1 and bumps the exponent. Magnitudes below
    /// 10^-324 collapse to canonical zero.
    pub fn from_f64_rounded(value: f64, digits: usize) -> Self {
        let digits = digits.max(1);
        let sign = value >= 0.0;
        let value = value.abs();
        if value == 0.0 || !value.is_finite() {
            return Self::zero(digits);
        }

        let mut characteristic = value.log10().floor() as i32 + 1;
        if characteristic < Self::F64_UNDERFLOW_CHARACTERISTIC {
            return Self::zero(digits);
        }

        // Scale the mantissa into [0.1, 1.0); float rounding in log10 can
        // leave it just outside, so nudge once in either direction.
        let mut mantissa = value / 10f64.powi(characteristic);
        if mantissa >= 1.0 {
            mantissa /= 10.0;
            characteristic += 1;
        }

        // Peel off one digit at a time, plus one guard digit for rounding.
        let mut work: Vec<u8> = Vec::with_capacity(digits + 2);
        for _ in 0..digits + 1 {
            mantissa *= 10.0;
            let digit = mantissa as u8;
            debug_assert!(digit <= 9);
            work.push(digit);
            mantissa -= f64::from(digit);
        }

        // Round half-up on the guard digit, cascading the carry left.
        if work[digits] >= 5 {
            let mut carry = true;
            for slot in work[..digits].iter_mut().rev() {
                if carry {
                    *slot += 1;
                }
                if *slot > 9 {
                    *slot -= 10;
                    carry = true;
                } else {
                    carry = false;
                }
            }
            if carry {
                work.insert(0, 1);
                characteristic += 1;
            }
        }

        // The scaled mantissa can still start 0.0999...; at most one leading
        // zero is possible, discard it.
        if work[0] == 0 {
            work.remove(0);
            characteristic -= 1;
        }

        let mut result: DigitVec = smallvec![0; digits];
        let keep = work.len().min(digits);
        result[..keep].copy_from_slice(&work[..keep]);
        Self {
            digits: result,
            characteristic,
            sign,
        }
    }

    /// Convert from a `rust_decimal::Decimal` at the given significand width.
    ///
    /// Intended for API boundaries (parsed user input, serialized payloads).
    pub fn from_decimal(value: Decimal, width: usize) -> Self {
        let width = width.max(1);
        if value.is_zero() {
            return Self::zero(width);
        }
        let sign = !value.is_sign_negative();
        let mantissa = value.mantissa().unsigned_abs().to_string();
        let characteristic = mantissa.len() as i32 - value.scale() as i32;
        Self::from_digits_sized(&mantissa, characteristic, sign, width)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The significand width (number of digits this value can hold).
    #[inline]
    pub fn length(&self) -> usize {
        self.digits.len()
    }

    /// The significand digits, most significant first.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// The decimal exponent scaling the significand.
    #[inline]
    pub fn characteristic(&self) -> i32 {
        self.characteristic
    }

    /// The sign flag; true means non-negative.
    #[inline]
    pub fn sign(&self) -> bool {
        self.sign
    }

    /// True iff the value is zero. Normalization guarantees a zero leading
    /// digit only ever appears on the canonical zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.digits[0] == 0
    }

    /// True iff the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sign && self.digits[0] > 0
    }

    /// True iff the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        !self.sign && self.digits[0] > 0
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Strip leading zero digits, compensating the characteristic, so the
    /// leading digit is non-zero; an all-zero significand collapses to the
    /// canonical zero (characteristic 0, non-negative sign, digits kept).
    pub fn normalize(&mut self) {
        if self.digits[0] != 0 {
            return;
        }
        match self.digits.iter().position(|&d| d != 0) {
            None => {
                self.characteristic = 0;
                self.sign = true;
            },
            Some(first) => {
                self.digits.copy_within(first.., 0);
                let new_len = self.digits.len() - first;
                self.digits.truncate(new_len);
                self.characteristic -= first as i32;
            },
        }
    }

    /// Force the value non-negative in place.
    #[inline]
    pub fn abs(&mut self) {
        self.sign = true;
    }

    /// Flip the sign in place. Zero stays non-negative so `-0` can never be
    /// observed.
    #[inline]
    pub fn negate(&mut self) {
        if !self.is_zero() {
            self.sign = !self.sign;
        }
    }

    // ========================================================================
    // Arithmetic: addition / subtraction
    // ========================================================================

    /// Replace this value with `self + that`, long-hand style.
    ///
    /// Both operands are first copied into decimal-point-aligned working
    /// values. Matching signs add digit-by-digit from the least significant
    /// end with carry propagation, growing the significand by one digit if a
    /// carry survives past the most significant position. Differing signs
    /// subtract the negative magnitude from the positive one; a borrow off
    /// the top means the guess was wrong, so the result is corrected by
    /// ten's complement and the sign flipped. The result is normalized into
    /// the receiver. `that` is never mutated.
    pub fn add(&mut self, that: &Self) {
        let mut result;
        if self.sign == that.sign {
            // Matching signs: add the aligned magnitudes, keep the sign.
            result = Self::aligned(self, that);
            let addend = Self::aligned(that, self);

            let mut carry = 0u8;
            for i in (0..result.digits.len()).rev() {
                let sum = result.digits[i] + addend.digits[i] + carry;
                debug_assert!(sum <= 19);
                if sum > 9 {
                    result.digits[i] = sum - 10;
                    carry = 1;
                } else {
                    result.digits[i] = sum;
                    carry = 0;
                }
            }

            // A final carry needs one more digit of significance.
            if carry == 1 {
                result.digits.insert(0, 1);
                result.characteristic += 1;
            }
        } else {
            // Differing signs: subtract the negative magnitude from the
            // positive one.
            let subtrahend;
            if self.sign {
                result = Self::aligned(self, that);
                subtrahend = Self::aligned(that, self);
            } else {
                result = Self::aligned(that, self);
                subtrahend = Self::aligned(self, that);
            }

            let mut borrow = false;
            for i in (0..result.digits.len()).rev() {
                let diff =
                    i16::from(result.digits[i]) - i16::from(subtrahend.digits[i]) - i16::from(borrow);
                debug_assert!(diff >= -10);
                if diff < 0 {
                    result.digits[i] = (diff + 10) as u8;
                    borrow = true;
                } else {
                    result.digits[i] = diff as u8;
                    borrow = false;
                }
            }

            if borrow {
                // The assumed-larger operand was actually smaller: correct by
                // ten's complement (every digit from 9, the least significant
                // from 10), resolve residual carries, and flip the sign.
                let last = result.digits.len() - 1;
                for digit in result.digits[..last].iter_mut() {
                    *digit = 9 - *digit;
                }
                result.digits[last] = 10 - result.digits[last];
                for i in (1..=last).rev() {
                    if result.digits[i] >= 10 {
                        result.digits[i] -= 10;
                        result.digits[i - 1] += 1;
                    }
                }
                result.sign = false;
            } else {
                result.sign = true;
            }
        }

        result.normalize();
        *self = result;
    }

    /// Replace this value with `self - that` by negating a copy of `that`
    /// and delegating to [`add`](Self::add). `that` is never mutated.
    pub fn sub(&mut self, that: &Self) {
        let mut negated = that.clone();
        negated.negate();
        self.add(&negated);
    }

    // ========================================================================
    // Arithmetic: multiplication
    // ========================================================================

    /// Replace this value with `self × that`, school-book style.
    ///
    /// Each multiplier digit is multiplied against each multiplicand digit
    /// and accumulated into a product buffer sized for both significands,
    /// leaving guard positions for normalization and rounding; carries are
    /// resolved immediately after every digit product so no buffer position
    /// ever exceeds two digits. The product is then normalized, truncated to
    /// the receiver's width with half-up rounding, and the characteristic set
    /// to the sum of both characteristics adjusted for the normalization
    /// shift and any rounding carry off the top. `that` is never mutated.
    pub fn mpy(&mut self, that: &Self) {
        // A zero factor short-circuits to the canonical zero.
        if self.digits[0] == 0 || that.digits[0] == 0 {
            for digit in self.digits.iter_mut() {
                *digit = 0;
            }
            self.characteristic = 0;
            self.sign = true;
            return;
        }

        let width = self.digits.len();
        let mut product = vec![0u8; width + that.digits.len().max(2)];

        for r in (0..that.digits.len()).rev() {
            // Accumulation starts at the product position implied by the
            // multiplier digit's place value.
            let mut p = width + r;
            for d in (0..width).rev() {
                product[p] += self.digits[d] * that.digits[r];
                debug_assert!(product[p] <= 90);

                // Resolve the carry immediately, walking left until a digit
                // no longer exceeds 9.
                let mut c = p;
                while c > 0 && product[c] > 9 {
                    product[c - 1] += product[c] / 10;
                    product[c] %= 10;
                    c -= 1;
                }
                p -= 1;
            }
        }
        debug_assert!(product[0] <= 9);

        // Both factors were normalized and non-zero, so at most one leading
        // zero can appear; shift it out and remember to adjust the exponent.
        let mut was_normalized = false;
        if product[0] == 0 {
            product.remove(0);
            product.push(0);
            was_normalized = true;
        }

        let rounding_carry = round_half_up(&mut product, width);

        self.characteristic += that.characteristic;
        if was_normalized {
            self.characteristic -= 1;
        }
        if rounding_carry {
            self.characteristic += 1;
        }

        self.digits.copy_from_slice(&product[..width]);
        self.sign = self.sign == that.sign;
    }

    // ========================================================================
    // Arithmetic: division
    // ========================================================================

    /// Replace this value with `self ÷ that` via digit-at-a-time restoring
    /// division, keeping the receiver's digit width.
    ///
    /// For each quotient position from most to least significant, the
    /// positioned divisor is repeatedly subtracted from an oversized working
    /// copy of the dividend until a subtraction borrows past the available
    /// window; that last subtraction is undone by adding the divisor back,
    /// and the count of successful subtractions becomes the quotient digit.
    /// The quotient is then normalized and rounded half-up to the receiver's
    /// width.
    ///
    /// Division by zero does not fail: the result saturates to an all-9s
    /// significand with [`SATURATED_CHARACTERISTIC`](Self::SATURATED_CHARACTERISTIC)
    /// and a positive sign. Use [`checked_div`](Self::checked_div) for a
    /// fallible alternative. `that` is never mutated.
    pub fn div(&mut self, that: &Self) {
        // Divide-by-zero saturates to a near-maximal positive value.
        if that.digits[0] == 0 {
            for digit in self.digits.iter_mut() {
                *digit = 9;
            }
            self.characteristic = Self::SATURATED_CHARACTERISTIC;
            self.sign = true;
            return;
        }

        // A zero dividend is already the canonical zero.
        if self.digits[0] == 0 {
            return;
        }

        let width = self.digits.len();
        let divisor = &that.digits;

        // Working copy of the dividend, destroyed during the process.
        let mut dividend = vec![0u8; width + divisor.len() + 1];
        dividend[..width].copy_from_slice(&self.digits);

        let mut quotient = vec![0u8; width + 2];

        for q_index in 0..quotient.len() {
            let mut subtractable = true;
            while subtractable && quotient[q_index] < 9 {
                // Subtract the positioned divisor from the dividend window.
                let mut borrow = false;
                for i in (0..divisor.len()).rev() {
                    let diff = i16::from(dividend[i + q_index])
                        - i16::from(divisor[i])
                        - i16::from(borrow);
                    debug_assert!(diff >= -10);
                    if diff < 0 {
                        dividend[i + q_index] = (diff + 10) as u8;
                        borrow = true;
                    } else {
                        dividend[i + q_index] = diff as u8;
                        borrow = false;
                    }
                }

                if borrow {
                    if q_index > 0 && dividend[q_index - 1] > 0 {
                        // The residual digit left of the window absorbs the
                        // borrow, so the subtraction stands.
                        dividend[q_index - 1] -= 1;
                        quotient[q_index] += 1;
                    } else {
                        // Borrowed past the dividend: undo by adding the
                        // divisor back and move to the next quotient digit.
                        subtractable = false;
                        let mut carry = false;
                        for i in (0..divisor.len()).rev() {
                            let sum = dividend[i + q_index]
                                + divisor[i]
                                + u8::from(carry);
                            debug_assert!(sum <= 19);
                            if sum > 9 {
                                dividend[i + q_index] = sum - 10;
                                carry = true;
                            } else {
                                dividend[i + q_index] = sum;
                                carry = false;
                            }
                        }
                    }
                } else {
                    quotient[q_index] += 1;
                }
            }
        }

        self.characteristic = self.characteristic - that.characteristic + 1;
        self.sign = self.sign == that.sign;

        // At most one leading zero, as for multiplication.
        let mut was_normalized = false;
        if quotient[0] == 0 {
            quotient.remove(0);
            quotient.push(0);
            was_normalized = true;
        }

        let rounding_carry = round_half_up(&mut quotient, width);

        if was_normalized {
            self.characteristic -= 1;
        }
        if rounding_carry {
            self.characteristic += 1;
        }

        self.digits.copy_from_slice(&quotient[..width]);
    }

    /// Fallible division: returns [`NumericError::DivisionByZero`] instead of
    /// the saturated sentinel when `that` is zero, otherwise behaves exactly
    /// like [`div`](Self::div).
    pub fn checked_div(&mut self, that: &Self) -> NumericResult<()> {
        if that.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        self.div(that);
        Ok(())
    }

    // ========================================================================
    // Formatting & conversion
    // ========================================================================

    /// Scientific-notation string bounded to roughly `size` characters.
    ///
    /// Sizes below 8 are raised to 8, the minimum that fits a sign, one
    /// mantissa digit, the decimal point, the `E`, and a signed exponent.
    /// When fewer mantissa digits fit than are stored, the excess digits are
    /// dropped and the kept ones rounded half-up; a rounding carry off the
    /// top produces a new leading 1 and bumps the displayed exponent, which
    /// can itself grow a digit and cost one more mantissa position. At least
    /// one mantissa digit is always shown, even if that exceeds the budget.
    ///
    /// Unlike [`Display`](fmt::Display), the most significant digit appears
    /// to the left of the decimal point, so the displayed exponent is the
    /// stored characteristic minus one.
    pub fn to_scientific_string(&self, size: usize) -> String {
        let size = size.max(8);
        let mut result = String::with_capacity(size);
        if !self.sign {
            result.push('-');
        }

        let mut exp = self.characteristic - 1;
        let exp_digits = decimal_digit_count(exp);

        // Overhead: optional '-', '.', 'E', exponent sign, exponent digits.
        let overhead = usize::from(!self.sign) + 3 + exp_digits;
        let mut available = size.saturating_sub(overhead).max(1);

        // Copy of the kept digits plus the first dropped one, for rounding.
        let mut kept: Vec<u8> = (0..available + 1)
            .map(|i| self.digits.get(i).copied().unwrap_or(0))
            .collect();

        if available >= self.digits.len() {
            available = self.digits.len();
        } else if kept[available] >= 5 {
            // Round half-up on the first dropped digit, cascading left.
            kept[available - 1] += 1;
            let mut ndx = available - 1;
            while ndx > 0 && kept[ndx] > 9 {
                kept[ndx] -= 10;
                kept[ndx - 1] += 1;
                ndx -= 1;
            }
            if kept[0] > 9 {
                // Carry off the top: everything below was a 9 and is now 0.
                kept[0] = 1;
                exp += 1;
                if decimal_digit_count(exp) > exp_digits {
                    // The exponent grew a digit; give one mantissa digit back
                    // to stay within budget, but always show at least one.
                    available = (available - 1).max(1);
                }
            }
        }

        result.push(digit_to_char(kept[0]));
        result.push('.');
        for &digit in &kept[1..available] {
            result.push(digit_to_char(digit));
        }
        result.push('E');
        if exp >= 0 {
            result.push('+');
        }
        result.push_str(&exp.to_string());
        result
    }

    /// Plain decimal-notation string with no exponent.
    ///
    /// The decimal point is inserted at the position the characteristic
    /// implies, padding with leading or trailing zeros when it falls outside
    /// the stored digit window.
    pub fn to_decimal_string(&self) -> String {
        let mut result = String::new();
        if !self.sign {
            result.push('-');
        }

        let point = self.characteristic;
        if point <= 0 {
            result.push('0');
        }
        if point < 0 {
            result.push('.');
            for _ in 0..point.unsigned_abs() {
                result.push('0');
            }
            for &digit in self.digits.iter() {
                result.push(digit_to_char(digit));
            }
        } else {
            for (i, &digit) in self.digits.iter().enumerate() {
                if i as i32 == point {
                    result.push('.');
                }
                result.push(digit_to_char(digit));
            }
            let len = self.digits.len() as i32;
            for _ in len..point {
                result.push('0');
            }
            if point >= len {
                result.push('.');
            }
        }
        result
    }

    /// Native floating-point approximation of this value.
    ///
    /// Sums `digit[i] / 10^(i+1)` over at most the first 17 digits (the
    /// useful decimal precision of an `f64`), scales by the characteristic,
    /// and applies the sign.
    pub fn to_f64(&self) -> f64 {
        let count = self.digits.len().min(Self::F64_USEFUL_DIGITS);
        let mut magnitude = 0.0;
        let mut divisor = 1.0;
        for &digit in &self.digits[..count] {
            divisor *= 10.0;
            magnitude += f64::from(digit) / divisor;
        }
        magnitude *= 10f64.powi(self.characteristic);
        if self.sign {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Convert to a `rust_decimal::Decimal`.
    ///
    /// Intended for API boundaries. Fails with `PrecisionLoss` when the
    /// significant digits exceed what `Decimal` can carry, or `Overflow` when
    /// the magnitude is out of its range.
    pub fn to_decimal(&self) -> NumericResult<Decimal> {
        if self.is_zero() {
            return Ok(Decimal::ZERO);
        }

        // Decimal holds at most 28-29 significant digits; require everything
        // beyond that to be trailing zeros.
        let take = self.digits.len().min(28);
        if self.digits[take..].iter().any(|&d| d != 0) {
            return Err(NumericError::PrecisionLoss);
        }
        let mut mantissa: i128 = 0;
        for &digit in &self.digits[..take] {
            mantissa = mantissa * 10 + i128::from(digit);
        }

        let mut scale = take as i32 - self.characteristic;
        while scale > 28 {
            if mantissa % 10 != 0 {
                return Err(NumericError::PrecisionLoss);
            }
            mantissa /= 10;
            scale -= 1;
        }
        while scale < 0 {
            mantissa = mantissa.checked_mul(10).ok_or(NumericError::Overflow)?;
            scale += 1;
        }
        if !self.sign {
            mantissa = -mantissa;
        }
        Decimal::try_from_i128_with_scale(mantissa, scale as u32)
            .map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// Shared rounding helper
// ============================================================================

/// Round a product/quotient buffer half-up at `width` kept digits, cascading
/// the carry left. Returns true when the carry escaped the most significant
/// digit (which then holds 1 over all zeros) so the caller can bump the
/// characteristic.
fn round_half_up(buffer: &mut [u8], width: usize) -> bool {
    if buffer[width] < 5 {
        return false;
    }
    let mut i = width - 1;
    buffer[i] += 1;
    while i > 0 && buffer[i] > 9 {
        buffer[i - 1] += 1;
        buffer[i] -= 10;
        i -= 1;
    }
    if buffer[0] > 9 {
        buffer[0] = 1;
        return true;
    }
    false
}

#[inline]
fn byte_to_digit(byte: u8) -> u8 {
    debug_assert!(byte.is_ascii_digit());
    if byte.is_ascii_digit() {
        byte - b'0'
    } else {
        0
    }
}

#[inline]
fn digit_to_char(digit: u8) -> char {
    (b'0' + digit) as char
}

/// Number of decimal digits in `value`'s magnitude (zero counts as one).
fn decimal_digit_count(value: i32) -> usize {
    match value.unsigned_abs().checked_ilog10() {
        Some(digits) => digits as usize + 1,
        None => 1,
    }
}

// ============================================================================
// Builders from machine integers
// ============================================================================

impl From<i64> for UNumber {
    /// Decompose a machine integer into decimal digits, least significant
    /// first, sizing the significand exactly to the digit count. Zero maps to
    /// a minimal single-digit canonical zero.
    fn from(value: i64) -> Self {
        let sign = value >= 0;
        let mut magnitude = value.unsigned_abs();
        if magnitude == 0 {
            return Self::zero(1);
        }

        let mut num_digits = 0usize;
        let mut probe = magnitude;
        while probe > 0 {
            probe /= 10;
            num_digits += 1;
        }

        let mut digits: DigitVec = smallvec![0; num_digits];
        for slot in digits.iter_mut().rev() {
            *slot = (magnitude % 10) as u8;
            magnitude /= 10;
        }
        Self {
            digits,
            characteristic: num_digits as i32,
            sign,
        }
    }
}

impl From<i32> for UNumber {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl Default for UNumber {
    /// A canonical zero at the default 20-digit width.
    fn default() -> Self {
        Self::zero(Self::DEFAULT_WIDTH)
    }
}

// ============================================================================
// Serde validation
// ============================================================================

/// Unvalidated wire form. Deserialization funnels through `TryFrom` so a
/// hand-crafted payload cannot smuggle in out-of-range digits or an empty
/// significand; the invariants every algorithm assumes hold for deserialized
/// values exactly as for constructed ones.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawUNumber {
    digits: DigitVec,
    characteristic: i32,
    sign: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawUNumber> for UNumber {
    type Error = &'static str;

    fn try_from(raw: RawUNumber) -> Result<Self, Self::Error> {
        if raw.digits.is_empty() {
            return Err("significand must hold at least one digit");
        }
        if raw.digits.iter().any(|&digit| digit > 9) {
            return Err("significand digits must be 0-9");
        }
        let mut value = Self {
            digits: raw.digits,
            characteristic: raw.characteristic,
            sign: raw.sign,
        };
        // Leading zeros and a signed zero are representable on the wire;
        // bring them back to normalized form rather than rejecting.
        value.normalize();
        Ok(value)
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl Ord for UNumber {
    /// Three-way comparison with the cheap checks first: sign, then
    /// characteristic, then leading digit, and only when all of those tie a
    /// full subtraction on a disposable copy.
    fn cmp(&self, other: &Self) -> Ordering {
        // Differing signs resolve immediately; zero is stored non-negative.
        match (self.sign, other.sign) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {},
        }

        // Zero operands sidestep the characteristic fast path, which is only
        // meaningful between normalized non-zero values.
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if other.sign {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            },
            (false, true) => {
                return if self.sign {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            },
            (false, false) => {},
        }

        let magnitude = match self.characteristic.cmp(&other.characteristic) {
            Ordering::Equal => match self.digits[0].cmp(&other.digits[0]) {
                Ordering::Equal => {
                    // Same sign, characteristic, and leading digit: fall back
                    // to subtraction. The difference is already signed, so
                    // its sign settles the order for either operand sign.
                    let mut diff = self.clone();
                    diff.sub(other);
                    return if diff.is_positive() {
                        Ordering::Greater
                    } else if diff.is_negative() {
                        Ordering::Less
                    } else {
                        Ordering::Equal
                    };
                },
                ordering => ordering,
            },
            ordering => ordering,
        };

        // Magnitude order inverts for negative operands.
        if self.sign {
            magnitude
        } else {
            magnitude.reverse()
        }
    }
}

impl PartialOrd for UNumber {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for UNumber {
    /// Numeric equality: values of different significand widths compare equal
    /// when they denote the same number.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for UNumber {}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for UNumber {
    /// Unbounded scientific notation: sign, `0.`, every stored digit, `E`,
    /// and the characteristic with an explicit `+` when non-negative.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}0.", if self.sign { '+' } else { '-' })?;
        for &digit in self.digits.iter() {
            write!(f, "{}", digit)?;
        }
        write!(f, "E")?;
        if self.characteristic >= 0 {
            write!(f, "+")?;
        }
        write!(f, "{}", self.characteristic)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let original = UNumber::from_digits("579", 3, true);
        let json = serde_json::to_string(&original).unwrap();
        let back: UNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back.digits(), original.digits());
        assert_eq!(back.characteristic(), original.characteristic());
        assert_eq!(back.sign(), original.sign());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_digits() {
        let result: Result<UNumber, _> =
            serde_json::from_str(r#"{"digits":[1,12,3],"characteristic":3,"sign":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_empty_significand() {
        let result: Result<UNumber, _> =
            serde_json::from_str(r#"{"digits":[],"characteristic":0,"sign":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_normalizes_wire_values() {
        let value: UNumber =
            serde_json::from_str(r#"{"digits":[0,0,5,7],"characteristic":3,"sign":true}"#).unwrap();
        assert_eq!(value.digits(), &[5, 7]);
        assert_eq!(value.characteristic(), 1);

        // A signed all-zero significand collapses to the canonical zero.
        let zero: UNumber =
            serde_json::from_str(r#"{"digits":[0,0],"characteristic":9,"sign":false}"#).unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.characteristic(), 0);
        assert!(zero.sign());
    }
}
