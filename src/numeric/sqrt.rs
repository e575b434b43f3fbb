// ============================================================================
// Square Root
// Newton-Raphson iteration over UNumber at the operand's digit width
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::unumber::UNumber;

/// Decimal digits of accuracy the f64-based seed can be trusted for.
const SEED_DIGITS: usize = 15;

/// Square root of a non-negative value, computed by Newton-Raphson
/// iteration `x ← (x + v/x) / 2` at the operand's digit width.
///
/// The seed comes from the `f64` square root of the operand's mantissa with
/// the decimal exponent halved separately, so magnitudes outside `f64` range
/// still seed correctly. Each iteration roughly doubles the number of correct
/// digits, so the pass count grows logarithmically with the width.
///
/// # Errors
///
/// Returns [`NumericError::NegativeSquareRoot`] for negative input. Zero
/// yields the canonical zero at the operand's width.
pub fn sqrt(value: &UNumber) -> NumericResult<UNumber> {
    if value.is_negative() {
        return Err(NumericError::NegativeSquareRoot);
    }
    let width = value.length();
    if value.is_zero() {
        return Ok(UNumber::zero(width));
    }

    // Split v = m × 10^(2k), leaving m's exponent at 0 or 1 so the seed
    // computation stays comfortably inside f64 range; sqrt(v) = sqrt(m) × 10^k.
    let half_exponent = value.characteristic().div_euclid(2);
    let mut reduced = value.clone();
    reduced.characteristic -= 2 * half_exponent;

    let mut guess = UNumber::from_f64(reduced.to_f64().sqrt()).resized(width);
    guess.characteristic += half_exponent;

    let half = UNumber::from_digits("5", 0, true);
    let mut accurate = SEED_DIGITS;
    loop {
        // One Newton pass: x ← (x + v/x) / 2, clamped back to the operand
        // width (alignment inside add can grow the working significand).
        let mut quotient = value.clone();
        quotient.div(&guess);
        guess.add(&quotient);
        guess.mpy(&half);
        guess = guess.resized(width);

        // The final pass past full accuracy lets the rounding settle.
        if accurate >= width {
            break;
        }
        accurate *= 2;
    }
    Ok(guess)
}
