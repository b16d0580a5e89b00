//! Full precision math operations
//!
//! The fixed-point kernel: wide-integer multiply/divide with a
//! caller-specified rounding direction, and Q64.64 binary exponentiation.
//! Every other module builds on these primitives.

use crate::constants::{MAX_EXPONENTIAL, ONE_Q64, SCALE_OFFSET};
use crate::errors::MathError;
use serde::{Deserialize, Serialize};
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer, used where a single squaring stays in range
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer, wide enough for every intermediate product
    /// in the curve math (three 128-bit factors at most)
    pub struct U512(8);
}

/// Rounding direction for a division. Always chosen by the caller;
/// no operation in this crate rounds implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    Down,
    Up,
}

/// Compute `x * y / denominator` at full width with the requested rounding.
///
/// The product is formed in 512 bits so no input combination can wrap.
/// Errors if the denominator is zero or the quotient exceeds 128 bits.
pub fn mul_div(x: u128, y: u128, denominator: u128, rounding: Rounding) -> Result<u128, MathError> {
    let numerator = U512::from(x) * U512::from(y);
    let quotient = div_rounding(numerator, U512::from(denominator), rounding)?;
    try_to_u128(quotient)
}

/// Divide two wide integers with the requested rounding.
pub(crate) fn div_rounding(
    numerator: U512,
    denominator: U512,
    rounding: Rounding,
) -> Result<U512, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let (quotient, remainder) = numerator.div_mod(denominator);
    if rounding == Rounding::Up && !remainder.is_zero() {
        // Cannot overflow: quotient < numerator <= U512::MAX whenever a
        // remainder exists (denominator >= 2).
        Ok(quotient + U512::one())
    } else {
        Ok(quotient)
    }
}

/// Narrow a wide result back to `u128`, the protocol's widest encoding.
pub(crate) fn try_to_u128(value: U512) -> Result<u128, MathError> {
    if value.bits() > 128 {
        return Err(MathError::TypeCastFailed);
    }
    Ok(value.low_u128())
}

/// Narrow a wide result to `u64` (token amounts).
pub(crate) fn try_to_u64(value: U512) -> Result<u64, MathError> {
    if value.bits() > 64 {
        return Err(MathError::TypeCastFailed);
    }
    Ok(value.low_u64())
}

/// Raise a Q64.64 base to an integer power by squaring.
///
/// The operand is right-shifted by the scale after every multiply so the
/// working width stays inside 256 bits. Bases `>= 1.0` are inverted against
/// `u128::MAX` before exponentiation (and the result inverted back), which
/// also gives negative conceptual exponents their meaning. Exponents with
/// magnitude above [`MAX_EXPONENTIAL`] saturate to zero by design.
pub fn pow(base: u128, exp: i64) -> u128 {
    if exp == 0 {
        return ONE_Q64;
    }

    let mut invert = exp < 0;
    let exp = exp.unsigned_abs();
    if exp > MAX_EXPONENTIAL {
        return 0;
    }

    let max = U256::from(u128::MAX);
    let one = U256::from(ONE_Q64);

    let mut squared_base = U256::from(base);
    if squared_base >= one {
        squared_base = max / squared_base;
        invert = !invert;
    }

    let mut result = one;
    let bits = 64 - exp.leading_zeros();
    for i in 0..bits {
        if (exp >> i) & 1 == 1 {
            result = (result * squared_base) >> SCALE_OFFSET;
        }
        squared_base = (squared_base * squared_base) >> SCALE_OFFSET;
    }

    if result.is_zero() {
        return 0;
    }
    if invert {
        result = max / result;
    }

    result.low_u128()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_simple() {
        assert_eq!(mul_div(10, 20, 5, Rounding::Down).unwrap(), 40);
    }

    #[test]
    fn test_mul_div_rounding() {
        // 7 * 3 / 2 = 10.5
        assert_eq!(mul_div(7, 3, 2, Rounding::Down).unwrap(), 10);
        assert_eq!(mul_div(7, 3, 2, Rounding::Up).unwrap(), 11);
    }

    #[test]
    fn test_mul_div_exact_no_bump() {
        assert_eq!(mul_div(6, 4, 8, Rounding::Up).unwrap(), 3);
    }

    #[test]
    fn test_mul_div_full_width_intermediate() {
        // u128::MAX * u128::MAX overflows any primitive; full-width path
        // must still produce the exact quotient.
        assert_eq!(
            mul_div(u128::MAX, u128::MAX, u128::MAX, Rounding::Down).unwrap(),
            u128::MAX
        );
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(10, 20, 0, Rounding::Down),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_quotient_too_wide() {
        assert_eq!(
            mul_div(u128::MAX, u128::MAX, 1, Rounding::Down),
            Err(MathError::TypeCastFailed)
        );
    }

    #[test]
    fn test_pow_zero_exponent_is_one() {
        assert_eq!(pow(ONE_Q64 / 2, 0), ONE_Q64);
    }

    #[test]
    fn test_pow_identity() {
        // 1.0^n == 1.0 (inversion path: base == One flips to Max/One)
        let result = pow(ONE_Q64, 4);
        // The Max-based reciprocal costs a few ulps each way; the result is
        // 1.0 up to that rounding.
        assert!(result.abs_diff(ONE_Q64) <= 8);
    }

    #[test]
    fn test_pow_half_squared() {
        let half = ONE_Q64 / 2;
        assert_eq!(pow(half, 2), ONE_Q64 / 4);
    }

    #[test]
    fn test_pow_saturates_above_ceiling() {
        assert_eq!(pow(ONE_Q64 / 2, MAX_EXPONENTIAL as i64 + 1), 0);
    }

    #[test]
    fn test_pow_negative_exponent_inverts() {
        // (1/2)^-1 == 2.0 (up to the Max-based reciprocal's rounding)
        let result = pow(ONE_Q64 / 2, -1);
        let expected = 2 * ONE_Q64;
        assert!(result >= expected - 4 && result <= expected);
    }

    #[test]
    fn test_pow_fee_scheduler_base() {
        // base = 1 - 50/10000 in Q64.64, the exponential scheduler's shape
        let reduction = (50u128 << 64) / 10_000;
        let base = ONE_Q64 - reduction;
        let result = pow(base, 10);
        // (0.995)^10 ~= 0.95111
        let approx = (0.995f64).powi(10);
        let got = result as f64 / ONE_Q64 as f64;
        assert!((got - approx).abs() < 1e-9);
    }
}
