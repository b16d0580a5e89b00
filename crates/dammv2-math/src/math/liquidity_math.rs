//! Liquidity Math
//!
//! Conversions between liquidity deltas and single-sided token amounts over
//! a sqrt-price range. Liquidity results carry the protocol's 2^128 scale.
//!
//! Amounts owed *to* the pool round up; amounts paid *out* round down. The
//! direction is always the caller's explicit choice.

use crate::constants::LIQUIDITY_SCALE;
use crate::errors::MathError;
use crate::math::full_math::{div_rounding, try_to_u128, try_to_u64, Rounding, U512};

/// Liquidity supported by a single-sided amount of token A over
/// `[lower_sqrt_price, upper_sqrt_price]`.
///
/// `L = Δa · √P_lower · √P_upper / (√P_upper − √P_lower)`, floored.
pub fn get_liquidity_delta_from_amount_a(
    amount_a: u64,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
) -> Result<u128, MathError> {
    if upper_sqrt_price <= lower_sqrt_price {
        return Err(MathError::InvalidPriceRange);
    }

    let product =
        U512::from(lower_sqrt_price) * U512::from(amount_a) * U512::from(upper_sqrt_price);
    let denominator = U512::from(upper_sqrt_price - lower_sqrt_price);

    try_to_u128(div_rounding(product, denominator, Rounding::Down)?)
}

/// Liquidity supported by a single-sided amount of token B over
/// `[lower_sqrt_price, upper_sqrt_price]`.
///
/// `L = (Δb ≪ 128) / (√P_upper − √P_lower)`, floored.
pub fn get_liquidity_delta_from_amount_b(
    amount_b: u64,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
) -> Result<u128, MathError> {
    if upper_sqrt_price <= lower_sqrt_price {
        return Err(MathError::InvalidPriceRange);
    }

    let product = U512::from(amount_b) << LIQUIDITY_SCALE;
    let denominator = U512::from(upper_sqrt_price - lower_sqrt_price);

    try_to_u128(div_rounding(product, denominator, Rounding::Down)?)
}

/// Token A covered by a liquidity delta between the current price and the
/// range's upper bound.
///
/// `Δa = L · (√P_max − √P_cur) / (√P_cur · √P_max)`
pub fn get_amount_a_from_liquidity_delta(
    liquidity: u128,
    current_sqrt_price: u128,
    max_sqrt_price: u128,
    rounding: Rounding,
) -> Result<u64, MathError> {
    if max_sqrt_price < current_sqrt_price {
        return Err(MathError::InvalidPriceRange);
    }

    let product = U512::from(liquidity) * U512::from(max_sqrt_price - current_sqrt_price);
    let denominator = U512::from(current_sqrt_price) * U512::from(max_sqrt_price);

    try_to_u64(div_rounding(product, denominator, rounding)?)
}

/// Token B covered by a liquidity delta between the current price and the
/// range's lower bound.
///
/// `Δb = L · (√P_cur − √P_min) ≫ 128`
pub fn get_amount_b_from_liquidity_delta(
    liquidity: u128,
    current_sqrt_price: u128,
    min_sqrt_price: u128,
    rounding: Rounding,
) -> Result<u64, MathError> {
    if current_sqrt_price < min_sqrt_price {
        return Err(MathError::InvalidPriceRange);
    }

    let product = U512::from(liquidity) * U512::from(current_sqrt_price - min_sqrt_price);
    let one = U512::one() << LIQUIDITY_SCALE;

    try_to_u64(div_rounding(product, one, rounding)?)
}
