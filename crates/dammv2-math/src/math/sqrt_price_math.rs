//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas, in both
//! the forward (amount in) and inverse (amount out) directions.
//!
//! Rounding discipline: every division here rounds toward the direction
//! that keeps liquidity conservation safe for the pool, never the trader.

use crate::constants::LIQUIDITY_SCALE;
use crate::errors::MathError;
use crate::math::full_math::{div_rounding, try_to_u128, Rounding, U512};

/// Get the next sqrt price after swapping a specified input amount.
///
/// A→B (price decreases):
///   `√P' = ⌈L·√P / (L + Δx·√P)⌉`
///
/// B→A (price increases):
///   `√P' = √P + (Δy ≪ 128) / L`
pub fn get_next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u64,
    a_to_b: bool,
) -> Result<u128, MathError> {
    if amount_in == 0 {
        return Ok(sqrt_price);
    }

    if a_to_b {
        let product = U512::from(amount_in) * U512::from(sqrt_price);
        let denominator = U512::from(liquidity) + product;
        let numerator = U512::from(liquidity) * U512::from(sqrt_price);
        try_to_u128(div_rounding(numerator, denominator, Rounding::Up)?)
    } else {
        let quotient = div_rounding(
            U512::from(amount_in) << LIQUIDITY_SCALE,
            U512::from(liquidity),
            Rounding::Down,
        )?;
        let next = U512::from(sqrt_price) + quotient;
        try_to_u128(next)
    }
}

/// Inverse problem: the sqrt price that produces a desired output amount.
///
/// Token B out rounds the price delta up (`√P' = √P − ⌈(Δy ≪ 128)/L⌉`,
/// erroring rather than going negative); token A out rounds the quotient
/// down (`√P' = ⌊L·√P / (L − Δx·√P)⌋`, erroring on a non-positive
/// denominator).
pub fn get_next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    out_amount: u64,
    is_token_b: bool,
) -> Result<u128, MathError> {
    if sqrt_price == 0 {
        return Err(MathError::ZeroSqrtPrice);
    }

    if is_token_b {
        get_next_sqrt_price_from_amount_b_rounding_up(sqrt_price, liquidity, out_amount)
    } else {
        get_next_sqrt_price_from_amount_a_rounding_down(sqrt_price, liquidity, out_amount)
    }
}

/// `√P' = √P − ⌈(Δy ≪ 128) / L⌉`
///
/// Rounding the removed delta up keeps the pool from paying out more B than
/// the price move covers.
fn get_next_sqrt_price_from_amount_b_rounding_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
) -> Result<u128, MathError> {
    let quotient = div_rounding(
        U512::from(amount) << LIQUIDITY_SCALE,
        U512::from(liquidity),
        Rounding::Up,
    )?;
    let quotient = try_to_u128(quotient).map_err(|_| MathError::NegativeSqrtPrice)?;

    sqrt_price
        .checked_sub(quotient)
        .ok_or(MathError::NegativeSqrtPrice)
}

/// `√P' = ⌊L·√P / (L − Δx·√P)⌋`
///
/// The denominator shrinks as the requested A output grows; a non-positive
/// denominator means the pool cannot produce that much A.
fn get_next_sqrt_price_from_amount_a_rounding_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
) -> Result<u128, MathError> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let product = U512::from(amount) * U512::from(sqrt_price);
    let liquidity = U512::from(liquidity);
    if product >= liquidity {
        return Err(MathError::InsufficientLiquidity);
    }
    let denominator = liquidity - product;

    let numerator = liquidity * U512::from(sqrt_price);
    try_to_u128(div_rounding(numerator, denominator, Rounding::Down)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MIN_SQRT_PRICE, ONE_Q64};

    // Liquidity with the protocol's 2^128 scale, small enough that token-
    // sized trades still move the Q64.64 price by a visible delta
    const LIQUIDITY: u128 = 1u128 << 120;

    #[test]
    fn test_next_sqrt_price_zero_amount() {
        assert_eq!(
            get_next_sqrt_price_from_input(ONE_Q64, LIQUIDITY, 0, true).unwrap(),
            ONE_Q64
        );
        assert_eq!(
            get_next_sqrt_price_from_input(ONE_Q64, LIQUIDITY, 0, false).unwrap(),
            ONE_Q64
        );
    }

    #[test]
    fn test_a_to_b_decreases_price() {
        let next = get_next_sqrt_price_from_input(ONE_Q64, LIQUIDITY, 1_000_000, true).unwrap();
        assert!(next < ONE_Q64);
        assert!(next > 0);
    }

    #[test]
    fn test_b_to_a_increases_price() {
        let next = get_next_sqrt_price_from_input(ONE_Q64, LIQUIDITY, 1_000_000, false).unwrap();
        assert!(next > ONE_Q64);
    }

    #[test]
    fn test_b_to_a_delta_matches_formula() {
        // delta = (amount << 128) / L, exact when L is a power of two:
        // (2^20 << 128) / 2^120 == 2^28
        let amount = 1u64 << 20;
        let next = get_next_sqrt_price_from_input(ONE_Q64, LIQUIDITY, amount, false).unwrap();
        assert_eq!(next - ONE_Q64, 1u128 << 28);
    }

    #[test]
    fn test_output_b_rounds_delta_up() {
        let next = get_next_sqrt_price_from_output(ONE_Q64, LIQUIDITY, 1_000_000, true).unwrap();
        assert!(next < ONE_Q64);

        // Removing the same B again from the lower price must consume at
        // least as large a price delta (ceiling never under-moves).
        let forward =
            get_next_sqrt_price_from_input(next, LIQUIDITY, 1_000_000, false).unwrap();
        assert!(forward <= ONE_Q64);
    }

    #[test]
    fn test_output_b_cannot_go_negative() {
        assert_eq!(
            get_next_sqrt_price_from_output(MIN_SQRT_PRICE, 1u128 << 70, u64::MAX, true),
            Err(MathError::NegativeSqrtPrice)
        );
    }

    #[test]
    fn test_output_a_increases_price() {
        let next = get_next_sqrt_price_from_output(ONE_Q64, LIQUIDITY, 1_000_000, false).unwrap();
        assert!(next > ONE_Q64);
    }

    #[test]
    fn test_output_a_insufficient_liquidity() {
        // Δx·√P >= L exhausts the denominator
        assert_eq!(
            get_next_sqrt_price_from_output(ONE_Q64, ONE_Q64, u64::MAX, false),
            Err(MathError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_output_zero_sqrt_price_rejected() {
        assert_eq!(
            get_next_sqrt_price_from_output(0, LIQUIDITY, 1, true),
            Err(MathError::ZeroSqrtPrice)
        );
    }
}
