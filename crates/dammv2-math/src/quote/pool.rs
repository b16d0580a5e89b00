//! Pool-creation quoting
//!
//! Derives the starting price and liquidity for a new pool from the
//! deposit budgets. The init price comes from the deposit ratio; the
//! liquidity is whichever single-sided delta the netted budgets support.

use crate::errors::MathError;
use crate::math::liquidity_math::{
    get_liquidity_delta_from_amount_a, get_liquidity_delta_from_amount_b,
};
use crate::math::price_math::get_init_sqrt_price;
use crate::transfer_fee::TransferFeeAdapter;
use serde::{Deserialize, Serialize};

/// Starting state for a new pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreationAmounts {
    pub init_sqrt_price: u128,
    pub liquidity_delta: u128,
}

/// What actually lands in the pool when `amount` is deposited through a
/// transfer-fee mint: the budget minus the fee the transfer withholds.
fn net_creation_amount(
    adapter: Option<&dyn TransferFeeAdapter>,
    amount: u64,
) -> Result<u64, MathError> {
    match adapter {
        Some(adapter) => {
            let fee = adapter.transfer_fee_included_amount(amount)?.transfer_fee;
            amount.checked_sub(fee).ok_or(MathError::MathUnderflow)
        }
        None => Ok(amount),
    }
}

/// Derive the init price and liquidity for a two-sided pool creation.
///
/// The price is pinned by the raw deposit ratio; the liquidity delta is
/// the smaller of the two single-sided deltas on the transfer-fee-netted
/// budgets, so neither side can be overdrawn.
pub fn prepare_pool_creation_params(
    token_a_amount: u64,
    token_b_amount: u64,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
    token_a_transfer_fee: Option<&dyn TransferFeeAdapter>,
    token_b_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<PoolCreationAmounts, MathError> {
    if token_a_amount == 0 && token_b_amount == 0 {
        return Err(MathError::ZeroAmount);
    }

    let actual_amount_a = net_creation_amount(token_a_transfer_fee, token_a_amount)?;
    let actual_amount_b = net_creation_amount(token_b_transfer_fee, token_b_amount)?;

    let init_sqrt_price =
        get_init_sqrt_price(token_a_amount, token_b_amount, min_sqrt_price, max_sqrt_price)?;

    let from_a =
        get_liquidity_delta_from_amount_a(actual_amount_a, init_sqrt_price, max_sqrt_price)?;
    let from_b =
        get_liquidity_delta_from_amount_b(actual_amount_b, min_sqrt_price, init_sqrt_price)?;

    Ok(PoolCreationAmounts {
        init_sqrt_price,
        liquidity_delta: from_a.min(from_b),
    })
}

/// Liquidity for a token-A single-sided pool creation.
///
/// Only supported when the pool starts at its lower price bound; anywhere
/// above it the pool would immediately demand token B as well.
pub fn prepare_pool_creation_single_side(
    token_a_amount: u64,
    init_sqrt_price: u128,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
    token_a_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<u128, MathError> {
    if init_sqrt_price != min_sqrt_price {
        return Err(MathError::InvalidPriceRange);
    }

    let actual_amount = net_creation_amount(token_a_transfer_fee, token_a_amount)?;
    get_liquidity_delta_from_amount_a(actual_amount, init_sqrt_price, max_sqrt_price)
}
