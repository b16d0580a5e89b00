//! Deposit and withdraw quoting
//!
//! Liquidity-position math over a pool snapshot: how much liquidity an
//! amount buys, what the counterpart side costs, and what a removal pays
//! out. Amounts owed to the pool round up, amounts paid out round down.

use crate::errors::MathError;
use crate::math::full_math::Rounding;
use crate::math::liquidity_math::{
    get_amount_a_from_liquidity_delta, get_amount_b_from_liquidity_delta,
    get_liquidity_delta_from_amount_a, get_liquidity_delta_from_amount_b,
};
use crate::transfer_fee::{gross_included, net_excluded, TransferFeeAdapter};
use serde::{Deserialize, Serialize};

/// Liquidity supported by both token budgets at once: the smaller of the
/// two single-sided deltas.
pub fn get_liquidity_delta(
    max_amount_a: u64,
    max_amount_b: u64,
    sqrt_price: u128,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
) -> Result<u128, MathError> {
    let from_a = get_liquidity_delta_from_amount_a(max_amount_a, sqrt_price, max_sqrt_price)?;
    let from_b = get_liquidity_delta_from_amount_b(max_amount_b, min_sqrt_price, sqrt_price)?;
    Ok(from_a.min(from_b))
}

/// Quote for a single-sided deposit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
    /// What reaches the pool after the input mint's transfer fee
    pub actual_input_amount: u64,
    /// What the user sends
    pub consumed_input_amount: u64,
    pub liquidity_delta: u128,
    /// Required counterpart amount, including its mint's transfer fee
    pub output_amount: u64,
}

/// Quote a deposit driven by one side's amount.
///
/// The driving side fixes the liquidity delta (floored); the counterpart
/// amount the pool will demand for that delta rounds up, then is grossed
/// through its mint's transfer fee.
pub fn get_deposit_quote(
    in_amount: u64,
    is_token_a: bool,
    sqrt_price: u128,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
    input_transfer_fee: Option<&dyn TransferFeeAdapter>,
    output_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<DepositQuote, MathError> {
    let actual_input_amount = net_excluded(input_transfer_fee, in_amount)?;

    let (liquidity_delta, raw_output_amount) = if is_token_a {
        let delta =
            get_liquidity_delta_from_amount_a(actual_input_amount, sqrt_price, max_sqrt_price)?;
        let amount_b =
            get_amount_b_from_liquidity_delta(delta, sqrt_price, min_sqrt_price, Rounding::Up)?;
        (delta, amount_b)
    } else {
        let delta =
            get_liquidity_delta_from_amount_b(actual_input_amount, min_sqrt_price, sqrt_price)?;
        let amount_a =
            get_amount_a_from_liquidity_delta(delta, sqrt_price, max_sqrt_price, Rounding::Up)?;
        (delta, amount_a)
    };

    let output_amount = gross_included(output_transfer_fee, raw_output_amount)?;

    Ok(DepositQuote {
        actual_input_amount,
        consumed_input_amount: in_amount,
        liquidity_delta,
        output_amount,
    })
}

/// Quote for removing liquidity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawQuote {
    pub liquidity_delta: u128,
    /// Token A received, after its mint's transfer fee
    pub out_amount_a: u64,
    /// Token B received, after its mint's transfer fee
    pub out_amount_b: u64,
}

/// Quote the payout for removing `liquidity_delta`. Both sides round down
/// and are netted through their mints' transfer fees.
pub fn get_withdraw_quote(
    liquidity_delta: u128,
    sqrt_price: u128,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
    token_a_transfer_fee: Option<&dyn TransferFeeAdapter>,
    token_b_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<WithdrawQuote, MathError> {
    let amount_a = get_amount_a_from_liquidity_delta(
        liquidity_delta,
        sqrt_price,
        max_sqrt_price,
        Rounding::Down,
    )?;
    let amount_b = get_amount_b_from_liquidity_delta(
        liquidity_delta,
        sqrt_price,
        min_sqrt_price,
        Rounding::Down,
    )?;

    Ok(WithdrawQuote {
        liquidity_delta,
        out_amount_a: net_excluded(token_a_transfer_fee, amount_a)?,
        out_amount_b: net_excluded(token_b_transfer_fee, amount_b)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_SQRT_PRICE, MIN_SQRT_PRICE, ONE_Q64};

    #[test]
    fn test_liquidity_delta_takes_smaller_side() {
        let from_a =
            get_liquidity_delta_from_amount_a(1_000_000, ONE_Q64, MAX_SQRT_PRICE).unwrap();
        let from_b =
            get_liquidity_delta_from_amount_b(1_000_000, MIN_SQRT_PRICE, ONE_Q64).unwrap();
        let combined =
            get_liquidity_delta(1_000_000, 1_000_000, ONE_Q64, MIN_SQRT_PRICE, MAX_SQRT_PRICE)
                .unwrap();
        assert_eq!(combined, from_a.min(from_b));
    }

    #[test]
    fn test_deposit_quote_in_range_price() {
        // Price strictly inside the range: both sides participate
        let quote = get_deposit_quote(
            1_000_000,
            true,
            ONE_Q64,
            MIN_SQRT_PRICE,
            MAX_SQRT_PRICE,
            None,
            None,
        )
        .unwrap();
        assert_eq!(quote.actual_input_amount, 1_000_000);
        assert_eq!(quote.consumed_input_amount, 1_000_000);
        assert!(quote.liquidity_delta > 0);
        assert!(quote.output_amount > 0);
    }

    #[test]
    fn test_deposit_quote_token_b_drives() {
        let quote = get_deposit_quote(
            1_000_000,
            false,
            ONE_Q64,
            MIN_SQRT_PRICE,
            MAX_SQRT_PRICE,
            None,
            None,
        )
        .unwrap();
        assert!(quote.liquidity_delta > 0);
        assert!(quote.output_amount > 0);
    }

    #[test]
    fn test_withdraw_returns_no_more_than_deposited() {
        let deposit = get_deposit_quote(
            1_000_000,
            true,
            ONE_Q64,
            MIN_SQRT_PRICE,
            MAX_SQRT_PRICE,
            None,
            None,
        )
        .unwrap();

        let withdraw = get_withdraw_quote(
            deposit.liquidity_delta,
            ONE_Q64,
            MIN_SQRT_PRICE,
            MAX_SQRT_PRICE,
            None,
            None,
        )
        .unwrap();

        assert_eq!(withdraw.liquidity_delta, deposit.liquidity_delta);
        // floors on the way out, ceilings on the way in
        assert!(withdraw.out_amount_a <= deposit.actual_input_amount);
        assert!(withdraw.out_amount_b <= deposit.output_amount);
        assert!(withdraw.out_amount_a > 0);
        assert!(withdraw.out_amount_b > 0);
    }

    #[test]
    fn test_withdraw_zero_liquidity_pays_nothing() {
        let quote =
            get_withdraw_quote(0, ONE_Q64, MIN_SQRT_PRICE, MAX_SQRT_PRICE, None, None).unwrap();
        assert_eq!(quote.out_amount_a, 0);
        assert_eq!(quote.out_amount_b, 0);
    }
}
