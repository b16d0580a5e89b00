//! Swap quoting
//!
//! Exact-in and exact-out swap math over a pool snapshot, plus the
//! user-facing quote assembly: transfer-fee netting, slippage bounds and
//! price impact. All pool state arrives as plain numbers; nothing here
//! talks to a chain.

use crate::constants::{BASIS_POINT_MAX, FEE_DENOMINATOR};
use crate::errors::MathError;
use crate::fees::{
    get_fee_mode, get_fee_numerator, get_total_fee_on_amount, split_fees, BaseFee,
    CollectFeeMode, DynamicFeeParams, FeeMode, TradeDirection,
};
use crate::math::full_math::{mul_div, Rounding};
use crate::math::liquidity_math::{
    get_amount_a_from_liquidity_delta, get_amount_b_from_liquidity_delta,
};
use crate::math::price_math::get_price_impact;
use crate::math::sqrt_price_math::{
    get_next_sqrt_price_from_input, get_next_sqrt_price_from_output,
};
use crate::transfer_fee::{gross_included, net_excluded, TransferFeeAdapter};
use serde::{Deserialize, Serialize};

/// Exact-in swap outcome at the curve level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmount {
    pub output_amount: u64,
    pub total_fee: u64,
    pub next_sqrt_price: u128,
}

/// Exact-in core: trade `in_amount` against the curve.
///
/// The trading fee is withheld from the input or the output per the pool's
/// collect mode; the curve only ever sees post-fee input.
pub fn get_swap_amount(
    in_amount: u64,
    sqrt_price: u128,
    liquidity: u128,
    trade_fee_numerator: u64,
    a_to_b: bool,
    collect_fee_mode: CollectFeeMode,
) -> Result<SwapAmount, MathError> {
    let direction = if a_to_b {
        TradeDirection::AToB
    } else {
        TradeDirection::BToA
    };
    let fee_mode = get_fee_mode(collect_fee_mode, direction, false);

    let (actual_in_amount, input_fee) = if fee_mode.fee_on_input {
        let fee = get_total_fee_on_amount(in_amount, trade_fee_numerator)?;
        (
            in_amount.checked_sub(fee).ok_or(MathError::MathUnderflow)?,
            fee,
        )
    } else {
        (in_amount, 0)
    };

    let next_sqrt_price =
        get_next_sqrt_price_from_input(sqrt_price, liquidity, actual_in_amount, a_to_b)?;

    // Output owed to the trader rounds down
    let out_amount = if a_to_b {
        get_amount_b_from_liquidity_delta(liquidity, sqrt_price, next_sqrt_price, Rounding::Down)?
    } else {
        get_amount_a_from_liquidity_delta(liquidity, sqrt_price, next_sqrt_price, Rounding::Down)?
    };

    let (output_amount, total_fee) = if fee_mode.fee_on_input {
        (out_amount, input_fee)
    } else {
        let fee = get_total_fee_on_amount(out_amount, trade_fee_numerator)?;
        (
            out_amount.checked_sub(fee).ok_or(MathError::MathUnderflow)?,
            fee,
        )
    };

    Ok(SwapAmount {
        output_amount,
        total_fee,
        next_sqrt_price,
    })
}

/// Exact-out swap outcome, fees split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    pub input_amount: u64,
    pub output_amount: u64,
    pub next_sqrt_price: u128,
    pub total_fee: u64,
    pub lp_fee: u64,
    pub protocol_fee: u64,
    pub partner_fee: u64,
    pub referral_fee: u64,
}

/// Smallest pre-fee amount whose fee leaves `excluded` behind:
/// `⌈excluded · 1e9 / (1e9 − numerator)⌉`.
fn get_included_fee_amount(fee_numerator: u64, excluded: u64) -> Result<u64, MathError> {
    if fee_numerator >= FEE_DENOMINATOR {
        return Err(MathError::InvalidFeeParams("fee numerator at or above 100%"));
    }
    let included = mul_div(
        excluded as u128,
        FEE_DENOMINATOR as u128,
        (FEE_DENOMINATOR - fee_numerator) as u128,
        Rounding::Up,
    )?;
    u64::try_from(included).map_err(|_| MathError::TypeCastFailed)
}

/// Exact-out core: the input and fees required for the pool to emit
/// `out_amount`.
///
/// Every rounding here goes against the trader: the output-side gross-up
/// and the required input both take the ceiling.
#[allow(clippy::too_many_arguments)]
pub fn get_swap_result_from_out_amount(
    out_amount: u64,
    sqrt_price: u128,
    liquidity: u128,
    trade_fee_numerator: u64,
    fee_mode: FeeMode,
    a_to_b: bool,
    protocol_fee_percent: u8,
    partner_fee_percent: u8,
    referral_fee_percent: u8,
) -> Result<SwapResult, MathError> {
    // When the fee lands on the output, the curve must emit enough to cover
    // both the requested amount and the fee on it.
    let (curve_out_amount, output_fee) = if fee_mode.fee_on_input {
        (out_amount, 0)
    } else {
        let included = get_included_fee_amount(trade_fee_numerator, out_amount)?;
        (included, included - out_amount)
    };

    let next_sqrt_price =
        get_next_sqrt_price_from_output(sqrt_price, liquidity, curve_out_amount, a_to_b)?;

    // Input owed to the pool rounds up
    let curve_in_amount = if a_to_b {
        get_amount_a_from_liquidity_delta(liquidity, next_sqrt_price, sqrt_price, Rounding::Up)?
    } else {
        get_amount_b_from_liquidity_delta(liquidity, next_sqrt_price, sqrt_price, Rounding::Up)?
    };

    let (input_amount, total_fee) = if fee_mode.fee_on_input {
        let included = get_included_fee_amount(trade_fee_numerator, curve_in_amount)?;
        (included, included - curve_in_amount)
    } else {
        (curve_in_amount, output_fee)
    };

    let split = split_fees(
        total_fee,
        protocol_fee_percent,
        partner_fee_percent,
        referral_fee_percent,
        fee_mode.has_referral,
    )?;

    Ok(SwapResult {
        input_amount,
        output_amount: out_amount,
        next_sqrt_price,
        total_fee,
        lp_fee: split.lp_fee,
        protocol_fee: split.protocol_fee,
        partner_fee: split.partner_fee,
        referral_fee: split.referral_fee,
    })
}

/// Largest output still acceptable after `rate` percent of adverse slippage:
/// `amount · ⌊(100 − rate)/100 · 10000⌋ / 10000`.
pub fn get_min_amount_with_slippage(amount: u64, rate: f64) -> Result<u64, MathError> {
    let factor = ((100.0 - rate) / 100.0 * BASIS_POINT_MAX as f64) as u64;
    let min = mul_div(
        amount as u128,
        factor as u128,
        BASIS_POINT_MAX as u128,
        Rounding::Down,
    )?;
    u64::try_from(min).map_err(|_| MathError::TypeCastFailed)
}

/// Largest input still acceptable after `rate` percent of adverse slippage:
/// `⌈amount · ⌊(100 + rate)/100 · 10000⌋ / 10000⌉`.
pub fn get_max_amount_with_slippage(amount: u64, rate: f64) -> Result<u64, MathError> {
    let factor = ((100.0 + rate) / 100.0 * BASIS_POINT_MAX as f64) as u64;
    let max = mul_div(
        amount as u128,
        factor as u128,
        BASIS_POINT_MAX as u128,
        Rounding::Up,
    )?;
    u64::try_from(max).map_err(|_| MathError::TypeCastFailed)
}

/// Pool snapshot and trade parameters for an exact-in quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwapQuoteParams {
    pub in_amount: u64,
    pub a_to_b: bool,
    /// Tolerated slippage in percent (`0.5` = 0.5%)
    pub slippage_rate: f64,
    pub sqrt_price: u128,
    pub liquidity: u128,
    pub collect_fee_mode: CollectFeeMode,
    pub base_fee: BaseFee,
    pub dynamic_fee: Option<DynamicFeeParams>,
    pub activation_point: u64,
    pub current_point: u64,
}

/// Exact-in quote as shown to a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwapQuote {
    /// What the user sends
    pub swap_in_amount: u64,
    /// What reaches the pool after the input mint's transfer fee
    pub consumed_in_amount: u64,
    /// What reaches the user after the output mint's transfer fee
    pub swap_out_amount: u64,
    pub min_swap_out_amount: u64,
    pub total_fee: u64,
    pub price_impact: f64,
}

/// Quote an exact-in swap.
///
/// Transfer-fee netting happens at both edges: the input is netted before
/// the curve sees it, the curve's output is netted before it is shown.
pub fn get_quote(
    params: &SwapQuoteParams,
    input_transfer_fee: Option<&dyn TransferFeeAdapter>,
    output_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<SwapQuote, MathError> {
    let trade_fee_numerator = get_fee_numerator(
        params.current_point,
        params.activation_point,
        params.base_fee.number_of_period,
        params.base_fee.period_frequency,
        params.base_fee.fee_scheduler_mode,
        params.base_fee.cliff_fee_numerator,
        params.base_fee.reduction_factor,
        params.dynamic_fee.as_ref(),
    )?;

    let consumed_in_amount = net_excluded(input_transfer_fee, params.in_amount)?;

    let swap = get_swap_amount(
        consumed_in_amount,
        params.sqrt_price,
        params.liquidity,
        trade_fee_numerator,
        params.a_to_b,
        params.collect_fee_mode,
    )?;

    let swap_out_amount = net_excluded(output_transfer_fee, swap.output_amount)?;
    let min_swap_out_amount = get_min_amount_with_slippage(swap_out_amount, params.slippage_rate)?;

    Ok(SwapQuote {
        swap_in_amount: params.in_amount,
        consumed_in_amount,
        swap_out_amount,
        min_swap_out_amount,
        total_fee: swap.total_fee,
        price_impact: get_price_impact(swap.next_sqrt_price, params.sqrt_price),
    })
}

/// Pool snapshot and trade parameters for an exact-out quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExactOutQuoteParams {
    pub out_amount: u64,
    pub a_to_b: bool,
    pub slippage_rate: f64,
    pub sqrt_price: u128,
    pub liquidity: u128,
    pub collect_fee_mode: CollectFeeMode,
    pub base_fee: BaseFee,
    pub dynamic_fee: Option<DynamicFeeParams>,
    pub activation_point: u64,
    pub current_point: u64,
    pub protocol_fee_percent: u8,
    pub partner_fee_percent: u8,
    pub referral_fee_percent: u8,
    pub has_referral: bool,
}

/// Exact-out quote as shown to a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExactOutQuote {
    pub swap_result: SwapResult,
    /// What the user must send, including the input mint's transfer fee
    pub input_amount: u64,
    pub max_input_amount: u64,
    pub price_impact: f64,
}

/// Quote an exact-out swap: the user names what must arrive, the quote
/// names what they must send.
///
/// The requested output is grossed through the output mint's transfer fee
/// (the pool must emit more so the named amount survives the transfer), and
/// the required input is grossed through the input mint's (the user must
/// send more so the pool receives what the curve needs).
pub fn get_quote_exact_out(
    params: &ExactOutQuoteParams,
    input_transfer_fee: Option<&dyn TransferFeeAdapter>,
    output_transfer_fee: Option<&dyn TransferFeeAdapter>,
) -> Result<ExactOutQuote, MathError> {
    let trade_fee_numerator = get_fee_numerator(
        params.current_point,
        params.activation_point,
        params.base_fee.number_of_period,
        params.base_fee.period_frequency,
        params.base_fee.fee_scheduler_mode,
        params.base_fee.cliff_fee_numerator,
        params.base_fee.reduction_factor,
        params.dynamic_fee.as_ref(),
    )?;

    let direction = if params.a_to_b {
        TradeDirection::AToB
    } else {
        TradeDirection::BToA
    };
    let fee_mode = get_fee_mode(params.collect_fee_mode, direction, params.has_referral);

    let pool_out_amount = gross_included(output_transfer_fee, params.out_amount)?;

    let swap_result = get_swap_result_from_out_amount(
        pool_out_amount,
        params.sqrt_price,
        params.liquidity,
        trade_fee_numerator,
        fee_mode,
        params.a_to_b,
        params.protocol_fee_percent,
        params.partner_fee_percent,
        params.referral_fee_percent,
    )?;

    let input_amount = gross_included(input_transfer_fee, swap_result.input_amount)?;
    let max_input_amount = get_max_amount_with_slippage(input_amount, params.slippage_rate)?;

    Ok(ExactOutQuote {
        swap_result,
        input_amount,
        max_input_amount,
        price_impact: get_price_impact(swap_result.next_sqrt_price, params.sqrt_price),
    })
}
