//! Fee mode and fee application
//!
//! Which token a trade is taxed in, how a fee is charged on an amount, and
//! how a collected fee is split between LPs, protocol, partner and referrer.

use crate::constants::FEE_DENOMINATOR;
use crate::errors::MathError;
use crate::math::full_math::{mul_div, Rounding};
use serde::{Deserialize, Serialize};

/// Which side of the pool collects trading fees. Closed enumeration fixed
/// by the on-chain program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectFeeMode {
    BothToken,
    OnlyB,
}

/// Swap direction relative to the pool's token ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    AToB,
    BToA,
}

/// Where this particular trade's fee lands. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeMode {
    /// Fee is withheld from the input amount before the curve sees it
    pub fee_on_input: bool,
    /// Fee is denominated in token A
    pub fees_on_token_a: bool,
    /// A referral account participates in the protocol-fee split
    pub has_referral: bool,
}

/// Derive the fee mode for a trade.
///
/// Fees land on the input side only when a B→A trade hits an OnlyB pool
/// (the output would be token A, which that pool refuses to collect in).
pub fn get_fee_mode(
    collect_fee_mode: CollectFeeMode,
    trade_direction: TradeDirection,
    has_referral: bool,
) -> FeeMode {
    let b_to_a = trade_direction == TradeDirection::BToA;
    FeeMode {
        fee_on_input: b_to_a && collect_fee_mode == CollectFeeMode::OnlyB,
        fees_on_token_a: b_to_a && collect_fee_mode == CollectFeeMode::BothToken,
        has_referral,
    }
}

/// Total trading fee charged on an amount: `⌈amount · numerator / 1e9⌉`.
/// Fees always round up, never in the trader's favor.
pub fn get_total_fee_on_amount(amount: u64, fee_numerator: u64) -> Result<u64, MathError> {
    let fee = mul_div(
        amount as u128,
        fee_numerator as u128,
        FEE_DENOMINATOR as u128,
        Rounding::Up,
    )?;
    u64::try_from(fee).map_err(|_| MathError::TypeCastFailed)
}

/// How a collected trading fee is distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub total_fee: u64,
    pub lp_fee: u64,
    pub protocol_fee: u64,
    pub partner_fee: u64,
    pub referral_fee: u64,
}

/// Split a total fee between protocol, referrer, partner and LPs.
///
/// The partner share is computed against `protocol − referral`, but the LP
/// share subtracts the partner fee from the raw protocol fee. That is the
/// split the host program performs today; it is reproduced here verbatim
/// and must stay bit-identical to it (see DESIGN.md before "fixing").
pub fn split_fees(
    total_fee: u64,
    protocol_fee_percent: u8,
    partner_fee_percent: u8,
    referral_fee_percent: u8,
    has_referral: bool,
) -> Result<FeeBreakdown, MathError> {
    let protocol_fee = mul_div(
        total_fee as u128,
        protocol_fee_percent as u128,
        100,
        Rounding::Down,
    )? as u64;

    let referral_fee = if has_referral {
        mul_div(
            protocol_fee as u128,
            referral_fee_percent as u128,
            100,
            Rounding::Down,
        )? as u64
    } else {
        0
    };

    let partner_fee = mul_div(
        (protocol_fee - referral_fee) as u128,
        partner_fee_percent as u128,
        100,
        Rounding::Down,
    )? as u64;

    let lp_fee = protocol_fee
        .checked_sub(partner_fee)
        .ok_or(MathError::MathUnderflow)?;

    Ok(FeeBreakdown {
        total_fee,
        lp_fee,
        protocol_fee,
        partner_fee,
        referral_fee,
    })
}
