//! Dynamic (volatility) fee
//!
//! The variable fee component scales with the square of recent price
//! movement, measured in bins: `⌈vfc · (va · binStep)² / 1e11⌉`.

use crate::constants::{
    dynamic_fee_defaults, BASIS_POINT_MAX, DYNAMIC_FEE_SCALING, MAX_PRICE_CHANGE_BPS_DEFAULT,
    ONE_Q64,
};
use crate::errors::MathError;
use crate::fees::scheduler::bps_to_fee_numerator;
use crate::math::full_math::{try_to_u128, U512};
use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

/// Volatility inputs for one fee evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFeeParams {
    pub volatility_accumulator: u64,
    pub bin_step: u16,
    pub variable_fee_control: u32,
}

/// Full dynamic-fee configuration for a pool, as stored on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFeeConfig {
    pub bin_step: u16,
    pub bin_step_u128: u128,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub max_volatility_accumulator: u32,
    pub variable_fee_control: u32,
}

/// Variable fee numerator for the given volatility state.
///
/// `⌈variable_fee_control · (volatility_accumulator · bin_step)² / 1e11⌉`,
/// zero when the control is zero.
pub fn get_dynamic_fee_numerator(
    volatility_accumulator: u64,
    bin_step: u16,
    variable_fee_control: u32,
) -> Result<u128, MathError> {
    if variable_fee_control == 0 {
        return Ok(0);
    }

    let vfa_bin = U512::from(volatility_accumulator) * U512::from(bin_step);
    let square = vfa_bin * vfa_bin;
    let v_fee = square * U512::from(variable_fee_control);

    let scaled = (v_fee + U512::from(DYNAMIC_FEE_SCALING - 1)) / U512::from(DYNAMIC_FEE_SCALING);
    try_to_u128(scaled)
}

/// Derive a pool's dynamic-fee configuration from its base fee and the
/// price swing it should tolerate before the variable fee saturates.
///
/// The accumulator cap is set so a move of `max_price_change_bps` fills it,
/// and the control is sized so a full accumulator charges
/// `MAX_DYNAMIC_FEE_PERCENT` of the base fee.
pub fn get_dynamic_fee_params(
    base_fee_bps: u64,
    max_price_change_bps: u64,
) -> Result<DynamicFeeConfig, MathError> {
    if max_price_change_bps > MAX_PRICE_CHANGE_BPS_DEFAULT {
        return Err(MathError::InvalidFeeParams(
            "max price change exceeds supported range",
        ));
    }
    let max_price_change_bps = if max_price_change_bps == 0 {
        MAX_PRICE_CHANGE_BPS_DEFAULT
    } else {
        max_price_change_bps
    };

    // √(1 + change) in Q64.64, via decimal sqrt
    let price_ratio = Decimal::from(max_price_change_bps)
        .checked_div(Decimal::from(BASIS_POINT_MAX))
        .and_then(|r| r.checked_add(Decimal::ONE))
        .ok_or(MathError::DecimalOverflow)?;
    let scale = Decimal::from_u128(ONE_Q64).ok_or(MathError::DecimalOverflow)?;
    let sqrt_price_ratio_q64 = price_ratio
        .sqrt()
        .and_then(|s| s.checked_mul(scale))
        .ok_or(MathError::SqrtError)?
        .floor()
        .to_u128()
        .ok_or(MathError::TypeCastFailed)?;

    // One-sided bin distance of that move, doubled for both directions
    let delta_bin_id = (sqrt_price_ratio_q64 - ONE_Q64) / dynamic_fee_defaults::BIN_STEP_BPS_U128 * 2;
    let max_volatility_accumulator =
        u32::try_from(delta_bin_id * BASIS_POINT_MAX as u128)
            .map_err(|_| MathError::TypeCastFailed)?;

    let square_vfa_bin = (max_volatility_accumulator as u128
        * dynamic_fee_defaults::BIN_STEP_BPS as u128)
        .pow(2);
    if square_vfa_bin == 0 {
        // a sub-bin price change cannot carry a volatility fee
        return Err(MathError::InvalidFeeParams(
            "max price change smaller than one bin",
        ));
    }

    let base_fee_numerator = bps_to_fee_numerator(base_fee_bps)?;
    let max_dynamic_fee_numerator =
        base_fee_numerator as u128 * dynamic_fee_defaults::MAX_DYNAMIC_FEE_PERCENT as u128 / 100;

    // Largest control whose ceiling-division fee stays within the target
    let v_fee = max_dynamic_fee_numerator
        .checked_mul(DYNAMIC_FEE_SCALING as u128)
        .and_then(|v| v.checked_sub(DYNAMIC_FEE_SCALING as u128 - 1))
        .ok_or(MathError::MathUnderflow)?;
    let variable_fee_control = u32::try_from(v_fee / square_vfa_bin)
        .map_err(|_| MathError::TypeCastFailed)?;

    Ok(DynamicFeeConfig {
        bin_step: dynamic_fee_defaults::BIN_STEP_BPS,
        bin_step_u128: dynamic_fee_defaults::BIN_STEP_BPS_U128,
        filter_period: dynamic_fee_defaults::FILTER_PERIOD,
        decay_period: dynamic_fee_defaults::DECAY_PERIOD,
        reduction_factor: dynamic_fee_defaults::REDUCTION_FACTOR,
        max_volatility_accumulator,
        variable_fee_control,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_control_is_free() {
        assert_eq!(get_dynamic_fee_numerator(1_000_000, 100, 0).unwrap(), 0);
    }

    #[test]
    fn test_dynamic_fee_rounds_up() {
        // (1 * 1)^2 * 1 = 1, ceil(1 / 1e11) = 1
        assert_eq!(get_dynamic_fee_numerator(1, 1, 1).unwrap(), 1);
        // exact multiple takes no bump: va*bin = 10^6, squared 10^12,
        // * 100 = 10^14, / 1e11 = 1000
        assert_eq!(
            get_dynamic_fee_numerator(10_000, 100, 100).unwrap(),
            1000
        );
    }

    #[test]
    fn test_dynamic_fee_grows_with_square_of_volatility() {
        let control = 5_000_000;
        let f1 = get_dynamic_fee_numerator(100_000, 1, control).unwrap();
        let f2 = get_dynamic_fee_numerator(200_000, 1, control).unwrap();
        // doubling the accumulator quadruples the fee, up to ceil slack
        assert!(f2 >= 4 * f1 - 4 && f2 <= 4 * f1 + 4);
    }

    #[test]
    fn test_dynamic_fee_params_rejects_wide_range() {
        assert!(get_dynamic_fee_params(100, MAX_PRICE_CHANGE_BPS_DEFAULT + 1).is_err());
    }

    #[test]
    fn test_dynamic_fee_params_rejects_sub_bin_range() {
        // one basis point spans less than a single bin
        assert!(get_dynamic_fee_params(100, 1).is_err());
    }

    #[test]
    fn test_dynamic_fee_params_defaults() {
        let config = get_dynamic_fee_params(100, 0).unwrap();
        assert_eq!(config.bin_step, dynamic_fee_defaults::BIN_STEP_BPS);
        assert_eq!(config.filter_period, dynamic_fee_defaults::FILTER_PERIOD);
        assert_eq!(config.decay_period, dynamic_fee_defaults::DECAY_PERIOD);
        assert!(config.max_volatility_accumulator > 0);
        assert!(config.variable_fee_control > 0);
    }

    #[test]
    fn test_saturated_fee_stays_within_target_share() {
        // At the accumulator cap the variable fee must not exceed 20% of
        // the base fee.
        let base_fee_bps = 100;
        let config = get_dynamic_fee_params(base_fee_bps, 0).unwrap();

        let fee = get_dynamic_fee_numerator(
            config.max_volatility_accumulator as u64,
            config.bin_step,
            config.variable_fee_control,
        )
        .unwrap();

        let base_fee_numerator = bps_to_fee_numerator(base_fee_bps).unwrap() as u128;
        let target = base_fee_numerator * dynamic_fee_defaults::MAX_DYNAMIC_FEE_PERCENT as u128 / 100;
        assert!(fee <= target);
        // and lands within 1% of it
        assert!(fee >= target - target / 100);
    }
}
