//! Base-fee scheduler
//!
//! A pool's trading fee starts at a cliff numerator and decays over
//! discrete periods after the activation point, linearly or exponentially.
//! This module computes the scheduled numerator, composes it with the
//! dynamic (volatility) component, and derives schedule parameters from
//! basis-point inputs.

use crate::constants::{BASIS_POINT_MAX, FEE_DENOMINATOR, MAX_FEE_NUMERATOR, ONE_Q64, SCALE_OFFSET};
use crate::errors::MathError;
use crate::fees::dynamic_fee::{get_dynamic_fee_numerator, DynamicFeeParams};
use crate::math::full_math::{mul_div, pow, Rounding};
use serde::{Deserialize, Serialize};

/// How the base fee decays across periods. Closed enumeration fixed by the
/// on-chain program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeSchedulerMode {
    /// `cliff − reduction_factor · period`
    Linear,
    /// `cliff · (1 − reduction_factor / 10000)^period`
    Exponential,
}

/// A pool's base-fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFee {
    pub cliff_fee_numerator: u64,
    pub number_of_period: u16,
    pub period_frequency: u64,
    pub reduction_factor: u64,
    pub fee_scheduler_mode: FeeSchedulerMode,
}

/// Scheduled base-fee numerator after `period` elapsed periods.
///
/// Linear underflow (a reduction schedule that crosses zero) is a
/// configuration error and surfaces as `MathUnderflow` rather than being
/// clamped; [`get_base_fee_params`] never builds such a schedule.
pub fn get_base_fee_numerator(
    mode: FeeSchedulerMode,
    cliff_fee_numerator: u64,
    period: u64,
    reduction_factor: u64,
) -> Result<u64, MathError> {
    match mode {
        FeeSchedulerMode::Linear => {
            let total_reduction = reduction_factor as u128 * period as u128;
            let fee = (cliff_fee_numerator as u128)
                .checked_sub(total_reduction)
                .ok_or(MathError::MathUnderflow)?;
            Ok(fee as u64)
        }
        FeeSchedulerMode::Exponential => {
            // a full-basis-point reduction zeroes the decay base outright
            if reduction_factor >= BASIS_POINT_MAX {
                return Err(MathError::InvalidFeeParams(
                    "reduction factor must stay below basis point max",
                ));
            }
            let bps = ((reduction_factor as u128) << SCALE_OFFSET) / BASIS_POINT_MAX as u128;
            let base = ONE_Q64 - bps;
            let decay = pow(base, i64::try_from(period).unwrap_or(i64::MAX));
            let fee = (cliff_fee_numerator as u128 * decay) >> SCALE_OFFSET;
            Ok(fee as u64)
        }
    }
}

/// Effective trade-fee numerator at `current_point`, base schedule plus
/// dynamic component, capped at [`MAX_FEE_NUMERATOR`].
///
/// An inactive schedule (`period_frequency == 0`, or a point before
/// activation) charges the cliff numerator unchanged, with no dynamic
/// contribution.
#[allow(clippy::too_many_arguments)]
pub fn get_fee_numerator(
    current_point: u64,
    activation_point: u64,
    number_of_period: u16,
    period_frequency: u64,
    mode: FeeSchedulerMode,
    cliff_fee_numerator: u64,
    reduction_factor: u64,
    dynamic_fee: Option<&DynamicFeeParams>,
) -> Result<u64, MathError> {
    if period_frequency == 0 || current_point < activation_point {
        return Ok(cliff_fee_numerator);
    }

    let elapsed_periods = (current_point - activation_point) / period_frequency;
    let period = elapsed_periods.min(number_of_period as u64);

    let base = get_base_fee_numerator(mode, cliff_fee_numerator, period, reduction_factor)?;

    let dynamic = match dynamic_fee {
        Some(params) => get_dynamic_fee_numerator(
            params.volatility_accumulator,
            params.bin_step,
            params.variable_fee_control,
        )?,
        None => 0,
    };

    let total = base as u128 + dynamic;
    Ok(total.min(MAX_FEE_NUMERATOR as u128) as u64)
}

/// Convert basis points to a fee numerator over [`FEE_DENOMINATOR`].
pub fn bps_to_fee_numerator(bps: u64) -> Result<u64, MathError> {
    let numerator = mul_div(
        bps as u128,
        FEE_DENOMINATOR as u128,
        BASIS_POINT_MAX as u128,
        Rounding::Down,
    )?;
    u64::try_from(numerator).map_err(|_| MathError::TypeCastFailed)
}

/// Convert a fee numerator back to basis points (floored).
pub fn fee_numerator_to_bps(fee_numerator: u64) -> u64 {
    ((fee_numerator as u128 * BASIS_POINT_MAX as u128) / FEE_DENOMINATOR as u128) as u64
}

/// Build a base-fee schedule from basis-point bounds.
///
/// The Exponential reduction factor is solved with floating-point `powf`
/// (`10000 · (1 − (min/max)^(1/n))`): the result is a basis-point integer,
/// so the sub-basis-point float error is tolerated by design.
pub fn get_base_fee_params(
    max_base_fee_bps: u64,
    min_base_fee_bps: u64,
    mode: FeeSchedulerMode,
    number_of_period: u64,
    total_duration: u64,
) -> Result<BaseFee, MathError> {
    if max_base_fee_bps == min_base_fee_bps {
        if number_of_period != 0 || total_duration != 0 {
            return Err(MathError::InvalidFeeParams(
                "constant fee requires zero periods and duration",
            ));
        }
        return Ok(BaseFee {
            cliff_fee_numerator: bps_to_fee_numerator(max_base_fee_bps)?,
            number_of_period: 0,
            period_frequency: 0,
            reduction_factor: 0,
            fee_scheduler_mode: mode,
        });
    }

    if number_of_period == 0 || total_duration == 0 {
        return Err(MathError::InvalidFeeParams(
            "periods and duration must both be greater than zero",
        ));
    }
    let number_of_period_u16 = u16::try_from(number_of_period)
        .map_err(|_| MathError::InvalidFeeParams("too many periods"))?;

    if max_base_fee_bps > fee_numerator_to_bps(MAX_FEE_NUMERATOR) {
        return Err(MathError::InvalidFeeParams(
            "max base fee exceeds protocol cap",
        ));
    }
    if min_base_fee_bps > max_base_fee_bps {
        return Err(MathError::InvalidFeeParams(
            "min base fee must not exceed max base fee",
        ));
    }

    let max_fee_numerator = bps_to_fee_numerator(max_base_fee_bps)?;
    let min_fee_numerator = bps_to_fee_numerator(min_base_fee_bps)?;
    let period_frequency = total_duration / number_of_period;

    let reduction_factor = match mode {
        FeeSchedulerMode::Linear => (max_fee_numerator - min_fee_numerator) / number_of_period,
        FeeSchedulerMode::Exponential => {
            let ratio = min_fee_numerator as f64 / max_fee_numerator as f64;
            let decay_base = ratio.powf(1.0 / number_of_period as f64);
            (BASIS_POINT_MAX as f64 * (1.0 - decay_base)) as u64
        }
    };

    Ok(BaseFee {
        cliff_fee_numerator: max_fee_numerator,
        number_of_period: number_of_period_u16,
        period_frequency,
        reduction_factor,
        fee_scheduler_mode: mode,
    })
}
