//! Position vesting
//!
//! Locked liquidity unlocks at a cliff point and then in fixed periods.
//! The schedule is pure arithmetic over the caller-supplied current point
//! (slot or unix timestamp, per the pool's activation type).

use crate::errors::MathError;
use serde::{Deserialize, Serialize};

/// A position's vesting schedule and release progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vesting {
    pub cliff_point: u64,
    pub period_frequency: u64,
    pub cliff_unlock_liquidity: u128,
    pub liquidity_per_period: u128,
    pub number_of_period: u16,
    pub total_released_liquidity: u128,
}

/// Whether every period of the schedule has elapsed.
pub fn is_vesting_complete(vesting: &Vesting, current_point: u64) -> bool {
    let total_duration = vesting.period_frequency as u128 * vesting.number_of_period as u128;
    current_point as u128 >= vesting.cliff_point as u128 + total_duration
}

/// Liquidity unlocked but not yet released at `current_point`.
///
/// Zero before the cliff. A zero `period_frequency` schedule unlocks the
/// cliff amount only. Releasing more than has vested is a state corruption
/// and surfaces as `MathUnderflow`.
pub fn get_available_vesting_liquidity(
    vesting: &Vesting,
    current_point: u64,
) -> Result<u128, MathError> {
    if current_point < vesting.cliff_point {
        return Ok(0);
    }

    let unlocked = if vesting.period_frequency == 0 {
        vesting.cliff_unlock_liquidity
    } else {
        let passed_periods =
            ((current_point - vesting.cliff_point) / vesting.period_frequency)
                .min(vesting.number_of_period as u64);
        let periodic = vesting
            .liquidity_per_period
            .checked_mul(passed_periods as u128)
            .ok_or(MathError::MathOverflow)?;
        vesting
            .cliff_unlock_liquidity
            .checked_add(periodic)
            .ok_or(MathError::MathOverflow)?
    };

    unlocked
        .checked_sub(vesting.total_released_liquidity)
        .ok_or(MathError::MathUnderflow)
}
