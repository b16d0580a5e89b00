//! Price Math
//!
//! Pool-initialization price derivation and price-impact display math.
//!
//! Both routines deliberately leave the integer domain: the init-price
//! quadratic has no closed-form integer solution and price impact is a
//! display percentage. Neither result ever feeds settlement math, and the
//! approximation error of the decimal square root is sub-basis-point.

use crate::constants::ONE_Q64;
use crate::errors::MathError;
use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

/// Solve the initial sqrt price for a pool seeded with both tokens.
///
/// With `pa = √P_min`, `pb = √P_max`, `x = 1/pb` and `y = amountB/amountA`,
/// the deposit ratio pins the price at the positive root of
///
/// `s² + s·(x·y − pa) − y = 0`
///
/// i.e. `s = [(pa − x·y) + √((x·y − pa)² + 4y)] / 2`, floored back into the
/// Q64.64 integer domain.
pub fn get_init_sqrt_price(
    token_a_amount: u64,
    token_b_amount: u64,
    min_sqrt_price: u128,
    max_sqrt_price: u128,
) -> Result<u128, MathError> {
    if token_a_amount == 0 || token_b_amount == 0 {
        return Err(MathError::ZeroAmount);
    }

    let scale = Decimal::from_u128(ONE_Q64).ok_or(MathError::DecimalOverflow)?;
    let min_dec = Decimal::from_u128(min_sqrt_price)
        .ok_or(MathError::DecimalOverflow)?
        .checked_div(scale)
        .ok_or(MathError::DivisionByZero)?;
    let max_dec = Decimal::from_u128(max_sqrt_price)
        .ok_or(MathError::DecimalOverflow)?
        .checked_div(scale)
        .ok_or(MathError::DivisionByZero)?;
    if max_dec.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let x = dec!(1).checked_div(max_dec).ok_or(MathError::DecimalOverflow)?;
    let y = Decimal::from(token_b_amount)
        .checked_div(Decimal::from(token_a_amount))
        .ok_or(MathError::DecimalOverflow)?;
    let xy = x.checked_mul(y).ok_or(MathError::DecimalOverflow)?;

    let pa_minus_xy = min_dec - xy;
    let xy_minus_pa = xy - min_dec;

    let discriminant = xy_minus_pa
        .checked_mul(xy_minus_pa)
        .and_then(|sq| sq.checked_add(y.checked_mul(dec!(4))?))
        .ok_or(MathError::DecimalOverflow)?;

    let sqrt_discriminant = discriminant.sqrt().ok_or(MathError::SqrtError)?;

    let result = pa_minus_xy
        .checked_add(sqrt_discriminant)
        .and_then(|s| s.checked_div(dec!(2)))
        .and_then(|s| s.checked_mul(scale))
        .ok_or(MathError::DecimalOverflow)?;

    result.floor().to_u128().ok_or(MathError::TypeCastFailed)
}

/// Percentage difference between two sqrt prices, on the underlying price:
/// `|next² − current²| · 100 / current²`.
///
/// Display only. Settlement math never consumes this value.
pub fn get_price_impact(next_sqrt_price: u128, current_sqrt_price: u128) -> f64 {
    if current_sqrt_price == 0 {
        return 0.0;
    }

    let ratio = next_sqrt_price as f64 / current_sqrt_price as f64;
    (ratio * ratio - 1.0).abs() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_SQRT_PRICE, MIN_SQRT_PRICE, ONE_Q64};
    use crate::math::liquidity_math::{
        get_liquidity_delta_from_amount_a, get_liquidity_delta_from_amount_b,
    };

    #[test]
    fn test_init_sqrt_price_zero_amount_rejected() {
        assert_eq!(
            get_init_sqrt_price(0, 1, MIN_SQRT_PRICE, MAX_SQRT_PRICE),
            Err(MathError::ZeroAmount)
        );
        assert_eq!(
            get_init_sqrt_price(1, 0, MIN_SQRT_PRICE, MAX_SQRT_PRICE),
            Err(MathError::ZeroAmount)
        );
    }

    #[test]
    fn test_init_sqrt_price_equal_amounts_full_range() {
        // Equal deposits over the full range land near price 1.0
        let s = get_init_sqrt_price(
            1_000_000_000,
            1_000_000_000,
            MIN_SQRT_PRICE,
            MAX_SQRT_PRICE,
        )
        .unwrap();
        assert!(s > MIN_SQRT_PRICE && s < MAX_SQRT_PRICE);

        let price = (s as f64 / ONE_Q64 as f64).powi(2);
        assert!(price > 0.99 && price < 1.01);
    }

    #[test]
    fn test_init_sqrt_price_balances_single_sided_deltas() {
        // At the derived price, the two single-sided liquidity deltas must
        // be close: that is what "the ratio pins the price" means.
        let (a, b) = (5_000_000_000u64, 2_000_000_000u64);
        let s = get_init_sqrt_price(a, b, MIN_SQRT_PRICE, MAX_SQRT_PRICE).unwrap();

        let from_a = get_liquidity_delta_from_amount_a(a, s, MAX_SQRT_PRICE).unwrap();
        let from_b = get_liquidity_delta_from_amount_b(b, MIN_SQRT_PRICE, s).unwrap();

        let (lo, hi) = if from_a < from_b { (from_a, from_b) } else { (from_b, from_a) };
        // Within 0.1% of each other
        assert!(hi - lo <= hi / 1000);
    }

    #[test]
    fn test_price_impact_unmoved_price_is_zero() {
        assert_eq!(get_price_impact(ONE_Q64, ONE_Q64), 0.0);
    }

    #[test]
    fn test_price_impact_doubling_sqrt_price() {
        // Doubling sqrt price quadruples price: impact 300%
        let impact = get_price_impact(2 * ONE_Q64, ONE_Q64);
        assert!((impact - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_impact_symmetric_on_abs() {
        let down = get_price_impact(ONE_Q64 / 2, ONE_Q64);
        assert!((down - 75.0).abs() < 1e-9);
    }
}
