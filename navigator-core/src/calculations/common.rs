//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the regime
//! calculations, including rounding and clamping.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use navigator_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(123.456)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a decimal value at zero from below.
///
/// Taxable income and per-slab amounts never go negative; any negative
/// intermediate collapses to zero.
///
/// # Arguments
///
/// * `value` - The decimal value to clamp
///
/// # Returns
///
/// `value` when non-negative, otherwise zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use navigator_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(100.00)), dec!(100.00));
/// assert_eq!(clamp_non_negative(dec!(-100.00)), dec!(0));
/// ```
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else {
        value
    }
}
