//! Monthly equivalent pay preview.
//!
//! This module mirrors the server's payroll formula so a rate can be
//! previewed while it is being edited, without a round trip.
//!
//! ## Formula
//!
//! - `regular_pay = hourly_rate × standard_hours`
//! - `overtime_pay = hourly_rate × overtime_hours × overtime_multiplier`
//! - `total = regular_pay + overtime_pay`
//! - `effective_rate = total / (standard_hours + overtime_hours)`, or 0 with no hours
//!
//! Intermediate values keep full precision; monetary outputs are rounded to
//! cents, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{RateError, RateResult};
use crate::models::{CalculationRequest, MonthlyEquivalentCalculation};

/// Overtime multiplier used when none is given (time and a half).
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Number of decimal places monetary outputs are rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use hourly_rates::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("20.585").unwrap()), Decimal::from_str("20.59").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-1.005").unwrap()), Decimal::from_str("-1.01").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Previews the monthly equivalent pay for an hourly rate.
///
/// This is a pure function: the result depends only on the four inputs.
/// It never panics. Values beyond the range of [`Decimal`] saturate at
/// `Decimal::MAX` (or `Decimal::MIN`); use [`try_preview_monthly_equivalent`]
/// to detect that case.
///
/// # Arguments
///
/// * `hourly_rate` - The base hourly wage
/// * `standard_hours` - Standard (non-overtime) hours in the month
/// * `overtime_hours` - Overtime hours in the month
/// * `overtime_multiplier` - Factor applied to the hourly wage for overtime
///
/// # Examples
///
/// ```
/// use hourly_rates::calculation::preview_monthly_equivalent;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = preview_monthly_equivalent(
///     Decimal::from(20),
///     Decimal::from(160),
///     Decimal::from(10),
///     Decimal::from_str("1.5").unwrap(),
/// );
///
/// assert_eq!(result.regular_pay, Decimal::from_str("3200.00").unwrap());
/// assert_eq!(result.overtime_pay, Decimal::from_str("300.00").unwrap());
/// assert_eq!(result.total_monthly_equivalent, Decimal::from_str("3500.00").unwrap());
/// assert_eq!(result.total_hours, Decimal::from(170));
/// assert_eq!(result.effective_hourly_rate, Decimal::from_str("20.59").unwrap());
/// ```
pub fn preview_monthly_equivalent(
    hourly_rate: Decimal,
    standard_hours: Decimal,
    overtime_hours: Decimal,
    overtime_multiplier: Decimal,
) -> MonthlyEquivalentCalculation {
    let regular_pay = hourly_rate.saturating_mul(standard_hours);
    let overtime_pay = hourly_rate
        .saturating_mul(overtime_hours)
        .saturating_mul(overtime_multiplier);
    let total = regular_pay.saturating_add(overtime_pay);
    let total_hours = standard_hours.saturating_add(overtime_hours);

    // Zero or negative hours would divide by zero or invert the sign.
    let effective_hourly_rate = if total_hours > Decimal::ZERO {
        total.checked_div(total_hours).unwrap_or(if total.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    } else {
        Decimal::ZERO
    };

    assemble(regular_pay, overtime_pay, total, total_hours, effective_hourly_rate)
}

/// Like [`preview_monthly_equivalent`], but reports overflow instead of
/// saturating.
///
/// # Errors
///
/// Returns [`RateError::Validation`] on `hourly_rate` when any intermediate
/// value exceeds the range of [`Decimal`].
///
/// # Examples
///
/// ```
/// use hourly_rates::calculation::try_preview_monthly_equivalent;
/// use rust_decimal::Decimal;
///
/// let huge = Decimal::from(10u64.pow(15));
/// assert!(try_preview_monthly_equivalent(huge, huge, Decimal::ZERO, Decimal::ONE).is_err());
/// ```
pub fn try_preview_monthly_equivalent(
    hourly_rate: Decimal,
    standard_hours: Decimal,
    overtime_hours: Decimal,
    overtime_multiplier: Decimal,
) -> RateResult<MonthlyEquivalentCalculation> {
    let overflow = || RateError::Validation {
        field: "hourly_rate".to_string(),
        reason: "Monthly equivalent is too large to calculate".to_string(),
    };

    let regular_pay = hourly_rate.checked_mul(standard_hours).ok_or_else(overflow)?;
    let overtime_pay = hourly_rate
        .checked_mul(overtime_hours)
        .and_then(|pay| pay.checked_mul(overtime_multiplier))
        .ok_or_else(overflow)?;
    let total = regular_pay.checked_add(overtime_pay).ok_or_else(overflow)?;
    let total_hours = standard_hours.checked_add(overtime_hours).ok_or_else(overflow)?;

    let effective_hourly_rate = if total_hours > Decimal::ZERO {
        total.checked_div(total_hours).ok_or_else(overflow)?
    } else {
        Decimal::ZERO
    };

    Ok(assemble(regular_pay, overtime_pay, total, total_hours, effective_hourly_rate))
}

fn assemble(
    regular_pay: Decimal,
    overtime_pay: Decimal,
    total: Decimal,
    total_hours: Decimal,
    effective_hourly_rate: Decimal,
) -> MonthlyEquivalentCalculation {
    MonthlyEquivalentCalculation {
        regular_pay: round_money(regular_pay),
        overtime_pay: round_money(overtime_pay),
        total_monthly_equivalent: round_money(total),
        total_hours,
        effective_hourly_rate: round_money(effective_hourly_rate),
    }
}

/// Previews monthly pay with no overtime.
pub fn preview_regular_monthly(
    hourly_rate: Decimal,
    standard_hours: Decimal,
) -> MonthlyEquivalentCalculation {
    preview_monthly_equivalent(
        hourly_rate,
        standard_hours,
        Decimal::ZERO,
        DEFAULT_OVERTIME_MULTIPLIER,
    )
}

/// Previews the calculation described by a [`CalculationRequest`].
///
/// Requests usually come from caller data, so overflow is reported rather
/// than saturated.
pub fn preview_request(request: &CalculationRequest) -> RateResult<MonthlyEquivalentCalculation> {
    try_preview_monthly_equivalent(
        request.hourly_rate,
        request.standard_hours,
        request.overtime_hours,
        request.overtime_multiplier,
    )
}
