//! Local payroll calculations.
//!
//! Pure functions that mirror the rate service's formulas so values can be
//! previewed and validated without a network round trip.

mod currency;
mod monthly_equivalent;
mod wage_validation;

pub use currency::{format_currency, CurrencyFormat};
pub use monthly_equivalent::{
    preview_monthly_equivalent, preview_regular_monthly, preview_request, round_money,
    try_preview_monthly_equivalent, DEFAULT_OVERTIME_MULTIPLIER, MONEY_DECIMAL_PLACES,
};
pub use wage_validation::{
    validate_wage, validate_wage_amount, WageBounds, WageValidation, MAXIMUM_HOURLY_WAGE,
    MINIMUM_HOURLY_WAGE,
};
