//! Currency display formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Largest scale a [`Decimal`] can carry.
const MAX_FRACTION_DIGITS: u32 = 28;

/// How monetary amounts are rendered for display.
///
/// # Example
///
/// ```
/// use hourly_rates::calculation::CurrencyFormat;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let euro = CurrencyFormat {
///     symbol: "€".to_string(),
///     thousands_separator: ".".to_string(),
///     decimal_separator: ",".to_string(),
///     fraction_digits: 2,
/// };
/// assert_eq!(euro.format(Decimal::from_str("1234.5").unwrap()), "€1.234,50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount.
    pub symbol: String,
    /// Separator between groups of three integer digits.
    pub thousands_separator: String,
    /// Separator between integer and fraction digits.
    pub decimal_separator: String,
    /// Number of fraction digits shown.
    pub fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fraction_digits: 2,
        }
    }
}

impl CurrencyFormat {
    /// Renders `amount`, rounding half away from zero to `fraction_digits`.
    ///
    /// Negative amounts get a leading minus before the symbol. An amount that
    /// rounds to zero is shown without a sign.
    pub fn format(&self, amount: Decimal) -> String {
        let digits = self.fraction_digits.min(MAX_FRACTION_DIGITS);
        let rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);

        let mut magnitude = rounded.abs();
        magnitude.rescale(digits);
        let plain = magnitude.to_string();
        let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
        // Near the top of the range there is no room to rescale; pad instead.
        let mut fraction = fraction.to_string();
        while fraction.len() < digits as usize {
            fraction.push('0');
        }

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&group_thousands(integer, &self.thousands_separator));
        if !fraction.is_empty() {
            out.push_str(&self.decimal_separator);
            out.push_str(&fraction);
        }
        out
    }
}

fn group_thousands(integer: &str, separator: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `amount` with the default `$1,234.50` style.
///
/// # Examples
///
/// ```
/// use hourly_rates::calculation::format_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_currency(Decimal::from_str("3500").unwrap()), "$3,500.00");
/// assert_eq!(format_currency(Decimal::from_str("-20.585").unwrap()), "-$20.59");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::default().format(amount)
}
