//! Display formatting for amounts and dates.

use crate::core::currency::{Conversion, RateTable, convert_detailed};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;

/// Currencies whose fractional units are not customarily shown.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "INR"];

pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "CAD" => "C$",
        "AUD" => "A$",
        "INR" => "₹",
        _ => "$",
    }
}

pub fn decimal_places(code: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.contains(&code) {
        0
    } else {
        2
    }
}

/// Renders `amount` as `{symbol}{fixed}` with no grouping separators.
///
/// Rounding is half away from zero on the shortest decimal form of the
/// amount, so `9.999` renders as `10.00` and `2.5` JPY as `3`.
pub fn format_currency(amount: f64, code: &str) -> String {
    let dp = decimal_places(code);
    let symbol = currency_symbol(code);

    match Decimal::from_f64(amount) {
        Some(value) => {
            let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            // Avoid rendering "-0.00" for tiny negatives.
            let rounded = if rounded.is_zero() {
                Decimal::ZERO
            } else {
                rounded
            };
            format!("{symbol}{:.*}", dp as usize, rounded)
        }
        None => format!("{symbol}{amount:.*}", dp as usize),
    }
}

/// Formats an amount in the display currency, converting it first when it is
/// denominated in another currency.
///
/// When no rate is known for the pair the amount stays in its original
/// currency and is marked as unconverted.
pub fn format_with_conversion(
    rates: &dyn RateTable,
    amount: f64,
    display_currency: &str,
    original_currency: Option<&str>,
) -> String {
    let Some(original) = original_currency else {
        return format_currency(amount, display_currency);
    };
    match convert_detailed(rates, amount, original, display_currency) {
        Conversion::Unsupported(amount) => {
            format!("{} {UNCONVERTED_MARK}", format_amount_with_code(amount, original))
        }
        conversion => format_currency(conversion.amount(), display_currency),
    }
}

/// Suffix shown next to amounts that could not be converted.
pub const UNCONVERTED_MARK: &str = "(unconverted)";

/// Formats an amount in its own currency, naming the code when the currency
/// has no symbol of its own.
pub fn format_amount_with_code(amount: f64, code: &str) -> String {
    let formatted = format_currency(amount, code);
    match currency_symbol(code) {
        "$" if code != "USD" => format!("{formatted} {code}"),
        _ => formatted,
    }
}

/// Short human date, e.g. `Jan 31, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
