//! Currency rate lookup and conversion through a USD pivot.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Built-in rates, expressed as units of currency per 1 USD.
pub const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 149.91),
    ("CAD", 1.36),
    ("AUD", 1.52),
    ("INR", 83.49),
    ("CNY", 7.23),
];

/// Source of USD-relative exchange rates.
pub trait RateTable: Send + Sync {
    /// Units of `code` per 1 USD, or `None` when the code is unsupported.
    fn usd_rate(&self, code: &str) -> Option<f64>;

    /// All codes this table can convert, sorted.
    fn codes(&self) -> Vec<String>;
}

/// Fixed rates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRates;

impl RateTable for StaticRates {
    fn usd_rate(&self, code: &str) -> Option<f64> {
        DEFAULT_RATES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, rate)| *rate)
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = DEFAULT_RATES.iter().map(|(c, _)| c.to_string()).collect();
        codes.sort();
        codes
    }
}

/// Built-in rates overlaid with rates supplied by the user's configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredRates {
    rates: HashMap<String, f64>,
}

impl ConfiguredRates {
    pub fn new(overrides: &HashMap<String, f64>) -> Self {
        let mut rates: HashMap<String, f64> = DEFAULT_RATES
            .iter()
            .map(|(c, r)| (c.to_string(), *r))
            .collect();
        for (code, rate) in overrides {
            if rate.is_finite() && *rate > 0.0 {
                debug!("Using configured rate {code} = {rate}");
                rates.insert(code.to_uppercase(), *rate);
            } else {
                warn!("Ignoring invalid configured rate {code} = {rate}");
            }
        }
        Self { rates }
    }
}

impl RateTable for ConfiguredRates {
    fn usd_rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }
}

/// Outcome of a conversion, so callers can tell a no-op from an unsupported pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    Converted(f64),
    /// Source and target currency were the same.
    Unchanged(f64),
    /// One of the codes has no rate; the amount is returned as-is.
    Unsupported(f64),
}

impl Conversion {
    pub fn amount(&self) -> f64 {
        match self {
            Conversion::Converted(v) | Conversion::Unchanged(v) | Conversion::Unsupported(v) => *v,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Conversion::Unsupported(_))
    }
}

pub fn convert_detailed(rates: &dyn RateTable, amount: f64, from: &str, to: &str) -> Conversion {
    if from == to {
        return Conversion::Unchanged(amount);
    }

    match (rates.usd_rate(from), rates.usd_rate(to)) {
        (Some(from_rate), Some(to_rate)) if from_rate != 0.0 => {
            let converted = amount / from_rate * to_rate;
            debug!("Converted {amount} {from} -> {converted} {to}");
            Conversion::Converted(converted)
        }
        _ => {
            warn!("Unsupported currency: {from} or {to}");
            Conversion::Unsupported(amount)
        }
    }
}

/// Converts `amount` from one currency to another, falling back to the
/// unconverted amount when either code is unsupported.
pub fn convert(rates: &dyn RateTable, amount: f64, from: &str, to: &str) -> f64 {
    convert_detailed(rates, amount, from, to).amount()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_currency_is_unchanged() {
        for (code, _) in DEFAULT_RATES {
            assert_eq!(convert(&StaticRates, 42.5, code, code), 42.5);
        }
        assert_eq!(
            convert_detailed(&StaticRates, 7.0, "XXX", "XXX"),
            Conversion::Unchanged(7.0)
        );
    }

    #[test]
    fn test_unsupported_code_falls_back() {
        assert_eq!(convert(&StaticRates, 100.0, "XXX", "USD"), 100.0);
        assert_eq!(
            convert_detailed(&StaticRates, 100.0, "USD", "XXX"),
            Conversion::Unsupported(100.0)
        );
        assert!(!convert_detailed(&StaticRates, 1.0, "XXX", "EUR").is_supported());
    }

    #[test]
    fn test_usd_pivot() {
        let eur = convert(&StaticRates, 100.0, "USD", "EUR");
        assert!((eur - 92.0).abs() < 1e-9);

        let gbp = convert(&StaticRates, 92.0, "EUR", "GBP");
        assert!((gbp - 79.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let codes = StaticRates.codes();
        for a in &codes {
            for b in &codes {
                let there = convert(&StaticRates, 123.45, a, b);
                let back = convert(&StaticRates, there, b, a);
                assert!((back - 123.45).abs() < 1e-9, "{a} -> {b} -> {a}: {back}");
            }
        }
    }

    #[test]
    fn test_configured_rates_overlay_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("eur".to_string(), 0.5);
        overrides.insert("CHF".to_string(), 0.9);
        overrides.insert("BAD".to_string(), -1.0);
        let rates = ConfiguredRates::new(&overrides);

        assert_eq!(rates.usd_rate("EUR"), Some(0.5));
        assert_eq!(rates.usd_rate("CHF"), Some(0.9));
        assert_eq!(rates.usd_rate("JPY"), Some(149.91));
        assert_eq!(rates.usd_rate("BAD"), None);
        assert_eq!(convert(&rates, 10.0, "USD", "EUR"), 5.0);
    }
}
