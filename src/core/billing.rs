//! Billing cycles and renewal date arithmetic.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Yearly,
    Custom,
    /// A stored value this version does not recognise.
    Unknown,
}

impl From<&str> for BillingCycle {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "monthly" => BillingCycle::Monthly,
            "quarterly" => BillingCycle::Quarterly,
            "yearly" | "annual" => BillingCycle::Yearly,
            "custom" => BillingCycle::Custom,
            _ => BillingCycle::Unknown,
        }
    }
}

impl From<String> for BillingCycle {
    fn from(s: String) -> Self {
        BillingCycle::from(s.as_str())
    }
}

impl From<BillingCycle> for String {
    fn from(cycle: BillingCycle) -> Self {
        cycle.to_string()
    }
}

impl Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BillingCycle::Monthly => "monthly",
                BillingCycle::Quarterly => "quarterly",
                BillingCycle::Yearly => "yearly",
                BillingCycle::Custom => "custom",
                BillingCycle::Unknown => "unknown",
            }
        )
    }
}

impl FromStr for BillingCycle {
    type Err = anyhow::Error;

    /// Strict parse for user input; stored data goes through `From<&str>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BillingCycle::from(s) {
            BillingCycle::Unknown => Err(anyhow::anyhow!(
                "Invalid billing cycle: {s} (expected monthly, quarterly, yearly or custom)"
            )),
            cycle => Ok(cycle),
        }
    }
}

impl BillingCycle {
    /// Human label, with the day count for custom cycles.
    pub fn describe(&self, custom_billing_days: Option<u32>) -> String {
        match (self, custom_billing_days) {
            (BillingCycle::Custom, Some(days)) if days > 0 => format!("every {days} days"),
            _ => self.to_string(),
        }
    }
}

/// Returns the custom day count only when it is meaningful for the cycle.
pub(crate) fn effective_custom_days(cycle: BillingCycle, custom_billing_days: Option<u32>) -> Option<u32> {
    match cycle {
        BillingCycle::Custom => custom_billing_days.filter(|d| *d > 0),
        _ => None,
    }
}

/// Computes the next renewal date.
///
/// The base is the later of `start_date` and `now`, so the result is never in
/// the past relative to `now`. Month arithmetic clamps to the last day of the
/// target month: Jan 31 + 1 month is Feb 28 (or 29).
pub fn next_billing_date(
    start_date: DateTime<Utc>,
    billing_cycle: BillingCycle,
    custom_billing_days: Option<u32>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let base = start_date.max(now);

    let next = match billing_cycle {
        BillingCycle::Monthly => base.checked_add_months(Months::new(1)),
        BillingCycle::Quarterly => base.checked_add_months(Months::new(3)),
        BillingCycle::Yearly => base.checked_add_months(Months::new(12)),
        BillingCycle::Custom => match effective_custom_days(billing_cycle, custom_billing_days) {
            Some(days) => base.checked_add_signed(Duration::days(i64::from(days))),
            None => {
                debug!("Custom cycle without a day count, keeping base date");
                Some(base)
            }
        },
        BillingCycle::Unknown => {
            debug!("Unknown billing cycle, keeping base date");
            Some(base)
        }
    };

    // Only overflows near the end of chrono's representable range.
    next.unwrap_or(base)
}
