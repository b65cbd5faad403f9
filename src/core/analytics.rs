//! Provides cost normalisation, renewal filtering and spending aggregation
//! over subscription collections.
//!
//! Everything here is a pure calculation: callers pass the current time and
//! the rate table explicitly.
use crate::core::billing::{BillingCycle, effective_custom_days};
use crate::core::currency::{RateTable, convert};
use crate::core::subscription::{Category, Subscription, category_name};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_RENEWAL_WINDOW_DAYS: u32 = 7;
const DAYS_PER_YEAR: f64 = 365.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Normalises a cost to a yearly figure.
///
/// The cost is converted first when both currencies are given and differ. A
/// custom cycle without a day count, or an unknown cycle, leaves the
/// converted cost unscaled.
pub fn annual_cost(
    rates: &dyn RateTable,
    cost: f64,
    billing_cycle: BillingCycle,
    custom_billing_days: Option<u32>,
    from_currency: Option<&str>,
    to_currency: Option<&str>,
) -> f64 {
    let cost = match (from_currency, to_currency) {
        (Some(from), Some(to)) if from != to => convert(rates, cost, from, to),
        _ => cost,
    };

    match billing_cycle {
        BillingCycle::Monthly => cost * 12.0,
        BillingCycle::Quarterly => cost * 4.0,
        BillingCycle::Yearly => cost,
        BillingCycle::Custom => match effective_custom_days(billing_cycle, custom_billing_days) {
            Some(days) => cost * (DAYS_PER_YEAR / f64::from(days)),
            None => cost,
        },
        BillingCycle::Unknown => cost,
    }
}

/// Converts a subscription's cost into `target_currency`.
///
/// Records without an original currency are taken to already be in the target.
fn converted_cost(rates: &dyn RateTable, subscription: &Subscription, target_currency: &str) -> f64 {
    let original = subscription.original_currency.as_str();
    if original.is_empty() || original == target_currency {
        subscription.cost
    } else {
        convert(rates, subscription.cost, original, target_currency)
    }
}

/// Monthly share of one subscription's cost in `target_currency`.
///
/// Custom cycles without a day count and unknown cycles contribute nothing.
pub fn monthly_cost(rates: &dyn RateTable, subscription: &Subscription, target_currency: &str) -> f64 {
    let cost = converted_cost(rates, subscription, target_currency);

    match subscription.billing_cycle {
        BillingCycle::Monthly => cost,
        BillingCycle::Quarterly => cost / 3.0,
        BillingCycle::Yearly => cost / 12.0,
        BillingCycle::Custom => {
            match effective_custom_days(subscription.billing_cycle, subscription.custom_billing_days) {
                Some(days) => cost / (f64::from(days) / DAYS_PER_MONTH),
                None => {
                    debug!("Skipping {}: custom cycle without day count", subscription.name);
                    0.0
                }
            }
        }
        BillingCycle::Unknown => {
            debug!("Skipping {}: unknown billing cycle", subscription.name);
            0.0
        }
    }
}

/// Total monthly spending on active subscriptions in `target_currency`.
pub fn monthly_spend(rates: &dyn RateTable, subscriptions: &[Subscription], target_currency: &str) -> f64 {
    subscriptions
        .iter()
        .filter(|s| s.active)
        .map(|s| monthly_cost(rates, s, target_currency))
        .sum()
}

/// Total yearly spending on active subscriptions in `target_currency`.
pub fn annual_spend(rates: &dyn RateTable, subscriptions: &[Subscription], target_currency: &str) -> f64 {
    subscriptions
        .iter()
        .filter(|s| s.active)
        .map(|s| {
            annual_cost(
                rates,
                converted_cost(rates, s, target_currency),
                s.billing_cycle,
                s.custom_billing_days,
                None,
                None,
            )
        })
        .sum()
}

/// `now` plus `days`, saturating at the latest representable date.
fn days_after(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Active subscriptions renewing within `[now, now + window_days]`, in input order.
pub fn upcoming_renewals<'a>(
    subscriptions: &'a [Subscription],
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<&'a Subscription> {
    let until = days_after(now, i64::from(window_days));
    subscriptions
        .iter()
        .filter(|s| s.active && s.next_billing_date >= now && s.next_billing_date <= until)
        .collect()
}

/// Whole days between `now` and the next renewal, rounded up.
pub fn days_until_renewal(subscription: &Subscription, now: DateTime<Utc>) -> i64 {
    let diff = (subscription.next_billing_date - now).abs();
    let whole = diff.num_days();
    if diff > Duration::days(whole) { whole + 1 } else { whole }
}

/// True when the reminder for this subscription should be shown at `now`.
pub fn reminder_due(subscription: &Subscription, now: DateTime<Utc>) -> bool {
    let reminder = &subscription.reminder_settings;
    if !subscription.active || !reminder.enabled {
        return false;
    }
    // A lead time reaching past the earliest representable date means the
    // window is already open.
    let notify_from = subscription
        .next_billing_date
        .checked_sub_signed(Duration::days(i64::from(reminder.days_in_advance)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    now >= notify_from && now <= subscription.next_billing_date
}

/// Active subscriptions sorted by next billing date and bucketed by how soon
/// they renew.
#[derive(Debug, Default)]
pub struct RenewalTimeframes<'a> {
    pub this_week: Vec<&'a Subscription>,
    pub this_month: Vec<&'a Subscription>,
    pub later: Vec<&'a Subscription>,
}

pub fn renewal_timeframes(subscriptions: &[Subscription], now: DateTime<Utc>) -> RenewalTimeframes<'_> {
    let one_week = days_after(now, 7);
    let one_month = days_after(now, 30);

    let mut active: Vec<&Subscription> = subscriptions.iter().filter(|s| s.active).collect();
    active.sort_by_key(|s| s.next_billing_date);

    let mut frames = RenewalTimeframes::default();
    for sub in active {
        if sub.next_billing_date <= one_week {
            frames.this_week.push(sub);
        } else if sub.next_billing_date <= one_month {
            frames.this_month.push(sub);
        } else {
            frames.later.push(sub);
        }
    }
    frames
}

/// Groups subscriptions by category id, preserving input order within groups.
pub fn group_by_category(subscriptions: &[Subscription]) -> HashMap<String, Vec<&Subscription>> {
    let mut groups: HashMap<String, Vec<&Subscription>> = HashMap::new();
    for sub in subscriptions {
        groups.entry(sub.category.clone()).or_default().push(sub);
    }
    groups
}

/// Count of active subscriptions per category id, in first-seen order.
pub fn category_breakdown(subscriptions: &[Subscription]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for sub in subscriptions.iter().filter(|s| s.active) {
        match counts.iter_mut().find(|(id, _)| *id == sub.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((sub.category.clone(), 1)),
        }
    }
    counts
}

/// Category with the most active subscriptions; ties go to the first seen.
pub fn most_common_category(subscriptions: &[Subscription]) -> Option<String> {
    let mut best: Option<(String, usize)> = None;
    for (id, count) in category_breakdown(subscriptions) {
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((id, count));
        }
    }
    best.map(|(id, _)| id)
}

#[derive(Debug)]
pub struct CategorySpend {
    pub category_id: String,
    pub name: String,
    pub count: usize,
    pub monthly: f64,
}

/// Aggregate figures for the home view, all in `currency`.
#[derive(Debug)]
pub struct SpendingSummary {
    pub currency: String,
    pub total_count: usize,
    pub active_count: usize,
    pub monthly_total: f64,
    pub annual_total: f64,
    pub categories: Vec<CategorySpend>,
    pub most_common_category: Option<String>,
}

pub fn spending_summary(
    rates: &dyn RateTable,
    subscriptions: &[Subscription],
    categories: &[Category],
    currency: &str,
) -> SpendingSummary {
    let breakdown = category_breakdown(subscriptions);
    let category_spend = breakdown
        .into_iter()
        .map(|(id, count)| {
            let monthly = subscriptions
                .iter()
                .filter(|s| s.active && s.category == id)
                .map(|s| monthly_cost(rates, s, currency))
                .sum();
            CategorySpend {
                name: category_name(categories, &id).to_string(),
                category_id: id,
                count,
                monthly,
            }
        })
        .collect();

    SpendingSummary {
        currency: currency.to_string(),
        total_count: subscriptions.len(),
        active_count: subscriptions.iter().filter(|s| s.active).count(),
        monthly_total: monthly_spend(rates, subscriptions, currency),
        annual_total: annual_spend(rates, subscriptions, currency),
        categories: category_spend,
        most_common_category: most_common_category(subscriptions)
            .map(|id| category_name(categories, &id).to_string()),
    }
}
