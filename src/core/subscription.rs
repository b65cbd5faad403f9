//! Subscription and category records as they are stored.

use crate::core::billing::{BillingCycle, next_billing_date};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_REMINDER_DAYS: u32 = 3;
/// Longest reminder lead time a draft may ask for.
pub const MAX_REMINDER_DAYS: u32 = 365;
/// Display name used when a subscription points at a category that no longer exists.
pub const FALLBACK_CATEGORY_NAME: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    pub days_in_advance: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days_in_advance: DEFAULT_REMINDER_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cost: f64,
    pub original_currency: String,
    pub billing_cycle: BillingCycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_billing_days: Option<u32>,
    pub category: String,
    pub start_date: DateTime<Utc>,
    pub next_billing_date: DateTime<Utc>,
    #[serde(default)]
    pub reminder_settings: ReminderSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub active: bool,
    pub auto_renew: bool,
}

impl Subscription {
    /// Builds a new record with a fresh id and a computed next billing date.
    pub fn create(draft: SubscriptionDraft, now: DateTime<Utc>) -> Result<Self> {
        let id = Uuid::new_v4().to_string();
        Self::from_draft(id, draft, now)
    }

    /// Builds a record for an existing id, recomputing the next billing date.
    pub fn from_draft(id: String, draft: SubscriptionDraft, now: DateTime<Utc>) -> Result<Self> {
        let valid = draft.validate()?;
        let custom_billing_days = match valid.billing_cycle {
            BillingCycle::Custom => valid.custom_billing_days,
            _ => None,
        };
        let next_billing_date =
            next_billing_date(valid.start_date, valid.billing_cycle, custom_billing_days, now);

        Ok(Self {
            id,
            name: valid.name,
            description: valid.description,
            cost: valid.cost,
            original_currency: valid.original_currency,
            billing_cycle: valid.billing_cycle,
            custom_billing_days,
            category: valid.category,
            start_date: valid.start_date,
            next_billing_date,
            reminder_settings: ReminderSettings {
                enabled: valid.reminder_enabled,
                days_in_advance: valid.reminder_days,
            },
            url: valid.url,
            notes: valid.notes,
            logo_url: valid.logo_url,
            color: valid.color,
            active: valid.active,
            auto_renew: valid.auto_renew,
        })
    }

    /// Converts the record back into editable form data.
    pub fn to_draft(&self) -> SubscriptionDraft {
        SubscriptionDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            cost: self.cost.to_string(),
            original_currency: Some(self.original_currency.clone()),
            billing_cycle: self.billing_cycle,
            custom_billing_days: self.custom_billing_days.map(|d| d.to_string()),
            category: self.category.clone(),
            start_date: self.start_date,
            url: self.url.clone(),
            notes: self.notes.clone(),
            logo_url: self.logo_url.clone(),
            color: self.color.clone(),
            active: self.active,
            auto_renew: self.auto_renew,
            reminder_enabled: self.reminder_settings.enabled,
            reminder_days: Some(self.reminder_settings.days_in_advance.to_string()),
        }
    }
}

/// Unvalidated form input. Numeric fields are kept as text until validation.
#[derive(Debug, Clone)]
pub struct SubscriptionDraft {
    pub name: String,
    pub description: Option<String>,
    pub cost: String,
    pub original_currency: Option<String>,
    pub billing_cycle: BillingCycle,
    pub custom_billing_days: Option<String>,
    pub category: String,
    pub start_date: DateTime<Utc>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub logo_url: Option<String>,
    pub color: Option<String>,
    pub active: bool,
    pub auto_renew: bool,
    pub reminder_enabled: bool,
    pub reminder_days: Option<String>,
}

impl SubscriptionDraft {
    pub fn new(name: &str, cost: &str, billing_cycle: BillingCycle, start_date: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            cost: cost.to_string(),
            original_currency: None,
            billing_cycle,
            custom_billing_days: None,
            category: "6".to_string(),
            start_date,
            url: None,
            notes: None,
            logo_url: None,
            color: None,
            active: true,
            auto_renew: true,
            reminder_enabled: true,
            reminder_days: None,
        }
    }
}

#[derive(Debug)]
struct ValidDraft {
    name: String,
    description: Option<String>,
    cost: f64,
    original_currency: String,
    billing_cycle: BillingCycle,
    custom_billing_days: Option<u32>,
    category: String,
    start_date: DateTime<Utc>,
    url: Option<String>,
    notes: Option<String>,
    logo_url: Option<String>,
    color: Option<String>,
    active: bool,
    auto_renew: bool,
    reminder_enabled: bool,
    reminder_days: u32,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SubscriptionDraft {
    fn validate(self) -> Result<ValidDraft> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push("name: Name is required".to_string());
        }

        let cost_text = self.cost.trim();
        let cost = if cost_text.is_empty() {
            errors.push("cost: Cost is required".to_string());
            0.0
        } else {
            match cost_text.parse::<f64>() {
                Ok(c) if c.is_finite() && c >= 0.0 => c,
                _ => {
                    errors.push("cost: Cost must be a positive number".to_string());
                    0.0
                }
            }
        };

        if self.billing_cycle == BillingCycle::Unknown {
            errors.push("billing_cycle: Please choose a billing cycle".to_string());
        }

        let custom_billing_days = match self.billing_cycle {
            BillingCycle::Custom => match trimmed(&self.custom_billing_days).map(|d| d.parse::<u32>()) {
                Some(Ok(days)) if days > 0 => Some(days),
                _ => {
                    errors.push(
                        "custom_billing_days: Please enter a valid number of days".to_string(),
                    );
                    None
                }
            },
            _ => None,
        };

        let url = trimmed(&self.url);
        if let Some(url) = &url {
            if !url.starts_with("http") {
                errors.push(
                    "url: Please enter a valid URL starting with http:// or https://".to_string(),
                );
            }
        }

        let reminder_days = match trimmed(&self.reminder_days) {
            None => DEFAULT_REMINDER_DAYS,
            Some(days) => match days.parse::<u32>() {
                Ok(0) => DEFAULT_REMINDER_DAYS,
                Ok(d) if d <= MAX_REMINDER_DAYS => d,
                Ok(_) => {
                    errors.push(format!(
                        "reminder_days: Reminder days cannot exceed {MAX_REMINDER_DAYS}"
                    ));
                    DEFAULT_REMINDER_DAYS
                }
                Err(_) => {
                    errors.push("reminder_days: Please enter a valid number of days".to_string());
                    DEFAULT_REMINDER_DAYS
                }
            },
        };

        if !errors.is_empty() {
            bail!("Invalid subscription: {}", errors.join("; "));
        }

        let original_currency = trimmed(&self.original_currency)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(ValidDraft {
            name,
            description: trimmed(&self.description),
            cost,
            original_currency,
            billing_cycle: self.billing_cycle,
            custom_billing_days,
            category: self.category.trim().to_string(),
            start_date: self.start_date,
            url,
            notes: trimmed(&self.notes),
            logo_url: trimmed(&self.logo_url),
            color: trimmed(&self.color),
            active: self.active,
            auto_renew: self.auto_renew,
            reminder_enabled: self.reminder_enabled,
            reminder_days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            color: color.trim().to_string(),
        }
    }
}

pub fn default_categories() -> Vec<Category> {
    [
        ("1", "Streaming", "#e53935"),
        ("2", "Music", "#8e24aa"),
        ("3", "News", "#1e88e5"),
        ("4", "Gaming", "#43a047"),
        ("5", "Software", "#fb8c00"),
        ("6", "Other", "#546e7a"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// Name to show for a category id, degrading to "Other" for dangling references.
pub fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map_or(FALLBACK_CATEGORY_NAME, |c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_next_date() {
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let mut draft = SubscriptionDraft::new("  Netflix ", "15.49", BillingCycle::Monthly, start);
        draft.original_currency = Some("eur".to_string());
        draft.custom_billing_days = Some("12".to_string());

        let sub = Subscription::create(draft, now()).unwrap();
        assert!(Uuid::parse_str(&sub.id).is_ok());
        assert_eq!(sub.name, "Netflix");
        assert_eq!(sub.cost, 15.49);
        assert_eq!(sub.original_currency, "EUR");
        assert_eq!(sub.custom_billing_days, None);
        assert_eq!(
            sub.next_billing_date,
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert_eq!(sub.reminder_settings, ReminderSettings::default());
    }

    #[test]
    fn test_create_generates_distinct_ids() {
        let draft = SubscriptionDraft::new("A", "1", BillingCycle::Yearly, now());
        let a = Subscription::create(draft.clone(), now()).unwrap();
        let b = Subscription::create(draft, now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut draft = SubscriptionDraft::new(" ", "-3", BillingCycle::Custom, now());
        draft.url = Some("ftp://example.com".to_string());
        draft.reminder_days = Some("soon".to_string());

        let err = Subscription::create(draft, now()).unwrap_err().to_string();
        assert!(err.contains("Name is required"));
        assert!(err.contains("Cost must be a positive number"));
        assert!(err.contains("valid number of days"));
        assert!(err.contains("valid URL"));
        assert!(err.contains("reminder_days"));
    }

    #[test]
    fn test_validation_rejects_nan_and_missing_cost() {
        let draft = SubscriptionDraft::new("X", "NaN", BillingCycle::Monthly, now());
        assert!(Subscription::create(draft, now()).is_err());

        let draft = SubscriptionDraft::new("X", "", BillingCycle::Monthly, now());
        let err = Subscription::create(draft, now()).unwrap_err().to_string();
        assert!(err.contains("Cost is required"));
    }

    #[test]
    fn test_custom_cycle_keeps_days() {
        let mut draft = SubscriptionDraft::new("Gym", "30", BillingCycle::Custom, now());
        draft.custom_billing_days = Some("10".to_string());
        draft.reminder_days = Some("0".to_string());
        let sub = Subscription::create(draft, now()).unwrap();
        assert_eq!(sub.custom_billing_days, Some(10));
        assert_eq!(sub.reminder_settings.days_in_advance, DEFAULT_REMINDER_DAYS);
        assert_eq!(
            sub.next_billing_date,
            Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_reminder_days_are_bounded() {
        let mut draft = SubscriptionDraft::new("News", "4", BillingCycle::Monthly, now());
        draft.reminder_days = Some("4000000000".to_string());
        let err = Subscription::create(draft.clone(), now()).unwrap_err().to_string();
        assert!(err.contains("cannot exceed 365"), "{err}");

        draft.reminder_days = Some(MAX_REMINDER_DAYS.to_string());
        let sub = Subscription::create(draft, now()).unwrap();
        assert_eq!(sub.reminder_settings.days_in_advance, MAX_REMINDER_DAYS);
    }

    #[test]
    fn test_draft_round_trip_preserves_record() {
        let mut draft = SubscriptionDraft::new("Spotify", "9.99", BillingCycle::Quarterly, now());
        draft.url = Some("https://spotify.com".to_string());
        let sub = Subscription::create(draft, now()).unwrap();
        let again = Subscription::from_draft(sub.id.clone(), sub.to_draft(), now()).unwrap();
        assert_eq!(sub, again);
    }

    #[test]
    fn test_serialized_field_names() {
        let sub = Subscription::create(
            SubscriptionDraft::new("Music", "5", BillingCycle::Monthly, now()),
            now(),
        )
        .unwrap();
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["originalCurrency"], "USD");
        assert_eq!(json["billingCycle"], "monthly");
        assert_eq!(json["reminderSettings"]["daysInAdvance"], 3);
        assert!(json.get("customBillingDays").is_none());
        assert_eq!(json["nextBillingDate"], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn test_category_name_fallback() {
        let categories = default_categories();
        assert_eq!(category_name(&categories, "2"), "Music");
        assert_eq!(category_name(&categories, "gone"), FALLBACK_CATEGORY_NAME);
    }
}
