use super::{subscriptions::render_table, ui};
use crate::app::AppState;
use crate::core::analytics::{reminder_due, renewal_timeframes, upcoming_renewals};
use crate::core::format::format_date;
use crate::core::subscription::Subscription;
use chrono::{DateTime, Utc};

pub fn upcoming(state: &AppState, window_days: u32, now: DateTime<Utc>) -> String {
    let due = upcoming_renewals(state.subscriptions(), window_days, now);
    if due.is_empty() {
        return format!("No renewals in the next {window_days} days.");
    }
    format!(
        "{}\n\n{}",
        ui::style_text(
            &format!("Renewing in the next {window_days} days"),
            ui::StyleType::Title
        ),
        render_table(state, &due, now)
    )
}

pub fn reminders(state: &AppState, now: DateTime<Utc>) -> String {
    let frames = renewal_timeframes(state.subscriptions(), now);
    let sections: [(&str, &Vec<&Subscription>); 3] = [
        ("This week", &frames.this_week),
        ("This month", &frames.this_month),
        ("Later", &frames.later),
    ];

    let mut parts = Vec::new();
    for (title, subs) in sections {
        if subs.is_empty() {
            continue;
        }
        parts.push(format!(
            "{} {}\n{}",
            ui::style_text(title, ui::StyleType::Title),
            ui::style_text(&format!("({})", subs.len()), ui::StyleType::Subtle),
            render_table(state, subs, now)
        ));
    }

    if parts.is_empty() {
        return "No active subscriptions.".to_string();
    }

    let due: Vec<String> = state
        .subscriptions()
        .iter()
        .filter(|s| reminder_due(s, now))
        .map(|s| format!("  {} renews on {}", s.name, format_date(&s.next_billing_date)))
        .collect();
    if !due.is_empty() {
        parts.push(format!(
            "{}\n{}",
            ui::style_text("Reminders due", ui::StyleType::Warning),
            due.join("\n")
        ));
    }

    parts.join(&format!("\n{}\n", ui::separator()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::billing::BillingCycle;
    use crate::core::currency::StaticRates;
    use crate::core::subscription::SubscriptionDraft;
    use crate::store::{MemoryStore, Repository};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    async fn seeded() -> AppState {
        let mut state = AppState::load(
            Repository::new(Arc::new(MemoryStore::new())),
            Arc::new(StaticRates),
            "USD",
        )
        .await
        .unwrap();

        let mut weekly = SubscriptionDraft::new("Weekly box", "12", BillingCycle::Custom, now());
        weekly.custom_billing_days = Some("5".to_string());
        weekly.reminder_days = Some("7".to_string());
        state.add_subscription(weekly, now()).await.unwrap();

        let monthly = SubscriptionDraft::new("Streaming", "9", BillingCycle::Monthly, now());
        state.add_subscription(monthly, now()).await.unwrap();

        let yearly = SubscriptionDraft::new(
            "Domain",
            "20",
            BillingCycle::Yearly,
            now() - Duration::days(400),
        );
        state.add_subscription(yearly, now()).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_upcoming_uses_window() {
        let state = seeded().await;
        let out = upcoming(&state, 7, now());
        assert!(out.contains("Weekly box"));
        assert!(!out.contains("Streaming"));

        assert_eq!(upcoming(&state, 1, now()), "No renewals in the next 1 days.");
    }

    #[tokio::test]
    async fn test_reminders_sections() {
        let state = seeded().await;
        let out = reminders(&state, now());
        assert!(out.contains("This week"));
        assert!(out.contains("Later"));
        assert!(out.contains("Weekly box renews on Apr 6, 2024"));
    }
}
