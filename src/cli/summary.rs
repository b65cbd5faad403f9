use super::ui;
use crate::app::AppState;
use crate::core::analytics::{SpendingSummary, spending_summary};
use crate::core::format::format_currency;
use comfy_table::Cell;

impl SpendingSummary {
    pub fn display_as_table(&self) -> String {
        let currency = &self.currency;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell("Subscriptions"),
            ui::header_cell(&format!("Monthly ({currency})")),
            ui::header_cell("Share (%)"),
        ]);

        for category in &self.categories {
            let share = if self.monthly_total > 0.0 {
                Some(category.monthly / self.monthly_total * 100.0)
            } else {
                None
            };
            table.add_row(vec![
                Cell::new(&category.name),
                ui::amount_cell(category.count.to_string()),
                ui::amount_cell(format_currency(category.monthly, currency)),
                ui::format_optional_cell(share, |s| format!("{s:.1}%")),
            ]);
        }

        let mut output = format!(
            "{}\n\nActive subscriptions: {} of {}\n",
            ui::style_text("Spending summary", ui::StyleType::Title),
            self.active_count,
            self.total_count
        );
        if let Some(name) = &self.most_common_category {
            output.push_str(&format!("Most common category: {name}\n"));
        }
        if !self.categories.is_empty() {
            output.push('\n');
            output.push_str(&table.to_string());
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{} ({}): {}\n{} ({}): {}",
            ui::style_text("Monthly spend", ui::StyleType::TotalLabel),
            currency,
            ui::style_text(
                &format_currency(self.monthly_total, currency),
                ui::StyleType::TotalValue
            ),
            ui::style_text("Annual spend", ui::StyleType::TotalLabel),
            currency,
            ui::style_text(
                &format_currency(self.annual_total, currency),
                ui::StyleType::TotalValue
            ),
        ));

        output
    }
}

pub fn summary(state: &AppState) -> String {
    spending_summary(
        state.rates(),
        state.subscriptions(),
        state.categories(),
        state.display_currency(),
    )
    .display_as_table()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::billing::BillingCycle;
    use crate::core::currency::StaticRates;
    use crate::core::subscription::SubscriptionDraft;
    use crate::store::{MemoryStore, Repository};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_in_display_currency() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let mut state = AppState::load(
            Repository::new(Arc::new(MemoryStore::new())),
            Arc::new(StaticRates),
            "USD",
        )
        .await
        .unwrap();

        let mut music = SubscriptionDraft::new("Music", "10", BillingCycle::Monthly, now);
        music.category = "2".to_string();
        state.add_subscription(music, now).await.unwrap();
        let mut news = SubscriptionDraft::new("News", "120", BillingCycle::Yearly, now);
        news.category = "3".to_string();
        state.add_subscription(news, now).await.unwrap();

        let out = summary(&state);
        assert!(out.contains("Active subscriptions: 2 of 2"));
        assert!(out.contains("$20.00"));
        assert!(out.contains("$240.00"));
        assert!(out.contains("Music"));

        state.set_currency("JPY").await.unwrap();
        let out = summary(&state);
        assert!(out.contains("¥2998"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = SpendingSummary {
            currency: "EUR".to_string(),
            total_count: 0,
            active_count: 0,
            monthly_total: 0.0,
            annual_total: 0.0,
            categories: Vec::new(),
            most_common_category: None,
        };
        let out = summary.display_as_table();
        assert!(out.contains("Active subscriptions: 0 of 0"));
        assert!(out.contains("€0.00"));
    }
}
