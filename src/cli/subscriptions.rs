use super::{SubscriptionArgs, ui};
use crate::app::AppState;
use crate::core::analytics::{annual_cost, days_until_renewal, monthly_cost, reminder_due};
use crate::core::billing::BillingCycle;
use crate::core::currency::convert_detailed;
use crate::core::format::{
    UNCONVERTED_MARK, format_amount_with_code, format_currency, format_date, format_with_conversion,
};
use crate::core::subscription::{Subscription, SubscriptionDraft, category_name};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// Copies every provided argument onto the draft.
fn apply_args(state: &AppState, draft: &mut SubscriptionDraft, args: SubscriptionArgs) -> Result<()> {
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(cost) = args.cost {
        draft.cost = cost;
    }
    if let Some(currency) = args.currency {
        draft.original_currency = Some(currency);
    }
    if let Some(cycle) = args.cycle {
        draft.billing_cycle = cycle;
    }
    if let Some(days) = args.days {
        draft.custom_billing_days = Some(days);
    }
    if let Some(key) = args.category {
        let category = state
            .resolve_category(&key)
            .ok_or_else(|| anyhow!("Unknown category: {key}"))?;
        draft.category = category.id.clone();
    }
    if let Some(start) = args.start {
        draft.start_date = start
            .and_hms_opt(0, 0, 0)
            .context("Invalid start date")?
            .and_utc();
    }
    if let Some(description) = args.description {
        draft.description = Some(description);
    }
    if let Some(url) = args.url {
        draft.url = Some(url);
    }
    if let Some(notes) = args.notes {
        draft.notes = Some(notes);
    }
    if let Some(days) = args.reminder_days {
        draft.reminder_days = Some(days);
    }
    if let Some(enabled) = args.reminder {
        draft.reminder_enabled = enabled;
    }
    if let Some(auto_renew) = args.auto_renew {
        draft.auto_renew = auto_renew;
    }
    Ok(())
}

pub fn render_table(state: &AppState, subscriptions: &[&Subscription], now: DateTime<Utc>) -> String {
    let display = state.display_currency();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Category"),
        ui::header_cell("Cost"),
        ui::header_cell("Cycle"),
        ui::header_cell("Next billing"),
        ui::header_cell("Renews in"),
        ui::header_cell("Status"),
    ]);

    for sub in subscriptions {
        table.add_row(vec![
            Cell::new(sub.id.chars().take(8).collect::<String>()),
            Cell::new(&sub.name),
            Cell::new(category_name(state.categories(), &sub.category)),
            ui::amount_cell(format_with_conversion(
                state.rates(),
                sub.cost,
                display,
                Some(&sub.original_currency),
            )),
            Cell::new(sub.billing_cycle.describe(sub.custom_billing_days)),
            Cell::new(format_date(&sub.next_billing_date)),
            ui::days_cell(days_until_renewal(sub, now), 3),
            ui::status_cell(sub.active),
        ]);
    }
    table.to_string()
}

pub fn list(state: &AppState, category: Option<&str>, now: DateTime<Utc>) -> Result<String> {
    let category_id = match category {
        Some(key) => Some(
            state
                .resolve_category(key)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| key.to_string()),
        ),
        None => None,
    };
    let selected: Vec<&Subscription> = state
        .subscriptions()
        .iter()
        .filter(|s| category_id.as_ref().is_none_or(|id| s.category == *id))
        .collect();

    if selected.is_empty() {
        return Ok("No subscriptions found.".to_string());
    }

    let total: f64 = selected
        .iter()
        .filter(|s| s.active)
        .map(|s| monthly_cost(state.rates(), s, state.display_currency()))
        .sum();

    Ok(format!(
        "{}\n\n{} ({}): {}",
        render_table(state, &selected, now),
        ui::style_text("Monthly total", ui::StyleType::TotalLabel),
        state.display_currency(),
        ui::style_text(
            &format_currency(total, state.display_currency()),
            ui::StyleType::TotalValue
        )
    ))
}

pub async fn add(state: &mut AppState, args: SubscriptionArgs, now: DateTime<Utc>) -> Result<String> {
    let mut draft = SubscriptionDraft::new("", "", BillingCycle::Monthly, now);
    draft.original_currency = Some(state.display_currency().to_string());
    apply_args(state, &mut draft, args)?;

    let sub = state.add_subscription(draft, now).await?;
    Ok(format!(
        "Added {} ({}), next billing {}",
        ui::style_text(&sub.name, ui::StyleType::Title),
        sub.id,
        format_date(&sub.next_billing_date)
    ))
}

pub fn show(state: &AppState, id: &str, now: DateTime<Utc>) -> Result<String> {
    let id = state.resolve_subscription_id(id)?;
    let sub = state
        .subscription(&id)
        .ok_or_else(|| anyhow!("No subscription with id {id}"))?;
    Ok(render_details(state, sub, now))
}

pub fn render_details(state: &AppState, sub: &Subscription, now: DateTime<Utc>) -> String {
    let display = state.display_currency();
    let annual = annual_cost(
        state.rates(),
        sub.cost,
        sub.billing_cycle,
        sub.custom_billing_days,
        Some(&sub.original_currency),
        Some(display),
    );

    let mut table = ui::new_styled_table();
    let mut row = |label: &str, value: String| {
        table.add_row(vec![ui::header_cell(label), Cell::new(value)]);
    };
    row("Id", sub.id.clone());
    if let Some(description) = &sub.description {
        row("Description", description.clone());
    }
    row("Category", category_name(state.categories(), &sub.category).to_string());
    row(
        "Cost",
        format!(
            "{} {}",
            format_currency(sub.cost, &sub.original_currency),
            sub.billing_cycle.describe(sub.custom_billing_days)
        ),
    );
    let convertible =
        convert_detailed(state.rates(), sub.cost, &sub.original_currency, display).is_supported();
    row(
        &format!("Annual cost ({display})"),
        if convertible {
            format_currency(annual, display)
        } else {
            format!(
                "{} {UNCONVERTED_MARK}",
                format_amount_with_code(annual, &sub.original_currency)
            )
        },
    );
    row("Started", format_date(&sub.start_date));
    row(
        "Next billing",
        format!(
            "{} (in {} days)",
            format_date(&sub.next_billing_date),
            days_until_renewal(sub, now)
        ),
    );
    row(
        "Reminder",
        if sub.reminder_settings.enabled {
            format!("{} days before", sub.reminder_settings.days_in_advance)
        } else {
            "off".to_string()
        },
    );
    row("Auto-renew", if sub.auto_renew { "yes" } else { "no" }.to_string());
    row("Status", if sub.active { "active" } else { "paused" }.to_string());
    if let Some(url) = &sub.url {
        row("URL", url.clone());
    }
    if let Some(notes) = &sub.notes {
        row("Notes", notes.clone());
    }

    let mut output = format!("{}\n\n{table}", ui::style_text(&sub.name, ui::StyleType::Title));
    if reminder_due(sub, now) {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text("Reminder: renews soon", ui::StyleType::Warning)
        ));
    }
    output
}

pub async fn edit(
    state: &mut AppState,
    id: &str,
    changes: SubscriptionArgs,
    now: DateTime<Utc>,
) -> Result<String> {
    let id = state.resolve_subscription_id(id)?;
    let mut draft = state
        .subscription(&id)
        .map(Subscription::to_draft)
        .ok_or_else(|| anyhow!("No subscription with id {id}"))?;
    apply_args(state, &mut draft, changes)?;

    let updated = state
        .update_subscription(&id, draft, now)
        .await?
        .ok_or_else(|| anyhow!("No subscription with id {id}"))?;
    Ok(format!(
        "Updated {}, next billing {}",
        updated.name,
        format_date(&updated.next_billing_date)
    ))
}

pub async fn toggle(state: &mut AppState, id: &str) -> Result<String> {
    let id = state.resolve_subscription_id(id)?;
    let active = state.subscription(&id).is_some_and(|s| s.active);
    match state.set_active(&id, !active).await {
        Some(true) => Ok(format!("Resumed {id}")),
        Some(false) => Ok(format!("Paused {id}")),
        None => Err(anyhow!("No subscription with id {id}")),
    }
}

pub async fn delete(state: &mut AppState, id: &str) -> Result<String> {
    let id = state.resolve_subscription_id(id)?;
    if state.delete_subscription(&id).await {
        Ok(format!("Deleted {id}"))
    } else {
        Err(anyhow!("No subscription with id {id}"))
    }
}
