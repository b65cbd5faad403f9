use super::{SettingsCommand, ui};
use crate::app::AppState;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(state: &mut AppState, command: SettingsCommand) -> Result<String> {
    match command {
        SettingsCommand::Show => Ok(show(state)),
        SettingsCommand::Theme { theme } => {
            state.set_theme(theme).await;
            Ok(format!("Theme set to {theme}"))
        }
        SettingsCommand::Currency { code } => {
            state.set_currency(&code).await?;
            Ok(format!("Display currency set to {}", state.display_currency()))
        }
    }
}

fn show(state: &AppState) -> String {
    let settings = state.settings();
    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::header_cell("Theme"),
        Cell::new(settings.theme.to_string()),
    ]);
    table.add_row(vec![
        ui::header_cell("Currency"),
        Cell::new(&settings.currency),
    ]);
    table.add_row(vec![
        ui::header_cell("Known currencies"),
        Cell::new(state.rates().codes().join(", ")),
    ]);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::StaticRates;
    use crate::core::settings::Theme;
    use crate::store::{MemoryStore, Repository};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_settings_persist_across_loads() {
        let store = Arc::new(MemoryStore::new());
        let mut state = AppState::load(Repository::new(store.clone()), Arc::new(StaticRates), "USD")
            .await
            .unwrap();

        run(&mut state, SettingsCommand::Theme { theme: Theme::Dark })
            .await
            .unwrap();
        let msg = run(
            &mut state,
            SettingsCommand::Currency {
                code: "eur".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(msg, "Display currency set to EUR");

        let reloaded = AppState::load(Repository::new(store), Arc::new(StaticRates), "USD")
            .await
            .unwrap();
        assert_eq!(reloaded.settings().theme, Theme::Dark);
        assert_eq!(reloaded.display_currency(), "EUR");

        let shown = run(&mut state, SettingsCommand::Show).await.unwrap();
        assert!(shown.contains("dark"));
        assert!(shown.contains("JPY"));
    }

    #[tokio::test]
    async fn test_blank_currency_is_rejected() {
        let mut state = AppState::load(
            Repository::new(Arc::new(MemoryStore::new())),
            Arc::new(StaticRates),
            "USD",
        )
        .await
        .unwrap();
        let result = run(
            &mut state,
            SettingsCommand::Currency {
                code: "  ".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(state.display_currency(), "USD");
    }
}
