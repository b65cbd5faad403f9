use super::{CategoryCommand, ui};
use crate::app::AppState;
use crate::core::analytics::group_by_category;
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;

pub async fn run(state: &mut AppState, command: CategoryCommand) -> Result<String> {
    match command {
        CategoryCommand::List => Ok(list(state)),
        CategoryCommand::Add { name, color } => {
            let category = state.add_category(&name, &color).await?;
            Ok(format!("Added category {} ({})", category.name, category.id))
        }
        CategoryCommand::Edit {
            category,
            name,
            color,
        } => {
            if name.is_none() && color.is_none() {
                bail!("Nothing to change; pass --name or --color");
            }
            let mut updated = state
                .resolve_category(&category)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown category: {category}"))?;
            if let Some(name) = name {
                let name = name.trim();
                if name.is_empty() {
                    bail!("Category name is required");
                }
                if state
                    .resolve_category(name)
                    .is_some_and(|other| other.id != updated.id)
                {
                    bail!("Category {name} already exists");
                }
                updated.name = name.to_string();
            }
            if let Some(color) = color {
                updated.color = color.trim().to_string();
            }
            let message = format!("Updated category {}", updated.name);
            state.update_category(updated).await;
            Ok(message)
        }
        CategoryCommand::Delete { category } => {
            let existing = state
                .resolve_category(&category)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown category: {category}"))?;
            state.delete_category(&existing.id).await;
            Ok(format!("Deleted category {}", existing.name))
        }
    }
}

fn list(state: &AppState) -> String {
    let groups = group_by_category(state.subscriptions());

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Color"),
        ui::header_cell("Subscriptions"),
    ]);
    for category in state.categories() {
        let count = groups.get(&category.id).map_or(0, Vec::len);
        table.add_row(vec![
            Cell::new(&category.id),
            Cell::new(&category.name),
            Cell::new(&category.color),
            ui::amount_cell(count.to_string()),
        ]);
    }
    table.to_string()
}
