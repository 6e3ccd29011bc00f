//! Recipe commands: `recipebook recipe ...`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use std::path::Path;
use std::sync::Arc;

use recipebook::draft::{DraftStore, LocalStorage};
use recipebook::ui::icons::{IMAGE, INGREDIENT, RECIPE, STEP};
use recipebook::ui::{Notice, with_spinner};
use recipebook::wizard::{Destination, RecipeWizard, WizardMode};

use super::super::{Cli, RecipeCommands};
use super::wizard::WizardScreen;
use super::{load_config, require_session};

pub async fn cmd_recipe(project_dir: &Path, cli: &Cli, command: RecipeCommands) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let session = require_session(&config).await?;
    let client = session.client();

    match command {
        RecipeCommands::New => {
            let drafts = DraftStore::new(LocalStorage::new(config.storage_file()));
            let wizard = RecipeWizard::new(WizardMode::create(), Arc::new(client.clone()), drafts);
            let destination = WizardScreen::new(&config, client, wizard).run().await?;
            print_destination(destination);
        }
        RecipeCommands::Edit { id } => {
            let recipe = with_spinner("Loading recipe...", client.get_recipe(&id))
                .await
                .with_context(|| format!("Failed to load recipe {}", id))?;
            let drafts = DraftStore::new(LocalStorage::new(config.storage_file()));
            let mut wizard =
                RecipeWizard::new(WizardMode::edit(&recipe.id), Arc::new(client.clone()), drafts);
            wizard.hydrate(&recipe);
            let destination = WizardScreen::new(&config, client, wizard).run().await?;
            print_destination(destination);
        }
        RecipeCommands::List => {
            let recipes = with_spinner("Loading recipes...", client.list_recipes())
                .await
                .context("Failed to load recipes")?;
            if recipes.is_empty() {
                println!("No recipes yet. Run 'recipebook recipe new' to write one.");
                return Ok(());
            }
            println!();
            for recipe in &recipes {
                let title = recipe.title.as_deref().unwrap_or("Untitled");
                let created = recipe
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!(
                    "{}{}  {}  {}",
                    RECIPE,
                    style(title).bold(),
                    style(&recipe.id).dim(),
                    style(created).dim()
                );
            }
            println!();
        }
        RecipeCommands::Show { id } => {
            let recipe = with_spinner("Loading recipe...", client.get_recipe(&id))
                .await
                .with_context(|| format!("Failed to load recipe {}", id))?;

            println!();
            println!(
                "{}{}",
                RECIPE,
                style(recipe.title.as_deref().unwrap_or("Untitled")).bold()
            );
            if let Some(description) = &recipe.description {
                println!("{}", textwrap::fill(description, 72));
            }
            if let Some(servings) = recipe.servings {
                println!("Serves {}", servings);
            }
            if let Some(image) = &recipe.image_url {
                println!("{}{}", IMAGE, image);
            }
            println!();
            println!("{}", style("Ingredients").underlined());
            for ing in &recipe.ingredients {
                let brand = ing
                    .brand
                    .as_deref()
                    .filter(|b| *b != recipebook_common::recipe::GENERIC_BRAND)
                    .map(|b| format!(" ({})", b))
                    .unwrap_or_default();
                println!("  {}{} {}{}", INGREDIENT, ing.quantity, ing.name, brand);
            }
            println!();
            println!("{}", style("Steps").underlined());
            for (i, step) in recipe.steps.iter().enumerate() {
                let number = step.step_number.map(|n| n as usize).unwrap_or(i + 1);
                println!(
                    "  {}{}. {}",
                    STEP,
                    number,
                    step.description.as_deref().unwrap_or_default()
                );
            }
            println!();
        }
        RecipeCommands::Delete { id, force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt(format!("Delete recipe {}? This cannot be undone.", id))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirm {
                    println!("Delete cancelled");
                    return Ok(());
                }
            }
            let ack = with_spinner("Deleting recipe...", client.delete_recipe(&id))
                .await
                .with_context(|| format!("Failed to delete recipe {}", id))?;
            Notice::success(
                ack.message
                    .unwrap_or_else(|| "Recipe deleted successfully".to_string()),
            )
            .print();
        }
    }

    Ok(())
}

pub(crate) fn print_destination(destination: Destination) {
    match destination {
        Destination::RecipeList => {
            println!("Run 'recipebook recipe list' to see your recipes.")
        }
        Destination::Dashboard => println!("Left the recipe editor."),
    }
}
