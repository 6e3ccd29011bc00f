//! Local draft commands: `recipebook drafts ...`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use std::path::Path;
use std::sync::Arc;

use recipebook::draft::{DraftRecord, DraftStore, LocalStorage};
use recipebook::ui::Notice;
use recipebook::ui::icons::{DRAFT, INGREDIENT, STEP};
use recipebook::wizard::RecipeWizard;
use recipebook_common::DraftIdentity;

use super::super::{Cli, DraftsCommands};
use super::recipe::print_destination;
use super::wizard::WizardScreen;
use super::{load_config, require_session};

pub async fn cmd_drafts(
    project_dir: &Path,
    cli: &Cli,
    command: Option<DraftsCommands>,
) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let store = DraftStore::new(LocalStorage::new(config.storage_file()));

    match command {
        None | Some(DraftsCommands::List) => {
            let drafts = store.list().context("Failed to read drafts")?;
            if drafts.is_empty() {
                println!("No drafts saved.");
                return Ok(());
            }
            println!();
            for record in &drafts {
                print_summary(record);
            }
            println!();
        }
        Some(DraftsCommands::Show { identity }) => {
            let record = find(&store, &identity)?;
            print_summary(&record);
            let draft = &record.snapshot;
            if !draft.story.is_empty() {
                println!("{}", textwrap::indent(&textwrap::fill(&draft.story, 70), "    "));
            }
            println!("    servings: {}", draft.servings);
            if let Some(image) = &draft.image {
                println!("    image: {}", image);
            }
            for line in &draft.ingredients {
                println!("    {}{} {}", INGREDIENT, line.quantity, line.name);
            }
            for (i, step) in draft.steps.iter().enumerate() {
                println!("    {}{}. {}", STEP, i + 1, step.instruction);
            }
            println!();
        }
        Some(DraftsCommands::Resume { identity }) => {
            let record = find(&store, &identity)?;
            let session = require_session(&config).await?;
            let client = session.client();
            let wizard = RecipeWizard::resume(record, Arc::new(client.clone()), store);
            let destination = WizardScreen::new(&config, client, wizard).run().await?;
            print_destination(destination);
        }
        Some(DraftsCommands::Delete { identity, force }) => {
            let key: DraftIdentity = parse_identity(&identity);
            if !force {
                let confirm = Confirm::new()
                    .with_prompt(format!("Delete draft {}?", key))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirm {
                    println!("Delete cancelled");
                    return Ok(());
                }
            }
            let removed = store
                .remove(&key)
                .with_context(|| format!("Failed to delete draft {}", key))?;
            Notice::success(format!("Deleted draft {}", display_name(&removed))).print();
        }
    }

    Ok(())
}

fn parse_identity(raw: &str) -> DraftIdentity {
    match raw.parse() {
        Ok(identity) => identity,
        Err(never) => match never {},
    }
}

fn find(store: &DraftStore, raw: &str) -> Result<DraftRecord> {
    let identity = parse_identity(raw);
    store
        .get(&identity)
        .context("Failed to read drafts")?
        .with_context(|| format!("No draft found for {}", identity))
}

fn display_name(record: &DraftRecord) -> &str {
    if record.snapshot.name.trim().is_empty() {
        "Untitled recipe"
    } else {
        &record.snapshot.name
    }
}

fn print_summary(record: &DraftRecord) {
    let kind = match record.identity {
        DraftIdentity::Recipe(_) => "edit",
        DraftIdentity::Temp(_) => "new",
    };
    println!(
        "{}{}  {}  {}  {}",
        DRAFT,
        style(display_name(record)).bold(),
        style(&record.identity).cyan(),
        style(kind).dim(),
        style(record.saved_at.format("%Y-%m-%d %H:%M")).dim()
    );
}
