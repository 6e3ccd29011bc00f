//! Terminal front end for the recipe wizard.
//!
//! Each step is a menu; every action goes through the library's wizard
//! types and then prints whatever notices they posted.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;
use std::sync::Arc;

use recipebook::api::BackendClient;
use recipebook::autocomplete::{IngredientEntry, PanelSettings, SuggestionPanel};
use recipebook::config::RecipebookConfig;
use recipebook::draft::DraftUpdate;
use recipebook::errors::WizardError;
use recipebook::ui::icons::{IMAGE, INGREDIENT, RECIPE, STEP};
use recipebook::ui::{Notice, with_spinner};
use recipebook::upload::{HttpImageSink, ImageUploader};
use recipebook::wizard::{CookingStepsStep, Destination, IngredientsStep, RecipeWizard, WizardStep};

/// Everything one interactive session needs.
pub(crate) struct WizardScreen {
    wizard: RecipeWizard,
    ingredients: IngredientsStep,
    steps: CookingStepsStep,
    cover: ImageUploader,
}

impl WizardScreen {
    pub(crate) fn new(config: &RecipebookConfig, client: &BackendClient, wizard: RecipeWizard) -> Self {
        let catalog = Arc::new(client.clone());
        let sink = Arc::new(HttpImageSink::new(config.upload_url.clone()));
        let cover = ImageUploader::new(sink.clone(), config.max_upload_bytes)
            .with_current(wizard.draft().image.clone());
        Self {
            ingredients: IngredientsStep::new(catalog, PanelSettings::from(config)),
            steps: CookingStepsStep::new(ImageUploader::new(sink, config.max_upload_bytes)),
            cover,
            wizard,
        }
    }

    /// Run menus until the user submits, saves a draft or leaves.
    pub(crate) async fn run(mut self) -> Result<Destination> {
        loop {
            self.render_header();
            let outcome = match self.wizard.step() {
                WizardStep::BasicDetails => self.basic_details().await?,
                WizardStep::Ingredients => self.ingredients_menu().await?,
                WizardStep::CookingSteps => self.steps_menu().await?,
            };
            self.flush_notices();
            if let Some(destination) = outcome {
                return Ok(destination);
            }
        }
    }

    fn flush_notices(&mut self) {
        for notice in self.wizard.take_notices() {
            notice.print();
        }
    }

    fn render_header(&self) {
        let step = self.wizard.step();
        let draft = self.wizard.draft();
        println!();
        let title = if draft.name.is_empty() {
            "Untitled recipe"
        } else {
            draft.name.as_str()
        };
        println!("{}{}", RECIPE, style(title).bold());
        let trail: Vec<String> = WizardStep::ALL
            .iter()
            .map(|s| {
                let label = format!("{}. {}", s.number(), s);
                if *s == step {
                    style(label).cyan().bold().to_string()
                } else {
                    style(label).dim().to_string()
                }
            })
            .collect();
        println!("{}", trail.join("  ›  "));
        println!();
    }

    async fn basic_details(&mut self) -> Result<Option<Destination>> {
        let draft = self.wizard.draft();
        println!("  name:     {}", draft.name);
        if !draft.story.is_empty() {
            println!(
                "  story:    {}",
                textwrap::fill(&draft.story, textwrap::Options::new(70).subsequent_indent("            "))
            );
        }
        println!("  servings: {}", draft.servings);
        if let Some(image) = &draft.image {
            println!("  image:    {}{}", IMAGE, image);
        }
        println!();

        let items = [
            "Edit name",
            "Edit story",
            "Set servings",
            "Upload cover image",
            "Remove cover image",
            "Next →",
            "Save draft",
            "Cancel",
        ];
        match choose("Basic details", &items)? {
            0 => {
                let name = prompt_text("Recipe name", &self.wizard.draft().name, false)?;
                self.wizard.update(DraftUpdate::Name(name));
            }
            1 => {
                let story = prompt_text("Story behind the recipe", &self.wizard.draft().story, true)?;
                self.wizard.update(DraftUpdate::Story(story));
            }
            2 => {
                let servings: u32 = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Servings")
                    .default(self.wizard.draft().servings)
                    .interact_text()
                    .context("Failed to read servings")?;
                self.wizard.set_servings(servings);
            }
            3 => {
                if let Some(path) = prompt_image_path()? {
                    let result = with_spinner("Uploading image...", self.cover.select_path(&path)).await;
                    match result {
                        Ok(reference) => {
                            self.wizard.update(DraftUpdate::Image(Some(reference)));
                            self.wizard.notify(Notice::success("Image uploaded successfully"));
                        }
                        Err(e) => self.wizard.notify(Notice::error(e.to_string())),
                    }
                }
            }
            4 => {
                self.cover.clear();
                self.wizard.update(DraftUpdate::Image(None));
            }
            5 => {
                self.wizard.next().ok();
            }
            6 => return Ok(self.save_draft()),
            _ => return self.leave(),
        }
        Ok(None)
    }

    async fn ingredients_menu(&mut self) -> Result<Option<Destination>> {
        let lines = self.wizard.draft().ingredients.clone();
        if lines.is_empty() {
            println!("  {}", style("No ingredients yet").dim());
        }
        for (i, line) in lines.iter().enumerate() {
            let brand = if line.brand.is_empty() {
                String::new()
            } else {
                format!(" ({})", line.brand)
            };
            println!("  {}{}. {} — {}{}", INGREDIENT, i + 1, line.name, line.quantity, brand);
        }
        println!();

        let items = [
            "Add ingredient",
            "Edit ingredient",
            "Remove ingredient",
            "Next →",
            "← Back",
            "Save draft",
            "Cancel",
        ];
        match choose("Ingredients", &items)? {
            0 => {
                fill_entry(self.ingredients.add_form(), None).await?;
                with_spinner("Saving ingredient...", self.ingredients.add(&mut self.wizard))
                    .await
                    .ok();
            }
            1 => {
                if let Some(index) = pick_line(&lines.iter().map(|l| l.name.clone()).collect::<Vec<_>>())? {
                    let id = lines[index].id.clone();
                    if self.ingredients.begin_edit(&self.wizard, &id) {
                        let current = lines[index].clone();
                        fill_entry(self.ingredients.edit_form(), Some(&current)).await?;
                        with_spinner("Saving ingredient...", self.ingredients.save_edit(&mut self.wizard))
                            .await
                            .ok();
                        self.ingredients.cancel_edit();
                    }
                }
            }
            2 => {
                if let Some(index) = pick_line(&lines.iter().map(|l| l.name.clone()).collect::<Vec<_>>())? {
                    self.ingredients.remove(&mut self.wizard, &lines[index].id);
                }
            }
            3 => {
                self.wizard.next().ok();
            }
            4 => {
                self.wizard.previous();
            }
            5 => return Ok(self.save_draft()),
            _ => return self.leave(),
        }
        Ok(None)
    }

    async fn steps_menu(&mut self) -> Result<Option<Destination>> {
        let steps = self.wizard.draft().steps.clone();
        if steps.is_empty() {
            println!("  {}", style("No steps yet").dim());
        }
        for (i, step) in steps.iter().enumerate() {
            let image = if step.step_image.is_some() {
                format!(" {}", IMAGE)
            } else {
                String::new()
            };
            println!("  {}{}. {}{}", STEP, i + 1, step.instruction, image);
        }
        println!();

        let items = [
            "Add step",
            "Edit step",
            "Remove step",
            "Submit recipe",
            "← Back",
            "Save draft",
            "Cancel",
        ];
        let labels: Vec<String> = steps.iter().map(|s| s.instruction.clone()).collect();
        match choose("Cooking steps", &items)? {
            0 => {
                let text = prompt_text("Instruction", "", false)?;
                self.steps.dictate(&text);
                let attach = Confirm::new()
                    .with_prompt("Attach an image to this step?")
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if attach && let Some(path) = prompt_image_path()? {
                    let result =
                        with_spinner("Uploading image...", self.steps.uploader().select_path(&path)).await;
                    match result {
                        Ok(_) => self.wizard.notify(Notice::success("Image uploaded successfully")),
                        Err(e) => self.wizard.notify(Notice::error(e.to_string())),
                    }
                }
                self.steps.add(&mut self.wizard);
            }
            1 => {
                if let Some(index) = pick_line(&labels)? {
                    let id = steps[index].id.clone();
                    if self.steps.begin_edit(&self.wizard, &id) {
                        let text = prompt_text("Instruction", &steps[index].instruction, false)?;
                        self.steps.set_edit_text(&text);
                        if self.steps.save_edit(&mut self.wizard).is_none() {
                            self.steps.cancel_edit();
                        }
                    }
                }
            }
            2 => {
                if let Some(index) = pick_line(&labels)? {
                    self.steps.remove(&mut self.wizard, &steps[index].id);
                }
            }
            3 => return self.submit().await,
            4 => {
                self.wizard.previous();
            }
            5 => return Ok(self.save_draft()),
            _ => return self.leave(),
        }
        Ok(None)
    }

    async fn submit(&mut self) -> Result<Option<Destination>> {
        let pending = match self.wizard.begin_submit() {
            Ok(pending) => pending,
            Err(_) => return Ok(None),
        };
        let message = if self.wizard.mode().is_edit() {
            "Updating recipe..."
        } else {
            "Submitting recipe..."
        };
        let outcome = with_spinner(message, pending.send()).await;
        match self.wizard.finish_submit(outcome) {
            Ok(destination) => Ok(Some(destination)),
            Err(WizardError::Submit { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_draft(&mut self) -> Option<Destination> {
        self.wizard.save_draft().ok()
    }

    /// Offer to keep the work as a draft before leaving.
    fn leave(&mut self) -> Result<Option<Destination>> {
        let answer = Confirm::new()
            .with_prompt("Save your changes as a draft before leaving?")
            .default(true)
            .interact();
        self.settle_leave(answer)
    }

    /// An unreadable answer keeps the wizard open rather than dropping work.
    fn settle_leave(&mut self, answer: dialoguer::Result<bool>) -> Result<Option<Destination>> {
        let save = answer.context("Failed to read confirmation")?;
        if save {
            return Ok(self.save_draft());
        }
        Ok(Some(self.wizard.cancel()))
    }
}

fn choose(prompt: &str, items: &[&str]) -> Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .context("Failed to read selection")
}

fn prompt_text(prompt: &str, current: &str, allow_empty: bool) -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(allow_empty)
        .interact_text()
        .context("Failed to read input")
}

fn prompt_image_path() -> Result<Option<PathBuf>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Image file path (empty to skip)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read image path")?;
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
}

fn pick_line(labels: &[String]) -> Result<Option<usize>> {
    if labels.is_empty() {
        return Ok(None);
    }
    let mut items: Vec<String> = labels.to_vec();
    items.push("(never mind)".to_string());
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which one?")
        .items(&items)
        .default(0)
        .interact()
        .context("Failed to read selection")?;
    Ok((index < labels.len()).then_some(index))
}

/// Walk the user through one ingredient form: name with suggestions,
/// quantity, then brand suggestions scoped to the chosen ingredient.
async fn fill_entry(
    entry: &mut IngredientEntry,
    current: Option<&recipebook_common::IngredientLine>,
) -> Result<()> {
    if let Some(line) = current {
        entry.load(line);
    }

    let name = prompt_text("Ingredient", entry.name().input(), false)?;
    if current.is_none() || name != entry.name().input() {
        entry.type_name(&name);
        entry.settle().await;
        if let Some(choice) = pick_suggestion(entry.name())? {
            match choice {
                SuggestionChoice::Existing(index) => {
                    entry.select_ingredient(index)?;
                }
                SuggestionChoice::Create => {
                    if let Err(e) = with_spinner("Adding ingredient...", entry.create_ingredient()).await {
                        Notice::error(e.to_string()).print();
                    }
                }
            }
        }
        entry.dismiss();
    }

    let quantity = prompt_text("Quantity", entry.quantity(), false)?;
    entry.set_quantity(&quantity);

    if entry.name().selected().is_some() {
        let brand = prompt_text("Brand (optional)", entry.brand().input(), true)?;
        if !brand.trim().is_empty() && brand != entry.brand().input() {
            entry.type_brand(&brand);
            entry.settle().await;
            if let Some(choice) = pick_suggestion(entry.brand())? {
                match choice {
                    SuggestionChoice::Existing(index) => {
                        entry.select_brand(index)?;
                    }
                    SuggestionChoice::Create => {
                        if let Err(e) = with_spinner("Adding brand...", entry.create_brand()).await {
                            Notice::error(e.to_string()).print();
                        }
                    }
                }
            }
        } else if brand.trim().is_empty() {
            entry.type_brand("");
        }
        entry.dismiss();
    }
    Ok(())
}

enum SuggestionChoice {
    Existing(usize),
    Create,
}

/// Show a panel's suggestions; `None` keeps the text as typed.
fn pick_suggestion(panel: &SuggestionPanel) -> Result<Option<SuggestionChoice>> {
    let suggestions = panel.suggestions();
    let mut items: Vec<String> = suggestions.iter().map(|s| s.name.clone()).collect();
    let create_index = if panel.can_create() {
        items.push(format!("+ Add new \"{}\"", panel.input().trim()));
        Some(items.len() - 1)
    } else {
        None
    };
    if items.is_empty() {
        return Ok(None);
    }
    items.push("Keep as typed".to_string());

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Matching {}s", panel.kind()))
        .items(&items)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    if index < suggestions.len() {
        Ok(Some(SuggestionChoice::Existing(index)))
    } else if Some(index) == create_index {
        Ok(Some(SuggestionChoice::Create))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebook::config::{CliOverrides, RecipebookToml};
    use recipebook::draft::{DraftStore, LocalStorage};
    use recipebook::wizard::{WizardMode, WizardStep};
    use tempfile::{TempDir, tempdir};

    fn screen() -> (TempDir, WizardScreen) {
        let dir = tempdir().unwrap();
        let config = RecipebookConfig::resolve(
            dir.path().to_path_buf(),
            RecipebookToml::default(),
            |_| None,
            CliOverrides::default(),
        );
        let client = BackendClient::new(&config.api_url, &config.auth_url).unwrap();
        let drafts = DraftStore::new(LocalStorage::new(config.storage_file()));
        let mut wizard = RecipeWizard::new(WizardMode::create(), Arc::new(client.clone()), drafts);
        wizard.update(DraftUpdate::Name("Pasta".to_string()));
        let screen = WizardScreen::new(&config, &client, wizard);
        (dir, screen)
    }

    fn stored_drafts(dir: &TempDir) -> usize {
        let storage = LocalStorage::new(dir.path().join(".recipebook").join("storage.json"));
        DraftStore::new(storage).list().unwrap().len()
    }

    #[test]
    fn test_unreadable_leave_answer_keeps_wizard_open() {
        let (dir, mut screen) = screen();
        let closed = dialoguer::Error::IO(std::io::Error::other("terminal closed"));

        let err = screen.settle_leave(Err(closed)).unwrap_err();
        assert!(err.to_string().contains("Failed to read confirmation"));
        assert_eq!(screen.wizard.step(), WizardStep::BasicDetails);
        assert_eq!(screen.wizard.draft().name, "Pasta");
        assert_eq!(stored_drafts(&dir), 0);
    }

    #[test]
    fn test_leave_with_save_stores_draft() {
        let (dir, mut screen) = screen();
        let destination = screen.settle_leave(Ok(true)).unwrap();
        assert_eq!(destination, Some(Destination::RecipeList));
        assert_eq!(stored_drafts(&dir), 1);
    }

    #[test]
    fn test_leave_without_save_goes_to_dashboard() {
        let (dir, mut screen) = screen();
        let destination = screen.settle_leave(Ok(false)).unwrap();
        assert_eq!(destination, Some(Destination::Dashboard));
        assert_eq!(stored_drafts(&dir), 0);
    }
}
