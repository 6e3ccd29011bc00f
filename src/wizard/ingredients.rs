use std::sync::Arc;

use recipebook_common::{IngredientLine, LineId};

use super::RecipeWizard;
use crate::api::CatalogBackend;
use crate::autocomplete::{IngredientEntry, IngredientFields, PanelSettings};
use crate::draft::DraftUpdate;
use crate::errors::{EntryError, WizardError};
use crate::ui::Notice;

/// The ingredients step: an add form, an edit form, and removal.
pub struct IngredientsStep {
    add: IngredientEntry,
    edit: IngredientEntry,
    editing: Option<LineId>,
}

impl IngredientsStep {
    pub fn new(catalog: Arc<dyn CatalogBackend>, settings: PanelSettings) -> Self {
        Self {
            add: IngredientEntry::new(catalog.clone(), settings),
            edit: IngredientEntry::new(catalog, settings),
            editing: None,
        }
    }

    pub fn add_form(&mut self) -> &mut IngredientEntry {
        &mut self.add
    }

    pub fn edit_form(&mut self) -> &mut IngredientEntry {
        &mut self.edit
    }

    /// Line currently loaded into the edit form.
    pub fn editing(&self) -> Option<&LineId> {
        self.editing.as_ref()
    }

    /// Commit the add form as a new line.
    pub async fn add(&mut self, wizard: &mut RecipeWizard) -> Result<IngredientLine, WizardError> {
        let fields = commit(&mut self.add, wizard).await?;
        let line = IngredientLine::new(
            fields.name,
            fields.quantity,
            fields.brand,
            fields.catalog_ingredient_id,
        );

        let mut lines = wizard.draft().ingredients.clone();
        lines.push(line.clone());
        wizard.update(DraftUpdate::Ingredients(lines));
        wizard.notify(Notice::success(format!("Added {} to recipe", line.name)));
        self.add.reset();
        Ok(line)
    }

    /// Load a line into the edit form. Returns false for an unknown id.
    pub fn begin_edit(&mut self, wizard: &RecipeWizard, id: &LineId) -> bool {
        let Some(line) = wizard.draft().ingredients.iter().find(|l| &l.id == id) else {
            return false;
        };
        self.edit.load(line);
        self.editing = Some(id.clone());
        true
    }

    /// Write the edit form back over the line being edited.
    pub async fn save_edit(
        &mut self,
        wizard: &mut RecipeWizard,
    ) -> Result<Option<IngredientLine>, WizardError> {
        let Some(id) = self.editing.clone() else {
            return Ok(None);
        };
        let fields = commit(&mut self.edit, wizard).await?;

        let mut lines = wizard.draft().ingredients.clone();
        let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
            self.cancel_edit();
            return Ok(None);
        };
        line.name = fields.name;
        line.quantity = fields.quantity;
        line.brand = fields.brand;
        if fields.catalog_ingredient_id.is_some() {
            line.catalog_ingredient_id = fields.catalog_ingredient_id;
        }
        let updated = line.clone();

        wizard.update(DraftUpdate::Ingredients(lines));
        wizard.notify(Notice::success(format!("Updated {}", updated.name)));
        self.cancel_edit();
        Ok(Some(updated))
    }

    pub fn cancel_edit(&mut self) {
        self.edit.reset();
        self.editing = None;
    }

    pub fn remove(&mut self, wizard: &mut RecipeWizard, id: &LineId) -> Option<IngredientLine> {
        let mut lines = wizard.draft().ingredients.clone();
        let index = lines.iter().position(|l| &l.id == id)?;
        let removed = lines.remove(index);
        wizard.update(DraftUpdate::Ingredients(lines));
        wizard.notify(Notice::info(format!("Removed {} from recipe", removed.name)));
        if self.editing.as_ref() == Some(id) {
            self.cancel_edit();
        }
        Some(removed)
    }

    pub fn poll(&mut self) {
        self.add.poll();
        self.edit.poll();
    }

    pub async fn settle(&mut self) {
        self.add.settle().await;
        self.edit.settle().await;
    }
}

/// Validate a form, creating its ingredient when unresolved, and report the
/// outcome on the wizard.
async fn commit(
    entry: &mut IngredientEntry,
    wizard: &mut RecipeWizard,
) -> Result<IngredientFields, WizardError> {
    let was_resolved = entry.name().selected().is_some();
    match entry.commit().await {
        Ok(fields) => {
            if !was_resolved {
                wizard.notify(Notice::success(format!(
                    "Added \"{}\" to ingredients database",
                    fields.name
                )));
            }
            Ok(fields)
        }
        Err(e) => {
            let message = match &e {
                EntryError::MissingFields => "Name and quantity are required".to_string(),
                other => other.to_string(),
            };
            wizard.notify(Notice::error(message));
            Err(e.into())
        }
    }
}
