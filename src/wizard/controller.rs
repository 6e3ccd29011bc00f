use std::sync::Arc;

use recipebook_common::{RecipeDetail, RecipeDraft, RecipePayload};

use super::{Destination, WizardMode, WizardStep};
use crate::api::{RecipeBackend, SubmitReceipt};
use crate::draft::{DraftModel, DraftRecord, DraftStore, DraftUpdate};
use crate::errors::{ApiError, WizardError};
use crate::ui::Notice;

/// Drives one authoring session from basic details to submission.
pub struct RecipeWizard {
    mode: WizardMode,
    step: WizardStep,
    model: DraftModel,
    drafts: DraftStore,
    recipes: Arc<dyn RecipeBackend>,
    submitting: bool,
    notices: Vec<Notice>,
}

/// A validated submission, detached from the wizard so the request can run
/// while the front end keeps handling input.
pub struct PendingSubmit {
    recipes: Arc<dyn RecipeBackend>,
    recipe_id: Option<String>,
    payload: RecipePayload,
}

impl PendingSubmit {
    pub fn payload(&self) -> &RecipePayload {
        &self.payload
    }

    pub async fn send(self) -> Result<SubmitReceipt, ApiError> {
        match &self.recipe_id {
            Some(id) => self.recipes.update_recipe(id, &self.payload).await,
            None => self.recipes.create_recipe(&self.payload).await,
        }
    }
}

impl RecipeWizard {
    pub fn new(mode: WizardMode, recipes: Arc<dyn RecipeBackend>, drafts: DraftStore) -> Self {
        Self {
            mode,
            step: WizardStep::BasicDetails,
            model: DraftModel::new(),
            drafts,
            recipes,
            submitting: false,
            notices: Vec::new(),
        }
    }

    /// Continue from a saved draft.
    pub fn resume(record: DraftRecord, recipes: Arc<dyn RecipeBackend>, drafts: DraftStore) -> Self {
        let mut wizard = Self::new(WizardMode::from(record.identity), recipes, drafts);
        wizard.model = DraftModel::from_snapshot(record.snapshot);
        wizard
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &RecipeDraft {
        self.model.draft()
    }

    pub fn revision(&self) -> u64 {
        self.model.revision()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn update(&mut self, update: DraftUpdate) {
        self.model.update(update);
    }

    /// Servings from the stepper; never below one.
    pub fn set_servings(&mut self, servings: u32) {
        self.model.update(DraftUpdate::Servings(servings.max(1)));
    }

    /// Fill the draft from the recipe being edited. Only the first call counts.
    pub fn hydrate(&mut self, recipe: &RecipeDetail) -> bool {
        self.model.hydrate_once(recipe)
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Advance one step. Leaving the ingredients step needs at least one
    /// ingredient; the name is only checked on submit.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        if self.step == WizardStep::Ingredients && self.draft().ingredients.is_empty() {
            let err = WizardError::Blocked {
                from: self.step,
                reason: WizardError::NoIngredients.to_string(),
            };
            self.notices.push(Notice::warning(WizardError::NoIngredients.to_string()));
            return Err(err);
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn previous(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Check everything submission needs, sending the user to the step that
    /// has to be fixed.
    pub fn validate(&mut self) -> Result<(), WizardError> {
        let draft = self.model.draft();
        let failure = if draft.name.trim().is_empty() {
            Some((WizardError::MissingName, WizardStep::BasicDetails))
        } else if draft.ingredients.is_empty() {
            Some((WizardError::NoIngredients, WizardStep::Ingredients))
        } else if draft.steps.is_empty() {
            Some((WizardError::NoSteps, WizardStep::CookingSteps))
        } else {
            None
        };

        match failure {
            Some((err, step)) => {
                self.step = step;
                self.notices.push(Notice::error(err.to_string()));
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Validate and mark a submission in flight.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmitInFlight);
        }
        self.validate()?;
        self.submitting = true;

        let recipe_id = match &self.mode {
            WizardMode::Edit { recipe_id } => Some(recipe_id.clone()),
            WizardMode::Create { .. } => None,
        };
        tracing::info!(
            mode = if recipe_id.is_some() { "edit" } else { "create" },
            name = %self.draft().name,
            "Submitting recipe"
        );
        Ok(PendingSubmit {
            recipes: self.recipes.clone(),
            recipe_id,
            payload: RecipePayload::from(self.model.draft()),
        })
    }

    /// Record the outcome of a submission. State is left as it was on
    /// failure so the user can retry.
    pub fn finish_submit(
        &mut self,
        outcome: Result<SubmitReceipt, ApiError>,
    ) -> Result<Destination, WizardError> {
        self.submitting = false;
        let editing = self.mode.is_edit();
        match outcome {
            Ok(receipt) => {
                tracing::info!(id = ?receipt.id, "Recipe submitted");
                self.notices.push(Notice::success(if editing {
                    "Recipe updated successfully!"
                } else {
                    "Recipe submitted successfully!"
                }));
                Ok(Destination::RecipeList)
            }
            Err(source) => {
                let err = WizardError::Submit {
                    action: if editing { "update" } else { "submit" },
                    source,
                };
                tracing::warn!(error = %err, "Recipe submission failed");
                self.notices.push(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn submit(&mut self) -> Result<Destination, WizardError> {
        let pending = self.begin_submit()?;
        let outcome = pending.send().await;
        self.finish_submit(outcome)
    }

    /// Store the current snapshot under this session's identity.
    pub fn save_draft(&mut self) -> Result<Destination, WizardError> {
        let identity = self.mode.draft_identity();
        match self.drafts.save(&identity, self.model.draft()) {
            Ok(_) => {
                self.notices.push(Notice::success("Recipe saved as draft"));
                Ok(Destination::RecipeList)
            }
            Err(e) => {
                tracing::warn!(error = %e, %identity, "Draft save failed");
                self.notices.push(Notice::error("Failed to save draft"));
                Err(e.into())
            }
        }
    }

    /// Leave without saving.
    pub fn cancel(&mut self) -> Destination {
        tracing::debug!("Wizard cancelled");
        Destination::Dashboard
    }
}
