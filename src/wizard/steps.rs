use recipebook_common::{LineId, StepLine};

use super::RecipeWizard;
use crate::draft::DraftUpdate;
use crate::upload::ImageUploader;

/// The cooking-steps step: a new-step form with its own image uploader,
/// plus inline editing of existing steps.
pub struct CookingStepsStep {
    instruction: String,
    uploader: ImageUploader,
    editing: Option<(LineId, String)>,
}

impl CookingStepsStep {
    pub fn new(uploader: ImageUploader) -> Self {
        Self {
            instruction: String::new(),
            uploader,
            editing: None,
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn set_instruction(&mut self, text: &str) {
        self.instruction = text.to_string();
    }

    /// Entry point for a speech front end: the transcript replaces the
    /// instruction text.
    pub fn dictate(&mut self, transcript: &str) {
        tracing::debug!(chars = transcript.len(), "Dictated step text");
        self.set_instruction(transcript.trim());
    }

    pub fn uploader(&mut self) -> &mut ImageUploader {
        &mut self.uploader
    }

    /// Append the form as a new step. Blank text is ignored.
    pub fn add(&mut self, wizard: &mut RecipeWizard) -> Option<StepLine> {
        let text = self.instruction.trim();
        if text.is_empty() {
            return None;
        }
        let step = StepLine::new(text, self.uploader.reference().map(str::to_string));

        let mut steps = wizard.draft().steps.clone();
        steps.push(step.clone());
        wizard.update(DraftUpdate::Steps(steps));

        self.instruction.clear();
        self.uploader.clear();
        Some(step)
    }

    pub fn editing(&self) -> Option<&LineId> {
        self.editing.as_ref().map(|(id, _)| id)
    }

    pub fn begin_edit(&mut self, wizard: &RecipeWizard, id: &LineId) -> bool {
        let Some(step) = wizard.draft().steps.iter().find(|s| &s.id == id) else {
            return false;
        };
        self.editing = Some((id.clone(), step.instruction.clone()));
        true
    }

    pub fn set_edit_text(&mut self, text: &str) {
        if let Some((_, current)) = self.editing.as_mut() {
            *current = text.to_string();
        }
    }

    /// Write the edited text back. Blank text is ignored and editing
    /// continues.
    pub fn save_edit(&mut self, wizard: &mut RecipeWizard) -> Option<StepLine> {
        let (id, text) = self.editing.as_ref()?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut steps = wizard.draft().steps.clone();
        let step = steps.iter_mut().find(|s| &s.id == id)?;
        step.instruction = text.to_string();
        let saved = step.clone();
        wizard.update(DraftUpdate::Steps(steps));
        self.editing = None;
        Some(saved)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn remove(&mut self, wizard: &mut RecipeWizard, id: &LineId) -> Option<StepLine> {
        let mut steps = wizard.draft().steps.clone();
        let index = steps.iter().position(|s| &s.id == id)?;
        let removed = steps.remove(index);
        wizard.update(DraftUpdate::Steps(steps));
        if self.editing() == Some(id) {
            self.editing = None;
        }
        Some(removed)
    }
}
