//! The recipe authoring flow.
//!
//! [`RecipeWizard`] owns the draft for the session and enforces the step
//! gates. The ingredients and cooking-steps components edit the draft
//! through it, so every change goes through [`DraftModel::update`].
//!
//! [`DraftModel::update`]: crate::draft::DraftModel::update

pub mod controller;
pub mod ingredients;
pub mod steps;

use std::fmt;

use recipebook_common::DraftIdentity;

pub use controller::{PendingSubmit, RecipeWizard};
pub use ingredients::IngredientsStep;
pub use steps::CookingStepsStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    BasicDetails,
    Ingredients,
    CookingSteps,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::BasicDetails,
        WizardStep::Ingredients,
        WizardStep::CookingSteps,
    ];

    /// 1-based position shown to the user.
    pub fn number(self) -> usize {
        match self {
            WizardStep::BasicDetails => 1,
            WizardStep::Ingredients => 2,
            WizardStep::CookingSteps => 3,
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::BasicDetails => Some(WizardStep::Ingredients),
            WizardStep::Ingredients => Some(WizardStep::CookingSteps),
            WizardStep::CookingSteps => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::BasicDetails => None,
            WizardStep::Ingredients => Some(WizardStep::BasicDetails),
            WizardStep::CookingSteps => Some(WizardStep::Ingredients),
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            WizardStep::BasicDetails => "Basic Details",
            WizardStep::Ingredients => "Ingredients",
            WizardStep::CookingSteps => "Cooking Steps",
        };
        f.write_str(title)
    }
}

/// Whether the session creates a new recipe or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMode {
    /// `draft` is the temporary identity minted once for this session.
    Create { draft: DraftIdentity },
    Edit { recipe_id: String },
}

impl WizardMode {
    pub fn create() -> Self {
        WizardMode::Create {
            draft: DraftIdentity::mint_temp(),
        }
    }

    pub fn edit(recipe_id: impl Into<String>) -> Self {
        WizardMode::Edit {
            recipe_id: recipe_id.into(),
        }
    }

    /// Key the draft is saved under.
    pub fn draft_identity(&self) -> DraftIdentity {
        match self {
            WizardMode::Create { draft } => draft.clone(),
            WizardMode::Edit { recipe_id } => DraftIdentity::Recipe(recipe_id.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, WizardMode::Edit { .. })
    }
}

impl From<DraftIdentity> for WizardMode {
    /// A resumed draft edits its recipe, or keeps creating under its temp id.
    fn from(identity: DraftIdentity) -> Self {
        match identity {
            DraftIdentity::Recipe(recipe_id) => WizardMode::Edit { recipe_id },
            temp @ DraftIdentity::Temp(_) => WizardMode::Create { draft: temp },
        }
    }
}

/// Where the front end goes after a wizard action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    RecipeList,
    Dashboard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::BasicDetails.next(), Some(WizardStep::Ingredients));
        assert_eq!(WizardStep::CookingSteps.next(), None);
        assert_eq!(WizardStep::BasicDetails.previous(), None);
        assert_eq!(WizardStep::CookingSteps.number(), 3);
        assert_eq!(WizardStep::CookingSteps.to_string(), "Cooking Steps");
    }

    #[test]
    fn test_mode_identity() {
        let edit = WizardMode::edit("r-9");
        assert_eq!(edit.draft_identity(), DraftIdentity::Recipe("r-9".into()));

        let create = WizardMode::create();
        assert_eq!(create.draft_identity(), create.draft_identity());
        assert!(matches!(create.draft_identity(), DraftIdentity::Temp(_)));
    }

    #[test]
    fn test_mode_from_resumed_identity() {
        assert!(WizardMode::from(DraftIdentity::Recipe("r-1".into())).is_edit());
        assert_eq!(
            WizardMode::from(DraftIdentity::Temp(42)),
            WizardMode::Create {
                draft: DraftIdentity::Temp(42)
            }
        );
    }
}
