use recipebook_common::{IngredientLine, RecipeDetail, RecipeDraft, StepLine};

/// One top-level field replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    Name(String),
    Story(String),
    Servings(u32),
    Image(Option<String>),
    Ingredients(Vec<IngredientLine>),
    Steps(Vec<StepLine>),
}

impl DraftUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            DraftUpdate::Name(_) => "name",
            DraftUpdate::Story(_) => "story",
            DraftUpdate::Servings(_) => "servings",
            DraftUpdate::Image(_) => "image",
            DraftUpdate::Ingredients(_) => "ingredients",
            DraftUpdate::Steps(_) => "steps",
        }
    }
}

/// Owner of the draft under edit.
///
/// The model does not validate; gates live in the wizard. Every update bumps
/// `revision` so a renderer can tell that something changed.
#[derive(Debug, Clone, Default)]
pub struct DraftModel {
    draft: RecipeDraft,
    revision: u64,
    hydrated: bool,
}

impl DraftModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot (a resumed draft). Counts as hydrated.
    pub fn from_snapshot(draft: RecipeDraft) -> Self {
        Self {
            draft,
            revision: 0,
            hydrated: true,
        }
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn update(&mut self, update: DraftUpdate) {
        tracing::debug!(field = update.field(), "Draft updated");
        match update {
            DraftUpdate::Name(name) => self.draft.name = name,
            DraftUpdate::Story(story) => self.draft.story = story,
            DraftUpdate::Servings(servings) => self.draft.servings = servings,
            DraftUpdate::Image(image) => self.draft.image = image,
            DraftUpdate::Ingredients(ingredients) => self.draft.ingredients = ingredients,
            DraftUpdate::Steps(steps) => self.draft.steps = steps,
        }
        self.revision += 1;
    }

    /// Load an existing recipe. Only the first call per model has an effect,
    /// so a refetch does not clobber edits in progress. Returns whether the
    /// draft was replaced.
    pub fn hydrate_once(&mut self, recipe: &RecipeDetail) -> bool {
        if self.hydrated {
            return false;
        }
        self.draft = RecipeDraft::from(recipe);
        self.hydrated = true;
        self.revision += 1;
        true
    }
}
