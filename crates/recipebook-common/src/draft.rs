use serde::{Deserialize, Serialize};

use crate::ids::{CatalogId, LineId};

/// Servings a fresh draft starts with.
pub const DEFAULT_SERVINGS: u32 = 2;

/// The recipe aggregate under construction.
///
/// Field order of `ingredients` and `steps` is display and cook order; it is
/// preserved through every serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub story: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<StepLine>,
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            story: String::new(),
            servings: DEFAULT_SERVINGS,
            image: None,
            ingredients: Vec::new(),
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub id: LineId,
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub brand: String,
    /// Catalog binding. `None` means the name is still free text.
    #[serde(rename = "ingredient_id", default)]
    pub catalog_ingredient_id: Option<CatalogId>,
}

impl IngredientLine {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        brand: impl Into<String>,
        catalog_ingredient_id: Option<CatalogId>,
    ) -> Self {
        Self {
            id: LineId::generate(),
            name: name.into(),
            quantity: quantity.into(),
            brand: brand.into(),
            catalog_ingredient_id,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.catalog_ingredient_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLine {
    pub id: LineId,
    pub instruction: String,
    #[serde(rename = "stepImage", default)]
    pub step_image: Option<String>,
}

impl StepLine {
    pub fn new(instruction: impl Into<String>, step_image: Option<String>) -> Self {
        Self {
            id: LineId::generate(),
            instruction: instruction.into(),
            step_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = RecipeDraft::default();
        assert!(draft.name.is_empty());
        assert_eq!(draft.servings, 2);
        assert!(draft.image.is_none());
        assert!(draft.ingredients.is_empty());
        assert!(draft.steps.is_empty());
    }

    #[test]
    fn test_order_survives_json() {
        let draft = RecipeDraft {
            name: "Soup".into(),
            ingredients: vec![
                IngredientLine::new("Water", "1 l", "", None),
                IngredientLine::new("Salt", "1 tsp", "Maldon", Some(CatalogId::new("c-1"))),
                IngredientLine::new("Leek", "2", "", None),
            ],
            steps: vec![
                StepLine::new("Boil", None),
                StepLine::new("Season", Some("/uploads/a.png".into())),
            ],
            ..RecipeDraft::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        let back: RecipeDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
        let names: Vec<&str> = back.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Water", "Salt", "Leek"]);
    }

    #[test]
    fn test_line_field_names_on_the_wire() {
        let line = IngredientLine::new("Salt", "1 tsp", "", Some(CatalogId::new("c-9")));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["ingredient_id"], "c-9");

        let step = StepLine::new("Stir", Some("/uploads/x.jpg".into()));
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["stepImage"], "/uploads/x.jpg");
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let draft: RecipeDraft = serde_json::from_str(r#"{"name":"Tea"}"#).unwrap();
        assert_eq!(draft.servings, 2);
        assert!(draft.story.is_empty());
    }
}
