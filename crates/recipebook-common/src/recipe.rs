//! Backend recipe shapes and the mappings to and from [`RecipeDraft`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::draft::{DEFAULT_SERVINGS, IngredientLine, RecipeDraft, StepLine};
use crate::ids::{CatalogId, LineId};

/// Brand name the backend substitutes when a line has no brand.
pub const GENERIC_BRAND: &str = "Generic";

/// Body of `POST /recipes` and `PUT /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePayload {
    pub name: String,
    pub story: String,
    pub servings: u32,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientPayload>,
    pub steps: Vec<StepPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientPayload {
    pub name: String,
    pub quantity: String,
    pub brand: String,
    pub ingredient_id: Option<CatalogId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPayload {
    pub instruction: String,
    #[serde(rename = "stepImage")]
    pub step_image: Option<String>,
}

impl From<&RecipeDraft> for RecipePayload {
    /// Local line ids stay behind; list order carries display and cook order.
    fn from(draft: &RecipeDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            story: draft.story.clone(),
            servings: draft.servings,
            image: draft.image.clone(),
            ingredients: draft
                .ingredients
                .iter()
                .map(|line| IngredientPayload {
                    name: line.name.clone(),
                    quantity: line.quantity.clone(),
                    brand: line.brand.clone(),
                    ingredient_id: line.catalog_ingredient_id.clone(),
                })
                .collect(),
            steps: draft
                .steps
                .iter()
                .map(|step| StepPayload {
                    instruction: step.instruction.clone(),
                    step_image: step.step_image.clone(),
                })
                .collect(),
        }
    }
}

/// Response of `GET /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ingredients: Vec<DetailIngredient>,
    #[serde(default)]
    pub steps: Vec<DetailStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailIngredient {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub branded_ingredient_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailStep {
    #[serde(default)]
    pub step_number: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// One row of `GET /user/recipes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accept RFC 3339 or a naive ISO timestamp (read as UTC). Anything else is
/// treated as absent rather than failing the whole record.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<&RecipeDetail> for RecipeDraft {
    fn from(recipe: &RecipeDetail) -> Self {
        Self {
            name: recipe.title.clone().unwrap_or_default(),
            story: recipe.description.clone().unwrap_or_default(),
            servings: recipe.servings.filter(|s| *s > 0).unwrap_or(DEFAULT_SERVINGS),
            image: recipe.image_url.clone(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|ing| IngredientLine {
                    id: ing.id.clone().map(LineId::from).unwrap_or_else(LineId::generate),
                    name: ing.name.clone(),
                    quantity: ing.quantity.clone(),
                    brand: ing
                        .brand
                        .clone()
                        .filter(|b| b != GENERIC_BRAND)
                        .unwrap_or_default(),
                    catalog_ingredient_id: ing
                        .branded_ingredient_id
                        .clone()
                        .or_else(|| ing.id.clone())
                        .map(CatalogId::new),
                })
                .collect(),
            steps: recipe
                .steps
                .iter()
                .map(|step| StepLine {
                    id: LineId::generate(),
                    instruction: step.description.clone().unwrap_or_default(),
                    step_image: step.media_url.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> RecipeDetail {
        serde_json::from_value(serde_json::json!({
            "id": "r-1",
            "title": "Dal",
            "description": "Every Sunday",
            "servings": 4,
            "image_url": "/uploads/dal.jpg",
            "created_at": "2024-03-01T10:00:00Z",
            "ingredients": [
                {"id": "bi-1", "name": "Lentils", "quantity": "1 cup", "brand": "Generic"},
                {"id": "bi-2", "name": "Ghee", "quantity": "2 tbsp", "brand": "Amul"}
            ],
            "steps": [
                {"step_number": 1, "description": "Rinse", "media_url": null},
                {"step_number": 2, "description": "Simmer", "media_url": "/uploads/s.png", "media_type": "image"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_draft_from_detail() {
        let draft = RecipeDraft::from(&detail());
        assert_eq!(draft.name, "Dal");
        assert_eq!(draft.story, "Every Sunday");
        assert_eq!(draft.servings, 4);
        assert_eq!(draft.image.as_deref(), Some("/uploads/dal.jpg"));
        assert_eq!(draft.ingredients[0].brand, "");
        assert_eq!(draft.ingredients[1].brand, "Amul");
        assert_eq!(
            draft.ingredients[1].catalog_ingredient_id,
            Some(CatalogId::new("bi-2"))
        );
        assert_eq!(draft.steps[1].instruction, "Simmer");
        assert_eq!(draft.steps[1].step_image.as_deref(), Some("/uploads/s.png"));
    }

    #[test]
    fn test_draft_from_sparse_detail_defaults() {
        let sparse: RecipeDetail = serde_json::from_str(r#"{"id":"r-2"}"#).unwrap();
        let draft = RecipeDraft::from(&sparse);
        assert_eq!(draft.name, "");
        assert_eq!(draft.servings, 2);
        assert!(draft.ingredients.is_empty());
    }

    #[test]
    fn test_timestamps_accept_naive_and_offset_forms() {
        let summary: RecipeSummary = serde_json::from_value(serde_json::json!({
            "id": "r-3",
            "created_at": "2024-03-01T10:00:00.123456"
        }))
        .unwrap();
        assert_eq!(
            summary.created_at.unwrap().to_rfc3339(),
            "2024-03-01T10:00:00.123456+00:00"
        );

        let offset: RecipeSummary = serde_json::from_value(serde_json::json!({
            "id": "r-4",
            "created_at": "2024-03-01T12:00:00+02:00"
        }))
        .unwrap();
        assert_eq!(offset.created_at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let junk: RecipeSummary =
            serde_json::from_value(serde_json::json!({"id": "r-5", "created_at": "yesterday"}))
                .unwrap();
        assert!(junk.created_at.is_none());
    }

    #[test]
    fn test_payload_drops_line_ids() {
        let draft = RecipeDraft {
            name: "  Pasta ".into(),
            ingredients: vec![IngredientLine::new("Flour", "2 cups", "", None)],
            steps: vec![StepLine::new("Mix", None)],
            ..RecipeDraft::default()
        };
        let value = serde_json::to_value(RecipePayload::from(&draft)).unwrap();
        assert_eq!(value["name"], "Pasta");
        assert!(value["ingredients"][0].get("id").is_none());
        assert!(value["steps"][0].get("id").is_none());
        assert_eq!(value["steps"][0]["instruction"], "Mix");
        assert!(value["steps"][0]["stepImage"].is_null());
    }
}
