//! In-memory backends for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use recipebook_common::{CatalogId, RecipePayload, Suggestion};

use crate::api::{CatalogBackend, RecipeBackend, SubmitReceipt};
use crate::errors::ApiError;

/// Catalog that answers from fixed lists and records every call.
#[derive(Default)]
pub struct FakeCatalog {
    pub ingredients: Vec<Suggestion>,
    /// (ingredient id, brand)
    pub brands: Vec<(String, Suggestion)>,
    pub fail_create: bool,
    pub ingredient_queries: Mutex<Vec<String>>,
    pub brand_queries: Mutex<Vec<(String, String)>>,
    pub created: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_ingredients(names: &[(&str, &str)]) -> Self {
        Self {
            ingredients: names
                .iter()
                .map(|(id, name)| Suggestion::new(*id, *name))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, ingredient: &str, id: &str, name: &str) -> Self {
        self.brands
            .push((ingredient.to_string(), Suggestion::new(id, name)));
        self
    }

    pub fn ingredient_queries(&self) -> Vec<String> {
        self.ingredient_queries.lock().unwrap().clone()
    }

    pub fn brand_queries(&self) -> Vec<(String, String)> {
        self.brand_queries.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogBackend for FakeCatalog {
    async fn search_ingredients(&self, term: &str) -> Result<Vec<Suggestion>, ApiError> {
        self.ingredient_queries
            .lock()
            .unwrap()
            .push(term.to_string());
        let needle = term.to_lowercase();
        Ok(self
            .ingredients
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_ingredient(&self, name: &str) -> Result<CatalogId, ApiError> {
        if self.fail_create {
            return Err(ApiError::Rejected {
                message: "Ingredient name is required".into(),
            });
        }
        self.created.lock().unwrap().push(name.to_string());
        Ok(CatalogId::new(format!("new-{}", name.to_lowercase())))
    }

    async fn search_brands(
        &self,
        ingredient: &CatalogId,
        term: &str,
    ) -> Result<Vec<Suggestion>, ApiError> {
        self.brand_queries
            .lock()
            .unwrap()
            .push((ingredient.to_string(), term.to_string()));
        let needle = term.to_lowercase();
        Ok(self
            .brands
            .iter()
            .filter(|(ing, b)| ing == ingredient.as_str() && b.name.to_lowercase().contains(&needle))
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn create_brand(
        &self,
        ingredient: &CatalogId,
        name: &str,
    ) -> Result<CatalogId, ApiError> {
        if self.fail_create {
            return Err(ApiError::Status {
                status: 500,
                message: Some("Database constraint error".into()),
            });
        }
        self.created
            .lock()
            .unwrap()
            .push(format!("{}:{}", ingredient, name));
        Ok(CatalogId::new(format!("brand-{}", name.to_lowercase())))
    }
}

/// Recipe backend that records payloads and answers with a canned result.
#[derive(Default)]
pub struct FakeRecipes {
    pub fail_with: Option<String>,
    pub created: Mutex<Vec<RecipePayload>>,
    pub updated: Mutex<Vec<(String, RecipePayload)>>,
}

impl FakeRecipes {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<RecipePayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(String, RecipePayload)> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeBackend for FakeRecipes {
    async fn create_recipe(&self, payload: &RecipePayload) -> Result<SubmitReceipt, ApiError> {
        if let Some(message) = &self.fail_with {
            return Err(ApiError::Status {
                status: 500,
                message: Some(message.clone()),
            });
        }
        self.created.lock().unwrap().push(payload.clone());
        Ok(SubmitReceipt {
            message: Some("Recipe saved successfully".into()),
            id: Some("r-new".into()),
        })
    }

    async fn update_recipe(
        &self,
        recipe_id: &str,
        payload: &RecipePayload,
    ) -> Result<SubmitReceipt, ApiError> {
        if let Some(message) = &self.fail_with {
            return Err(ApiError::Status {
                status: 500,
                message: Some(message.clone()),
            });
        }
        self.updated
            .lock()
            .unwrap()
            .push((recipe_id.to_string(), payload.clone()));
        Ok(SubmitReceipt {
            message: Some("Recipe updated successfully".into()),
            id: None,
        })
    }
}
