//! Typed client for the recipe backend.
//!
//! The wizard and the suggestion panels talk to the backend through the
//! [`RecipeBackend`] and [`CatalogBackend`] traits so they can run against
//! an in-memory fake in tests. [`BackendClient`] is the HTTP implementation
//! and also carries the endpoints only the CLI needs (auth, listing,
//! families).

pub mod client;
pub mod types;

use async_trait::async_trait;
use recipebook_common::{CatalogId, RecipePayload, Suggestion};

use crate::errors::ApiError;

pub use client::{BackendClient, decode_response};
pub use types::{
    Ack, Credentials, Family, FamilyMember, MemberInvite, Registration, SubmitReceipt, UserInfo,
};

/// Recipe persistence used by the wizard's submit.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    async fn create_recipe(&self, payload: &RecipePayload) -> Result<SubmitReceipt, ApiError>;

    async fn update_recipe(
        &self,
        recipe_id: &str,
        payload: &RecipePayload,
    ) -> Result<SubmitReceipt, ApiError>;
}

/// Ingredient and brand catalog lookups and creation.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn search_ingredients(&self, term: &str) -> Result<Vec<Suggestion>, ApiError>;

    async fn create_ingredient(&self, name: &str) -> Result<CatalogId, ApiError>;

    /// Brands known for one ingredient.
    async fn search_brands(
        &self,
        ingredient: &CatalogId,
        term: &str,
    ) -> Result<Vec<Suggestion>, ApiError>;

    async fn create_brand(&self, ingredient: &CatalogId, name: &str)
    -> Result<CatalogId, ApiError>;
}
