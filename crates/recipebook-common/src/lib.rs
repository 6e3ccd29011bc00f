//! Shared domain types for recipebook.
//!
//! Everything here is plain data: the recipe draft under edit, the lines it
//! is made of, catalog suggestions, and the backend's recipe shapes together
//! with the mappings between them. No I/O happens in this crate.

pub mod catalog;
pub mod draft;
pub mod ids;
pub mod recipe;

pub use catalog::{CatalogKind, Suggestion};
pub use draft::{IngredientLine, RecipeDraft, StepLine};
pub use ids::{CatalogId, DraftIdentity, LineId};
pub use recipe::{RecipeDetail, RecipePayload, RecipeSummary};
