use serde::{Deserialize, Serialize};

use crate::ids::CatalogId;

/// Which catalog list a lookup runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Ingredient,
    Brand,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Ingredient => write!(f, "ingredient"),
            CatalogKind::Brand => write!(f, "brand"),
        }
    }
}

/// One catalog entry offered while typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// `None` for free text that is not in the catalog yet.
    #[serde(default)]
    pub id: Option<CatalogId>,
    pub name: String,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(CatalogId::new(id)),
            name: name.into(),
        }
    }

    pub fn free_text(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}
