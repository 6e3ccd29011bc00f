use std::sync::Arc;

use recipebook_common::{CatalogId, CatalogKind, IngredientLine, Suggestion};

use super::PanelSettings;
use super::panel::SuggestionPanel;
use crate::api::CatalogBackend;
use crate::errors::EntryError;

/// Validated contents of an ingredient form.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientFields {
    pub name: String,
    pub quantity: String,
    pub brand: String,
    pub catalog_ingredient_id: Option<CatalogId>,
}

/// An ingredient form: name and brand panels plus a free-form quantity.
///
/// The brand panel is always scoped to whatever ingredient the name panel
/// has resolved, so brand lookups stop as soon as the name is edited.
pub struct IngredientEntry {
    name: SuggestionPanel,
    brand: SuggestionPanel,
    quantity: String,
}

impl IngredientEntry {
    pub fn new(catalog: Arc<dyn CatalogBackend>, settings: PanelSettings) -> Self {
        Self {
            name: SuggestionPanel::new(CatalogKind::Ingredient, catalog.clone(), settings),
            brand: SuggestionPanel::new(CatalogKind::Brand, catalog, settings),
            quantity: String::new(),
        }
    }

    pub fn name(&self) -> &SuggestionPanel {
        &self.name
    }

    pub fn brand(&self) -> &SuggestionPanel {
        &self.brand
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn type_name(&mut self, text: &str) {
        self.name.type_text(text);
        self.sync_scope();
    }

    pub fn type_brand(&mut self, text: &str) {
        self.brand.type_text(text);
    }

    pub fn set_quantity(&mut self, quantity: &str) {
        self.quantity = quantity.to_string();
    }

    pub fn select_ingredient(&mut self, index: usize) -> Result<Suggestion, EntryError> {
        let chosen = self.name.select(index)?;
        self.sync_scope();
        Ok(chosen)
    }

    pub fn select_brand(&mut self, index: usize) -> Result<Suggestion, EntryError> {
        self.brand.select(index)
    }

    /// "Add new" on the name field.
    pub async fn create_ingredient(&mut self) -> Result<CatalogId, EntryError> {
        let id = self.name.create().await?;
        self.sync_scope();
        Ok(id)
    }

    /// "Add new" on the brand field. Needs a resolved ingredient.
    pub async fn create_brand(&mut self) -> Result<CatalogId, EntryError> {
        if self.name.selected().is_none() {
            return Err(EntryError::IngredientUnresolved);
        }
        self.brand.create().await
    }

    pub fn dismiss(&mut self) {
        self.name.dismiss();
        self.brand.dismiss();
    }

    pub fn poll(&mut self) {
        self.name.poll();
        self.brand.poll();
    }

    /// Wait for both panels' outstanding lookups.
    pub async fn settle(&mut self) {
        self.name.settle().await;
        self.brand.settle().await;
    }

    /// Fill the form from an existing line (edit mode).
    pub fn load(&mut self, line: &IngredientLine) {
        self.name
            .load(&line.name, line.catalog_ingredient_id.clone());
        self.sync_scope();
        self.brand.load(&line.brand, None);
        self.quantity = line.quantity.clone();
    }

    pub fn reset(&mut self) {
        self.name.reset();
        self.sync_scope();
        self.brand.reset();
        self.quantity.clear();
    }

    /// Validate the form, creating the ingredient first when the name is not
    /// bound to a catalog entry yet.
    pub async fn commit(&mut self) -> Result<IngredientFields, EntryError> {
        let name = self.name.input().trim().to_string();
        let quantity = self.quantity.trim().to_string();
        if name.is_empty() || quantity.is_empty() {
            return Err(EntryError::MissingFields);
        }

        if self.name.selected().is_none() {
            self.create_ingredient().await?;
        }

        Ok(IngredientFields {
            name: self.name.input().trim().to_string(),
            quantity,
            brand: self.brand.input().trim().to_string(),
            catalog_ingredient_id: self.name.selected().cloned(),
        })
    }

    fn sync_scope(&mut self) {
        let scope = self.name.selected().cloned();
        self.brand.set_scope(scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use std::time::Duration;

    fn catalog() -> Arc<FakeCatalog> {
        Arc::new(
            FakeCatalog::with_ingredients(&[("i-1", "Salt"), ("i-2", "Sugar")])
                .with_brand("i-1", "b-1", "Maldon"),
        )
    }

    fn entry(catalog: Arc<FakeCatalog>) -> IngredientEntry {
        IngredientEntry::new(catalog, PanelSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_brand_queries_stop_when_name_edited() {
        let catalog = catalog();
        let mut form = entry(catalog.clone());

        form.type_name("salt");
        form.settle().await;
        form.select_ingredient(0).unwrap();
        assert_eq!(form.brand().scope(), Some(&CatalogId::new("i-1")));

        form.type_brand("Mal");
        form.settle().await;
        assert_eq!(catalog.brand_queries().len(), 1);
        assert_eq!(form.brand().suggestions()[0].name, "Maldon");

        form.type_name("Salty");
        assert!(form.name().selected().is_none());
        assert!(form.brand().scope().is_none());
        assert!(form.brand().suggestions().is_empty());

        form.type_brand("Maldon");
        form.settle().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(catalog.brand_queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_requires_name_and_quantity() {
        let mut form = entry(catalog());
        form.type_name("Salt");
        let err = form.commit().await.unwrap_err();
        assert!(matches!(err, EntryError::MissingFields));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_creates_unresolved_ingredient() {
        let catalog = catalog();
        let mut form = entry(catalog.clone());
        form.type_name("Saffron");
        form.set_quantity("a pinch");

        let fields = form.commit().await.unwrap();
        assert_eq!(fields.name, "Saffron");
        assert_eq!(fields.quantity, "a pinch");
        assert_eq!(fields.catalog_ingredient_id, Some(CatalogId::new("new-saffron")));
        assert_eq!(catalog.created(), vec!["Saffron".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_with_selected_ingredient_skips_create() {
        let catalog = catalog();
        let mut form = entry(catalog.clone());
        form.type_name("sug");
        form.settle().await;
        form.select_ingredient(0).unwrap();
        form.set_quantity("1 tbsp");

        let fields = form.commit().await.unwrap();
        assert_eq!(fields.catalog_ingredient_id, Some(CatalogId::new("i-2")));
        assert!(catalog.created().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_brand_needs_resolved_ingredient() {
        let mut form = entry(catalog());
        form.type_name("Salt");
        form.type_brand("Maldon");
        let err = form.create_brand().await.unwrap_err();
        assert!(matches!(err, EntryError::IngredientUnresolved));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_brand_under_selected_ingredient() {
        let catalog = catalog();
        let mut form = entry(catalog.clone());
        form.type_name("salt");
        form.settle().await;
        form.select_ingredient(0).unwrap();
        form.type_brand("Tata");
        form.settle().await;
        assert!(form.brand().can_create());

        let id = form.create_brand().await.unwrap();
        assert_eq!(id, CatalogId::new("brand-tata"));
        assert_eq!(catalog.created(), vec!["i-1:Tata".to_string()]);
        assert_eq!(form.brand().input(), "Tata");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_line_keeps_binding() {
        let catalog = catalog();
        let mut form = entry(catalog.clone());
        let line = IngredientLine::new("Salt", "1 tsp", "Maldon", Some(CatalogId::new("i-1")));
        form.load(&line);

        assert_eq!(form.name().selected(), Some(&CatalogId::new("i-1")));
        assert_eq!(form.brand().input(), "Maldon");
        assert_eq!(form.quantity(), "1 tsp");

        let fields = form.commit().await.unwrap();
        assert_eq!(fields.brand, "Maldon");
        assert!(catalog.created().is_empty());
    }
}
