use std::sync::Arc;

use recipebook_common::{CatalogId, CatalogKind, Suggestion};
use tokio::sync::mpsc;

use super::PanelSettings;
use super::debounce::Debouncer;
use super::rank::rank_suggestions;
use crate::api::CatalogBackend;
use crate::errors::{ApiError, EntryError};

/// What a lookup was issued for. A result is applied only while the panel
/// still shows the same input under the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryKey {
    text: String,
    scope: Option<CatalogId>,
}

#[derive(Debug)]
struct QueryOutcome {
    key: QueryKey,
    result: Result<Vec<Suggestion>, ApiError>,
}

/// One autocompleting text field backed by a catalog list.
///
/// Brand panels are scoped to a resolved ingredient and stay silent until
/// they have one.
pub struct SuggestionPanel {
    kind: CatalogKind,
    catalog: Arc<dyn CatalogBackend>,
    settings: PanelSettings,
    debouncer: Debouncer,
    input: String,
    selected: Option<CatalogId>,
    scope: Option<CatalogId>,
    suggestions: Vec<Suggestion>,
    open: bool,
    /// The query whose result we are waiting for
    pending: Option<QueryKey>,
    tx: mpsc::UnboundedSender<QueryOutcome>,
    rx: mpsc::UnboundedReceiver<QueryOutcome>,
}

impl SuggestionPanel {
    pub fn new(kind: CatalogKind, catalog: Arc<dyn CatalogBackend>, settings: PanelSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            kind,
            catalog,
            settings,
            debouncer: Debouncer::new(settings.debounce),
            input: String::new(),
            selected: None,
            scope: None,
            suggestions: Vec::new(),
            open: false,
            pending: None,
            tx,
            rx,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> Option<&CatalogId> {
        self.selected.as_ref()
    }

    pub fn scope(&self) -> Option<&CatalogId> {
        self.scope.as_ref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The user typed: replace the text, drop any binding and schedule a
    /// lookup.
    pub fn type_text(&mut self, text: &str) {
        self.input = text.to_string();
        self.selected = None;
        self.refresh();
    }

    /// Put text and a binding in place without querying (loading a line
    /// into the edit form).
    pub fn load(&mut self, text: &str, selected: Option<CatalogId>) {
        self.debouncer.cancel();
        self.pending = None;
        self.input = text.to_string();
        self.selected = selected;
        self.suggestions.clear();
        self.open = false;
    }

    /// Change the ingredient a brand panel is scoped to. A real change drops
    /// the brand binding and cached results and re-queries under the new
    /// scope.
    pub fn set_scope(&mut self, scope: Option<CatalogId>) {
        if self.scope == scope {
            return;
        }
        tracing::debug!(kind = %self.kind, ?scope, "Suggestion scope changed");
        self.scope = scope;
        self.selected = None;
        self.suggestions.clear();
        self.refresh();
    }

    /// Bind the suggestion at `index` and close the panel.
    pub fn select(&mut self, index: usize) -> Result<Suggestion, EntryError> {
        let chosen = self
            .suggestions
            .get(index)
            .cloned()
            .ok_or(EntryError::NoSuchSuggestion(index))?;
        self.debouncer.cancel();
        self.pending = None;
        self.input = chosen.name.clone();
        self.selected = chosen.id.clone();
        self.open = false;
        Ok(chosen)
    }

    /// Whether "add new" applies: nothing matched the current text.
    pub fn can_create(&self) -> bool {
        !self.input.trim().is_empty()
            && self.selected.is_none()
            && self.suggestions.is_empty()
            && self.pending.is_none()
            && (self.kind == CatalogKind::Ingredient || self.scope.is_some())
    }

    /// Create the current text as a catalog entry and bind it.
    ///
    /// On failure the field stays unresolved.
    pub async fn create(&mut self) -> Result<CatalogId, EntryError> {
        let name = self.input.trim().to_string();
        if name.is_empty() {
            return Err(EntryError::EmptyInput);
        }

        let result = match self.kind {
            CatalogKind::Ingredient => self.catalog.create_ingredient(&name).await,
            CatalogKind::Brand => {
                let scope = self.scope.clone().ok_or(EntryError::IngredientUnresolved)?;
                self.catalog.create_brand(&scope, &name).await
            }
        };

        let id = result.map_err(|source| {
            tracing::warn!(kind = %self.kind, name = %name, error = %source, "Catalog create failed");
            EntryError::Create {
                kind: self.kind,
                source,
            }
        })?;

        tracing::info!(kind = %self.kind, name = %name, %id, "Catalog entry created");
        if !self.suggestions.iter().any(|s| s.id.as_ref() == Some(&id)) {
            self.suggestions
                .insert(0, Suggestion::new(id.as_str(), name.clone()));
        }
        self.debouncer.cancel();
        self.pending = None;
        self.input = name;
        self.selected = Some(id.clone());
        self.open = false;
        Ok(id)
    }

    /// Focus moved elsewhere.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.pending = None;
        self.input.clear();
        self.selected = None;
        self.suggestions.clear();
        self.open = false;
    }

    /// Apply any lookup results that have arrived, without waiting.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Wait for the outstanding lookup, if any, and apply it.
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            match self.rx.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    fn current_key(&self) -> QueryKey {
        QueryKey {
            text: self.input.trim().to_string(),
            scope: self.scope.clone(),
        }
    }

    fn refresh(&mut self) {
        let key = self.current_key();
        let long_enough = key.text.chars().count() >= self.settings.min_chars.max(1);
        let scoped = self.kind == CatalogKind::Ingredient || key.scope.is_some();

        if !long_enough || !scoped {
            self.debouncer.cancel();
            self.pending = None;
            self.suggestions.clear();
            self.open = false;
            return;
        }

        self.open = true;
        self.pending = Some(key.clone());

        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        let kind = self.kind;
        self.debouncer.schedule(async move {
            let result = match (&kind, &key.scope) {
                (CatalogKind::Brand, Some(scope)) => catalog.search_brands(scope, &key.text).await,
                _ => catalog.search_ingredients(&key.text).await,
            };
            // The panel may be gone; nothing to deliver to then.
            let _ = tx.send(QueryOutcome { key, result });
        });
    }

    fn apply(&mut self, outcome: QueryOutcome) {
        if outcome.key != self.current_key() {
            tracing::debug!(kind = %self.kind, stale = %outcome.key.text, "Discarding stale suggestions");
            return;
        }
        if self.pending.as_ref() == Some(&outcome.key) {
            self.pending = None;
        }
        match outcome.result {
            Ok(results) => {
                self.suggestions = rank_suggestions(&outcome.key.text, results);
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "Suggestion lookup failed");
                self.suggestions.clear();
            }
        }
    }
}
