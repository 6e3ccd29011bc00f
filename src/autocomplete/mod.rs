//! Debounced catalog autocompletion for ingredient and brand fields.
//!
//! ```text
//! keystroke ─▶ SuggestionPanel::type_text ─▶ Debouncer (300 ms)
//!                                               │
//!                         catalog lookup ◀──────┘
//!                               │
//!        QueryOutcome ─▶ apply (only if input and scope still match)
//!                               │
//!                       rank_suggestions ─▶ suggestions
//! ```
//!
//! An [`IngredientEntry`] pairs a name panel with a brand panel scoped to
//! the resolved ingredient. The ingredients step holds two entries (add and
//! edit), so four panels share the one [`Debouncer`] type.

pub mod debounce;
pub mod entry;
pub mod panel;
pub mod rank;

use std::time::Duration;

pub use debounce::Debouncer;
pub use entry::{IngredientEntry, IngredientFields};
pub use panel::SuggestionPanel;
pub use rank::rank_suggestions;

use crate::config::RecipebookConfig;

/// Quiet period before a lookup fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest input that triggers a lookup.
pub const DEFAULT_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub debounce: Duration,
    pub min_chars: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

impl From<&RecipebookConfig> for PanelSettings {
    fn from(config: &RecipebookConfig) -> Self {
        Self {
            debounce: config.debounce,
            min_chars: config.min_chars,
        }
    }
}
