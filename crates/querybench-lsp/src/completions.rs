//! SQL Completion Provider

use lsp_types::CompletionItem;
use std::sync::Arc;

use crate::catalog_store::CatalogStore;
use crate::resolver::resolve_at;

/// Editor-facing completion entry point backed by the active catalog
pub struct SqlCompletionProvider {
    catalog: Arc<CatalogStore>,
}

impl SqlCompletionProvider {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Suggestions for a cursor at byte `offset` of `text`
    pub fn completions(&self, text: &str, offset: usize) -> Vec<CompletionItem> {
        let catalog = self.catalog.current();
        tracing::debug!(
            offset,
            catalog_loaded = catalog.is_some(),
            "Getting SQL completions"
        );

        let completions = resolve_at(text, offset, catalog.as_deref());
        tracing::debug!(count = completions.len(), "Returning completions");
        completions
    }

    /// Whether inserting `new_text` should open the completion menu
    pub fn is_completion_trigger(&self, new_text: &str) -> bool {
        let mut chars = new_text.chars();
        match (chars.next(), chars.next()) {
            // Single character: dot (table.column) or identifier chars, never space
            (Some(ch), None) => ch == '.' || ch.is_alphanumeric() || ch == '_',
            // Paste or rapid typing: only if it looks like meaningful text
            (Some(_), Some(_)) => new_text.chars().any(char::is_alphanumeric),
            (None, _) => false,
        }
    }
}
