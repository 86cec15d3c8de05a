//! SQL completion support
//!
//! Classifies the text before the cursor into a completion context and turns
//! the active completion catalog into suggestions for that context.
//!
//! The resolver is a pure function of `(text before cursor, catalog)`: it keeps
//! no state between calls, so typing forward and deleting back to the same
//! prefix always produce the same suggestions.

mod catalog_store;
mod completions;
mod context;
mod resolver;

#[cfg(test)]
mod tests;

pub use catalog_store::{CatalogKey, CatalogLoad, CatalogStore};
pub use completions::SqlCompletionProvider;
pub use context::{
    CONTEXT_RULES, ContextRule, SuggestionContext, classify, detect_column_of_table,
    detect_table_name,
};
pub use resolver::{resolve, resolve_at, text_before_cursor};
