//! Completion context resolver

use lsp_types::{CompletionItem, CompletionItemKind};
use querybench_core::CompletionCatalog;

use crate::context::{SuggestionContext, classify};

/// Suggestions for the text before the cursor.
///
/// Returns an empty list when no catalog has been loaded.
pub fn resolve(
    text_before_cursor: &str,
    catalog: Option<&CompletionCatalog>,
) -> Vec<CompletionItem> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };

    let context = classify(text_before_cursor);
    tracing::debug!(context = ?context, "resolving completions");

    match context {
        SuggestionContext::ColumnOf(table) => column_items(catalog, &table),
        SuggestionContext::TableName => table_items(catalog),
        SuggestionContext::General => general_items(catalog),
    }
}

/// Suggestions for a cursor at byte `offset` of `text`
pub fn resolve_at(
    text: &str,
    offset: usize,
    catalog: Option<&CompletionCatalog>,
) -> Vec<CompletionItem> {
    resolve(text_before_cursor(text, offset), catalog)
}

/// The part of `text` before byte `offset`.
///
/// Offsets past the end are clamped, and an offset inside a multi-byte
/// character is moved back to the start of that character.
pub fn text_before_cursor(text: &str, offset: usize) -> &str {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn column_items(catalog: &CompletionCatalog, table: &str) -> Vec<CompletionItem> {
    catalog
        .columns_of(table)
        .iter()
        .map(|column| CompletionItem {
            label: column.clone(),
            kind: Some(CompletionItemKind::FIELD),
            detail: Some(format!("Column from {}", table)),
            ..Default::default()
        })
        .collect()
}

fn table_items(catalog: &CompletionCatalog) -> Vec<CompletionItem> {
    catalog.tables.iter().map(|table| table_item(table)).collect()
}

fn table_item(table: &str) -> CompletionItem {
    CompletionItem {
        label: table.to_string(),
        kind: Some(CompletionItemKind::CLASS),
        detail: Some("Table".to_string()),
        ..Default::default()
    }
}

fn general_items(catalog: &CompletionCatalog) -> Vec<CompletionItem> {
    let mut items =
        Vec::with_capacity(catalog.keywords.len() + catalog.tables.len() + catalog.column_count());

    items.extend(catalog.keywords.iter().map(|keyword| CompletionItem {
        label: keyword.clone(),
        kind: Some(CompletionItemKind::KEYWORD),
        detail: Some("SQL Keyword".to_string()),
        ..Default::default()
    }));

    items.extend(catalog.tables.iter().map(|table| table_item(table)));

    // Qualified detail keeps same-named columns of different tables apart.
    for (table, columns) in &catalog.columns_by_table {
        items.extend(columns.iter().map(|column| CompletionItem {
            label: column.clone(),
            kind: Some(CompletionItemKind::FIELD),
            detail: Some(format!("{}.{}", table, column)),
            ..Default::default()
        }));
    }

    items
}
