//! Completion context classification
//!
//! The context is decided by an ordered rule table. Rules run in order and
//! the first one that matches wins; later rules are not evaluated.
//!
//! | # | rule              | matches when the text before the cursor ends with            | context          |
//! |---|-------------------|--------------------------------------------------------------|------------------|
//! | 1 | `column-of-table` | `<identifier>.<partial>`, nothing but word chars after the dot | `ColumnOf(table)` |
//! | 2 | `table-name`      | `FROM`, `JOIN` or `INTO`, then optional whitespace and a partial name | `TableName` |
//! | - | fallback          | anything else                                                | `General`        |
//!
//! Rule 1 precedes rule 2, so `FROM users.` offers the columns of `users`.

use regex::Regex;
use std::sync::LazyLock;

/// `users.na`, `users.`, `` `order items`.qty ``, `café.é`
///
/// An unquoted identifier cannot start with a digit, so `total > 3.` is not
/// a column reference.
static COLUMN_OF_TABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}_$])(?:`([^`]+)`|([\p{L}_$][\p{L}\p{N}_$]*))\.[\p{L}\p{N}_$]*$")
        .expect("valid regex")
});

/// `FROM`, `from `, `JOIN us`, `INTO orders`
static TABLE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:FROM|JOIN|INTO)(?:\s+\S*)?$").expect("valid regex")
});

/// Where the cursor sits, as far as suggestions are concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionContext {
    /// Right after `<table>.`: columns of that table
    ColumnOf(String),
    /// Naming a table after `FROM`, `JOIN` or `INTO`
    TableName,
    /// Anything else: keywords, tables and every column
    General,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct ContextRule {
    pub name: &'static str,
    pub detect: fn(&str) -> Option<SuggestionContext>,
}

/// Classification rules in precedence order
pub const CONTEXT_RULES: &[ContextRule] = &[
    ContextRule {
        name: "column-of-table",
        detect: detect_column_of_table,
    },
    ContextRule {
        name: "table-name",
        detect: detect_table_name,
    },
];

/// Classify the text before the cursor
pub fn classify(text_before_cursor: &str) -> SuggestionContext {
    CONTEXT_RULES
        .iter()
        .find_map(|rule| {
            let context = (rule.detect)(text_before_cursor)?;
            tracing::trace!(rule = rule.name, context = ?context, "completion context matched");
            Some(context)
        })
        .unwrap_or(SuggestionContext::General)
}

/// Rule 1: `<identifier>.<partial-identifier>` at the end of the text
pub fn detect_column_of_table(text: &str) -> Option<SuggestionContext> {
    let captures = COLUMN_OF_TABLE_REGEX.captures(text)?;
    let table = captures.get(1).or_else(|| captures.get(2))?;
    Some(SuggestionContext::ColumnOf(table.as_str().to_string()))
}

/// Rule 2: a table-introducing keyword followed by an optional partial name
pub fn detect_table_name(text: &str) -> Option<SuggestionContext> {
    TABLE_NAME_REGEX
        .is_match(text)
        .then_some(SuggestionContext::TableName)
}
