//! Completion catalog snapshot

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Keywords offered in the general completion context
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "ON", "AND", "OR",
    "NOT", "IN", "LIKE", "BETWEEN", "IS", "NULL", "INSERT", "INTO", "VALUES", "UPDATE", "SET",
    "DELETE", "CREATE", "TABLE", "DROP", "ALTER", "ADD", "COLUMN", "INDEX", "PRIMARY", "KEY",
    "FOREIGN", "REFERENCES", "AS", "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET",
    "DISTINCT", "COUNT", "SUM", "AVG", "MIN", "MAX",
];

/// Immutable snapshot of the identifiers known for one (connection, database) pair.
///
/// `columns_by_table` keeps insertion order so every consumer iterates columns
/// in the order the backend reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCatalog {
    pub tables: Vec<String>,
    pub columns_by_table: IndexMap<String, Vec<String>>,
    pub keywords: Vec<String>,
}

impl CompletionCatalog {
    pub fn new(
        tables: Vec<String>,
        columns_by_table: IndexMap<String, Vec<String>>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            tables,
            columns_by_table,
            keywords,
        }
    }

    /// Build a catalog from `(table, columns)` pairs using [`DEFAULT_KEYWORDS`]
    pub fn from_tables<I, T, C>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut names = Vec::new();
        let mut columns_by_table = IndexMap::new();
        for (table, columns) in tables {
            let table = table.into();
            names.push(table.clone());
            columns_by_table.insert(table, columns.into_iter().map(Into::into).collect());
        }

        Self {
            tables: names,
            columns_by_table,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Columns of `table`, or an empty slice when the table is unknown
    pub fn columns_of(&self, table: &str) -> &[String] {
        self.columns_by_table
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append keywords not already present (compared case-insensitively)
    pub fn with_extra_keywords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in extra {
            let keyword = keyword.into();
            if !self
                .keywords
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&keyword))
            {
                self.keywords.push(keyword);
            }
        }
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns_by_table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.keywords.is_empty()
    }
}
