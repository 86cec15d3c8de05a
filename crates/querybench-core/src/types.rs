//! Request and result payloads exchanged with the backend

use serde::{Deserialize, Serialize};

/// A request to execute SQL against a stored connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Identifier of the stored connection profile
    pub connection_id: String,
    /// SQL text as typed by the user
    pub sql: String,
    /// Database to switch to before executing
    pub database: Option<String>,
    /// Zero-based page index
    pub page: Option<u32>,
    /// Rows per page
    pub page_size: Option<u32>,
}

impl QueryRequest {
    pub fn new(connection_id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            sql: sql.into(),
            database: None,
            page: None,
            page_size: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Returns `(page, page_size)` when both halves of the pagination are set.
    ///
    /// A request carrying only one of the two is executed unpaginated.
    pub fn pagination(&self) -> Option<(u32, u32)> {
        match (self.page, self.page_size) {
            (Some(page), Some(page_size)) => Some((page, page_size)),
            _ => None,
        }
    }

    /// First 100 characters of the SQL, for log fields
    pub fn sql_preview(&self) -> String {
        self.sql.chars().take(100).collect()
    }
}

/// Rows returned by a successful execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Result rows; each row has one value per column
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Number of rows returned
    pub total_rows: usize,
    /// Execution time in milliseconds as measured by the backend
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create a new empty query result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_requires_both_halves() {
        let request = QueryRequest::new("local", "SELECT 1");
        assert_eq!(request.pagination(), None);

        let partial = QueryRequest {
            page: Some(2),
            ..request.clone()
        };
        assert_eq!(partial.pagination(), None);

        let paged = request.with_page(2, 25);
        assert_eq!(paged.pagination(), Some((2, 25)));
    }

    #[test]
    fn test_sql_preview_truncates_on_char_boundary() {
        let sql = format!("SELECT '{}'", "é".repeat(200));
        let request = QueryRequest::new("local", sql);
        assert_eq!(request.sql_preview().chars().count(), 100);
    }
}
