//! Query history management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::session::{QuerySession, SessionId};

/// A single query history entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    /// Id of the session that produced this entry
    pub id: SessionId,

    /// Connection ID this was run against
    pub connection_id: String,

    /// The SQL query
    pub sql: String,

    /// When the query was submitted
    pub executed_at: DateTime<Utc>,

    /// Time from submission to settlement in milliseconds
    pub duration_ms: u64,

    /// Number of rows returned
    pub row_count: Option<u64>,

    /// Error message if failed
    pub error_message: Option<String>,

    /// Whether the query succeeded
    pub success: bool,
}

impl QueryHistoryEntry {
    /// Create a successful history entry
    pub fn success(session: &QuerySession, duration_ms: u64, row_count: u64) -> Self {
        Self {
            id: session.id,
            connection_id: session.connection_id().to_string(),
            sql: session.sql().to_string(),
            executed_at: session.started_at,
            duration_ms,
            row_count: Some(row_count),
            error_message: None,
            success: true,
        }
    }

    /// Create a failed history entry
    pub fn failure(session: &QuerySession, duration_ms: u64, error: String) -> Self {
        Self {
            id: session.id,
            connection_id: session.connection_id().to_string(),
            sql: session.sql().to_string(),
            executed_at: session.started_at,
            duration_ms,
            row_count: None,
            error_message: Some(error),
            success: false,
        }
    }
}

/// Bounded query history, most recent first
#[derive(Debug)]
pub struct QueryHistory {
    entries: VecDeque<QueryHistoryEntry>,
    max_entries: usize,
}

impl QueryHistory {
    /// Create a new query history
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Add an entry to history, evicting the oldest entries past the limit
    pub fn add(&mut self, entry: QueryHistoryEntry) {
        tracing::debug!(
            session_id = %entry.id,
            success = entry.success,
            duration_ms = entry.duration_ms,
            "adding query to history"
        );
        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    /// Search history by SQL content
    pub fn search(&self, query: &str) -> impl Iterator<Item = &QueryHistoryEntry> {
        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| e.sql.to_lowercase().contains(&query_lower))
    }

    /// Clear all history
    pub fn clear(&mut self) {
        let count = self.entries.len();
        tracing::info!(entries_cleared = count, "clearing query history");
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<QueryHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(crate::DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querybench_core::QueryRequest;

    fn entry(connection_id: &str, sql: &str) -> QueryHistoryEntry {
        let session = QuerySession::start(QueryRequest::new(connection_id, sql));
        QueryHistoryEntry::success(&session, 3, 1)
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let mut history = QueryHistory::new(3);
        for i in 0..5 {
            history.add(entry("local", &format!("SELECT {}", i)));
        }

        let sqls: Vec<String> = history.to_vec().into_iter().map(|e| e.sql).collect();
        assert_eq!(sqls, vec!["SELECT 4", "SELECT 3", "SELECT 2"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_search_ignores_case() {
        let mut history = QueryHistory::default();
        history.add(entry("a", "SELECT * FROM users"));
        history.add(entry("b", "select * from Posts"));
        history.add(entry("a", "DELETE FROM posts"));

        assert_eq!(history.search("POSTS").count(), 2);
        assert_eq!(history.search("users").count(), 1);
    }

    #[test]
    fn test_failure_entry_carries_message() {
        let session = QuerySession::start(QueryRequest::new("local", "SELEC 1"));
        let failed = QueryHistoryEntry::failure(&session, 7, "syntax error".to_string());

        assert!(!failed.success);
        assert_eq!(failed.error_message.as_deref(), Some("syntax error"));
        assert_eq!(failed.row_count, None);
        assert_eq!(failed.id, session.id);
        assert_eq!(failed.executed_at, session.started_at);
    }

    #[test]
    fn test_clear() {
        let mut history = QueryHistory::new(10);
        history.add(entry("local", "SELECT 1"));
        history.clear();
        assert!(history.is_empty());
    }
}
